//! Configuration for jsondb
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::path::PathBuf;

use crate::crypto::KdfParams;
use crate::error::{JsonDbError, Result};

/// Main configuration for a jsondb store
#[derive(Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Name partitioning this store from others under the same root
    pub namespace: String,

    /// Root directory for all stores
    /// Internal structure:
    ///   {root}/
    ///     └── .databases/
    ///         └── db-{namespace}/
    ///             └── {table}/
    ///                 └── {entry-id}.json
    pub root: PathBuf,

    // -------------------------------------------------------------------------
    // Encryption Configuration
    // -------------------------------------------------------------------------
    /// Encrypt entry files at rest
    pub encrypt: bool,

    /// Password for key derivation (required when `encrypt` is set)
    pub key: Option<String>,

    /// scrypt cost parameters
    pub kdf: KdfParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            root: PathBuf::from("./.data"),
            encrypt: false,
            key: None,
            kdf: KdfParams::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("namespace", &self.namespace)
            .field("root", &self.root)
            .field("encrypt", &self.encrypt)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("kdf", &self.kdf)
            .finish()
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory owned by this store: `{root}/.databases/db-{namespace}`
    pub fn store_dir(&self) -> PathBuf {
        self.root
            .join(".databases")
            .join(format!("db-{}", self.namespace))
    }

    /// Check that the configuration can open a store
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(JsonDbError::Config("namespace must not be empty".to_string()));
        }
        if self.namespace.contains(['/', '\\']) || self.namespace == "." || self.namespace == ".." {
            return Err(JsonDbError::Config(format!(
                "invalid namespace {:?}",
                self.namespace
            )));
        }

        if self.encrypt {
            match self.key.as_deref() {
                None => {
                    return Err(JsonDbError::Config(
                        "encryption requested without a key".to_string(),
                    ))
                }
                Some("") => {
                    return Err(JsonDbError::Config("encryption key must not be empty".to_string()))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the namespace
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Set the root directory (the store lives under `{root}/.databases`)
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root = path.into();
        self
    }

    /// Enable or disable encryption at rest
    pub fn encrypt(mut self, enabled: bool) -> Self {
        self.config.encrypt = enabled;
        self
    }

    /// Set the key derivation password
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config.key = Some(key.into());
        self
    }

    /// Set the scrypt cost parameters
    pub fn kdf(mut self, params: KdfParams) -> Self {
        self.config.kdf = params;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
