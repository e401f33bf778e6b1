//! Database handle
//!
//! What a transaction body works with: the store root, the optional cipher,
//! and access to tables. It cannot submit transactions itself.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::crypto::Cipher;
use crate::error::{JsonDbError, Result};
use crate::table::Table;

/// Handle to an open store's directory and cipher
#[derive(Debug, Clone)]
pub struct Database {
    /// `{root}/.databases/db-{namespace}`
    root: PathBuf,

    /// Present when encryption at rest is enabled
    cipher: Option<Arc<Cipher>>,
}

impl Database {
    pub(crate) fn new(root: PathBuf, cipher: Option<Arc<Cipher>>) -> Self {
        Self { root, cipher }
    }

    /// Store directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Open (and create if needed) the table called `name`
    pub fn table(&self, name: &str) -> Result<Table> {
        Table::open(&self.root, name, self.cipher.clone())
    }

    /// Names of all tables present on disk, sorted
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for item in fs::read_dir(&self.root)? {
            let item = item?;
            if item.file_type()?.is_dir() {
                if let Some(name) = item.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Encrypt a string with the store's cipher
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        self.cipher()?.encrypt_str(plaintext)
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        self.cipher()?.decrypt_str(blob)
    }

    fn cipher(&self) -> Result<&Cipher> {
        self.cipher
            .as_deref()
            .ok_or_else(|| JsonDbError::Config("store was opened without encryption".to_string()))
    }
}
