//! Store Module
//!
//! The root object that owns a store directory, its optional cipher and its
//! transaction queue.
//!
//! ## Responsibilities
//! - Validate configuration and create the namespace directory
//! - Derive the cipher when encryption is requested
//! - Serialize transaction bodies through the queue
//! - Expose tables and encrypt/decrypt to callers

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::crypto::Cipher;
use crate::database::Database;
use crate::error::Result;
use crate::table::Table;
use crate::transaction::{TransactionHandle, TransactionQueue};

/// An open document store
///
/// ## Concurrency Model: Serialized Transactions
///
/// - Every body passed to [`transact`](Self::transact) runs on one worker
///   thread, in submission order, to completion, so check-then-write
///   sequences inside a body are atomic with respect to other bodies.
/// - [`table`](Self::table) gives direct access outside the queue. Reads
///   there are fine; writes there are not serialized against transactions.
/// - Clones share the same queue. The worker stops when the last clone is
///   dropped, after finishing the jobs already queued.
#[derive(Clone)]
pub struct Store {
    config: Config,
    db: Database,
    queue: Arc<TransactionQueue>,
}

impl Store {
    /// Open or create the store described by `config`
    ///
    /// On startup:
    /// 1. Validate config (encryption needs a key)
    /// 2. Create `{root}/.databases/db-{namespace}`
    /// 3. Derive the cipher (salted with the store path)
    /// 4. Start the transaction worker
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Reject unusable configuration before touching disk
        config.validate()?;

        // Step 2: Create the namespace directory (idempotent)
        let store_dir = config.store_dir();
        fs::create_dir_all(&store_dir)?;
        let root = fs::canonicalize(&store_dir)?;

        // Step 3: Distinct store paths give distinct keys for the same password
        let cipher = match (config.encrypt, config.key.as_deref()) {
            (true, Some(key)) => {
                let salt = root.to_string_lossy();
                Some(Arc::new(Cipher::new(key.as_bytes(), salt.as_bytes(), config.kdf)?))
            }
            _ => None,
        };

        // Step 4: Start the worker
        let db = Database::new(root, cipher);
        let queue = TransactionQueue::start(db.clone())?;

        info!(
            namespace = %config.namespace,
            root = %db.root().display(),
            encrypted = db.is_encrypted(),
            "Store opened"
        );

        Ok(Self {
            config,
            db,
            queue: Arc::new(queue),
        })
    }

    /// Open with a root path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().root(path).build())
    }

    /// Queue `body` for exclusive, serialized execution
    ///
    /// ```no_run
    /// # use jsondb::{Store, Config};
    /// # use serde_json::json;
    /// # fn main() -> jsondb::Result<()> {
    /// let store = Store::open(Config::default())?;
    /// let id = store
    ///     .transact(|db| {
    ///         let entry = db.table("users")?.create_entry()?;
    ///         entry.merge(json!({ "name": "a" }))?;
    ///         Ok(entry.id().to_string())
    ///     })
    ///     .wait()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn transact<R, F>(&self, body: F) -> TransactionHandle<R>
    where
        F: FnOnce(&Database) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        self.queue.submit(body)
    }

    /// Open (and create if needed) a table outside the queue
    pub fn table(&self, name: &str) -> Result<Table> {
        self.db.table(name)
    }

    /// Names of all tables present on disk
    pub fn tables(&self) -> Result<Vec<String>> {
        self.db.tables()
    }

    /// Encrypt a string with the store's cipher
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        self.db.encrypt(plaintext)
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        self.db.decrypt(blob)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Store directory: `{root}/.databases/db-{namespace}`
    pub fn root(&self) -> &Path {
        self.db.root()
    }

    pub fn is_encrypted(&self) -> bool {
        self.db.is_encrypted()
    }

    /// The handle transaction bodies receive
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Transactions queued but not yet started
    pub fn pending_transactions(&self) -> usize {
        self.queue.pending()
    }

    /// Whether a transaction body is executing right now
    pub fn is_transaction_running(&self) -> bool {
        self.queue.is_running()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("namespace", &self.config.namespace)
            .field("root", &self.db.root())
            .field("encrypted", &self.db.is_encrypted())
            .finish()
    }
}
