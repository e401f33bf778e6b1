//! Table Module
//!
//! A table is a named directory of JSON entry files.
//!
//! ## Responsibilities
//! - Create the table directory on first use
//! - List entries (one per `*.json` file, ordered by id)
//! - Bind to existing entries or allocate new ones
//! - Filter entries by document content
//!
//! ## Layout
//! ```text
//! {store-root}/
//!   └── {table}/
//!       ├── {entry-id}.json
//!       └── {entry-id}.json
//! ```

mod collection;
mod entry;

pub use collection::EntryCollection;
pub use entry::{Document, Entry, SetOptions};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::crypto::Cipher;
use crate::error::{JsonDbError, Result};
use crate::pending::{DropTarget, PendingDelete};

/// File extension of entry documents
pub const ENTRY_EXTENSION: &str = "json";

/// Options for [`Table::select`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Keep at most this many matching entries
    pub limit: Option<usize>,
}

impl SelectOptions {
    /// Options with a result limit
    pub fn limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// A named collection of entries backed by one directory
///
/// Handles are value objects (name + path); every operation goes back to
/// the file system.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    root: PathBuf,
    cipher: Option<Arc<Cipher>>,
}

impl Table {
    /// Bind to `{store_root}/{name}`, creating the directory if needed
    pub(crate) fn open(store_root: &Path, name: &str, cipher: Option<Arc<Cipher>>) -> Result<Self> {
        validate_component("table name", name)?;

        let root = store_root.join(name);
        if !root.is_dir() {
            fs::create_dir_all(&root)?;
            debug!(table = name, path = %root.display(), "Created table directory");
        }

        Ok(Self {
            name: name.to_string(),
            root,
            cipher,
        })
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn cipher(&self) -> Option<&Cipher> {
        self.cipher.as_deref()
    }

    /// All entries currently on disk, ordered by id
    ///
    /// Recomputed on every call. A table whose directory has been removed
    /// has no entries.
    pub fn entries(&self) -> Result<EntryCollection> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(EntryCollection::default())
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for item in dir {
            let item = item?;
            if !item.file_type()?.is_file() {
                continue;
            }
            if let Some(id) = Self::parse_entry_id(&item.path()) {
                ids.push(id);
            }
        }
        ids.sort();

        let entries = ids
            .into_iter()
            .map(|id| Entry::bind(self.clone(), id))
            .collect();

        Ok(EntryCollection::new(entries))
    }

    /// Bind to an existing entry
    ///
    /// Fails with `NotFound` if `{id}.json` is absent.
    pub fn entry(&self, id: &str) -> Result<Entry> {
        Entry::open(self.clone(), id)
    }

    /// Allocate a new entry holding `{}`
    pub fn create_entry(&self) -> Result<Entry> {
        fs::create_dir_all(&self.root)?;
        Entry::create(self.clone())
    }

    /// Entries whose current document satisfies `predicate`
    pub fn select<F>(&self, mut predicate: F, options: SelectOptions) -> Result<EntryCollection>
    where
        F: FnMut(&Document) -> bool,
    {
        let mut matched = Vec::new();
        for entry in self.entries()? {
            if options.limit.is_some_and(|limit| matched.len() >= limit) {
                break;
            }
            let data = entry.data()?;
            if predicate(&data) {
                matched.push(entry);
            }
        }

        Ok(EntryCollection::new(matched))
    }

    /// Number of entries on disk
    pub fn count(&self) -> Result<usize> {
        Ok(self.entries()?.count())
    }

    /// Whether an entry with `id` exists
    pub fn contains(&self, id: &str) -> bool {
        validate_component("entry id", id).is_ok() && self.entry_path(id).is_file()
    }

    /// Request deletion of the whole table
    pub fn drop(&self) -> PendingDelete<Table> {
        PendingDelete::new(self.clone())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// `{table-root}/{id}.json`
    pub(crate) fn entry_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, ENTRY_EXTENSION))
    }

    /// "3f2a….json" → Some("3f2a…"); temp files end in `.tmp` and never match
    fn parse_entry_id(path: &Path) -> Option<String> {
        if path.extension()? != ENTRY_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() {
            return None;
        }
        Some(stem.to_string())
    }
}

impl DropTarget for Table {
    fn target_path(&self) -> &Path {
        &self.root
    }

    fn remove(&self) -> io::Result<()> {
        fs::remove_dir_all(&self.root)
    }
}

/// Reject names that are not a single plain path component
pub(crate) fn validate_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(JsonDbError::Validation(format!("{} must not be empty", kind)));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(JsonDbError::Validation(format!("invalid {}: {:?}", kind, value)));
    }
    Ok(())
}
