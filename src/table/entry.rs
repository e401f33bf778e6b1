//! Entry
//!
//! One JSON object document stored in one file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};
use uuid::Uuid;

use super::{validate_component, Table};
use crate::error::{JsonDbError, Result};
use crate::pending::{DropTarget, PendingDelete};

/// A top-level document (always a JSON object)
pub type Document = Map<String, Value>;

/// Options for [`Entry::set`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Replace the whole document instead of merging into it
    pub overwrite: bool,
}

impl SetOptions {
    /// Shallow-merge new keys over the current document
    pub fn merge() -> Self {
        Self { overwrite: false }
    }

    /// Replace the current document
    pub fn overwrite() -> Self {
        Self { overwrite: true }
    }
}

/// Handle to a single entry file
///
/// Holds only the id and resolved path; `data()` re-reads the file each
/// time, so a handle never goes stale.
#[derive(Debug, Clone)]
pub struct Entry {
    table: Table,
    id: String,
    path: PathBuf,
}

impl Entry {
    /// Bind without checking the file (used when listing a directory)
    pub(crate) fn bind(table: Table, id: String) -> Self {
        let path = table.entry_path(&id);
        Self { table, id, path }
    }

    /// Bind to an existing entry file
    pub(crate) fn open(table: Table, id: &str) -> Result<Self> {
        validate_component("entry id", id)?;

        let entry = Self::bind(table, id.to_string());
        if !entry.path.is_file() {
            return Err(JsonDbError::NotFound(format!(
                "entry {} in table {}",
                id,
                entry.table.name()
            )));
        }

        Ok(entry)
    }

    /// Allocate a fresh id and write an empty document
    pub(crate) fn create(table: Table) -> Result<Self> {
        let mut id = Uuid::new_v4().to_string();
        while table.entry_path(&id).exists() {
            id = Uuid::new_v4().to_string();
        }

        let entry = Self::bind(table, id);
        entry.write(&Document::new())?;
        debug!(table = entry.table.name(), id = %entry.id, "Created entry");

        Ok(entry)
    }

    /// Entry id (file name without `.json`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Owning table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Read the current document from disk
    pub fn data(&self) -> Result<Document> {
        let raw = fs::read_to_string(&self.path)?;
        let text = match self.table.cipher() {
            Some(cipher) => cipher.decrypt_str(&raw)?,
            None => raw,
        };

        match serde_json::from_str(&text)? {
            Value::Object(doc) => Ok(doc),
            other => Err(JsonDbError::Validation(format!(
                "entry {} holds a {} instead of an object",
                self.id,
                json_kind(&other)
            ))),
        }
    }

    /// Read the current document as `T`
    pub fn get<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.data()?))?)
    }

    /// Write `doc`, merged into or replacing the current document
    ///
    /// `doc` must be a JSON object.
    pub fn set(&self, doc: Value, options: SetOptions) -> Result<&Self> {
        let doc = match doc {
            Value::Object(doc) => doc,
            other => {
                return Err(JsonDbError::Validation(format!(
                    "document must be an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let merged = if options.overwrite {
            doc
        } else {
            let mut current = self.data()?;
            current.extend(doc);
            current
        };

        self.write(&merged)?;
        Ok(self)
    }

    /// `set` with merge semantics
    pub fn merge(&self, doc: Value) -> Result<&Self> {
        self.set(doc, SetOptions::merge())
    }

    /// `set` with overwrite semantics
    pub fn overwrite(&self, doc: Value) -> Result<&Self> {
        self.set(doc, SetOptions::overwrite())
    }

    /// Serialize `value` and `set` it
    pub fn put<T: Serialize>(&self, value: &T, options: SetOptions) -> Result<&Self> {
        self.set(serde_json::to_value(value)?, options)
    }

    /// Request deletion of this entry
    pub fn drop(&self) -> PendingDelete<Entry> {
        PendingDelete::new(self.clone())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Replace the file contents in one step
    ///
    /// The document is written to a hidden sibling and renamed over the
    /// target, so readers see either the old or the new document.
    fn write(&self, doc: &Document) -> Result<()> {
        let text = serde_json::to_string_pretty(doc)?;
        let contents = match self.table.cipher() {
            Some(cipher) => cipher.encrypt_str(&text)?,
            None => text,
        };

        let tmp_path = self.table.root().join(format!(".{}.json.tmp", self.id));
        let written = fs::write(&tmp_path, contents.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        trace!(table = self.table.name(), id = %self.id, bytes = contents.len(), "Wrote entry");
        Ok(())
    }
}

impl DropTarget for Entry {
    fn target_path(&self) -> &Path {
        &self.path
    }

    fn remove(&self) -> io::Result<()> {
        fs::remove_file(&self.path)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Entry {}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
