//! Two-phase drop
//!
//! `drop()` on a [`Table`](crate::Table) or [`Entry`](crate::Entry) never
//! deletes anything by itself. It hands back a [`PendingDelete`] that must be
//! confirmed before the target is removed from disk.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{JsonDbError, Result};

/// Something that can be removed from disk by a [`PendingDelete`]
pub trait DropTarget {
    /// Path removed on confirm
    fn target_path(&self) -> &Path;

    /// Remove the target (directory tree for tables, single file for entries)
    fn remove(&self) -> io::Result<()>;
}

/// A delete waiting for confirmation
#[must_use = "nothing is deleted until `confirm()` is called"]
#[derive(Debug)]
pub struct PendingDelete<T: DropTarget> {
    target: T,
}

impl<T: DropTarget> PendingDelete<T> {
    pub(crate) fn new(target: T) -> Self {
        Self { target }
    }

    /// The handle this delete is bound to
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Remove the target and return its handle
    ///
    /// Fails with `NotFound` when the target is already gone.
    pub fn confirm(self) -> Result<T> {
        match self.target.remove() {
            Ok(()) => {
                debug!(path = %self.target.target_path().display(), "Deleted");
                Ok(self.target)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(JsonDbError::NotFound(format!(
                "{} does not exist",
                self.target.target_path().display()
            ))),
            Err(e) => Err(JsonDbError::Io(e)),
        }
    }

    /// Abandon the delete and return the untouched handle
    pub fn cancel(self) -> T {
        self.target
    }
}
