//! EntryCollection
//!
//! Ordered, chainable view over entry handles.

use std::slice;
use std::vec;

use super::{Document, Entry};
use crate::error::{JsonDbError, Result};

/// An ordered list of entry handles
///
/// Holds handles, not snapshots: `data()` reads every file again.
#[derive(Debug, Clone, Default)]
pub struct EntryCollection {
    items: Vec<Entry>,
}

impl EntryCollection {
    pub fn new(items: Vec<Entry>) -> Self {
        Self { items }
    }

    /// Current handles, in order
    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Entry> {
        self.items
    }

    /// Read every document, in order
    pub fn data(&self) -> Result<Vec<Document>> {
        self.items.iter().map(Entry::data).collect()
    }

    /// Keep only handles matching `predicate`
    pub fn filter<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&Entry) -> bool,
    {
        self.items.retain(|entry| predicate(entry));
        self
    }

    /// `filter` with a predicate that can fail (e.g. one that reads `data()`)
    pub fn try_filter<F>(self, mut predicate: F) -> Result<Self>
    where
        F: FnMut(&Entry) -> Result<bool>,
    {
        let mut kept = Vec::with_capacity(self.items.len());
        for entry in self.items {
            if predicate(&entry)? {
                kept.push(entry);
            }
        }
        Ok(Self { items: kept })
    }

    /// Call `f(entry, index)` for every handle
    pub fn each<F>(self, mut f: F) -> Self
    where
        F: FnMut(&Entry, usize),
    {
        for (i, entry) in self.items.iter().enumerate() {
            f(entry, i);
        }
        self
    }

    /// Handle at position `index`
    pub fn at(&self, index: usize) -> Result<&Entry> {
        self.items.get(index).ok_or(JsonDbError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        })
    }

    pub fn first(&self) -> Option<&Entry> {
        self.items.first()
    }

    /// Keep at most `limit` handles
    pub fn truncate(mut self, limit: usize) -> Self {
        self.items.truncate(limit);
        self
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids of the current handles, in order
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(Entry::id).collect()
    }

    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.items.iter()
    }
}

impl IntoIterator for EntryCollection {
    type Item = Entry;
    type IntoIter = vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a EntryCollection {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
