//! Storage interface for bookmarks
//!
//! Handlers only talk to [`BookmarkStore`]. Each method is a single atomic
//! operation on one row (or a read of all rows); the handlers never span a
//! transaction across calls.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StorageError;
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

pub trait BookmarkStore: Send + Sync {
    /// All bookmarks in ascending id order, which is insertion order
    fn list(&self) -> Result<Vec<Bookmark>, StorageError>;

    fn get(&self, id: u64) -> Result<Option<Bookmark>, StorageError>;

    /// Stores `new` under a fresh id and returns the stored record
    fn insert(&self, new: NewBookmark) -> Result<Bookmark, StorageError>;

    /// Returns `false` if there was nothing to delete
    fn delete(&self, id: u64) -> Result<bool, StorageError>;

    /// Merges `patch` into the record and returns the result, or `None` if
    /// the id does not exist. Read, merge and write happen atomically.
    fn update(&self, id: u64, patch: &BookmarkPatch) -> Result<Option<Bookmark>, StorageError>;
}

/// Map-backed store used by tests and by `DATABASE_URL=:memory:`
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: u64,
    rows: BTreeMap<u64, Bookmark>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookmarkStore for InMemoryStore {
    fn list(&self) -> Result<Vec<Bookmark>, StorageError> {
        let inner = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(inner.rows.values().cloned().collect())
    }

    fn get(&self, id: u64) -> Result<Option<Bookmark>, StorageError> {
        let inner = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(inner.rows.get(&id).cloned())
    }

    fn insert(&self, new: NewBookmark) -> Result<Bookmark, StorageError> {
        let mut inner = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        inner.last_id += 1;
        let bookmark = new.into_bookmark(inner.last_id);
        inner.rows.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        Ok(inner.rows.remove(&id).is_some())
    }

    fn update(&self, id: u64, patch: &BookmarkPatch) -> Result<Option<Bookmark>, StorageError> {
        let mut inner = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        Ok(inner.rows.get_mut(&id).map(|bookmark| {
            bookmark.apply(patch);
            bookmark.clone()
        }))
    }
}
