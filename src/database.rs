//! Database initialization and table definitions
//!
//! This module sets up the embedded redb database and implements
//! [`BookmarkStore`] on top of it. It also defines the state shared by all
//! request handlers.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;

use crate::config::Config;
use crate::error::StorageError;
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};
use crate::store::{BookmarkStore, InMemoryStore};

/// Main table for bookmark records
///
/// Key: bookmark id
/// Value: JSON-serialized Bookmark
///
/// Example:
/// - Key: 7
/// - Value: '{"id":7,"title":"Rust","url":"https://www.rust-lang.org",...}'
///
/// Keys are assigned in increasing order, so iterating the table yields
/// bookmarks in insertion order.
pub const TABLE_BOOKMARKS: TableDefinition<u64, &str> = TableDefinition::new("bookmarks_v1");

/// Id sequences, keyed by table name
///
/// Holds the last id handed out so that ids of deleted rows are never reused.
pub const TABLE_SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences_v1");

const BOOKMARK_SEQUENCE: &str = "bookmarks";

/// Value of `DATABASE_URL` that selects the in-memory store
pub const IN_MEMORY: &str = ":memory:";

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookmarkStore>,

    /// Bearer token required on bookmark routes; `None` disables the check
    pub api_token: Option<String>,
}

impl AppState {
    pub fn new(store: impl BookmarkStore + 'static, api_token: Option<String>) -> Self {
        Self {
            store: Arc::new(store),
            api_token,
        }
    }

    /// Opens the store named by `config.database_url`
    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let state = if config.database_url == IN_MEMORY {
            Self::new(InMemoryStore::new(), config.api_token.clone())
        } else {
            let db = init_db(&config.database_url)?;
            Self::new(RedbStore::new(db), config.api_token.clone())
        };
        Ok(state)
    }
}

/// Initializes the embedded database and creates required tables
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "data.db")
///
/// # Example
///
/// ```no_run
/// # use bookmarks::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_BOOKMARKS)?;
        write_txn.open_table(TABLE_SEQUENCES)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// [`BookmarkStore`] backed by a redb database
///
/// Every mutation runs in its own write transaction; redb serializes
/// writers, which makes each call atomic.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl BookmarkStore for RedbStore {
    fn list(&self) -> Result<Vec<Bookmark>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_BOOKMARKS)?;

        let mut bookmarks = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            bookmarks.push(serde_json::from_str::<Bookmark>(value.value())?);
        }
        Ok(bookmarks)
    }

    fn get(&self, id: u64) -> Result<Option<Bookmark>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_BOOKMARKS)?;

        let bookmark = match table.get(id)? {
            Some(value) => Some(serde_json::from_str(value.value())?),
            None => None,
        };
        Ok(bookmark)
    }

    fn insert(&self, new: NewBookmark) -> Result<Bookmark, StorageError> {
        let write_txn = self.db.begin_write()?;
        let bookmark = {
            let mut sequences = write_txn.open_table(TABLE_SEQUENCES)?;
            let id = sequences
                .get(BOOKMARK_SEQUENCE)?
                .map(|last| last.value())
                .unwrap_or(0)
                + 1;
            sequences.insert(BOOKMARK_SEQUENCE, id)?;

            let bookmark = new.into_bookmark(id);
            let record_json = serde_json::to_string(&bookmark)?;

            let mut table = write_txn.open_table(TABLE_BOOKMARKS)?;
            table.insert(id, record_json.as_str())?;
            bookmark
        };
        write_txn.commit()?;

        Ok(bookmark)
    }

    fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(TABLE_BOOKMARKS)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;

        Ok(removed)
    }

    fn update(&self, id: u64, patch: &BookmarkPatch) -> Result<Option<Bookmark>, StorageError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(TABLE_BOOKMARKS)?;

            let existing = match table.get(id)? {
                Some(value) => Some(serde_json::from_str::<Bookmark>(value.value())?),
                None => None,
            };

            match existing {
                Some(mut bookmark) => {
                    bookmark.apply(patch);
                    let record_json = serde_json::to_string(&bookmark)?;
                    table.insert(id, record_json.as_str())?;
                    Some(bookmark)
                }
                None => None,
            }
        };
        write_txn.commit()?;

        Ok(updated)
    }
}
