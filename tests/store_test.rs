//! Behavior shared by every `BookmarkStore` implementation
//!
//! Each check runs against both the redb store and the in-memory store.

use tempfile::NamedTempFile;

use bookmarks::config::Config;
use bookmarks::database::{init_db, AppState, RedbStore};
use bookmarks::model::{BookmarkPatch, NewBookmark};
use bookmarks::store::{BookmarkStore, InMemoryStore};

fn new_bookmark(title: &str) -> NewBookmark {
    NewBookmark {
        title: title.to_string(),
        url: format!("https://example.com/{}", title),
        description: None,
        rating: 3,
    }
}

fn with_stores(check: impl Fn(&dyn BookmarkStore)) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db = init_db(temp_db.path().to_str().unwrap()).expect("Failed to initialize test database");

    check(&RedbStore::new(db));
    check(&InMemoryStore::new());
}

#[test]
fn test_insert_assigns_increasing_ids() {
    with_stores(|store| {
        let first = store.insert(new_bookmark("a")).unwrap();
        let second = store.insert(new_bookmark("b")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get(1).unwrap(), Some(first));
    });
}

#[test]
fn test_list_returns_insertion_order() {
    with_stores(|store| {
        assert!(store.list().unwrap().is_empty());

        for title in ["c", "a", "b"] {
            store.insert(new_bookmark(title)).unwrap();
        }

        let titles: Vec<String> = store.list().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    });
}

#[test]
fn test_delete_removes_and_reports_missing() {
    with_stores(|store| {
        let bookmark = store.insert(new_bookmark("gone")).unwrap();

        assert!(store.delete(bookmark.id).unwrap());
        assert_eq!(store.get(bookmark.id).unwrap(), None);
        assert!(!store.delete(bookmark.id).unwrap());

        // The deleted id is not handed out again
        let next = store.insert(new_bookmark("next")).unwrap();
        assert!(next.id > bookmark.id);
    });
}

#[test]
fn test_update_merges_present_fields() {
    with_stores(|store| {
        let original = store.insert(new_bookmark("orig")).unwrap();
        let patch = BookmarkPatch {
            rating: Some(5),
            description: Some(Some("now described".to_string())),
            ..BookmarkPatch::default()
        };

        let updated = store.update(original.id, &patch).unwrap().expect("bookmark exists");

        assert_eq!(updated.title, original.title);
        assert_eq!(updated.url, original.url);
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.description.as_deref(), Some("now described"));
        assert_eq!(store.get(original.id).unwrap(), Some(updated));
    });
}

#[test]
fn test_update_missing_id() {
    with_stores(|store| {
        let patch = BookmarkPatch {
            title: Some("x".to_string()),
            ..BookmarkPatch::default()
        };

        assert_eq!(store.update(123456, &patch).unwrap(), None);
        assert!(store.list().unwrap().is_empty());
    });
}

#[test]
fn test_redb_store_persists_across_reopen() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp_db.path().to_str().unwrap().to_string();

    {
        let store = RedbStore::new(init_db(&path).unwrap());
        store.insert(new_bookmark("kept")).unwrap();
        store.insert(new_bookmark("dropped")).unwrap();
        store.delete(2).unwrap();
    }

    let store = RedbStore::new(init_db(&path).unwrap());
    let titles: Vec<String> = store.list().unwrap().into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["kept"]);
    assert_eq!(store.insert(new_bookmark("fresh")).unwrap().id, 3);
}

#[test]
fn test_config_from_lookup() {
    let config = Config::from_lookup(|key| match key {
        "PORT" => Some("3000".to_string()),
        "DATABASE_URL" => Some(":memory:".to_string()),
        "API_TOKEN" => Some("".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.port, 3000);
    assert_eq!(config.database_url, ":memory:");
    assert_eq!(config.api_token, None);

    assert_eq!(Config::from_lookup(|_| None).unwrap(), Config::default());
    assert!(Config::from_lookup(|key| (key == "PORT").then(|| "http".to_string())).is_err());
}

#[test]
fn test_app_state_from_config_opens_store() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let config = Config {
        database_url: temp_db.path().to_str().unwrap().to_string(),
        api_token: Some("token".to_string()),
        ..Config::default()
    };

    let state = AppState::from_config(&config).unwrap();
    assert_eq!(state.api_token.as_deref(), Some("token"));
    assert!(state.store.list().unwrap().is_empty());

    let in_memory = AppState::from_config(&Config {
        database_url: ":memory:".to_string(),
        ..Config::default()
    })
    .unwrap();
    assert!(in_memory.store.insert(new_bookmark("m")).is_ok());
}
