use gomarket_core::db::open_db_in_memory;
use gomarket_core::{KeyValueStore, RepoError, SqliteKeyValueStore};

#[test]
fn get_missing_key_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert_eq!(store.get("@GoMarketplace:cart").unwrap(), None);
}

#[test]
fn set_then_get_returns_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    store.set("k", "[]").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));
}

#[test]
fn set_overwrites_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    store.set("k", "first").unwrap();
    store.set("k", "second").unwrap();

    assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn keys_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();

    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn blank_key_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert!(matches!(store.set("  ", "v"), Err(RepoError::InvalidKey(_))));
    assert!(matches!(store.get(""), Err(RepoError::InvalidKey(_))));
}

#[test]
fn store_is_usable_through_a_reference() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    let shared = &store;

    shared.set("k", "v").unwrap();
    assert_eq!(KeyValueStore::get(&shared, "k").unwrap().as_deref(), Some("v"));
}
