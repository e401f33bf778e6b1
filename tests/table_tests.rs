//! Tests for Table
//!
//! These tests verify:
//! - Directory creation and entry listing
//! - Binding to existing / missing entries
//! - select() filtering and limits
//! - Two-phase table drop

use std::fs;

use jsondb::config::Config;
use jsondb::{JsonDbError, SelectOptions, Store, Table};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_table(name: &str) -> (TempDir, Store, Table) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().root(temp_dir.path()).build();
    let store = Store::open(config).unwrap();
    let table = store.table(name).unwrap();
    (temp_dir, store, table)
}

fn insert(table: &Table, doc: serde_json::Value) -> String {
    let entry = table.create_entry().unwrap();
    entry.overwrite(doc).unwrap();
    entry.id().to_string()
}

// =============================================================================
// Directory / Listing Tests
// =============================================================================

#[test]
fn test_table_creates_directory() {
    let (_temp, store, table) = setup_temp_table("users");

    assert!(table.root().is_dir());
    assert_eq!(table.root(), store.root().join("users"));
    assert_eq!(table.name(), "users");
}

#[test]
fn test_new_table_is_empty() {
    let (_temp, _store, table) = setup_temp_table("users");

    let entries = table.entries().unwrap();

    assert_eq!(entries.count(), 0);
    assert!(entries.is_empty());
}

#[test]
fn test_entries_match_json_files_on_disk() {
    let (_temp, _store, table) = setup_temp_table("users");

    let mut ids = vec![
        insert(&table, json!({"n": 1})),
        insert(&table, json!({"n": 2})),
        insert(&table, json!({"n": 3})),
    ];
    // Files written behind the store's back are still entries
    fs::write(table.root().join("manual.json"), "{}").unwrap();
    ids.push("manual".to_string());
    // Dot-prefixed json files are entries too
    fs::write(table.root().join(".hidden.json"), "{}").unwrap();
    ids.push(".hidden".to_string());
    // Non-json files and directories are not
    fs::write(table.root().join("notes.txt"), "ignored").unwrap();
    fs::create_dir(table.root().join("nested.json")).unwrap();

    let mut on_disk: Vec<String> = table
        .entries()
        .unwrap()
        .ids()
        .into_iter()
        .map(String::from)
        .collect();
    on_disk.sort();
    ids.sort();

    assert_eq!(on_disk, ids);
}

#[test]
fn test_dot_prefixed_entry_is_listed_and_bindable() {
    let (_temp, _store, table) = setup_temp_table("users");
    fs::write(table.root().join(".hidden.json"), r#"{"name": "h"}"#).unwrap();

    let bound = table.entry(".hidden").unwrap();
    let matched = table
        .select(|doc| doc.get("name") == Some(&json!("h")), SelectOptions::default())
        .unwrap();

    assert_eq!(table.entries().unwrap().ids(), vec![".hidden"]);
    assert_eq!(table.count().unwrap(), 1);
    assert_eq!(matched.items(), &[bound]);
}

#[test]
fn test_entries_are_ordered_by_id() {
    let (_temp, _store, table) = setup_temp_table("users");

    for _ in 0..5 {
        insert(&table, json!({}));
    }

    let ids = table.entries().unwrap().ids().into_iter().map(String::from).collect::<Vec<_>>();
    let mut sorted = ids.clone();
    sorted.sort();

    assert_eq!(ids, sorted);
}

#[test]
fn test_entries_recomputed_each_call() {
    let (_temp, _store, table) = setup_temp_table("users");

    let before = table.entries().unwrap();
    insert(&table, json!({"n": 1}));
    let after = table.entries().unwrap();

    assert_eq!(before.count(), 0);
    assert_eq!(after.count(), 1);
}

#[test]
fn test_count_and_contains() {
    let (_temp, _store, table) = setup_temp_table("users");

    let id = insert(&table, json!({}));

    assert_eq!(table.count().unwrap(), 1);
    assert!(table.contains(&id));
    assert!(!table.contains("missing"));
    assert!(!table.contains("../users"));
}

// =============================================================================
// entry() Tests
// =============================================================================

#[test]
fn test_entry_binds_existing() {
    let (_temp, _store, table) = setup_temp_table("users");
    let id = insert(&table, json!({"name": "a"}));

    let entry = table.entry(&id).unwrap();

    assert_eq!(entry.id(), id);
    assert_eq!(entry.data().unwrap()["name"], "a");
}

#[test]
fn test_entry_missing_is_not_found() {
    let (_temp, _store, table) = setup_temp_table("users");

    let result = table.entry("does-not-exist");

    assert!(matches!(result, Err(JsonDbError::NotFound(_))));
}

#[test]
fn test_entry_rejects_path_like_ids() {
    let (_temp, _store, table) = setup_temp_table("users");

    for id in ["", "..", "../other", "a/b"] {
        assert!(
            matches!(table.entry(id), Err(JsonDbError::Validation(_))),
            "id {:?} should be rejected",
            id
        );
    }
}

#[test]
fn test_create_entry_writes_empty_document() {
    let (_temp, _store, table) = setup_temp_table("users");

    let entry = table.create_entry().unwrap();

    assert!(entry.path().is_file());
    assert!(entry.data().unwrap().is_empty());
}

#[test]
fn test_create_entry_allocates_unique_ids() {
    let (_temp, _store, table) = setup_temp_table("users");

    let a = table.create_entry().unwrap();
    let b = table.create_entry().unwrap();

    assert_ne!(a.id(), b.id());
    assert_eq!(table.count().unwrap(), 2);
}

// =============================================================================
// select() Tests
// =============================================================================

#[test]
fn test_select_filters_by_document() {
    let (_temp, _store, table) = setup_temp_table("users");
    insert(&table, json!({"name": "a"}));
    let b = insert(&table, json!({"name": "b"}));
    insert(&table, json!({"name": "c"}));

    let matched = table
        .select(|doc| doc["name"] == "b", SelectOptions::default())
        .unwrap();

    assert_eq!(matched.count(), 1);
    assert_eq!(matched.at(0).unwrap().id(), b);
}

#[test]
fn test_select_applies_limit() {
    let (_temp, _store, table) = setup_temp_table("queue");
    for n in 0..10 {
        insert(&table, json!({"n": n, "kind": "job"}));
    }

    let all = table
        .select(|doc| doc["kind"] == "job", SelectOptions::default())
        .unwrap();
    let limited = table
        .select(|doc| doc["kind"] == "job", SelectOptions::limit(3))
        .unwrap();

    assert_eq!(all.count(), 10);
    assert_eq!(limited.count(), 3);
    assert_eq!(limited.ids(), all.ids()[..3].to_vec());
}

#[test]
fn test_select_limit_zero_is_empty() {
    let (_temp, _store, table) = setup_temp_table("queue");
    insert(&table, json!({}));

    let matched = table.select(|_| true, SelectOptions::limit(0)).unwrap();

    assert!(matched.is_empty());
}

#[test]
fn test_select_propagates_read_errors() {
    let (_temp, _store, table) = setup_temp_table("users");
    fs::write(table.root().join("broken.json"), "{ not json").unwrap();

    let result = table.select(|_| true, SelectOptions::default());

    assert!(matches!(result, Err(JsonDbError::Serialization(_))));
}

// =============================================================================
// drop() Tests
// =============================================================================

#[test]
fn test_drop_confirm_removes_table() {
    let (_temp, _store, table) = setup_temp_table("users");
    insert(&table, json!({"name": "a"}));
    insert(&table, json!({"name": "b"}));

    let dropped = table.drop().confirm().unwrap();

    assert_eq!(dropped.name(), "users");
    assert!(!table.root().exists());
    assert_eq!(table.entries().unwrap().count(), 0);
}

#[test]
fn test_drop_cancel_keeps_table() {
    let (_temp, _store, table) = setup_temp_table("users");
    let id = insert(&table, json!({"name": "a"}));

    let kept = table.drop().cancel();

    assert_eq!(kept.root(), table.root());
    assert!(table.root().is_dir());
    assert!(table.contains(&id));
}

#[test]
fn test_drop_confirm_twice_is_not_found() {
    let (_temp, _store, table) = setup_temp_table("users");

    table.drop().confirm().unwrap();
    let second = table.drop().confirm();

    assert!(matches!(second, Err(JsonDbError::NotFound(_))));
}

#[test]
fn test_create_entry_after_drop_recreates_directory() {
    let (_temp, _store, table) = setup_temp_table("users");
    table.drop().confirm().unwrap();

    let entry = table.create_entry().unwrap();

    assert!(table.root().is_dir());
    assert_eq!(table.entries().unwrap().ids(), vec![entry.id()]);
}
