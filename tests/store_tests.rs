//! Tests for Store
//!
//! These tests verify:
//! - Directory layout on open
//! - Configuration validation
//! - Table listing
//! - encrypt/decrypt pass-through

use jsondb::config::Config;
use jsondb::crypto::KdfParams;
use jsondb::{JsonDbError, Store};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn fast_kdf() -> KdfParams {
    KdfParams {
        log_n: 8,
        r: 8,
        p: 1,
    }
}

fn setup_temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().root(temp_dir.path()).build();
    let store = Store::open(config).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Open / Layout Tests
// =============================================================================

#[test]
fn test_open_creates_namespace_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .root(temp_dir.path())
        .namespace("pushy")
        .build();

    let store = Store::open(config).unwrap();

    let expected = temp_dir.path().join(".databases").join("db-pushy");
    assert!(expected.is_dir());
    assert_eq!(store.root(), std::fs::canonicalize(&expected).unwrap());
}

#[test]
fn test_open_uses_default_namespace() {
    let (temp, _store) = setup_temp_store();

    assert!(temp.path().join(".databases").join("db-default").is_dir());
}

#[test]
fn test_reopen_sees_existing_entries() {
    let temp_dir = TempDir::new().unwrap();

    let first = Store::open_path(temp_dir.path()).unwrap();
    first
        .table("users")
        .unwrap()
        .create_entry()
        .unwrap()
        .merge(json!({"name": "a"}))
        .unwrap();
    drop(first);

    let second = Store::open_path(temp_dir.path()).unwrap();
    assert_eq!(second.table("users").unwrap().count().unwrap(), 1);
}

#[test]
fn test_entry_file_layout() {
    let (temp, store) = setup_temp_store();

    let entry = store.table("users").unwrap().create_entry().unwrap();

    let expected = temp
        .path()
        .join(".databases")
        .join("db-default")
        .join("users")
        .join(format!("{}.json", entry.id()));
    assert!(expected.is_file());
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_encrypt_without_key_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().root(temp_dir.path()).encrypt(true).build();

    let result = Store::open(config);

    assert!(matches!(result, Err(JsonDbError::Config(_))));
    // Nothing is created for a rejected config
    assert!(!temp_dir.path().join(".databases").exists());
}

#[test]
fn test_encrypt_with_empty_key_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .root(temp_dir.path())
        .encrypt(true)
        .key("")
        .build();

    assert!(matches!(Store::open(config), Err(JsonDbError::Config(_))));
}

#[test]
fn test_invalid_namespace_is_config_error() {
    let temp_dir = TempDir::new().unwrap();

    for namespace in ["", "a/b", ".."] {
        let config = Config::builder()
            .root(temp_dir.path())
            .namespace(namespace)
            .build();
        assert!(
            matches!(Store::open(config), Err(JsonDbError::Config(_))),
            "namespace {:?} should be rejected",
            namespace
        );
    }
}

#[test]
fn test_config_debug_redacts_key() {
    let config = Config::builder().encrypt(true).key("hunter2").build();

    let printed = format!("{:?}", config);

    assert!(!printed.contains("hunter2"));
    assert!(printed.contains("REDACTED"));
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.namespace, "default");
    assert_eq!(config.root, std::path::PathBuf::from("./.data"));
    assert!(!config.encrypt);
    assert!(config.key.is_none());
    assert_eq!(config.kdf, KdfParams::default());
}

// =============================================================================
// Table Listing Tests
// =============================================================================

#[test]
fn test_tables_lists_created_tables() {
    let (_temp, store) = setup_temp_store();

    store.table("users").unwrap();
    store.table("sessions").unwrap();

    assert_eq!(store.tables().unwrap(), vec!["sessions", "users"]);
}

#[test]
fn test_invalid_table_name_is_validation_error() {
    let (_temp, store) = setup_temp_store();

    for name in ["", "..", "a/b", "a\\b"] {
        assert!(
            matches!(store.table(name), Err(JsonDbError::Validation(_))),
            "table name {:?} should be rejected",
            name
        );
    }
}

// =============================================================================
// Encrypt / Decrypt Pass-through Tests
// =============================================================================

#[test]
fn test_store_encrypt_decrypt_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .root(temp_dir.path())
        .encrypt(true)
        .key("p")
        .kdf(fast_kdf())
        .build();
    let store = Store::open(config).unwrap();

    let blob = store.encrypt("session-token").unwrap();

    assert_ne!(blob, "session-token");
    assert_eq!(store.decrypt(&blob).unwrap(), "session-token");
}

#[test]
fn test_encrypt_on_plain_store_is_config_error() {
    let (_temp, store) = setup_temp_store();

    assert!(!store.is_encrypted());
    assert!(matches!(store.encrypt("x"), Err(JsonDbError::Config(_))));
}

#[test]
fn test_namespaces_derive_distinct_keys() {
    let temp_dir = TempDir::new().unwrap();
    let open = |namespace: &str| {
        Store::open(
            Config::builder()
                .root(temp_dir.path())
                .namespace(namespace)
                .encrypt(true)
                .key("same-password")
                .kdf(fast_kdf())
                .build(),
        )
        .unwrap()
    };
    let a = open("a");
    let b = open("b");

    let blob = a.encrypt("hello").unwrap();

    assert_eq!(a.decrypt(&blob).unwrap(), "hello");
    // A different salt gives a different key: padding failure or garbage
    match b.decrypt(&blob) {
        Ok(plaintext) => assert_ne!(plaintext, "hello"),
        Err(e) => assert!(matches!(e, JsonDbError::Crypto(_))),
    }
}
