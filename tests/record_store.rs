//! Integration tests for the INI-backed Record Store.

mod common;

use cityvault::error::StoreError;
use cityvault::store::{RecordStore, Scalar};
use tempfile::tempdir;

#[tokio::test]
async fn round_trip_all_scalar_types() {
    common::init_logging();
    let tmp = tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("records")).unwrap();

    let mut store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    store.update_key("10001", "coins", Scalar::Int(250)).unwrap();
    store.update_key("10001", "luck", Scalar::Float(0.75)).unwrap();
    store.update_key("10001", "jailed", Scalar::Bool(false)).unwrap();
    store.update_key("10001", "title", Scalar::from("night shift")).unwrap();
    store.save().await.unwrap();

    let store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    assert_eq!(store.read_key("10001", "coins", None).unwrap(), Scalar::Int(250));
    assert_eq!(store.read_key("10001", "luck", None).unwrap(), Scalar::Float(0.75));
    assert_eq!(store.read_key("10001", "jailed", None).unwrap(), Scalar::Bool(false));
    assert_eq!(
        store.read_key("10001", "title", None).unwrap(),
        Scalar::from("night shift")
    );
}

#[tokio::test]
async fn missing_file_yields_empty_table_without_creating_it() {
    let tmp = tempdir().unwrap();
    let store = RecordStore::open(tmp.path(), "records", "absent.ini")
        .await
        .unwrap();
    assert!(store.read_all().is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn missing_section_never_errors_and_can_be_materialized() {
    let tmp = tempdir().unwrap();
    let mut store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();

    assert!(store.read_section("nonexistent", false).is_empty());
    assert!(!store.has_section("nonexistent"));

    // Opting in creates the empty section in memory only.
    assert!(store.read_section("20001", true).is_empty());
    assert!(store.has_section("20001"));

    std::fs::create_dir_all(tmp.path().join("records")).unwrap();
    store.save().await.unwrap();

    // The empty section header survives the round trip.
    let content = std::fs::read_to_string(store.path()).unwrap();
    assert!(content.contains("[20001]"));
    let reopened = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    assert!(reopened.has_section("20001"));
}

#[tokio::test]
async fn read_key_default_and_key_not_found() {
    let tmp = tempdir().unwrap();
    let store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();

    let fallback = store
        .read_key("10001", "sign_days", Some(Scalar::Int(0)))
        .unwrap();
    assert_eq!(fallback, Scalar::Int(0));

    let err = store.read_key("10001", "sign_days", None).unwrap_err();
    assert!(matches!(err, StoreError::KeyNotFound { .. }));
}

#[tokio::test]
async fn update_is_idempotent_on_disk() {
    let tmp = tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("records")).unwrap();

    let mut store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    store.update_key("10001", "coins", Scalar::Int(99)).unwrap();
    store.save().await.unwrap();
    let once = std::fs::read(store.path()).unwrap();

    store.update_key("10001", "coins", Scalar::Int(99)).unwrap();
    store.save().await.unwrap();
    let twice = std::fs::read(store.path()).unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn batch_update_leaves_other_fields_alone() {
    let tmp = tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("records")).unwrap();

    let mut store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    store.update_key("10001", "coins", Scalar::Int(10)).unwrap();
    store
        .update_section_keys(
            "10001",
            [
                ("job".to_string(), Scalar::from("2001")),
                ("jailed".to_string(), Scalar::Bool(true)),
            ],
        )
        .unwrap();

    let section = store.read_section("10001", false);
    assert_eq!(section["coins"], Scalar::Int(10));
    assert_eq!(section["job"], Scalar::Int(2001)); // sniffing: digits read back as int
    assert_eq!(section["jailed"], Scalar::Bool(true));
}

#[tokio::test]
async fn loads_handwritten_ini_with_comments() {
    let tmp = tempdir().unwrap();
    common::write_fixture(
        tmp.path(),
        "records/briefly.ini",
        "# account ledger\n[10001]\ncoins = 250\nsigned = YES\n; note\nnickname = 小梦\n",
    );

    let store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    let all = store.read_all();
    assert_eq!(all["10001"]["coins"], Scalar::Int(250));
    assert_eq!(all["10001"]["signed"], Scalar::Bool(true));
    assert_eq!(all["10001"]["nickname"], Scalar::from("小梦"));
}

#[tokio::test]
async fn malformed_file_surfaces_load_error() {
    let tmp = tempdir().unwrap();
    common::write_fixture(tmp.path(), "records/briefly.ini", "coins = 250\n");

    let err = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Load { .. }));
}

#[tokio::test]
async fn reload_discards_unsaved_mutations() {
    let tmp = tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("records")).unwrap();

    let mut store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();
    store.update_key("10001", "coins", Scalar::Int(1)).unwrap();
    store.save().await.unwrap();

    store.update_key("10001", "coins", Scalar::Int(2)).unwrap();
    store.reload().await.unwrap();
    assert_eq!(
        store.read_key("10001", "coins", None).unwrap(),
        Scalar::Int(1)
    );
}

#[tokio::test]
async fn rejects_fields_that_break_the_ini_round_trip() {
    let tmp = tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("records")).unwrap();
    let mut store = RecordStore::open(tmp.path(), "records", "briefly.ini")
        .await
        .unwrap();

    // A line break in a value would smuggle a second line into the file
    // and make the next load fail.
    let err = store
        .update_key("10001", "note", Scalar::from("line one\nline two"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)));

    // '=' in a key would read back as a different key with a longer value.
    let err = store
        .update_key("10001", "bad=key", Scalar::Int(1))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)));

    // A key opening like a comment would silently vanish on reload.
    let err = store.update_key("10001", "#note", Scalar::Int(1)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)));

    let err = store
        .update_key("10001\n[20002]", "coins", Scalar::Int(1))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)));

    // Rejected updates leave nothing behind; the store still works.
    assert!(store.read_all().is_empty());
    store.update_key("10001", "note", Scalar::from("work = life")).unwrap();
    store.save().await.unwrap();

    // Sections materialized without the update checks are caught at save.
    store.read_section("20001\nhack", true);
    let err = store.save().await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)));
}

#[tokio::test]
async fn rejects_path_traversal_components() {
    let tmp = tempdir().unwrap();
    let err = RecordStore::open(tmp.path(), "../outside", "briefly.ini")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidName(_)));

    let err = RecordStore::open(tmp.path(), "records", "a/b.ini")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidName(_)));
}
