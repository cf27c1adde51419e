//! Persistence through the file-backed storage backend.

use stratagem_cache::{CacheEntry, CacheLifecycleManager, CacheStore, DurableStorage, FileStorage};
use stratagem_core::config::CacheConfig;
use stratagem_core::types::ContentLengthVariant;

use crate::common::sample_strategy;

#[test]
fn test_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig::default();

    {
        let mut store = CacheStore::open(FileStorage::open(dir.path()).unwrap(), &config).unwrap();
        store.save_markup(sample_strategy("a"), "# Sales", "ctx1", ContentLengthVariant::Brief);
        store.save("ctx2", CacheEntry::structured(sample_strategy("b")));
    }

    let mut store = CacheStore::open(FileStorage::open(dir.path()).unwrap(), &config).unwrap();
    assert_eq!(store.keys(), vec!["ctx1-brief", "ctx2"]);
    assert_eq!(
        store
            .load_markup("ctx1", ContentLengthVariant::Brief)
            .unwrap()
            .raw_markdown,
        "# Sales"
    );
}

#[test]
fn test_markup_index_blob_written() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let mut store = CacheStore::open(storage, &CacheConfig::default()).unwrap();
    store.save("ctx1", CacheEntry::structured(sample_strategy("a")));
    CacheLifecycleManager::default().migrate(&mut store);

    let blob = store
        .storage()
        .read("gtm-strategy-markup-cache")
        .unwrap()
        .unwrap();
    let index: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert!(index["ctx1"]["markup"].as_str().unwrap().contains("# Marketing"));
}
