//! Snapshot import across historical shapes, export, and migration.

use serde_json::json;
use stratagem_cache::{CacheEntry, CacheLifecycleManager, CacheStore, MemoryStorage, SnapshotShape};
use stratagem_core::config::CacheConfig;
use stratagem_core::types::ContentLengthVariant;

use crate::common::{capture_logs, logged, memory_store, now_ms, sample_strategy};

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_flat_import_skips_entry_missing_context_hash() {
    capture_logs();
    let snapshot = json!({
        "ctx-good": {
            "strategy": sample_strategy("good"),
            "timestamp": now_ms(),
            "contextHash": "abc123",
        },
        "ctx-missing-hash": {
            "strategy": sample_strategy("bad"),
            "timestamp": now_ms(),
        },
    });

    let mut store = memory_store();
    let report = CacheLifecycleManager::default().import(&mut store, &snapshot.to_string());

    assert!(report.success);
    assert_eq!(report.shape, Some(SnapshotShape::LegacyFlat));
    assert_eq!(store.len(), 1);
    assert!(store.get("ctx-good").is_some());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].key, "ctx-missing-hash");
    assert!(report.warnings[0].reason.contains("contextHash"));
    assert!(logged(log::Level::Warn, "'ctx-missing-hash'"));
}

#[test]
fn test_flat_import_converts_to_markup() {
    let snapshot = json!({
        "ctx1-brief": {
            "strategy": sample_strategy("s-1"),
            "timestamp": now_ms(),
            "contextHash": "abc123",
        },
    });

    let mut store = memory_store();
    CacheLifecycleManager::default().import(&mut store, &snapshot.to_string());

    let hit = store.load_markup("ctx1", ContentLengthVariant::Brief).unwrap();
    assert!(hit.raw_markdown.contains("# Marketing Strategies"));
    assert_eq!(store.get("ctx1-brief").unwrap().context_hash, "abc123");
}

#[test]
fn test_invalid_json_import_fails() {
    let mut store = memory_store();
    store.save("existing", CacheEntry::structured(sample_strategy("e")));

    let report = CacheLifecycleManager::default().import(&mut store, "{ invalid json }");

    assert!(!report.success);
    assert_eq!(report.imported, 0);
    assert!(report.shape.is_none());
    assert_eq!(store.keys(), vec!["existing"]);
}

#[test]
fn test_export_then_import_preserves_entries() {
    let manager = CacheLifecycleManager::default();
    let mut source = memory_store();
    source.save_markup(sample_strategy("a"), "# Sales", "ctx1", ContentLengthVariant::Detailed);
    let snapshot = manager.export(&source);
    assert_eq!(snapshot.markup_cache.len(), 1);

    let mut target = memory_store();
    let report = manager.import(&mut target, &serde_json::to_string(&snapshot).unwrap());

    assert_eq!(report.shape, Some(SnapshotShape::Enhanced));
    let hit = target.load_markup("ctx1", ContentLengthVariant::Detailed).unwrap();
    assert_eq!(hit.raw_markdown, "# Sales");
    assert_eq!(
        target.get("ctx1-detailed").unwrap().timestamp.timestamp_millis(),
        source.get("ctx1-detailed").unwrap().timestamp.timestamp_millis()
    );
}

// ============================================================================
// Migration
// ============================================================================

fn legacy_store() -> CacheStore<MemoryStorage> {
    let mut store = CacheStore::open(MemoryStorage::new(), &CacheConfig::default()).unwrap();
    let untagged = CacheEntry {
        format: None,
        ..CacheEntry::structured(sample_strategy("a"))
    };
    let mut unrenderable = CacheEntry::structured(sample_strategy("b"));
    unrenderable.structured_strategy.business_context.business_idea = String::new();

    store.save("ctx1-standard", untagged);
    store.save("ctx2", unrenderable);
    store.save_markup(sample_strategy("c"), "# Sales", "ctx3", ContentLengthVariant::Brief);
    store
}

#[test]
fn test_migrate_twice_equals_migrate_once() {
    let manager = CacheLifecycleManager::default();
    let mut once = legacy_store();
    let mut twice = CacheStore::open(MemoryStorage::new(), &CacheConfig::default()).unwrap();
    for (key, entry) in once.entries() {
        twice.save(&key, entry);
    }

    manager.migrate(&mut once);
    manager.migrate(&mut twice);
    let second = manager.migrate(&mut twice);

    assert!(!second.changed());
    assert_eq!(second.untouched, 3);
    assert_eq!(once.entries(), twice.entries());
    assert_eq!(once.markup_index(), twice.markup_index());
}

#[test]
fn test_migrate_backfills_markup_index() {
    let mut store = legacy_store();
    assert_eq!(store.markup_index().len(), 1);

    let report = CacheLifecycleManager::default().migrate(&mut store);

    assert_eq!(report.tagged, 1);
    assert_eq!(report.converted, 1);
    assert_eq!(report.recovered, 1);
    assert_eq!(store.markup_index().len(), 3);
    let recovered = store.get("ctx2").unwrap().raw_markup.clone().unwrap();
    assert!(recovered.contains("# Pricing Strategies"));
}
