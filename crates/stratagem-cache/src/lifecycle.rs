//! Snapshot export and import, and in-place format migration.
//!
//! Import isolates every entry: a bad entry is skipped with a warning that
//! names its key and never aborts the rest. Only an unparseable document
//! fails the import as a whole, in which case nothing is imported.
//!
//! Structured payloads are opportunistically rendered to markup on the way
//! in. A payload that cannot be rendered is kept structured rather than
//! dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use stratagem_convert::StrategyConverter;
use stratagem_core::types::{ContentLengthVariant, MarkupStrategy, StructuredStrategy};
use stratagem_core::{Error, Result};

use crate::entry::{CacheEntry, CacheFormat, MarkupIndexEntry, key_variant};
use crate::snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotShape, parse_snapshot};
use crate::storage::DurableStorage;
use crate::store::CacheStore;

/// One skipped snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportWarning {
    /// Cache key of the entry.
    pub key: String,
    /// Why it was skipped.
    pub reason: String,
}

impl From<ImportWarning> for Error {
    fn from(warning: ImportWarning) -> Self {
        Error::entry_skipped(warning.key, warning.reason)
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// `false` only when the document itself was unusable.
    pub success: bool,
    /// Entries merged into the store.
    pub imported: usize,
    /// Detected layout; `None` when the document could not be parsed.
    pub shape: Option<SnapshotShape>,
    /// Entries that were skipped.
    pub warnings: Vec<ImportWarning>,
    /// Top-level failure, when `success` is `false`.
    pub error: Option<String>,
}

impl ImportReport {
    fn failed(error: &Error) -> Self {
        Self {
            success: false,
            imported: 0,
            shape: None,
            warnings: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Outcome of a migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Untagged entries tagged as structured.
    pub tagged: usize,
    /// Structured entries rendered to markup.
    pub converted: usize,
    /// Structured entries given the recovery template instead.
    pub recovered: usize,
    /// Entries already in markup form.
    pub untouched: usize,
}

impl MigrationReport {
    /// Whether the pass changed anything.
    pub fn changed(&self) -> bool {
        self.tagged + self.converted + self.recovered > 0
    }
}

/// Export, import and migration over a [`CacheStore`].
#[derive(Debug, Default)]
pub struct CacheLifecycleManager {
    converter: StrategyConverter,
}

impl CacheLifecycleManager {
    /// Manager using `converter` for opportunistic conversion.
    pub fn new(converter: StrategyConverter) -> Self {
        Self { converter }
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Snapshot of every entry and the derived markup index.
    pub fn export<S: DurableStorage>(&self, store: &CacheStore<S>) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: Utc::now(),
            cache: store.entries(),
            markup_cache: store.markup_index(),
        }
    }

    /// Snapshot as pretty-printed JSON.
    pub fn export_json<S: DurableStorage>(&self, store: &CacheStore<S>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export(store))?)
    }

    // ------------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------------

    /// Merge a snapshot document into `store`. Never panics.
    ///
    /// Imported keys overwrite existing ones; other keys are kept. The store
    /// is persisted once at the end.
    pub fn import<S: DurableStorage>(&self, store: &mut CacheStore<S>, input: &str) -> ImportReport {
        let raw = match parse_snapshot(input) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to parse cache snapshot: {e}");
                return ImportReport::failed(&e);
            }
        };

        let mut warnings = Vec::new();
        let mut imported = Vec::new();
        for (key, value) in raw.entries {
            let result = match raw.shape {
                SnapshotShape::Enhanced => self.enhanced_entry(&key, &value),
                SnapshotShape::LegacyDualCache => dual_cache_entry(&value),
                SnapshotShape::LegacyFlat => self.flat_entry(&key, &value),
            };
            match result {
                Ok(entry) => imported.push((key, entry)),
                Err(reason) => {
                    log::warn!("Skipping cache entry '{key}': {reason}");
                    warnings.push(ImportWarning { key, reason });
                }
            }
        }

        attach_index_markup(&mut imported, &raw.markup_cache);

        let count = imported.len();
        if !store.merge(imported) {
            log::warn!("Imported entries are held in memory only; durable write failed");
        }
        log::info!(
            "Imported {count} cache entries from {} snapshot ({} skipped)",
            raw.shape,
            warnings.len()
        );

        ImportReport {
            success: true,
            imported: count,
            shape: Some(raw.shape),
            warnings,
            error: None,
        }
    }

    /// Version-tagged entry: detect the embedded payload's representation.
    fn enhanced_entry(&self, key: &str, value: &Value) -> std::result::Result<CacheEntry, String> {
        let object = value.as_object().ok_or("entry is not an object")?;
        let payload = object
            .get("structuredStrategy")
            .or_else(|| object.get("strategy"))
            .ok_or("entry has no strategy payload")?;
        let timestamp = timestamp_of(object).ok_or("entry has no valid timestamp")?;
        let variant = object
            .get("contentLengthVariant")
            .and_then(|v| serde_json::from_value::<ContentLengthVariant>(v.clone()).ok())
            .or_else(|| key_variant(key));

        let mut entry = if is_markup_payload(payload) {
            let markup: MarkupStrategy = serde_json::from_value(payload.clone())
                .map_err(|e| format!("unreadable markup payload: {e}"))?;
            let extraction = self.converter.to_structured(&markup);
            let variant = variant.unwrap_or(markup.metadata.content_length_variant);
            CacheEntry::with_markup(extraction.strategy, markup.raw_markup, variant)
        } else if is_structured_payload(payload) {
            let strategy: StructuredStrategy = serde_json::from_value(payload.clone())
                .map_err(|e| format!("unreadable structured payload: {e}"))?;
            let existing_markup = object
                .get("rawMarkup")
                .and_then(Value::as_str)
                .map(str::to_string);
            match existing_markup {
                Some(markup) => {
                    CacheEntry::with_markup(strategy, markup, variant.unwrap_or_default())
                }
                None => self.render_or_keep(key, strategy, variant.unwrap_or_default()),
            }
        } else {
            return Err("unrecognized strategy payload".to_string());
        };

        entry.timestamp = timestamp;
        if let Some(hash) = object.get("contextHash").and_then(Value::as_str) {
            entry.context_hash = hash.to_string();
        }
        Ok(entry)
    }

    /// Flat legacy entry: `{strategy, timestamp, contextHash}` all required.
    fn flat_entry(&self, key: &str, value: &Value) -> std::result::Result<CacheEntry, String> {
        let object = value.as_object().ok_or("entry is not an object")?;
        let missing: Vec<&str> = ["strategy", "timestamp", "contextHash"]
            .into_iter()
            .filter(|field| object.get(*field).is_none_or(Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing {}", missing.join(", ")));
        }

        let strategy: StructuredStrategy = serde_json::from_value(object["strategy"].clone())
            .map_err(|e| format!("unreadable strategy: {e}"))?;
        let timestamp = timestamp_of(object).ok_or("invalid timestamp")?;
        let context_hash = object["contextHash"]
            .as_str()
            .ok_or("contextHash is not a string")?
            .to_string();

        let variant = key_variant(key).unwrap_or_default();
        let mut entry = self.render_or_keep(key, strategy, variant);
        entry.timestamp = timestamp;
        entry.context_hash = context_hash;
        Ok(entry)
    }

    fn render_or_keep(
        &self,
        key: &str,
        strategy: StructuredStrategy,
        variant: ContentLengthVariant,
    ) -> CacheEntry {
        match self.converter.to_markup(&strategy, variant) {
            Ok(markup) => CacheEntry::with_markup(strategy, markup.raw_markup, variant),
            Err(e) => {
                log::warn!("Keeping cache entry '{key}' structured: {e}");
                CacheEntry {
                    content_length_variant: key_variant(key),
                    ..CacheEntry::structured(strategy)
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Migration
    // ------------------------------------------------------------------------

    /// Bring every entry to the current format, in place. Idempotent.
    ///
    /// Untagged entries are tagged structured; entries without markup are
    /// rendered (or given the recovery template). Timestamps are kept.
    pub fn migrate<S: DurableStorage>(&self, store: &mut CacheStore<S>) -> MigrationReport {
        let mut report = MigrationReport::default();

        for (key, entry) in store.entries_mut() {
            if entry.format.is_none() {
                entry.format = Some(CacheFormat::Structured);
                report.tagged += 1;
            }
            if entry.raw_markup.is_some() {
                if entry.has_markup() {
                    report.untouched += 1;
                }
                continue;
            }

            let variant = entry
                .content_length_variant
                .or_else(|| key_variant(key))
                .unwrap_or_default();
            let (markup, recovered) = self
                .converter
                .to_markup_or_recover(&entry.structured_strategy, variant);
            if recovered {
                report.recovered += 1;
            } else {
                report.converted += 1;
            }

            entry.raw_markup = Some(markup.raw_markup);
            entry.format = Some(CacheFormat::Markup);
            entry.content_length_variant = Some(variant);
        }

        if report.changed() {
            store.persist();
        }
        log::info!(
            "Migration: {} tagged, {} converted, {} recovered, {} untouched",
            report.tagged,
            report.converted,
            report.recovered,
            report.untouched
        );
        report
    }
}

fn dual_cache_entry(value: &Value) -> std::result::Result<CacheEntry, String> {
    serde_json::from_value(value.clone()).map_err(|e| format!("unreadable entry: {e}"))
}

/// Give markup from the index to imported entries that lack it.
fn attach_index_markup(entries: &mut [(String, CacheEntry)], index: &Map<String, Value>) {
    for (key, entry) in entries.iter_mut() {
        if entry.raw_markup.is_some() {
            continue;
        }
        let Some(value) = index.get(key) else {
            continue;
        };
        match serde_json::from_value::<MarkupIndexEntry>(value.clone()) {
            Ok(indexed) => {
                entry.raw_markup = Some(indexed.markup);
                entry.format = Some(CacheFormat::Markup);
                entry.content_length_variant = Some(indexed.content_length_variant);
            }
            Err(e) => log::warn!("Ignoring unreadable markup index entry '{key}': {e}"),
        }
    }
}

fn is_markup_payload(payload: &Value) -> bool {
    ["rawMarkup", "sections", "metadata"]
        .iter()
        .all(|field| payload.get(field).is_some())
}

fn is_structured_payload(payload: &Value) -> bool {
    ["marketingStrategies", "salesStrategies", "pricingStrategies"]
        .iter()
        .all(|field| payload.get(field).is_some())
}

fn timestamp_of(object: &Map<String, Value>) -> Option<DateTime<Utc>> {
    object
        .get("timestamp")
        .and_then(Value::as_i64)
        .and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use stratagem_core::config::CacheConfig;
    use stratagem_core::types::{BusinessContext, SalesStrategy};

    fn store() -> CacheStore<MemoryStorage> {
        CacheStore::open(MemoryStorage::new(), &CacheConfig::default()).unwrap()
    }

    fn strategy(id: &str) -> StructuredStrategy {
        let mut s = StructuredStrategy::new(id, BusinessContext::new("Meal kits", "Families", ""));
        s.sales_strategies.push(SalesStrategy {
            title: "Office partnerships".to_string(),
            ..SalesStrategy::default()
        });
        s
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ------------------------------------------------------------------------
    // Enhanced snapshots
    // ------------------------------------------------------------------------

    #[test]
    fn test_export_import_between_stores() {
        let manager = CacheLifecycleManager::default();
        let mut source = store();
        source.save_markup(strategy("a"), "# Sales\n## Calls", "ctx1", ContentLengthVariant::Brief);
        source.save("ctx2", CacheEntry::structured(strategy("b")));

        let json = manager.export_json(&source).unwrap();
        let mut target = store();
        let report = manager.import(&mut target, &json);

        assert!(report.success);
        assert_eq!(report.shape, Some(SnapshotShape::Enhanced));
        assert_eq!(report.imported, 2);
        let hit = target.load_markup("ctx1", ContentLengthVariant::Brief).unwrap();
        assert_eq!(hit.raw_markdown, "# Sales\n## Calls");
        assert!(target.get("ctx2").unwrap().has_markup());
    }

    #[test]
    fn test_enhanced_markup_payload_reversed() {
        let payload = MarkupStrategy {
            id: "m-1".to_string(),
            raw_markup: "# Sales\n## Demo calls\nBook demos.".to_string(),
            ..MarkupStrategy::default()
        };
        let doc = json!({
            "version": "2.0.0",
            "cache": { "ctx1-detailed": {
                "structuredStrategy": payload,
                "timestamp": now_ms(),
                "contextHash": "h",
            }},
        });
        let mut target = store();
        let report = CacheLifecycleManager::default().import(&mut target, &doc.to_string());
        assert_eq!(report.imported, 1);

        let entry = target.get("ctx1-detailed").unwrap();
        assert_eq!(entry.structured_strategy.sales_strategies[0].title, "Demo calls");
        assert_eq!(entry.content_length_variant, Some(ContentLengthVariant::Detailed));
        assert_eq!(entry.context_hash, "h");
    }

    #[test]
    fn test_enhanced_unconvertible_kept_structured() {
        let mut s = strategy("");
        s.id = String::new();
        let doc = json!({
            "version": "2.0.0",
            "cache": { "ctx1": {
                "structuredStrategy": s,
                "timestamp": now_ms(),
                "contextHash": "h",
            }},
        });
        let mut target = store();
        let report = CacheLifecycleManager::default().import(&mut target, &doc.to_string());
        assert_eq!(report.imported, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(
            target.get("ctx1").unwrap().effective_format(),
            CacheFormat::Structured
        );
    }

    #[test]
    fn test_enhanced_unrecognized_payload_skipped() {
        let doc = json!({
            "version": "2.0.0",
            "cache": { "odd": { "structuredStrategy": { "foo": 1 }, "timestamp": now_ms() } },
        });
        let report = CacheLifecycleManager::default().import(&mut store(), &doc.to_string());
        assert!(report.success);
        assert_eq!(report.imported, 0);
        assert_eq!(report.warnings[0].key, "odd");
        assert_eq!(report.warnings[0].reason, "unrecognized strategy payload");
    }

    // ------------------------------------------------------------------------
    // Legacy snapshots
    // ------------------------------------------------------------------------

    #[test]
    fn test_dual_cache_loaded_as_is() {
        let entry = CacheEntry {
            format: None,
            ..CacheEntry::structured(strategy("a"))
        };
        let doc = json!({
            "cache": { "ctx1-standard": entry, "broken": 7 },
            "markupCache": { "ctx1-standard": {
                "markup": "# Sales",
                "timestamp": now_ms(),
                "contentLengthVariant": "standard",
                "contextHash": "h",
            }},
        });
        let mut target = store();
        let report = CacheLifecycleManager::default().import(&mut target, &doc.to_string());
        assert_eq!(report.shape, Some(SnapshotShape::LegacyDualCache));
        assert_eq!(report.imported, 1);
        assert_eq!(report.warnings.len(), 1);
        let hit = target.load_markup("ctx1", ContentLengthVariant::Standard).unwrap();
        assert_eq!(hit.raw_markdown, "# Sales");
    }

    #[test]
    fn test_flat_entry_missing_fields_named() {
        let doc = json!({ "ctx9": { "strategy": strategy("a") } });
        let report = CacheLifecycleManager::default().import(&mut store(), &doc.to_string());
        assert_eq!(report.warnings[0].reason, "missing timestamp, contextHash");
        let err: Error = report.warnings[0].clone().into();
        assert!(matches!(err, Error::ImportEntrySkipped { ref key, .. } if key == "ctx9"));
    }

    #[test]
    fn test_import_merges_with_existing() {
        let mut target = store();
        target.save("keep", CacheEntry::structured(strategy("k")));
        let doc = json!({ "ctx1": {
            "strategy": strategy("a"),
            "timestamp": now_ms(),
            "contextHash": "h",
        }});
        CacheLifecycleManager::default().import(&mut target, &doc.to_string());
        assert_eq!(target.keys(), vec!["ctx1", "keep"]);
    }

    #[test]
    fn test_unparseable_imports_nothing() {
        let mut target = store();
        let report = CacheLifecycleManager::default().import(&mut target, "not json");
        assert!(!report.success);
        assert!(report.error.unwrap().contains("Malformed import"));
        assert!(target.is_empty());
    }

    // ------------------------------------------------------------------------
    // Migration
    // ------------------------------------------------------------------------

    #[test]
    fn test_migrate_counts() {
        let mut target = store();
        target.save(
            "legacy",
            CacheEntry {
                format: None,
                ..CacheEntry::structured(strategy("a"))
            },
        );
        let mut broken = CacheEntry::structured(strategy("b"));
        broken.structured_strategy.id = String::new();
        target.save("broken-brief", broken);
        target.save_markup(strategy("c"), "# Sales", "ctx1", ContentLengthVariant::Brief);

        let report = CacheLifecycleManager::default().migrate(&mut target);
        assert_eq!(
            report,
            MigrationReport {
                tagged: 1,
                converted: 1,
                recovered: 1,
                untouched: 1
            }
        );
        let broken = target.get("broken-brief").unwrap();
        assert!(broken.has_markup());
        assert_eq!(broken.content_length_variant, Some(ContentLengthVariant::Brief));
        assert_eq!(target.markup_index().len(), 3);
    }

    #[test]
    fn test_migrate_keeps_timestamps() {
        let mut target = store();
        let entry = CacheEntry::structured(strategy("a"));
        let stamp = entry.timestamp;
        target.save("ctx1", entry);
        CacheLifecycleManager::default().migrate(&mut target);
        assert_eq!(target.get("ctx1").unwrap().timestamp, stamp);
    }
}
