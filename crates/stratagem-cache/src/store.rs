//! In-memory cache mirrored to durable storage.
//!
//! One map holds every entry; markup is an optional field on the entry. The
//! markup index persisted next to it is derived from that map on every
//! write, so the two blobs cannot drift apart in memory.
//!
//! A failed durable write is logged and reported through the `bool` return
//! of the mutating call. The in-memory map stays authoritative until the
//! next successful write.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use stratagem_core::config::CacheConfig;
use stratagem_core::types::{BusinessContext, ContentLengthVariant, StructuredStrategy};
use stratagem_core::{Error, Result};

use crate::entry::{CacheEntry, CacheFormat, MarkupIndexEntry, key_variant, variant_key};
use crate::storage::DurableStorage;

/// A markup cache hit.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupHit {
    /// Strategy the markup was rendered from.
    pub strategies: StructuredStrategy,
    /// The markup exactly as saved.
    pub raw_markdown: String,
}

/// Summary of the live (unexpired) entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of entries.
    pub total_entries: usize,
    /// Entries carrying markup.
    #[serde(rename = "markdownEntries")]
    pub markup_entries: usize,
    /// Structured-only entries.
    #[serde(rename = "jsonEntries")]
    pub structured_entries: usize,
    /// Entry count per content-length variant.
    pub by_variant: BTreeMap<ContentLengthVariant, usize>,
    /// Timestamp of the oldest entry.
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Timestamp of the newest entry.
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Strategy cache over a durable storage backend.
#[derive(Debug)]
pub struct CacheStore<S> {
    storage: S,
    entries: HashMap<String, CacheEntry>,
    entries_key: String,
    markup_index_key: String,
    ttl: chrono::Duration,
}

impl<S: DurableStorage> CacheStore<S> {
    /// Hydrate a store from `storage`.
    ///
    /// Unreadable entries are dropped with a warning, markup found only in
    /// the index blob is folded back into its entry, and expired entries are
    /// swept.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage backend cannot be read at all.
    pub fn open(storage: S, config: &CacheConfig) -> Result<Self> {
        let mut store = Self {
            storage,
            entries: HashMap::new(),
            entries_key: config.entries_key.clone(),
            markup_index_key: config.markup_index_key.clone(),
            ttl: chrono::Duration::days(i64::from(config.ttl_days)),
        };

        let mut dirty = false;
        if let Some(blob) = store.storage.read(&store.entries_key)? {
            let (entries, dropped) = parse_entries(&blob, &store.entries_key);
            store.entries = entries;
            dirty |= dropped > 0;
        }
        if let Some(blob) = store.storage.read(&store.markup_index_key)? {
            dirty |= store.backfill_from_index(&blob);
        }
        dirty |= store.sweep_expired(Utc::now()) > 0;

        log::debug!("Cache hydrated with {} entries", store.entries.len());
        if dirty {
            store.persist();
        }
        Ok(store)
    }

    /// Durable backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Store `entry` at `key`, replacing any previous entry.
    ///
    /// Returns `false` when the durable write failed.
    pub fn save(&mut self, key: &str, entry: CacheEntry) -> bool {
        self.entries.insert(key.to_string(), entry);
        self.persist()
    }

    /// Store a strategy with its markup at `<contextId>-<variant>`.
    pub fn save_markup(
        &mut self,
        strategy: StructuredStrategy,
        raw_markup: impl Into<String>,
        context_id: &str,
        variant: ContentLengthVariant,
    ) -> bool {
        let entry = CacheEntry::with_markup(strategy, raw_markup.into(), variant);
        self.save(&variant_key(context_id, variant), entry)
    }

    /// Remove one variant of a context, or every fixed variant when `None`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, context_id: &str, variant: Option<ContentLengthVariant>) -> usize {
        let keys: Vec<String> = match variant {
            Some(v) => vec![variant_key(context_id, v)],
            None => ContentLengthVariant::ALL
                .iter()
                .map(|v| variant_key(context_id, *v))
                .collect(),
        };
        self.remove_keys(&keys)
    }

    /// Remove the unpartitioned entry for a context and every variant of it.
    pub fn invalidate_all(&mut self, context_id: &str) -> usize {
        let mut keys = vec![context_id.to_string()];
        keys.extend(
            ContentLengthVariant::ALL
                .iter()
                .map(|v| variant_key(context_id, *v)),
        );
        self.remove_keys(&keys)
    }

    /// Drop every entry and both durable blobs.
    pub fn clear(&mut self) -> bool {
        self.entries.clear();
        let mut ok = true;
        for key in [&self.entries_key, &self.markup_index_key] {
            if let Err(e) = self.storage.clear(key) {
                log::error!("Failed to clear cache blob: {e}");
                ok = false;
            }
        }
        ok
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Entry at `key`, unless absent or expired. Expired entries are evicted.
    pub fn load(&mut self, key: &str) -> Option<CacheEntry> {
        if self.evict_if_expired(key) {
            return None;
        }
        self.entries.get(key).cloned()
    }

    /// Markup saved for a context and variant.
    ///
    /// Both the entry and its markup must be present and unexpired. An entry
    /// at that key without markup is a stale remnant and is evicted.
    pub fn load_markup(
        &mut self,
        context_id: &str,
        variant: ContentLengthVariant,
    ) -> Option<MarkupHit> {
        let key = variant_key(context_id, variant);
        if self.evict_if_expired(&key) {
            return None;
        }
        let hit = self.entries.get(&key).and_then(|entry| {
            let markup = entry.raw_markup.as_ref().filter(|_| entry.has_markup())?;
            Some(MarkupHit {
                strategies: entry.structured_strategy.clone(),
                raw_markdown: markup.clone(),
            })
        });
        if hit.is_none() && self.entries.remove(&key).is_some() {
            log::debug!("Evicted cache entry '{key}' without markup");
            self.persist();
        }
        hit
    }

    /// Entry at `key` without expiry handling.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Every key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the entry at `key` was built from a different business context.
    ///
    /// A missing entry is stale.
    pub fn is_stale(&self, key: &str, context: &BusinessContext) -> bool {
        self.entries
            .get(key)
            .is_none_or(|entry| entry.context_hash != context.fingerprint())
    }

    /// Counts over unexpired entries.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut stats = CacheStats::default();
        for (key, entry) in &self.entries {
            if entry.is_expired(now, self.ttl) {
                continue;
            }
            stats.total_entries += 1;
            if entry.has_markup() {
                stats.markup_entries += 1;
            } else {
                stats.structured_entries += 1;
            }
            if let Some(variant) = entry.content_length_variant.or_else(|| key_variant(key)) {
                *stats.by_variant.entry(variant).or_default() += 1;
            }
            stats.oldest_entry = Some(
                stats
                    .oldest_entry
                    .map_or(entry.timestamp, |t| t.min(entry.timestamp)),
            );
            stats.newest_entry = Some(
                stats
                    .newest_entry
                    .map_or(entry.timestamp, |t| t.max(entry.timestamp)),
            );
        }
        stats
    }

    /// Entries in key order.
    pub fn entries(&self) -> BTreeMap<String, CacheEntry> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The markup index derived from the entries, in key order.
    pub fn markup_index(&self) -> BTreeMap<String, MarkupIndexEntry> {
        self.entries
            .iter()
            .filter_map(|(k, entry)| MarkupIndexEntry::from_entry(entry).map(|m| (k.clone(), m)))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Crate-internal
    // ------------------------------------------------------------------------

    /// Insert every entry, then persist once.
    pub(crate) fn merge(&mut self, entries: impl IntoIterator<Item = (String, CacheEntry)>) -> bool {
        self.entries.extend(entries);
        self.persist()
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&String, &mut CacheEntry)> {
        self.entries.iter_mut()
    }

    /// Write the entries blob, then the index blob.
    ///
    /// The index is only written after the entries write succeeded, so a
    /// stored index never describes entries newer than the stored entries.
    /// Returns `false` if either write failed.
    pub(crate) fn persist(&self) -> bool {
        let entries: BTreeMap<&String, &CacheEntry> = self.entries.iter().collect();
        let index = self.markup_index();
        let writes = [
            (&self.entries_key, serde_json::to_string(&entries)),
            (&self.markup_index_key, serde_json::to_string(&index)),
        ];

        for (key, blob) in writes {
            let result = blob
                .map_err(Error::from)
                .and_then(|blob| self.storage.write(key, &blob));
            if let Err(e) = result {
                log::error!("Failed to persist cache blob '{key}': {e}");
                return false;
            }
        }
        true
    }

    fn remove_keys(&mut self, keys: &[String]) -> usize {
        let removed = keys
            .iter()
            .filter(|k| self.entries.remove(k.as_str()).is_some())
            .count();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    fn evict_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|e| e.is_expired(Utc::now(), self.ttl));
        if expired {
            log::debug!("Evicting expired cache entry '{key}'");
            self.entries.remove(key);
            self.persist();
        }
        expired
    }

    fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        let swept = before - self.entries.len();
        if swept > 0 {
            log::debug!("Swept {swept} expired cache entries");
        }
        swept
    }

    /// Fold index markup into entries that lack it.
    ///
    /// An index entry is only trusted when it is unexpired and carries the
    /// same timestamp and context hash as the entry it would complete.
    /// Anything else is dropped. Returns whether anything changed.
    fn backfill_from_index(&mut self, blob: &str) -> bool {
        let index: HashMap<String, serde_json::Value> = match serde_json::from_str(blob) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Ignoring unreadable markup index '{}': {e}", self.markup_index_key);
                return false;
            }
        };

        let now = Utc::now();
        let ttl = self.ttl;
        let mut changed = false;
        for (key, value) in index {
            let Some(entry) = self.entries.get_mut(&key) else {
                changed = true;
                continue;
            };
            if entry.raw_markup.is_some() {
                continue;
            }
            match serde_json::from_value::<MarkupIndexEntry>(value) {
                Ok(indexed)
                    if indexed.timestamp != entry.timestamp
                        || indexed.context_hash != entry.context_hash
                        || now - indexed.timestamp > ttl =>
                {
                    log::warn!("Dropping markup index entry '{key}' that does not match its entry");
                    changed = true;
                }
                Ok(indexed) => {
                    entry.raw_markup = Some(indexed.markup);
                    entry.format = Some(CacheFormat::Markup);
                    entry.content_length_variant = Some(indexed.content_length_variant);
                    changed = true;
                }
                Err(e) => log::warn!("Ignoring unreadable markup index entry '{key}': {e}"),
            }
        }
        changed
    }
}

/// Parse the entries blob entry by entry. Returns the entries and how many were dropped.
fn parse_entries(blob: &str, blob_key: &str) -> (HashMap<String, CacheEntry>, usize) {
    let raw: HashMap<String, serde_json::Value> = match serde_json::from_str(blob) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("Discarding unreadable cache blob '{blob_key}': {e}");
            return (HashMap::new(), 1);
        }
    };

    let mut dropped = 0;
    let entries = raw
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<CacheEntry>(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                log::warn!("Dropping unreadable cache entry '{key}': {e}");
                dropped += 1;
                None
            }
        })
        .collect();
    (entries, dropped)
}
