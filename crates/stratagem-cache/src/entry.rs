//! Cache entry model and key scheme.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratagem_core::types::{ContentLengthVariant, StructuredStrategy};

/// Which representation an entry was saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheFormat {
    /// Structured strategy only (older snapshots call this `json`).
    #[serde(alias = "json")]
    Structured,
    /// Structured strategy with rendered markup attached.
    #[serde(alias = "markdown")]
    Markup,
}

impl CacheFormat {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheFormat::Structured => "structured",
            CacheFormat::Markup => "markup",
        }
    }
}

/// One cached strategy.
///
/// Entries are replaced wholesale, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Strategy snapshot.
    pub structured_strategy: StructuredStrategy,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Fingerprint of the business context the strategy was built from.
    pub context_hash: String,
    /// Representation tag; absent on entries written before tagging existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<CacheFormat>,
    /// Variant this entry belongs to, for variant-keyed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length_variant: Option<ContentLengthVariant>,
    /// Rendered markup, when the entry carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_markup: Option<String>,
}

impl CacheEntry {
    /// A structured-only entry stamped now, fingerprinting its own context.
    pub fn structured(strategy: StructuredStrategy) -> Self {
        Self {
            context_hash: strategy.business_context.fingerprint(),
            structured_strategy: strategy,
            timestamp: Utc::now(),
            format: Some(CacheFormat::Structured),
            content_length_variant: None,
            raw_markup: None,
        }
    }

    /// A markup-carrying entry stamped now.
    pub fn with_markup(
        strategy: StructuredStrategy,
        raw_markup: String,
        variant: ContentLengthVariant,
    ) -> Self {
        Self {
            format: Some(CacheFormat::Markup),
            content_length_variant: Some(variant),
            raw_markup: Some(raw_markup),
            ..Self::structured(strategy)
        }
    }

    /// Effective format: untagged entries count as structured.
    pub fn effective_format(&self) -> CacheFormat {
        self.format.unwrap_or(CacheFormat::Structured)
    }

    /// Whether markup is attached and the entry is tagged as markup.
    pub fn has_markup(&self) -> bool {
        self.effective_format() == CacheFormat::Markup && self.raw_markup.is_some()
    }

    /// Whether the entry is older than `ttl` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.timestamp) > ttl
    }
}

/// Markup-only view of an entry, persisted as its own blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupIndexEntry {
    /// Rendered markup.
    pub markup: String,
    /// Creation time of the owning entry.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Variant the markup was rendered at.
    pub content_length_variant: ContentLengthVariant,
    /// Fingerprint of the owning entry's business context.
    pub context_hash: String,
}

impl MarkupIndexEntry {
    /// Index view of an entry, if it carries markup.
    pub fn from_entry(entry: &CacheEntry) -> Option<Self> {
        if !entry.has_markup() {
            return None;
        }
        Some(Self {
            markup: entry.raw_markup.clone()?,
            timestamp: entry.timestamp,
            content_length_variant: entry.content_length_variant.unwrap_or_default(),
            context_hash: entry.context_hash.clone(),
        })
    }
}

/// Key of a variant-partitioned entry: `<contextId>-<variant>`.
pub fn variant_key(context_id: &str, variant: ContentLengthVariant) -> String {
    format!("{context_id}-{}", variant.as_str())
}

/// Variant encoded in a key's suffix, if any.
pub fn key_variant(key: &str) -> Option<ContentLengthVariant> {
    ContentLengthVariant::ALL
        .into_iter()
        .find(|v| key.ends_with(&format!("-{}", v.as_str())))
}
