//! Exported snapshot document and the historical shapes import accepts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stratagem_core::{Error, Result};

use crate::entry::{CacheEntry, MarkupIndexEntry};

/// Version tag written by [`Snapshot`] exports.
pub const SNAPSHOT_VERSION: &str = "2.0.0";

/// The current export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Always [`SNAPSHOT_VERSION`] on export.
    pub version: String,
    /// When the snapshot was taken.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub exported_at: DateTime<Utc>,
    /// Full entries by cache key.
    pub cache: BTreeMap<String, CacheEntry>,
    /// Markup index by cache key.
    pub markup_cache: BTreeMap<String, MarkupIndexEntry>,
}

/// Which historical layout a snapshot uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotShape {
    /// Version-tagged export with `cache` and `markupCache` maps.
    Enhanced,
    /// `cache` and `markupCache` maps without a version tag.
    LegacyDualCache,
    /// Map of context id to `{strategy, timestamp, contextHash}`.
    LegacyFlat,
}

impl fmt::Display for SnapshotShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SnapshotShape::Enhanced => "enhanced",
            SnapshotShape::LegacyDualCache => "legacy dual-cache",
            SnapshotShape::LegacyFlat => "legacy flat",
        };
        f.write_str(name)
    }
}

/// A parsed snapshot document, not yet interpreted entry by entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSnapshot {
    /// Detected layout.
    pub shape: SnapshotShape,
    /// Entries by key (the `cache` map, or the whole document when flat).
    pub entries: Map<String, Value>,
    /// The `markupCache` map, when present.
    pub markup_cache: Map<String, Value>,
}

/// Parse a snapshot document and detect its shape.
///
/// # Errors
///
/// [`Error::ImportMalformed`] when the input is not JSON or not an object,
/// or when its `cache` member is not an object.
pub fn parse_snapshot(input: &str) -> Result<RawSnapshot> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| Error::import_malformed(format!("not valid JSON: {e}")))?;
    let Value::Object(mut document) = value else {
        return Err(Error::import_malformed("top level is not an object"));
    };

    let shape = if document.contains_key("version") {
        SnapshotShape::Enhanced
    } else if document.get("cache").is_some_and(Value::is_object) {
        SnapshotShape::LegacyDualCache
    } else {
        SnapshotShape::LegacyFlat
    };

    if shape == SnapshotShape::LegacyFlat {
        return Ok(RawSnapshot {
            shape,
            entries: document,
            markup_cache: Map::new(),
        });
    }

    let entries = match document.remove("cache") {
        Some(Value::Object(map)) => map,
        None | Some(Value::Null) => Map::new(),
        Some(_) => return Err(Error::import_malformed("'cache' is not an object")),
    };
    let markup_cache = match document
        .remove("markupCache")
        .or_else(|| document.remove("markdownCache"))
    {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    Ok(RawSnapshot {
        shape,
        entries,
        markup_cache,
    })
}
