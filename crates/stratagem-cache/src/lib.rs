//! Content-length-partitioned strategy cache.
//!
//! - [`storage`]: The durable key-value port and its memory/file backends
//! - [`entry`]: Cache entries, the markup index view and the key scheme
//! - [`store`]: [`CacheStore`], the in-memory map mirrored to storage
//! - [`snapshot`]: Export document and historical snapshot shapes
//! - [`lifecycle`]: [`CacheLifecycleManager`] for import, export and migration
//!
//! # Example
//!
//! ```rust
//! use stratagem_cache::{CacheLifecycleManager, CacheStore, MemoryStorage};
//! use stratagem_core::config::CacheConfig;
//! use stratagem_core::types::{BusinessContext, ContentLengthVariant, StructuredStrategy};
//!
//! let mut store = CacheStore::open(MemoryStorage::new(), &CacheConfig::default()).unwrap();
//! let strategy = StructuredStrategy::new("s-1", BusinessContext::new("Meal kits", "", ""));
//!
//! store.save_markup(strategy, "# Sales", "ctx1", ContentLengthVariant::Standard);
//! assert!(store.load_markup("ctx1", ContentLengthVariant::Standard).is_some());
//! assert!(store.load_markup("ctx1", ContentLengthVariant::Brief).is_none());
//!
//! let manager = CacheLifecycleManager::default();
//! let snapshot = manager.export_json(&store).unwrap();
//! let mut copy = CacheStore::open(MemoryStorage::new(), &CacheConfig::default()).unwrap();
//! assert!(manager.import(&mut copy, &snapshot).success);
//! ```

pub mod entry;
pub mod lifecycle;
pub mod snapshot;
pub mod storage;
pub mod store;

// Re-export commonly used items
pub use entry::{CacheEntry, CacheFormat, MarkupIndexEntry, variant_key};
pub use lifecycle::{CacheLifecycleManager, ImportReport, ImportWarning, MigrationReport};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotShape};
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
pub use store::{CacheStats, CacheStore, MarkupHit};
