//! Variant-keyed markup round trips, invalidation and statistics.

use stratagem_cache::CacheEntry;
use stratagem_convert::StrategyConverter;
use stratagem_core::types::ContentLengthVariant;

use crate::common::{memory_store, sample_strategy};

#[test]
fn test_save_markup_then_load_markup_is_exact() {
    let mut store = memory_store();
    let strategy = sample_strategy("s-1");
    let markup = StrategyConverter::default()
        .to_markup(&strategy, ContentLengthVariant::Standard)
        .unwrap();

    assert!(store.save_markup(
        strategy.clone(),
        markup.raw_markup.clone(),
        "ctx1",
        ContentLengthVariant::Standard,
    ));

    let hit = store
        .load_markup("ctx1", ContentLengthVariant::Standard)
        .expect("markup should be cached");
    assert_eq!(hit.strategies, strategy);
    assert_eq!(hit.raw_markdown, markup.raw_markup);
    assert!(store.load_markup("ctx1", ContentLengthVariant::Brief).is_none());
}

#[test]
fn test_invalidating_one_variant_keeps_the_others() {
    let mut store = memory_store();
    for variant in ContentLengthVariant::ALL {
        store.save_markup(sample_strategy("s-1"), format!("# {variant}"), "ctx1", variant);
    }

    store.invalidate("ctx1", Some(ContentLengthVariant::Standard));

    assert!(store.load_markup("ctx1", ContentLengthVariant::Standard).is_none());
    let brief = store.load_markup("ctx1", ContentLengthVariant::Brief).unwrap();
    assert_eq!(brief.raw_markdown, "# brief");
    assert!(store.load_markup("ctx1", ContentLengthVariant::Detailed).is_some());
}

#[test]
fn test_stats_split_markup_and_structured() {
    let mut store = memory_store();
    store.save_markup(sample_strategy("a"), "# Sales", "ctx1", ContentLengthVariant::Standard);
    store.save("ctx2", CacheEntry::structured(sample_strategy("b")));

    let stats = store.stats();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.markup_entries, 1);
    assert_eq!(stats.structured_entries, 1);
    assert!(stats.oldest_entry.is_some());
}

#[test]
fn test_structured_remnant_is_not_a_markup_hit() {
    let mut store = memory_store();
    store.save("ctx1-detailed", CacheEntry::structured(sample_strategy("a")));

    assert!(store.load_markup("ctx1", ContentLengthVariant::Detailed).is_none());
    assert!(store.load("ctx1-detailed").is_none());
}
