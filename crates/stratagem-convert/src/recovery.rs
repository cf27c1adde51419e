//! Fallback markup used when rendering fails.
//!
//! Recovery never fails: it always produces a minimal strategy with the
//! three essential sections so the UI has something to show and edit.

use chrono::Utc;
use stratagem_content::{read_time_minutes, word_count};
use stratagem_core::types::{
    ContentLengthVariant, MarkupMetadata, MarkupStrategy, Section, SectionType, StructuredStrategy,
};

use crate::render::preamble;

/// Id used when the failed strategy had none.
pub const RECOVERED_ID: &str = "recovered-strategy";

const PLACEHOLDER: &str = "Strategy content could not be generated. Edit this section to add details.";

/// Build the minimal recovery document.
pub fn recover(
    strategy: &StructuredStrategy,
    variant: ContentLengthVariant,
    words_per_minute: usize,
    reason: &str,
) -> MarkupStrategy {
    log::warn!(
        "Recovering strategy '{}' with minimal markup: {reason}",
        strategy.id
    );

    let mut markup = preamble(&strategy.business_context, false);
    let mut sections = Vec::new();
    for section_type in SectionType::ESSENTIAL {
        markup.push_str(&format!("\n# {}\n\n{PLACEHOLDER}\n", section_type.heading()));
        sections.push(Section {
            content: PLACEHOLDER.to_string(),
            ..Section::new(section_type)
        });
    }

    let id = match strategy.id.trim() {
        "" => RECOVERED_ID.to_string(),
        id => id.to_string(),
    };
    let words = word_count(&markup);

    MarkupStrategy {
        id,
        business_context: strategy.business_context.clone(),
        sections,
        metadata: MarkupMetadata {
            content_length_variant: variant,
            generated_at: Utc::now(),
            word_count: words,
            read_time_minutes: read_time_minutes(words, words_per_minute),
        },
        raw_markup: markup,
    }
}
