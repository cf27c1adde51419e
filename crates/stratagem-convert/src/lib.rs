//! Bidirectional conversion between structured and markup strategies.
//!
//! The forward direction ([`StrategyConverter::to_markup`]) is deterministic
//! and renders markup text and its section index together. The reverse
//! direction ([`StrategyConverter::to_structured`]) is heuristic and lossy.
//! When forward conversion fails, [`StrategyConverter::recover_from_failure`]
//! always yields a minimal, editable document.
//!
//! # Example
//!
//! ```rust
//! use stratagem_convert::StrategyConverter;
//! use stratagem_core::types::{
//!     BusinessContext, ContentLengthVariant, MarketingStrategy, StructuredStrategy,
//! };
//!
//! let mut strategy = StructuredStrategy::new(
//!     "strategy-1",
//!     BusinessContext::new("Meal kits", "Busy families", "Dinner in 15 minutes"),
//! );
//! strategy.marketing_strategies.push(MarketingStrategy {
//!     title: "Instagram Launch".to_string(),
//!     description: "Short recipe videos".to_string(),
//!     ..MarketingStrategy::default()
//! });
//!
//! let converter = StrategyConverter::default();
//! let markup = converter.to_markup(&strategy, ContentLengthVariant::Standard).unwrap();
//! assert!(markup.raw_markup.contains("# Marketing Strategies"));
//! assert!(markup.metadata.read_time_minutes >= 1);
//!
//! let back = converter.to_structured(&markup);
//! assert_eq!(back.strategy.marketing_strategies[0].title, "Instagram Launch");
//! ```

pub mod recovery;
pub mod render;
pub mod reverse;
pub mod validate;

use stratagem_content::{FieldExtractor, read_time_minutes, word_count};
use stratagem_core::config::ConvertConfig;
use stratagem_core::types::{
    ContentLengthVariant, MarkupMetadata, MarkupStrategy, StructuredStrategy,
};
use stratagem_core::{Error, Result, StratagemConfig};

pub use reverse::{Extraction, section_keywords};
pub use validate::{ValidationReport, validate_conversion};

/// Converter behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Re-validate rendered markup and fail with
    /// [`Error::ConversionValidationFailed`] when it is insufficient.
    pub validate_output: bool,
    /// Reading speed for read-time estimates.
    pub words_per_minute: usize,
    /// Minimum markup length accepted by validation.
    pub min_markup_chars: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from(&ConvertConfig::default())
    }
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            validate_output: config.validate_output,
            words_per_minute: config.words_per_minute,
            min_markup_chars: config.min_markup_chars,
        }
    }
}

/// Converts strategies between their two representations.
#[derive(Debug, Default)]
pub struct StrategyConverter {
    options: ConvertOptions,
    extractor: FieldExtractor,
}

impl StrategyConverter {
    /// Converter with the given options and a seeded extractor.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            extractor: FieldExtractor::default(),
        }
    }

    /// Replace the field extractor used by [`Self::to_structured`].
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Converter configured from `[convert]` and `[extract]`.
    pub fn from_config(config: &StratagemConfig) -> Self {
        Self::new(ConvertOptions::from(&config.convert))
            .with_extractor(FieldExtractor::from_seed(config.extract.score_seed))
    }

    /// Active options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Render a structured strategy as markup.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when the strategy has no id or business
    /// context. [`Error::ConversionValidationFailed`] when output validation
    /// is enabled and the rendered markup is insufficient.
    pub fn to_markup(
        &self,
        strategy: &StructuredStrategy,
        variant: ContentLengthVariant,
    ) -> Result<MarkupStrategy> {
        if strategy.id.trim().is_empty() {
            return Err(Error::invalid_input("id", "strategy id is empty"));
        }
        if strategy.business_context.is_empty() {
            return Err(Error::invalid_input(
                "businessContext",
                "business context has no business idea",
            ));
        }
        if !strategy.is_usable() {
            log::warn!("Strategy '{}' has no content items", strategy.id);
        }

        let rendered = render::render(strategy, variant);
        let words = word_count(&rendered.markup);
        let markup = MarkupStrategy {
            id: strategy.id.clone(),
            business_context: strategy.business_context.clone(),
            raw_markup: rendered.markup,
            sections: rendered.sections,
            metadata: MarkupMetadata {
                content_length_variant: variant,
                generated_at: strategy.generated_at,
                word_count: words,
                read_time_minutes: read_time_minutes(words, self.options.words_per_minute),
            },
        };

        if self.options.validate_output {
            let report = validate_conversion(strategy, &markup, self.options.min_markup_chars);
            if !report.is_valid() {
                return Err(Error::validation_failed(report.errors));
            }
        }

        log::debug!(
            "Rendered strategy '{}' ({variant}): {} sections, {words} words",
            strategy.id,
            markup.sections.len()
        );
        Ok(markup)
    }

    /// Render, falling back to the recovery template on any failure.
    ///
    /// The flag is `true` when the recovery template was used.
    pub fn to_markup_or_recover(
        &self,
        strategy: &StructuredStrategy,
        variant: ContentLengthVariant,
    ) -> (MarkupStrategy, bool) {
        match self.to_markup(strategy, variant) {
            Ok(markup) => (markup, false),
            Err(e) => (self.recover_from_failure(strategy, variant, &e.to_string()), true),
        }
    }

    /// Minimal markup with the three essential sections. Never fails.
    pub fn recover_from_failure(
        &self,
        strategy: &StructuredStrategy,
        variant: ContentLengthVariant,
        reason: &str,
    ) -> MarkupStrategy {
        recovery::recover(strategy, variant, self.options.words_per_minute, reason)
    }

    /// Extract a structured strategy from markup. Never fails.
    pub fn to_structured(&self, markup: &MarkupStrategy) -> Extraction {
        reverse::extract(&self.extractor, markup)
    }

    /// Structural check of a conversion using the configured minimum length.
    pub fn validate_conversion(
        &self,
        original: &StructuredStrategy,
        converted: &MarkupStrategy,
    ) -> ValidationReport {
        validate_conversion(original, converted, self.options.min_markup_chars)
    }

    /// Recompute word count and read time after `raw_markup` was edited.
    pub fn refresh_metadata(&self, markup: &mut MarkupStrategy) {
        let words = word_count(&markup.raw_markup);
        markup.metadata.word_count = words;
        markup.metadata.read_time_minutes = read_time_minutes(words, self.options.words_per_minute);
    }
}
