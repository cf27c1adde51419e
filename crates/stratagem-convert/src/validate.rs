//! Post-conversion checks.

use stratagem_core::types::{MarkupStrategy, StructuredStrategy};

/// Outcome of [`validate_conversion`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every failed check, in the order checked.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Whether every check passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that `converted` is a sound rendering of `original`.
///
/// Fails when the original lacks an id or business context, when the
/// rendered text is empty or shorter than `min_markup_chars`, when there
/// are no sections, or when no essential section (marketing, sales,
/// pricing) is present.
pub fn validate_conversion(
    original: &StructuredStrategy,
    converted: &MarkupStrategy,
    min_markup_chars: usize,
) -> ValidationReport {
    let mut errors = Vec::new();

    if original.id.trim().is_empty() {
        errors.push("original strategy has no id".to_string());
    }
    if original.business_context.is_empty() {
        errors.push("original strategy has no business context".to_string());
    }

    let length = converted.raw_markup.trim().chars().count();
    if length == 0 {
        errors.push("rendered markup is empty".to_string());
    } else if length < min_markup_chars {
        errors.push(format!(
            "rendered markup is too short ({length} < {min_markup_chars} characters)"
        ));
    }

    if converted.sections.is_empty() {
        errors.push("rendered markup has no sections".to_string());
    } else if !converted.has_essential_section() {
        errors.push("rendered markup has no marketing, sales or pricing section".to_string());
    }

    ValidationReport { errors }
}
