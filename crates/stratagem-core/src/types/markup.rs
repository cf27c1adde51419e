//! The heading-based ("markup") strategy representation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::business::BusinessContext;
use super::variant::ContentLengthVariant;

/// Category tag of a top-level section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    /// Marketing strategies.
    Marketing,
    /// Sales strategies.
    Sales,
    /// Pricing strategies.
    Pricing,
    /// Distribution channels.
    Distribution,
    /// Implementation timeline.
    Timeline,
    /// Tool recommendations.
    Tools,
    /// Anything else.
    #[default]
    Custom,
}

impl SectionType {
    /// Rendering order of the content sections.
    pub const RENDER_ORDER: [SectionType; 6] = [
        SectionType::Marketing,
        SectionType::Sales,
        SectionType::Pricing,
        SectionType::Distribution,
        SectionType::Timeline,
        SectionType::Tools,
    ];

    /// Section types a usable markup strategy must contain at least one of.
    pub const ESSENTIAL: [SectionType; 3] =
        [SectionType::Marketing, SectionType::Sales, SectionType::Pricing];

    /// Whether this type is one of [`SectionType::ESSENTIAL`].
    pub fn is_essential(&self) -> bool {
        Self::ESSENTIAL.contains(self)
    }

    /// Lowercase tag, also used as the section id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Sales => "sales",
            Self::Pricing => "pricing",
            Self::Distribution => "distribution",
            Self::Timeline => "timeline",
            Self::Tools => "tools",
            Self::Custom => "custom",
        }
    }

    /// Heading text used when rendering this section.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Marketing => "Marketing Strategies",
            Self::Sales => "Sales Strategies",
            Self::Pricing => "Pricing Strategies",
            Self::Distribution => "Distribution Channels",
            Self::Timeline => "Implementation Timeline",
            Self::Tools => "Recommended Tools",
            Self::Custom => "Notes",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item block inside a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subsection {
    /// Subsection id.
    pub id: String,
    /// Heading text.
    pub title: String,
    /// Body text under the heading.
    pub content: String,
    /// List items (tactics, steps, price points, activities).
    pub action_items: Vec<String>,
    /// Labelled figures ("Budget: $500 - $750").
    pub key_metrics: Vec<String>,
}

/// One top-level section of a markup strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    /// Section id.
    pub id: String,
    /// Category tag.
    #[serde(rename = "type")]
    pub section_type: SectionType,
    /// Heading text.
    pub title: String,
    /// Body text directly under the heading.
    pub content: String,
    /// Item blocks, in document order.
    pub subsections: Vec<Subsection>,
    /// Whether the user has marked this section done.
    pub completed: bool,
    /// Whether the user may edit this section.
    pub editable: bool,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            id: String::new(),
            section_type: SectionType::Custom,
            title: String::new(),
            content: String::new(),
            subsections: Vec::new(),
            completed: false,
            editable: true,
        }
    }
}

impl Section {
    /// Create an empty, editable section of the given type.
    pub fn new(section_type: SectionType) -> Self {
        Self {
            id: section_type.as_str().to_string(),
            section_type,
            title: section_type.heading().to_string(),
            ..Self::default()
        }
    }
}

/// Reading metadata of a markup strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupMetadata {
    /// Verbosity the markup was rendered at.
    pub content_length_variant: ContentLengthVariant,
    /// When the strategy was generated.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,
    /// Words after stripping markup punctuation.
    pub word_count: usize,
    /// `ceil(word_count / words_per_minute)`.
    pub read_time_minutes: usize,
}

impl Default for MarkupMetadata {
    fn default() -> Self {
        Self {
            content_length_variant: ContentLengthVariant::default(),
            generated_at: DateTime::<Utc>::UNIX_EPOCH,
            word_count: 0,
            read_time_minutes: 0,
        }
    }
}

/// A go-to-market strategy as markup text plus its section index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupStrategy {
    /// Strategy identifier.
    pub id: String,
    /// Business plan this strategy serves.
    pub business_context: BusinessContext,
    /// Heading-based text.
    pub raw_markup: String,
    /// Section index; always agrees with `raw_markup` when produced by rendering.
    pub sections: Vec<Section>,
    /// Reading metadata.
    pub metadata: MarkupMetadata,
}

impl MarkupStrategy {
    /// First section of the given type.
    pub fn section(&self, section_type: SectionType) -> Option<&Section> {
        self.sections.iter().find(|s| s.section_type == section_type)
    }

    /// First section of the given type, mutably.
    pub fn section_mut(&mut self, section_type: SectionType) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|s| s.section_type == section_type)
    }

    /// Whether at least one essential section type is present.
    pub fn has_essential_section(&self) -> bool {
        self.sections.iter().any(|s| s.section_type.is_essential())
    }

    /// Flag a section as completed. Returns `false` if no section has that id.
    pub fn mark_completed(&mut self, section_id: &str) -> bool {
        match self.sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) => {
                section.completed = true;
                true
            }
            None => false,
        }
    }

    /// Fraction of sections marked completed, in `0.0..=1.0`.
    pub fn completion(&self) -> f64 {
        if self.sections.is_empty() {
            return 0.0;
        }
        let done = self.sections.iter().filter(|s| s.completed).count();
        done as f64 / self.sections.len() as f64
    }
}
