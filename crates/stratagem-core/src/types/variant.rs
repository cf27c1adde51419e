//! Content-length variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Target verbosity of a rendered strategy.
///
/// Also one half of the cache partition key: the same context id can hold
/// one cached strategy per variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLengthVariant {
    /// Short summary.
    Brief,
    /// Default length.
    #[default]
    Standard,
    /// Long-form with every optional detail.
    Detailed,
}

impl ContentLengthVariant {
    /// Every variant, in cache-key order.
    pub const ALL: [ContentLengthVariant; 3] = [
        ContentLengthVariant::Brief,
        ContentLengthVariant::Standard,
        ContentLengthVariant::Detailed,
    ];

    /// Lowercase tag used in cache keys and snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Standard => "standard",
            Self::Detailed => "detailed",
        }
    }

    /// Approximate word target for this variant.
    pub fn target_words(&self) -> usize {
        match self {
            Self::Brief => 800,
            Self::Standard => 1500,
            Self::Detailed => 2500,
        }
    }

    /// Whether per-item detail lines (tactic descriptions, milestones) are rendered.
    pub fn includes_item_details(&self) -> bool {
        !matches!(self, Self::Brief)
    }
}

impl fmt::Display for ContentLengthVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentLengthVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "standard" => Ok(Self::Standard),
            "detailed" => Ok(Self::Detailed),
            other => Err(Error::invalid_input(
                "contentLengthVariant",
                format!("unknown variant '{other}' (expected brief, standard or detailed)"),
            )),
        }
    }
}
