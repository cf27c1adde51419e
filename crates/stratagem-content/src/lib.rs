//! Markdown section parsing, field extraction, and text metrics.
//!
//! This crate knows how to read markup but not how a strategy is laid out:
//! the converter decides which section feeds which structured list.
//!
//! # Modules
//!
//! - [`markdown`]: Heading forest parsing, line helpers, word counts
//! - [`extract`]: Heuristic, never-failing field extraction
//!
//! # Example
//!
//! ```rust
//! use stratagem_content::{FieldExtractor, parse_sections};
//! use stratagem_content::extract::scores::FixedScore;
//!
//! let forest = parse_sections("# Pricing\n## Pro plan\n- $29/month\n- $290/year");
//! let plan = &forest[0].children[0];
//!
//! let extractor = FieldExtractor::new(FixedScore(7));
//! assert_eq!(extractor.price_points(&plan.body).len(), 2);
//! ```

pub mod extract;
pub mod markdown;

// Re-export commonly used items
pub use extract::FieldExtractor;
pub use extract::scores::{EntropyScores, FixedScore, ScoreSource, SeededScores};
pub use markdown::{HeadingNode, find_section, parse_sections, read_time_minutes, word_count};
