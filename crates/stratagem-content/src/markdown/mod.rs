//! Markdown parsing utilities.
//!
//! - [`sections`]: Heading forest parsing
//! - [`helpers`]: List, label and prose extraction over a section body
//! - [`text`]: Plain text, word counts and read time
//!
//! These return generic types (`String`, [`HeadingNode`]) rather than strategy
//! types; the [`crate::extract`] module and the converter map them onto the
//! strategy model.

pub mod helpers;
pub mod sections;
pub mod text;

pub use helpers::{
    labeled_fields, labeled_value, list_items, prose_lines, split_name_description,
    strip_inline_markup,
};
pub use sections::{HeadingNode, find_section, parse_sections};
pub use text::{plain_text, read_time_minutes, word_count};
