//! Identifier utilities.
//!
//! Section and item ids are derived from headings so that the rendered
//! markup and the section index agree without extra bookkeeping.

/// Turn a heading into a lowercase kebab-case slug.
///
/// Non-alphanumeric characters become separators; runs of separators
/// collapse into a single hyphen.
///
/// # Examples
///
/// ```
/// use stratagem_core::util::ids::slugify;
///
/// assert_eq!(slugify("Content Marketing"), "content-marketing");
/// assert_eq!(slugify("  Phase 1: MVP  "), "phase-1-mvp");
/// assert_eq!(slugify("B2B_Sales"), "b2b-sales");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

/// Build an item id from its parent section tag, position and title.
///
/// Falls back to the position alone when the title has no usable characters.
///
/// ```
/// use stratagem_core::util::ids::item_id;
///
/// assert_eq!(item_id("marketing", 0, "Social Media"), "marketing-1-social-media");
/// assert_eq!(item_id("pricing", 2, "!!!"), "pricing-3");
/// ```
pub fn item_id(prefix: &str, index: usize, title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{prefix}-{}", index + 1)
    } else {
        format!("{prefix}-{}-{slug}", index + 1)
    }
}
