//! Line-level content helpers.
//!
//! Small extractors over a section body:
//!
//! - [`list_items`]: bullet and numbered list entries
//! - [`labeled_value`]: `**Label:** value` lines outside lists
//! - [`split_name_description`]: `**Name**: description` list entries
//!
//! # Example
//!
//! ```rust
//! use stratagem_content::markdown::helpers::{labeled_value, list_items};
//!
//! let body = "**Budget:** $500 - $750\n\n- **SEO**: rank for long-tail terms\n1. Launch blog";
//!
//! assert_eq!(labeled_value(body, "budget").as_deref(), Some("$500 - $750"));
//! assert_eq!(list_items(body).len(), 2);
//! ```

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.+)$").expect("Invalid list item regex")
});

#[allow(clippy::expect_used)]
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\*\*([^*]+?):?\*\*:?\s*(.*)$").expect("Invalid label regex")
});

#[allow(clippy::expect_used)]
static NAMED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*([^*]+?)\*\*:?\s*(.*)$").expect("Invalid named item regex")
});

/// Every bullet (`-`, `*`, `+`) or numbered (`1.`, `1)`) entry in `body`.
///
/// Nested entries are returned flat, in document order. Lines that are not
/// list entries are ignored.
pub fn list_items(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            LIST_ITEM_RE
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Whether a line is a list entry.
pub fn is_list_item(line: &str) -> bool {
    LIST_ITEM_RE.is_match(line)
}

/// Value of the first `**Label:** value` line whose label matches (case-insensitive).
///
/// List entries are skipped so that `- **Tactic**: ...` never shadows a field.
pub fn labeled_value(body: &str, label: &str) -> Option<String> {
    let wanted = label.trim().to_lowercase();
    labeled_fields(body)
        .into_iter()
        .find(|(l, _)| l.to_lowercase() == wanted)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

/// Every `**Label:** value` line outside lists, in document order.
pub fn labeled_fields(body: &str) -> Vec<(String, String)> {
    body.lines()
        .filter(|line| !is_list_item(line))
        .filter_map(|line| {
            let caps = LABEL_RE.captures(line)?;
            let label = caps.get(1)?.as_str().trim().to_string();
            let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            Some((label, value.to_string()))
        })
        .collect()
}

/// Lines of `body` that are neither list entries, labels, nor blank.
pub fn prose_lines(body: &str) -> Vec<&str> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_list_item(line) && !LABEL_RE.is_match(line))
        .collect()
}

/// Split a list entry into name and description.
///
/// Recognizes `**Name**: description` and `Name: description`. Without
/// either structure the whole entry serves as both.
///
/// ```rust
/// use stratagem_content::markdown::helpers::split_name_description;
///
/// assert_eq!(
///     split_name_description("**SEO**: rank for long-tail terms"),
///     ("SEO".to_string(), "rank for long-tail terms".to_string())
/// );
/// assert_eq!(
///     split_name_description("Launch blog"),
///     ("Launch blog".to_string(), "Launch blog".to_string())
/// );
/// ```
pub fn split_name_description(item: &str) -> (String, String) {
    let item = item.trim();
    if let Some(caps) = NAMED_ITEM_RE.captures(item) {
        let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let description = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        let description = if description.is_empty() { name } else { description };
        return (name.to_string(), description.to_string());
    }
    if let Some((name, description)) = item.split_once(": ") {
        let name = name.trim();
        let description = description.trim();
        if !name.is_empty() && !description.is_empty() && !name.contains(char::is_numeric) {
            return (name.to_string(), description.to_string());
        }
    }
    let plain = strip_inline_markup(item);
    (plain.clone(), plain)
}

/// Remove bold, italic and code markers from inline text.
pub fn strip_inline_markup(text: &str) -> String {
    text.replace("**", "")
        .replace("__", "")
        .replace('`', "")
        .trim()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // list_items tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_list_items_markers() {
        let body = "- dash\n* star\n+ plus\n1. numbered\n2) paren\nplain line";
        assert_eq!(list_items(body), vec!["dash", "star", "plus", "numbered", "paren"]);
    }

    #[test]
    fn test_list_items_nested_flattened() {
        let body = "- parent\n  - child\n    1. grandchild";
        assert_eq!(list_items(body), vec!["parent", "child", "grandchild"]);
    }

    #[test]
    fn test_list_items_ignores_bold_lines() {
        let body = "**Budget:** $100\n- real item";
        assert_eq!(list_items(body), vec!["real item"]);
    }

    #[test]
    fn test_list_items_empty() {
        assert!(list_items("").is_empty());
        assert!(list_items("-no space\n1.nospace").is_empty());
    }

    // ------------------------------------------------------------------------
    // labeled_value tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_labeled_value_colon_inside_bold() {
        assert_eq!(labeled_value("**Timeline:** 3 months", "Timeline").unwrap(), "3 months");
    }

    #[test]
    fn test_labeled_value_colon_outside_bold() {
        assert_eq!(labeled_value("**Timeline**: 3 months", "timeline").unwrap(), "3 months");
    }

    #[test]
    fn test_labeled_value_skips_list_entries() {
        let body = "- **Timeline**: wrong\n**Timeline:** right";
        assert_eq!(labeled_value(body, "Timeline").unwrap(), "right");
    }

    #[test]
    fn test_labeled_value_missing() {
        assert!(labeled_value("**Budget:** $5", "Timeline").is_none());
        assert!(labeled_value("**Timeline:**", "Timeline").is_none());
    }

    #[test]
    fn test_prose_lines() {
        let body = "Intro sentence.\n\n**Budget:** $5\n- item\nClosing sentence.";
        assert_eq!(prose_lines(body), vec!["Intro sentence.", "Closing sentence."]);
    }

    // ------------------------------------------------------------------------
    // split_name_description tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_split_plain_colon() {
        assert_eq!(
            split_name_description("Webinars: monthly product demos"),
            ("Webinars".to_string(), "monthly product demos".to_string())
        );
    }

    #[test]
    fn test_split_bold_without_description() {
        assert_eq!(
            split_name_description("**Referral program**"),
            ("Referral program".to_string(), "Referral program".to_string())
        );
    }

    #[test]
    fn test_split_keeps_price_text_whole() {
        let (name, description) = split_name_description("Tier 1: $9/month");
        assert_eq!(name, "Tier 1: $9/month");
        assert_eq!(description, name);
    }
}
