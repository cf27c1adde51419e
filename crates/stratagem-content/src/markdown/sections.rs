//! Heading-delimited section parsing.
//!
//! Turns flat markup into a forest of [`HeadingNode`]s that mirrors heading
//! nesting:
//!
//! - A line of 1–6 `#` markers followed by text opens a section at that level
//! - Every other line belongs to the body of the currently open section
//! - Text before the first heading is discarded
//! - Leading and trailing blank lines of a body are trimmed
//!
//! Nesting uses a stack: a new heading closes every open section whose level
//! is greater than or equal to its own, then becomes a child of whatever is
//! left on top (or a root when nothing is).
//!
//! # Example
//!
//! ```rust
//! use stratagem_content::markdown::sections::parse_sections;
//!
//! let forest = parse_sections("# A\n## B\ntext\n# C");
//! assert_eq!(forest.len(), 2);
//! assert_eq!(forest[0].title, "A");
//! assert_eq!(forest[0].children[0].title, "B");
//! assert_eq!(forest[0].children[0].body, "text");
//! assert_eq!(forest[1].title, "C");
//! assert!(forest[1].body.is_empty());
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

#[allow(clippy::expect_used)]
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("Invalid heading regex"));

/// One heading and everything nested under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadingNode {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Heading text with surrounding whitespace and closing `#`s removed.
    pub title: String,
    /// Lines between this heading and the next one, blank edges trimmed.
    pub body: String,
    /// Deeper headings, in document order.
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    fn open(level: u8, title: &str) -> Self {
        Self {
            level,
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Depth-first search for the first node (self included) matching `pred`.
    pub fn find<P>(&self, pred: &P) -> Option<&HeadingNode>
    where
        P: Fn(&HeadingNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// Number of nodes in this subtree, self included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(HeadingNode::node_count).sum::<usize>()
    }
}

/// Depth-first search across a forest.
pub fn find_section<'a, P>(forest: &'a [HeadingNode], pred: P) -> Option<&'a HeadingNode>
where
    P: Fn(&HeadingNode) -> bool,
{
    forest.iter().find_map(|node| node.find(&pred))
}

/// Parse markup into a heading forest.
///
/// Pure and total: any input yields a (possibly empty) forest.
pub fn parse_sections(markup: &str) -> Vec<HeadingNode> {
    let mut roots: Vec<HeadingNode> = Vec::new();
    // Open sections, outermost first, each paired with its raw body lines.
    let mut stack: Vec<(HeadingNode, Vec<&str>)> = Vec::new();

    for line in markup.lines() {
        if let Some((level, title)) = parse_heading(line) {
            while stack.last().is_some_and(|(open, _)| open.level >= level) {
                close_top(&mut stack, &mut roots);
            }
            stack.push((HeadingNode::open(level, title), Vec::new()));
        } else if let Some((_, body)) = stack.last_mut() {
            body.push(line);
        }
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

/// Recognize a heading line, returning its level and cleaned title.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line.trim_end())?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = strip_closing_hashes(caps.get(2)?.as_str().trim());
    if title.is_empty() {
        return None;
    }
    Some((level, title))
}

/// Drop a closing `#` run, which only counts when whitespace precedes it
/// ("Learn C#" keeps its hash).
fn strip_closing_hashes(title: &str) -> &str {
    let open = title.trim_end_matches('#');
    if open.is_empty() || open.ends_with(char::is_whitespace) {
        open.trim_end()
    } else {
        title
    }
}

fn close_top(stack: &mut Vec<(HeadingNode, Vec<&str>)>, roots: &mut Vec<HeadingNode>) {
    let Some((mut node, lines)) = stack.pop() else {
        return;
    };
    node.body = trim_blank_lines(&lines);
    match stack.last_mut() {
        Some((parent, _)) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
