//! Plain-text extraction and reading metrics.
//!
//! Word counts are taken over the rendered text rather than the raw markup,
//! so heading markers, bold markers and list bullets never count as words.
//!
//! # Example
//!
//! ```rust
//! use stratagem_content::markdown::text::{read_time_minutes, word_count};
//!
//! let words = word_count("# Title\n\nSome **bold** text.\n\n- one item");
//! assert_eq!(words, 6);
//! assert_eq!(read_time_minutes(words, 200), 1);
//! ```

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Extract plain text from markup, dropping formatting and code blocks.
pub fn plain_text(markup: &str) -> String {
    let parser = Parser::new(markup);
    let mut text_content = String::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            // Adjacent text events can split a single word, so no separator here.
            Event::Text(text) | Event::Code(text) if !in_code_block => {
                text_content.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak => {
                text_content.push(' ');
            }
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item) => {
                text_content.push('\n');
            }
            _ => {}
        }
    }

    text_content
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Count words: whitespace tokens of the plain text containing a letter or digit.
pub fn word_count(markup: &str) -> usize {
    plain_text(markup)
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Minutes to read `words` at `words_per_minute`, rounded up.
pub fn read_time_minutes(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1))
}

// ============================================================================
// Tests
// ============================================================================
