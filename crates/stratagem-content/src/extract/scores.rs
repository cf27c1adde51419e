//! Numeric score parsing and synthesis.
//!
//! Scores (suitability, market fit) are on a 1–10 scale. When the text states
//! one it is parsed; otherwise a [`ScoreSource`] supplies a bounded value.
//! Production code can use OS entropy; tests pin a seed or a fixed value so
//! extraction is reproducible.

use std::ops::RangeInclusive;
use std::sync::{LazyLock, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

/// Range synthesized scores are drawn from.
pub const SYNTHESIZED_RANGE: RangeInclusive<u8> = 7..=9;

/// Seed used by [`SeededScores::default`].
pub const DEFAULT_SEED: u64 = 0x5EED_0F_57;

#[allow(clippy::expect_used)]
static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:score|fit|suitability|rating)\D{0,20}?(\d{1,3}(?:\.\d+)?)\s*(?:/\s*(10|100)\b)?")
        .expect("Invalid score regex")
});

#[allow(clippy::expect_used)]
static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,3}(?:\.\d+)?)\s*(?:/\s*(10|100))?\s*$").expect("Invalid rating regex")
});

/// Supplies scores when the text does not state one.
pub trait ScoreSource: Send + Sync {
    /// A score within `range`.
    fn score(&self, range: RangeInclusive<u8>) -> u8;
}

/// Deterministic scores from a seeded generator.
#[derive(Debug)]
pub struct SeededScores {
    rng: Mutex<StdRng>,
}

impl SeededScores {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SeededScores {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl ScoreSource for SeededScores {
    fn score(&self, range: RangeInclusive<u8>) -> u8 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(range)
    }
}

/// Scores from the thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntropyScores;

impl ScoreSource for EntropyScores {
    fn score(&self, range: RangeInclusive<u8>) -> u8 {
        rand::rng().random_range(range)
    }
}

/// Always the same score, clamped into the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedScore(pub u8);

impl ScoreSource for FixedScore {
    fn score(&self, range: RangeInclusive<u8>) -> u8 {
        self.0.clamp(*range.start(), *range.end())
    }
}

/// Parse an explicit score ("Market fit: 8/10", "suitability score 85/100").
///
/// Values out of 100 (or above 10) are scaled down; the result is clamped to 1–10.
pub fn parse_score(text: &str) -> Option<u8> {
    scaled_score(&SCORE_RE.captures(text)?)
}

/// Parse a bare rating value ("8/10", "85/100", "7"), as written after a score label.
pub fn parse_rating(value: &str) -> Option<u8> {
    scaled_score(&RATING_RE.captures(value)?)
}

fn scaled_score(caps: &regex::Captures<'_>) -> Option<u8> {
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let out_of_hundred = caps.get(2).is_some_and(|m| m.as_str() == "100") || value > 10.0;
    let scaled = if out_of_hundred { value / 10.0 } else { value };
    Some(scaled.round().clamp(1.0, 10.0) as u8)
}
