//! Heuristic extraction of structured fields from section text.
//!
//! Every extractor is total: it never fails and always returns a
//! syntactically valid value, falling back to a fixed default when the text
//! says nothing useful. Results are approximate by nature; free text can
//! always be read more than one way.
//!
//! # Example
//!
//! ```rust
//! use stratagem_content::extract::{FieldExtractor, scores::FixedScore};
//!
//! let extractor = FieldExtractor::new(FixedScore(8));
//! let body = "Grow on Instagram.\n\n**Budget:** $400\n\n- Reels: weekly short videos";
//!
//! assert_eq!(extractor.marketing_channel("Social", body), "social");
//! let budget = extractor.budget(body);
//! assert_eq!((budget.min, budget.max), (400.0, 600.0));
//! assert_eq!(extractor.tactics(body)[0].name, "Reels");
//! assert_eq!(extractor.suitability_score(body), 8);
//! ```

pub mod money;
pub mod rules;
pub mod scores;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use stratagem_core::types::{BudgetRange, PricePoint, Tactic};

use crate::markdown::helpers::{labeled_value, list_items, prose_lines, split_name_description};
use money::{first_percentage, first_reach, money_amounts};
use rules::{classify, first_match};
use scores::{EntropyScores, SYNTHESIZED_RANGE, ScoreSource, SeededScores, parse_score};

/// Returned when no percentage is stated.
pub const DEFAULT_ROI: &str = "To be determined";
/// Returned when no reach figure is stated.
pub const DEFAULT_REACH: &str = "To be determined";
/// Returned when no duration is stated.
pub const DEFAULT_TIMELINE: &str = "3-6 months";
/// Multiplier used to synthesize a missing range maximum.
pub const SYNTHESIZED_MAX_FACTOR: f64 = 1.5;

#[allow(clippy::expect_used)]
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\s*(?:-|to)\s*\d+)?\s*(?:days?|weeks?|months?|quarters?|years?)\b")
        .expect("Invalid duration regex")
});

/// Infers structured fields from a section's title and body.
pub struct FieldExtractor {
    scores: Box<dyn ScoreSource>,
}

impl fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldExtractor").finish_non_exhaustive()
    }
}

impl Default for FieldExtractor {
    /// Seeded with [`scores::DEFAULT_SEED`] so extraction is reproducible.
    fn default() -> Self {
        Self::new(SeededScores::default())
    }
}

impl FieldExtractor {
    /// Create an extractor with the given score source.
    pub fn new(scores: impl ScoreSource + 'static) -> Self {
        Self {
            scores: Box::new(scores),
        }
    }

    /// Extractor with seeded scores, or OS entropy when `seed` is `None`.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                log::debug!("Synthesized scores seeded with {seed}");
                Self::new(SeededScores::new(seed))
            }
            None => Self::new(EntropyScores),
        }
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    /// Marketing channel from keywords in title and body.
    pub fn marketing_channel(&self, title: &str, body: &str) -> String {
        classify(
            &format!("{title}\n{body}"),
            rules::MARKETING_CHANNELS,
            rules::DEFAULT_MARKETING_CHANNEL,
        )
        .to_string()
    }

    /// Sales approach from keywords in title and body.
    pub fn sales_approach(&self, title: &str, body: &str) -> String {
        classify(
            &format!("{title}\n{body}"),
            rules::SALES_APPROACHES,
            rules::DEFAULT_SALES_APPROACH,
        )
        .to_string()
    }

    /// Pricing model from keywords in title and body.
    pub fn pricing_model(&self, title: &str, body: &str) -> String {
        classify(
            &format!("{title}\n{body}"),
            rules::PRICING_MODELS,
            rules::DEFAULT_PRICING_MODEL,
        )
        .to_string()
    }

    /// Distribution channel from keywords in title and body.
    pub fn distribution_channel(&self, title: &str, body: &str) -> String {
        classify(
            &format!("{title}\n{body}"),
            rules::DISTRIBUTION_CHANNELS,
            rules::DEFAULT_DISTRIBUTION_CHANNEL,
        )
        .to_string()
    }

    /// Tool category from keywords in title and body.
    pub fn tool_category(&self, title: &str, body: &str) -> String {
        classify(
            &format!("{title}\n{body}"),
            rules::TOOL_CATEGORIES,
            rules::DEFAULT_TOOL_CATEGORY,
        )
        .to_string()
    }

    // ------------------------------------------------------------------------
    // Free text
    // ------------------------------------------------------------------------

    /// The `Description` label, else the first prose line, else empty.
    pub fn description(&self, body: &str) -> String {
        labeled_value(body, "Description")
            .or_else(|| prose_lines(body).first().map(|line| line.to_string()))
            .unwrap_or_default()
    }

    /// The `Timeline`/`Duration` label, else the first duration phrase, else a default.
    pub fn timeline(&self, body: &str) -> String {
        let rules: [fn(&str) -> Option<String>; 3] = [
            |b| labeled_value(b, "Timeline"),
            |b| labeled_value(b, "Duration"),
            |b| DURATION_RE.find(b).map(|m| m.as_str().to_string()),
        ];
        first_match(body, &rules, DEFAULT_TIMELINE.to_string())
    }

    // ------------------------------------------------------------------------
    // Money and figures
    // ------------------------------------------------------------------------

    /// First amount is the minimum; the second (if any) the maximum.
    ///
    /// A missing maximum is synthesized as 1.5× the minimum. With no amount
    /// at all the range is zero in dollars.
    pub fn budget(&self, body: &str) -> BudgetRange {
        let amounts = money_amounts(body);
        match amounts.as_slice() {
            [] => BudgetRange::default(),
            [only] => BudgetRange::new(
                only.amount,
                only.amount * SYNTHESIZED_MAX_FACTOR,
                only.currency.clone(),
            ),
            [first, second, ..] => BudgetRange::new(
                first.amount,
                second.amount.max(first.amount),
                first.currency.clone(),
            ),
        }
    }

    /// One positionally-labelled tier per amount in the body.
    ///
    /// Lossy: tier names written in the text are not recovered.
    pub fn price_points(&self, body: &str) -> Vec<PricePoint> {
        money_amounts(body)
            .into_iter()
            .enumerate()
            .map(|(i, m)| PricePoint {
                tier: format!("Tier {}", i + 1),
                price: m.amount,
                currency: m.currency,
                features: Vec::new(),
            })
            .collect()
    }

    /// First `N%`, else [`DEFAULT_ROI`].
    pub fn roi(&self, body: &str) -> String {
        first_percentage(body).unwrap_or_else(|| DEFAULT_ROI.to_string())
    }

    /// First `<number> customers|users|people`, else [`DEFAULT_REACH`].
    pub fn reach(&self, body: &str) -> String {
        first_reach(body).unwrap_or_else(|| DEFAULT_REACH.to_string())
    }

    /// Stated suitability score, else a synthesized one.
    pub fn suitability_score(&self, body: &str) -> u8 {
        parse_score(body).unwrap_or_else(|| self.scores.score(SYNTHESIZED_RANGE))
    }

    /// Stated market-fit score, else a synthesized one.
    pub fn market_fit_score(&self, body: &str) -> u8 {
        parse_score(body).unwrap_or_else(|| self.scores.score(SYNTHESIZED_RANGE))
    }

    // ------------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------------

    /// Every list entry as a tactic (name and description).
    pub fn tactics(&self, body: &str) -> Vec<Tactic> {
        list_items(body)
            .iter()
            .map(|item| {
                let (name, description) = split_name_description(item);
                Tactic::new(name, description)
            })
            .collect()
    }

    /// Every list entry as plain text.
    pub fn steps(&self, body: &str) -> Vec<String> {
        list_items(body)
            .iter()
            .map(|item| split_name_description(item).1)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scores::FixedScore;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(FixedScore(8))
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    #[test]
    fn test_social_media_keyword() {
        assert_eq!(extractor().marketing_channel("Growth", "Post daily on social media"), "social");
    }

    #[test]
    fn test_category_fallbacks() {
        let e = extractor();
        assert_eq!(e.marketing_channel("", ""), "content");
        assert_eq!(e.sales_approach("", ""), "direct");
        assert_eq!(e.pricing_model("", ""), "tiered");
        assert_eq!(e.distribution_channel("", ""), "direct");
        assert_eq!(e.tool_category("", ""), "productivity");
    }

    #[test]
    fn test_title_contributes_to_category() {
        assert_eq!(extractor().pricing_model("Freemium Model", "details"), "freemium");
    }

    // ------------------------------------------------------------------------
    // Money
    // ------------------------------------------------------------------------

    #[test]
    fn test_budget_synthesizes_max() {
        let budget = extractor().budget("Spend about £1,000 to start");
        assert_eq!(budget.min, 1000.0);
        assert_eq!(budget.max, 1500.0);
        assert_eq!(budget.currency, "£");
    }

    #[test]
    fn test_budget_uses_second_amount() {
        let budget = extractor().budget("**Budget:** $500 - $2,000");
        assert_eq!((budget.min, budget.max), (500.0, 2000.0));
    }

    #[test]
    fn test_budget_default() {
        let budget = extractor().budget("no money mentioned");
        assert!(budget.is_unset());
        assert_eq!(budget.currency, "$");
    }

    #[test]
    fn test_price_points_positional() {
        let points = extractor().price_points("- Starter: $9/month\n- Pro: $29/month\n- Team: $99/month");
        let tiers: Vec<&str> = points.iter().map(|p| p.tier.as_str()).collect();
        assert_eq!(tiers, vec!["Tier 1", "Tier 2", "Tier 3"]);
        assert_eq!(points[2].price, 99.0);
    }

    #[test]
    fn test_roi_and_reach() {
        let e = extractor();
        assert_eq!(e.roi("Expected ROI: 250% within a year"), "250%");
        assert_eq!(e.roi("unknown"), DEFAULT_ROI);
        assert_eq!(e.reach("reaches 2,000 customers monthly"), "2,000 customers");
        assert_eq!(e.reach(""), DEFAULT_REACH);
    }

    // ------------------------------------------------------------------------
    // Scores
    // ------------------------------------------------------------------------

    #[test]
    fn test_explicit_score_wins() {
        assert_eq!(extractor().market_fit_score("**Market Fit Score:** 6/10"), 6);
    }

    #[test]
    fn test_synthesized_score_uses_source() {
        assert_eq!(extractor().suitability_score("no score"), 8);
    }

    #[test]
    fn test_default_extractor_is_reproducible() {
        let a = FieldExtractor::default();
        let b = FieldExtractor::default();
        assert_eq!(a.suitability_score(""), b.suitability_score(""));
    }

    // ------------------------------------------------------------------------
    // Free text and lists
    // ------------------------------------------------------------------------

    #[test]
    fn test_description_label_then_prose() {
        let e = extractor();
        assert_eq!(e.description("**Description:** Labelled.\nProse."), "Labelled.");
        assert_eq!(e.description("Prose first.\n- item"), "Prose first.");
        assert_eq!(e.description("- only items"), "");
    }

    #[test]
    fn test_timeline_pipeline() {
        let e = extractor();
        assert_eq!(e.timeline("**Timeline:** Q3"), "Q3");
        assert_eq!(e.timeline("**Duration:** 6 weeks"), "6 weeks");
        assert_eq!(e.timeline("Roll out over 2-3 months."), "2-3 months");
        assert_eq!(e.timeline("soon"), DEFAULT_TIMELINE);
    }

    #[test]
    fn test_tactics_split_names() {
        let tactics = extractor().tactics("- **SEO**: long-tail posts\n- Guest posts\nnot a list");
        assert_eq!(tactics.len(), 2);
        assert_eq!(tactics[0], Tactic::new("SEO", "long-tail posts"));
        assert_eq!(tactics[1], Tactic::new("Guest posts", "Guest posts"));
    }

    #[test]
    fn test_steps_plain() {
        let steps = extractor().steps("1. Build listing\n2. **Launch**: go live");
        assert_eq!(steps, vec!["Build listing", "go live"]);
    }
}
