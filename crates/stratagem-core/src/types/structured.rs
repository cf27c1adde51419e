//! The field-typed ("structured") strategy representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::business::BusinessContext;

/// Current structured-format version tag.
pub const STRUCTURED_VERSION: &str = "1.0";

/// A go-to-market strategy as independent typed lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredStrategy {
    /// Strategy identifier (required for conversion).
    pub id: String,
    /// Business plan this strategy serves (required for conversion).
    pub business_context: BusinessContext,
    /// Marketing channel plans.
    pub marketing_strategies: Vec<MarketingStrategy>,
    /// Sales approaches.
    pub sales_strategies: Vec<SalesStrategy>,
    /// Pricing models.
    pub pricing_strategies: Vec<PricingStrategy>,
    /// Distribution channels.
    pub distribution_strategies: Vec<DistributionStrategy>,
    /// Implementation phases.
    pub implementation_timeline: Vec<TimelinePhase>,
    /// Recommended tools.
    pub tool_recommendations: Vec<ToolRecommendation>,
    /// When the strategy was generated.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,
    /// Format version tag.
    pub version: String,
}

impl Default for StructuredStrategy {
    fn default() -> Self {
        Self {
            id: String::new(),
            business_context: BusinessContext::default(),
            marketing_strategies: Vec::new(),
            sales_strategies: Vec::new(),
            pricing_strategies: Vec::new(),
            distribution_strategies: Vec::new(),
            implementation_timeline: Vec::new(),
            tool_recommendations: Vec::new(),
            generated_at: DateTime::<Utc>::UNIX_EPOCH,
            version: STRUCTURED_VERSION.to_string(),
        }
    }
}

impl StructuredStrategy {
    /// Create an empty strategy for a business context, stamped now.
    pub fn new(id: impl Into<String>, business_context: BusinessContext) -> Self {
        Self {
            id: id.into(),
            business_context,
            generated_at: Utc::now(),
            ..Self::default()
        }
    }

    /// Total number of items across every content list.
    pub fn item_count(&self) -> usize {
        self.marketing_strategies.len()
            + self.sales_strategies.len()
            + self.pricing_strategies.len()
            + self.distribution_strategies.len()
            + self.implementation_timeline.len()
            + self.tool_recommendations.len()
    }

    /// A strategy is usable when at least one content list has items.
    pub fn is_usable(&self) -> bool {
        self.item_count() > 0
    }

    /// Non-fatal problems with this strategy.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.id.trim().is_empty() {
            warnings.push("strategy has no id".to_string());
        }
        if self.business_context.is_empty() {
            warnings.push("strategy has no business context".to_string());
        }
        if !self.is_usable() {
            warnings.push("strategy has no content items".to_string());
        }
        warnings
    }
}

/// Monetary range in a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Currency symbol as written (e.g. "$").
    pub currency: String,
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            currency: "$".to_string(),
        }
    }
}

impl BudgetRange {
    /// Create a range.
    pub fn new(min: f64, max: f64, currency: impl Into<String>) -> Self {
        Self {
            min,
            max,
            currency: currency.into(),
        }
    }

    /// A range with no amounts set.
    pub fn is_unset(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

/// A named step or tactic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tactic {
    /// Short name.
    pub name: String,
    /// Longer description (equal to `name` when nothing more is known).
    pub description: String,
}

impl Tactic {
    /// Create a tactic.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One marketing channel plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingStrategy {
    /// Item id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Channel category ("social", "content", "email", ...).
    pub channel: String,
    /// What the plan does.
    pub description: String,
    /// Concrete tactics.
    pub tactics: Vec<Tactic>,
    /// Estimated spend.
    pub budget: BudgetRange,
    /// Time to results.
    pub timeline: String,
    /// Expected return, e.g. "150%".
    #[serde(rename = "expectedROI", alias = "expectedRoi")]
    pub expected_roi: String,
}

/// One sales approach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesStrategy {
    /// Item id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Approach category ("direct", "inside", "partner", ...).
    pub approach: String,
    /// What the approach does.
    pub description: String,
    /// Ordered sales process.
    pub process_steps: Vec<Tactic>,
    /// Estimated reach, e.g. "500 customers".
    pub estimated_reach: String,
    /// Expected conversion rate, e.g. "3%".
    pub conversion_rate: String,
    /// Time to results.
    pub timeline: String,
}

/// A single price point in a pricing model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricePoint {
    /// Tier label.
    pub tier: String,
    /// Price amount.
    pub price: f64,
    /// Currency symbol.
    pub currency: String,
    /// Included features.
    pub features: Vec<String>,
}

/// One pricing model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingStrategy {
    /// Item id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Model category ("subscription", "freemium", ...).
    pub model: String,
    /// What the model does.
    pub description: String,
    /// Price tiers.
    pub price_points: Vec<PricePoint>,
    /// Market fit on a 1-10 scale.
    pub market_fit_score: u8,
    /// Why this model fits.
    pub rationale: String,
}

/// One distribution channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributionStrategy {
    /// Item id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Channel category ("online", "retail", "partners", "direct").
    pub channel: String,
    /// What the channel does.
    pub description: String,
    /// Estimated cost.
    pub cost: BudgetRange,
    /// Estimated reach.
    pub reach: String,
    /// Suitability on a 1-10 scale.
    pub suitability_score: u8,
    /// Steps to stand the channel up.
    pub implementation_steps: Vec<String>,
}

/// One implementation phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelinePhase {
    /// Item id.
    pub id: String,
    /// Phase name.
    pub phase: String,
    /// Phase duration, e.g. "4 weeks".
    pub duration: String,
    /// Work done in the phase.
    pub activities: Vec<String>,
    /// Exit criteria.
    pub milestones: Vec<String>,
}

/// One recommended tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolRecommendation {
    /// Item id.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Tool category ("crm", "analytics", ...).
    pub category: String,
    /// What the tool is used for.
    pub description: String,
    /// Cost, e.g. "$49/month".
    pub cost: String,
    /// Comparable tools.
    pub alternatives: Vec<String>,
}
