//! Markup → structured extraction.
//!
//! The markup is parsed into a heading forest and, for each content list,
//! the first heading whose title carries one of that list's keywords is
//! taken as its section. Every child heading of that section becomes one
//! item. Values written with the renderer's bold labels are read back
//! verbatim; anything else goes through [`FieldExtractor`] heuristics.
//!
//! This direction is lossy. What the renderer's template does not capture
//! (tier names in free prose, item ids, extra paragraphs) is approximated
//! or dropped, and the result carries warnings instead of a fidelity promise.

use stratagem_content::extract::money::money_amounts;
use stratagem_content::extract::scores::parse_rating;
use stratagem_content::markdown::helpers::{labeled_value, list_items, split_name_description};
use stratagem_content::{FieldExtractor, HeadingNode, find_section, parse_sections};
use stratagem_core::types::{
    BusinessContext, DistributionStrategy, MarketingStrategy, MarkupStrategy, PricePoint,
    PricingStrategy, SalesStrategy, SectionType, StructuredStrategy, TimelinePhase,
    ToolRecommendation,
};
use stratagem_core::util::ids::item_id;

/// Result of a reverse conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Best-effort structured strategy.
    pub strategy: StructuredStrategy,
    /// What could not be found or reconstructed.
    pub warnings: Vec<String>,
}

/// Title keywords that identify each content list's section.
pub fn section_keywords(section_type: SectionType) -> &'static [&'static str] {
    match section_type {
        SectionType::Marketing => &["marketing"],
        SectionType::Sales => &["sales", "selling"],
        SectionType::Pricing => &["pricing", "price"],
        SectionType::Distribution => &["distribution", "channel"],
        SectionType::Timeline => &["timeline", "implementation", "roadmap", "phase"],
        SectionType::Tools => &["tool", "resource", "software"],
        SectionType::Custom => &[],
    }
}

/// One item located in the markup: a heading title and its body.
struct Item<'a> {
    title: &'a str,
    body: &'a str,
}

pub(crate) fn extract(extractor: &FieldExtractor, markup: &MarkupStrategy) -> Extraction {
    let forest = source_forest(markup);
    let mut warnings = Vec::new();

    let business_context = if markup.business_context.is_empty() {
        preamble_context(&markup.raw_markup)
    } else {
        markup.business_context.clone()
    };

    let mut strategy = StructuredStrategy {
        id: markup.id.clone(),
        business_context,
        generated_at: markup.metadata.generated_at,
        ..StructuredStrategy::default()
    };

    for section_type in SectionType::RENDER_ORDER {
        let Some(node) = locate(&forest, section_type) else {
            if section_type.is_essential() {
                warnings.push(format!("no {} section found", section_type.as_str()));
            }
            continue;
        };

        let items = items_of(node);
        if items.is_empty() {
            warnings.push(format!("section '{}' has no items", node.title));
            continue;
        }

        let prefix = section_type.as_str();
        match section_type {
            SectionType::Marketing => {
                strategy.marketing_strategies = enumerate(&items, |i, item| {
                    marketing(extractor, item_id(prefix, i, item.title), item)
                })
            }
            SectionType::Sales => {
                strategy.sales_strategies = enumerate(&items, |i, item| {
                    sales(extractor, item_id(prefix, i, item.title), item)
                })
            }
            SectionType::Pricing => {
                strategy.pricing_strategies = enumerate(&items, |i, item| {
                    pricing(extractor, item_id(prefix, i, item.title), item)
                })
            }
            SectionType::Distribution => {
                strategy.distribution_strategies = enumerate(&items, |i, item| {
                    distribution(extractor, item_id(prefix, i, item.title), item)
                })
            }
            SectionType::Timeline => {
                strategy.implementation_timeline = enumerate(&items, |i, item| {
                    timeline(extractor, item_id(prefix, i, item.title), item)
                })
            }
            SectionType::Tools => {
                strategy.tool_recommendations = enumerate(&items, |i, item| {
                    tool(extractor, item_id(prefix, i, item.title), item)
                })
            }
            SectionType::Custom => {}
        }
    }

    if !strategy.is_usable() {
        warnings.push("no content items could be extracted".to_string());
    }
    for warning in &warnings {
        log::debug!("Extraction of '{}': {warning}", markup.id);
    }

    Extraction { strategy, warnings }
}

/// The parsed raw markup, or the section index when the text has no headings.
fn source_forest(markup: &MarkupStrategy) -> Vec<HeadingNode> {
    let forest = parse_sections(&markup.raw_markup);
    if !forest.is_empty() {
        return forest;
    }
    markup
        .sections
        .iter()
        .map(|section| HeadingNode {
            level: 1,
            title: section.title.clone(),
            body: section.content.clone(),
            children: section
                .subsections
                .iter()
                .map(|sub| HeadingNode {
                    level: 2,
                    title: sub.title.clone(),
                    body: sub.content.clone(),
                    children: Vec::new(),
                })
                .collect(),
        })
        .collect()
}

/// Top-level headings are preferred; nested ones are searched only after.
fn locate(forest: &[HeadingNode], section_type: SectionType) -> Option<&HeadingNode> {
    let keywords = section_keywords(section_type);
    let matches = |node: &HeadingNode| {
        let title = node.title.to_lowercase();
        keywords.iter().any(|k| title.contains(k))
    };
    forest
        .iter()
        .find(|node| matches(node))
        .or_else(|| find_section(forest, matches))
}

/// Child headings, or the section itself when it has a body but no children.
fn items_of(node: &HeadingNode) -> Vec<Item<'_>> {
    if node.children.is_empty() {
        if node.body.trim().is_empty() {
            return Vec::new();
        }
        return vec![Item {
            title: &node.title,
            body: &node.body,
        }];
    }
    node.children
        .iter()
        .map(|child| Item {
            title: &child.title,
            body: &child.body,
        })
        .collect()
}

fn enumerate<T, F>(items: &[Item<'_>], build: F) -> Vec<T>
where
    F: Fn(usize, &Item<'_>) -> T,
{
    items.iter().enumerate().map(|(i, item)| build(i, item)).collect()
}

fn preamble_context(raw: &str) -> BusinessContext {
    let preamble = raw
        .lines()
        .take_while(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let field = |label| labeled_value(&preamble, label).unwrap_or_default();
    BusinessContext::new(
        field("Business Idea"),
        field("Target Market"),
        field("Value Proposition"),
    )
}

// ============================================================================
// Per-list reconstruction
// ============================================================================

fn marketing(extractor: &FieldExtractor, id: String, item: &Item<'_>) -> MarketingStrategy {
    let body = item.body;
    MarketingStrategy {
        id,
        title: item.title.to_string(),
        channel: labeled_value(body, "Channel")
            .unwrap_or_else(|| extractor.marketing_channel(item.title, body)),
        description: extractor.description(body),
        tactics: extractor.tactics(body),
        budget: extractor.budget(&labeled_value(body, "Budget").unwrap_or_else(|| body.to_string())),
        timeline: extractor.timeline(body),
        expected_roi: labeled_value(body, "Expected ROI").unwrap_or_else(|| extractor.roi(body)),
    }
}

fn sales(extractor: &FieldExtractor, id: String, item: &Item<'_>) -> SalesStrategy {
    let body = item.body;
    SalesStrategy {
        id,
        title: item.title.to_string(),
        approach: labeled_value(body, "Approach")
            .unwrap_or_else(|| extractor.sales_approach(item.title, body)),
        description: extractor.description(body),
        process_steps: extractor.tactics(body),
        estimated_reach: labeled_value(body, "Estimated Reach")
            .unwrap_or_else(|| extractor.reach(body)),
        conversion_rate: labeled_value(body, "Conversion Rate").unwrap_or_else(|| extractor.roi(body)),
        timeline: extractor.timeline(body),
    }
}

fn pricing(extractor: &FieldExtractor, id: String, item: &Item<'_>) -> PricingStrategy {
    let body = item.body;
    let mut price_points = named_price_points(body);
    if price_points.is_empty() {
        price_points = extractor.price_points(body);
    }
    PricingStrategy {
        id,
        title: item.title.to_string(),
        model: labeled_value(body, "Model")
            .unwrap_or_else(|| extractor.pricing_model(item.title, body)),
        description: extractor.description(body),
        price_points,
        market_fit_score: labeled_score(body, "Market Fit Score")
            .unwrap_or_else(|| extractor.market_fit_score(body)),
        rationale: labeled_value(body, "Rationale").unwrap_or_default(),
    }
}

fn distribution(extractor: &FieldExtractor, id: String, item: &Item<'_>) -> DistributionStrategy {
    let body = item.body;
    DistributionStrategy {
        id,
        title: item.title.to_string(),
        channel: labeled_value(body, "Channel")
            .unwrap_or_else(|| extractor.distribution_channel(item.title, body)),
        description: extractor.description(body),
        cost: extractor.budget(&labeled_value(body, "Cost").unwrap_or_else(|| body.to_string())),
        reach: labeled_value(body, "Reach").unwrap_or_else(|| extractor.reach(body)),
        suitability_score: labeled_score(body, "Suitability Score")
            .unwrap_or_else(|| extractor.suitability_score(body)),
        implementation_steps: extractor.steps(body),
    }
}

fn labeled_score(body: &str, label: &str) -> Option<u8> {
    labeled_value(body, label).as_deref().and_then(parse_rating)
}

fn timeline(extractor: &FieldExtractor, id: String, item: &Item<'_>) -> TimelinePhase {
    let body = item.body;
    TimelinePhase {
        id,
        phase: item.title.to_string(),
        duration: extractor.timeline(body),
        activities: extractor.steps(body),
        milestones: split_list(labeled_value(body, "Milestones"), "; "),
    }
}

fn tool(extractor: &FieldExtractor, id: String, item: &Item<'_>) -> ToolRecommendation {
    let body = item.body;
    ToolRecommendation {
        id,
        name: item.title.to_string(),
        category: labeled_value(body, "Category")
            .unwrap_or_else(|| extractor.tool_category(item.title, body)),
        description: extractor.description(body),
        cost: labeled_value(body, "Cost").unwrap_or_default(),
        alternatives: split_list(labeled_value(body, "Alternatives"), ", "),
    }
}

/// Price points from `- **Tier**: $N (feature, feature)` list entries.
fn named_price_points(body: &str) -> Vec<PricePoint> {
    list_items(body)
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let (name, description) = split_name_description(entry);
            let amount = money_amounts(&description).into_iter().next()?;
            let tier = if name == description {
                format!("Tier {}", i + 1)
            } else {
                name
            };
            let features = description
                .rsplit_once('(')
                .and_then(|(_, rest)| rest.strip_suffix(')'))
                .map(|inner| split_list(Some(inner.to_string()), ", "))
                .unwrap_or_default();
            Some(PricePoint {
                tier,
                price: amount.amount,
                currency: amount.currency,
                features,
            })
        })
        .collect()
}

fn split_list(value: Option<String>, separator: &str) -> Vec<String> {
    value
        .map(|v| {
            v.split(separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stratagem_content::FixedScore;
    use stratagem_core::types::{Section, Subsection};

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(FixedScore(8))
    }

    fn markup(raw: &str) -> MarkupStrategy {
        MarkupStrategy {
            id: "m-1".to_string(),
            raw_markup: raw.to_string(),
            ..MarkupStrategy::default()
        }
    }

    // ------------------------------------------------------------------------
    // Section location
    // ------------------------------------------------------------------------

    #[test]
    fn test_keywords_match_titles() {
        let raw = "# Go-To-Market Marketing Plan\n## Blog\nWrite weekly.\n\
                   # Selling Approach\n## Outbound\n- Cold email\n\
                   # Price Plans\n## Pro\n- **Pro**: $29/month";
        let out = extract(&extractor(), &markup(raw));
        assert_eq!(out.strategy.marketing_strategies.len(), 1);
        assert_eq!(out.strategy.sales_strategies.len(), 1);
        assert_eq!(out.strategy.pricing_strategies.len(), 1);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn test_top_level_preferred_over_nested() {
        let raw = "# Marketing\n## Sales enablement content\nDecks.\n# Sales\n## Demo calls\nBook demos.";
        let out = extract(&extractor(), &markup(raw));
        assert_eq!(out.strategy.sales_strategies[0].title, "Demo calls");
    }

    #[test]
    fn test_nested_section_found() {
        let raw = "# Strategy\n## Pricing\n### Starter\n- $9/month";
        let out = extract(&extractor(), &markup(raw));
        assert_eq!(out.strategy.pricing_strategies[0].title, "Starter");
    }

    #[test]
    fn test_missing_essentials_warned() {
        let out = extract(&extractor(), &markup("# Tools\n## Notion\nDocs."));
        assert_eq!(out.strategy.tool_recommendations.len(), 1);
        assert_eq!(
            out.warnings,
            vec![
                "no marketing section found",
                "no sales section found",
                "no pricing section found"
            ]
        );
    }

    #[test]
    fn test_empty_markup_is_unusable() {
        let out = extract(&extractor(), &markup(""));
        assert!(!out.strategy.is_usable());
        assert_eq!(out.warnings.last().unwrap(), "no content items could be extracted");
    }

    #[test]
    fn test_empty_section_warned() {
        let out = extract(&extractor(), &markup("# Marketing\n# Sales\n## Calls\nPhone."));
        assert!(out.warnings.contains(&"section 'Marketing' has no items".to_string()));
    }

    #[test]
    fn test_childless_section_is_one_item() {
        let out = extract(&extractor(), &markup("# Pricing\n- $29/month\n- $290/year"));
        let pricing = &out.strategy.pricing_strategies[0];
        assert_eq!(pricing.title, "Pricing");
        assert_eq!(pricing.price_points.len(), 2);
        assert_eq!(pricing.price_points[1].price, 290.0);
    }

    // ------------------------------------------------------------------------
    // Field reconstruction
    // ------------------------------------------------------------------------

    #[test]
    fn test_labeled_values_read_verbatim() {
        let raw = "# Marketing Strategies\n## Instagram Launch\n\n\
                   **Description:** Short recipe videos\n\n**Channel:** social\n\n\
                   **Budget:** $500 - $750\n\n**Timeline:** 3 months\n\n\
                   **Expected ROI:** To be determined\n\n**Tactics:**\n- **Reels**: Three per week";
        let out = extract(&extractor(), &markup(raw));
        let m = &out.strategy.marketing_strategies[0];
        assert_eq!(m.id, "marketing-1-instagram-launch");
        assert_eq!(m.description, "Short recipe videos");
        assert_eq!(m.channel, "social");
        assert_eq!((m.budget.min, m.budget.max), (500.0, 750.0));
        assert_eq!(m.timeline, "3 months");
        assert_eq!(m.expected_roi, "To be determined");
        assert_eq!(m.tactics[0].name, "Reels");
        assert_eq!(m.tactics[0].description, "Three per week");
    }

    #[test]
    fn test_heuristics_without_labels() {
        let raw = "# Distribution\n## Amazon marketplace\nList on Amazon to reach 10,000 customers. \
                   Fees around $200.\n1. Create seller account\n2. Upload catalog";
        let out = extract(&extractor(), &markup(raw));
        let d = &out.strategy.distribution_strategies[0];
        assert_eq!(d.channel, "online");
        assert_eq!(d.reach, "10,000 customers");
        assert_eq!((d.cost.min, d.cost.max), (200.0, 300.0));
        assert_eq!(d.suitability_score, 8);
        assert_eq!(d.implementation_steps, vec!["Create seller account", "Upload catalog"]);
    }

    #[test]
    fn test_named_price_points_with_features() {
        let raw = "# Pricing\n## Weekly Box\n**Price Points:**\n- **Family**: $59 (4 meals, free delivery)";
        let out = extract(&extractor(), &markup(raw));
        let point = &out.strategy.pricing_strategies[0].price_points[0];
        assert_eq!(point.tier, "Family");
        assert_eq!(point.price, 59.0);
        assert_eq!(point.features, vec!["4 meals", "free delivery"]);
    }

    #[test]
    fn test_timeline_and_tools() {
        let raw = "# Implementation Timeline\n## Launch\n**Duration:** 6 weeks\n\n\
                   **Milestones:** Beta; GA\n\n**Activities:**\n- Hire support\n\
                   # Recommended Tools\n## HubSpot\n**Category:** crm\n\n**Cost:** $50/month\n\n\
                   **Alternatives:** Pipedrive, Salesforce";
        let out = extract(&extractor(), &markup(raw));
        let phase = &out.strategy.implementation_timeline[0];
        assert_eq!(phase.duration, "6 weeks");
        assert_eq!(phase.milestones, vec!["Beta", "GA"]);
        assert_eq!(phase.activities, vec!["Hire support"]);
        let tool = &out.strategy.tool_recommendations[0];
        assert_eq!(tool.category, "crm");
        assert_eq!(tool.cost, "$50/month");
        assert_eq!(tool.alternatives, vec!["Pipedrive", "Salesforce"]);
    }

    #[test]
    fn test_business_context_from_preamble() {
        let raw = "**Business Idea:** Meal kits\n**Target Market:** Families\n\n# Sales\n## Calls\nPhone.";
        let out = extract(&extractor(), &markup(raw));
        assert_eq!(out.strategy.business_context.business_idea, "Meal kits");
        assert_eq!(out.strategy.business_context.target_market, "Families");
    }

    #[test]
    fn test_falls_back_to_section_index() {
        let mut m = markup("");
        m.sections = vec![Section {
            subsections: vec![Subsection {
                title: "Cold outreach".to_string(),
                content: "- Email founders".to_string(),
                ..Subsection::default()
            }],
            ..Section::new(SectionType::Sales)
        }];
        let out = extract(&extractor(), &m);
        assert_eq!(out.strategy.sales_strategies[0].title, "Cold outreach");
        assert_eq!(out.strategy.sales_strategies[0].process_steps[0].name, "Email founders");
    }
}
