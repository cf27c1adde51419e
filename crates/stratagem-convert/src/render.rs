//! Structured → markup rendering.
//!
//! Each populated content list becomes one top-level (`#`) block, in
//! [`SectionType::RENDER_ORDER`]; each item becomes a `##` block with
//! bold-labelled fields in a fixed order followed by its list.
//!
//! The section index is built from the same per-item text that is written
//! into the markup, so re-parsing the markup yields bodies identical to the
//! subsections' `content`.

use stratagem_content::extract::money::format_amount;
use stratagem_core::types::{
    BudgetRange, BusinessContext, ContentLengthVariant, DistributionStrategy, MarketingStrategy,
    PricingStrategy, SalesStrategy, Section, SectionType, StructuredStrategy, Subsection,
    TimelinePhase, ToolRecommendation,
};
use stratagem_core::util::ids::item_id;

/// Shown for fields that carry no value.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Shown for an unset ROI or reach.
pub const TO_BE_DETERMINED: &str = "To be determined";

/// Rendered text and the matching section index.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Full markup document.
    pub markup: String,
    /// One section per populated content list.
    pub sections: Vec<Section>,
}

/// Render a structured strategy.
pub fn render(strategy: &StructuredStrategy, variant: ContentLengthVariant) -> Rendered {
    let mut markup = preamble(&strategy.business_context, true);
    let mut sections = Vec::new();

    for section_type in SectionType::RENDER_ORDER {
        let items = render_items(strategy, section_type, variant);
        if items.is_empty() {
            continue;
        }

        markup.push_str(&format!("\n# {}\n", section_type.heading()));
        for item in &items {
            markup.push_str(&format!("\n## {}\n\n{}\n", item.title, item.content));
        }

        sections.push(Section {
            subsections: items,
            ..Section::new(section_type)
        });
    }

    Rendered { markup, sections }
}

/// The bold-labelled business context lines that open every document.
pub(crate) fn preamble(context: &BusinessContext, with_value_proposition: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("**Business Idea:** {}\n", or_default(&context.business_idea)));
    out.push_str(&format!("**Target Market:** {}\n", or_default(&context.target_market)));
    if with_value_proposition && !context.value_proposition.trim().is_empty() {
        out.push_str(&format!(
            "**Value Proposition:** {}\n",
            single_line(&context.value_proposition)
        ));
    }
    out
}

fn render_items(
    strategy: &StructuredStrategy,
    section_type: SectionType,
    variant: ContentLengthVariant,
) -> Vec<Subsection> {
    let prefix = section_type.as_str();
    match section_type {
        SectionType::Marketing => enumerate_items(&strategy.marketing_strategies, prefix, |m| {
            marketing_item(m, variant)
        }),
        SectionType::Sales => {
            enumerate_items(&strategy.sales_strategies, prefix, |s| sales_item(s, variant))
        }
        SectionType::Pricing => {
            enumerate_items(&strategy.pricing_strategies, prefix, |p| pricing_item(p, variant))
        }
        SectionType::Distribution => {
            enumerate_items(&strategy.distribution_strategies, prefix, distribution_item)
        }
        SectionType::Timeline => enumerate_items(&strategy.implementation_timeline, prefix, |t| {
            timeline_item(t, variant)
        }),
        SectionType::Tools => {
            enumerate_items(&strategy.tool_recommendations, prefix, tool_item)
        }
        SectionType::Custom => Vec::new(),
    }
}

fn enumerate_items<T, F>(items: &[T], prefix: &str, render_one: F) -> Vec<Subsection>
where
    F: Fn(&T) -> ItemBlock,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let block = render_one(item);
            let title = match single_line(&block.title) {
                t if t.is_empty() => format!("Item {}", i + 1),
                t => t,
            };
            Subsection {
                id: item_id(prefix, i, &title),
                title,
                content: block.writer.finish(),
                action_items: block.action_items,
                key_metrics: block.key_metrics,
            }
        })
        .collect()
}

// ============================================================================
// Per-item templates
// ============================================================================

struct ItemBlock {
    title: String,
    writer: BodyWriter,
    action_items: Vec<String>,
    key_metrics: Vec<String>,
}

impl ItemBlock {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            writer: BodyWriter::default(),
            action_items: Vec::new(),
            key_metrics: Vec::new(),
        }
    }

    /// A labelled field that also counts as a key metric.
    fn metric(&mut self, label: &str, value: &str) {
        self.writer.field(label, value);
        self.key_metrics.push(format!("{label}: {}", single_line(value)));
    }

    /// A bulleted (or numbered) list that also feeds the action items.
    fn list(&mut self, heading: &str, entries: Vec<String>, numbered: bool) {
        if entries.is_empty() {
            return;
        }
        self.writer.list(heading, &entries, numbered);
        self.action_items.extend(entries.into_iter().map(|e| e.replace("**", "")));
    }
}

fn marketing_item(item: &MarketingStrategy, variant: ContentLengthVariant) -> ItemBlock {
    let mut block = ItemBlock::new(&item.title);
    block.writer.optional_field("Description", &item.description);
    block.writer.optional_field("Channel", &item.channel);
    block.metric("Budget", &budget_text(&item.budget));
    block.metric("Timeline", &or_default(&item.timeline));
    block.metric("Expected ROI", &or_tbd(&item.expected_roi));
    let tactics = item
        .tactics
        .iter()
        .map(|t| named_entry(&t.name, &t.description, variant))
        .collect();
    block.list("Tactics", tactics, false);
    block
}

fn sales_item(item: &SalesStrategy, variant: ContentLengthVariant) -> ItemBlock {
    let mut block = ItemBlock::new(&item.title);
    block.writer.optional_field("Description", &item.description);
    block.writer.optional_field("Approach", &item.approach);
    block.metric("Estimated Reach", &or_tbd(&item.estimated_reach));
    block.metric("Timeline", &or_default(&item.timeline));
    block.metric("Conversion Rate", &or_tbd(&item.conversion_rate));
    let steps = item
        .process_steps
        .iter()
        .map(|t| named_entry(&t.name, &t.description, variant))
        .collect();
    block.list("Process", steps, true);
    block
}

fn pricing_item(item: &PricingStrategy, variant: ContentLengthVariant) -> ItemBlock {
    let mut block = ItemBlock::new(&item.title);
    block.writer.optional_field("Description", &item.description);
    block.writer.optional_field("Model", &item.model);
    block.metric("Market Fit Score", &format!("{}/10", item.market_fit_score));
    if variant.includes_item_details() {
        block.writer.optional_field("Rationale", &item.rationale);
    }
    let points = item
        .price_points
        .iter()
        .map(|p| {
            let price = format!("{}{}", p.currency, format_amount(p.price));
            if p.features.is_empty() || !variant.includes_item_details() {
                format!("**{}**: {price}", single_line(&p.tier))
            } else {
                format!("**{}**: {price} ({})", single_line(&p.tier), p.features.join(", "))
            }
        })
        .collect();
    block.list("Price Points", points, false);
    block
}

fn distribution_item(item: &DistributionStrategy) -> ItemBlock {
    let mut block = ItemBlock::new(&item.title);
    block.writer.optional_field("Description", &item.description);
    block.writer.optional_field("Channel", &item.channel);
    block.metric("Cost", &budget_text(&item.cost));
    block.metric("Reach", &or_tbd(&item.reach));
    block.metric("Suitability Score", &format!("{}/10", item.suitability_score));
    let steps = item
        .implementation_steps
        .iter()
        .map(|s| single_line(s))
        .filter(|s| !s.is_empty())
        .collect();
    block.list("Implementation Steps", steps, true);
    block
}

fn timeline_item(item: &TimelinePhase, variant: ContentLengthVariant) -> ItemBlock {
    let mut block = ItemBlock::new(&item.phase);
    block.metric("Duration", &or_default(&item.duration));
    if variant.includes_item_details() && !item.milestones.is_empty() {
        let milestones: Vec<String> = item.milestones.iter().map(|m| single_line(m)).collect();
        block.writer.field("Milestones", &milestones.join("; "));
    }
    let activities = item
        .activities
        .iter()
        .map(|a| single_line(a))
        .filter(|a| !a.is_empty())
        .collect();
    block.list("Activities", activities, false);
    block
}

fn tool_item(item: &ToolRecommendation) -> ItemBlock {
    let mut block = ItemBlock::new(&item.name);
    block.writer.optional_field("Description", &item.description);
    block.writer.optional_field("Category", &item.category);
    block.metric("Cost", &or_default(&item.cost));
    if !item.alternatives.is_empty() {
        block.writer.field("Alternatives", &item.alternatives.join(", "));
    }
    block
}

// ============================================================================
// Text helpers
// ============================================================================

/// Accumulates an item body. Every line starts with a label or a bullet so
/// no user text can be mistaken for a heading.
#[derive(Default)]
struct BodyWriter {
    blocks: Vec<String>,
}

impl BodyWriter {
    fn field(&mut self, label: &str, value: &str) {
        self.blocks.push(format!("**{label}:** {}", single_line(value)));
    }

    fn optional_field(&mut self, label: &str, value: &str) {
        if !value.trim().is_empty() {
            self.field(label, value);
        }
    }

    fn list(&mut self, heading: &str, entries: &[String], numbered: bool) {
        let lines: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if numbered {
                    format!("{}. {entry}", i + 1)
                } else {
                    format!("- {entry}")
                }
            })
            .collect();
        self.blocks.push(format!("**{heading}:**\n{}", lines.join("\n")));
    }

    fn finish(self) -> String {
        self.blocks.join("\n\n")
    }
}

fn named_entry(name: &str, description: &str, variant: ContentLengthVariant) -> String {
    let name = single_line(name);
    let description = single_line(description);
    if description.is_empty() || description == name || !variant.includes_item_details() {
        name
    } else if name.is_empty() {
        description
    } else {
        format!("**{name}**: {description}")
    }
}

fn budget_text(budget: &BudgetRange) -> String {
    if budget.is_unset() {
        return NOT_SPECIFIED.to_string();
    }
    let c = &budget.currency;
    if budget.max > budget.min {
        format!("{c}{} - {c}{}", format_amount(budget.min), format_amount(budget.max))
    } else {
        format!("{c}{}", format_amount(budget.min))
    }
}

/// Collapse a value onto one line.
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn or_default(text: &str) -> String {
    match single_line(text) {
        t if t.is_empty() => NOT_SPECIFIED.to_string(),
        t => t,
    }
}

fn or_tbd(text: &str) -> String {
    match single_line(text) {
        t if t.is_empty() => TO_BE_DETERMINED.to_string(),
        t => t,
    }
}
