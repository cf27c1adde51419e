//! Data model for both strategy representations.

mod business;
mod markup;
mod structured;
mod variant;

mod proptests;

pub use business::BusinessContext;
pub use markup::{MarkupMetadata, MarkupStrategy, Section, SectionType, Subsection};
pub use structured::{
    BudgetRange, DistributionStrategy, MarketingStrategy, PricePoint, PricingStrategy,
    STRUCTURED_VERSION, SalesStrategy, StructuredStrategy, Tactic, TimelinePhase,
    ToolRecommendation,
};
pub use variant::ContentLengthVariant;
