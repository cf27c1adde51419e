//! Keyword classification rules.
//!
//! Each table is an ordered list of `(value, keywords)` rules. The first rule
//! with a keyword contained in the (lowercased) text wins; when none match,
//! the caller's fallback is returned. Order matters: more specific rules come
//! first ("free tier" must beat "tier").

/// One keyword rule: when any keyword occurs in the text, classify as `value`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    /// Category produced by this rule.
    pub value: &'static str,
    /// Lowercase substrings that trigger the rule.
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    /// Whether any keyword occurs in already-lowercased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Run the rules in order, falling back to `default`.
pub fn classify(text: &str, rules: &[KeywordRule], default: &'static str) -> &'static str {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.value)
        .unwrap_or(default)
}

/// Run a pipeline of extractors in order, falling back to `default`.
///
/// Each rule is a predicate and value in one: it returns `Some` when it
/// recognizes the text.
pub fn first_match<T>(text: &str, rules: &[fn(&str) -> Option<T>], default: T) -> T {
    rules.iter().find_map(|rule| rule(text)).unwrap_or(default)
}

/// Fallback marketing channel.
pub const DEFAULT_MARKETING_CHANNEL: &str = "content";

/// Marketing channel categories.
pub const MARKETING_CHANNELS: &[KeywordRule] = &[
    KeywordRule {
        value: "social",
        keywords: &["social media", "instagram", "facebook", "linkedin", "tiktok", "twitter"],
    },
    KeywordRule {
        value: "email",
        keywords: &["email", "newsletter", "drip"],
    },
    KeywordRule {
        value: "paid",
        keywords: &["paid", "ads", "advertising", "ppc", "sponsored"],
    },
    KeywordRule {
        value: "partnerships",
        keywords: &["partner", "affiliate", "influencer", "referral"],
    },
    KeywordRule {
        value: "events",
        keywords: &["event", "conference", "webinar", "trade show", "meetup"],
    },
    KeywordRule {
        value: "content",
        keywords: &["blog", "content", "seo", "article", "video", "podcast"],
    },
];

/// Fallback sales approach.
pub const DEFAULT_SALES_APPROACH: &str = "direct";

/// Sales approach categories.
pub const SALES_APPROACHES: &[KeywordRule] = &[
    KeywordRule {
        value: "self-serve",
        keywords: &["self-serve", "self serve", "product-led", "free trial", "online checkout"],
    },
    KeywordRule {
        value: "inside",
        keywords: &["inside sales", "inbound", "phone", "demo call"],
    },
    KeywordRule {
        value: "partner",
        keywords: &["partner", "channel", "reseller"],
    },
    KeywordRule {
        value: "enterprise",
        keywords: &["enterprise", "account-based", "abm", "rfp"],
    },
    KeywordRule {
        value: "direct",
        keywords: &["direct", "outbound", "cold", "field sales"],
    },
];

/// Fallback pricing model.
pub const DEFAULT_PRICING_MODEL: &str = "tiered";

/// Pricing model categories.
pub const PRICING_MODELS: &[KeywordRule] = &[
    KeywordRule {
        value: "freemium",
        keywords: &["freemium", "free tier", "free plan"],
    },
    KeywordRule {
        value: "usage",
        keywords: &["usage", "pay-as-you-go", "pay as you go", "per use", "metered"],
    },
    KeywordRule {
        value: "subscription",
        keywords: &["subscription", "monthly", "annual", "per month", "/month", "saas"],
    },
    KeywordRule {
        value: "one-time",
        keywords: &["one-time", "one time", "lifetime", "perpetual"],
    },
    KeywordRule {
        value: "tiered",
        keywords: &["tier", "plan", "package"],
    },
];

/// Fallback distribution channel.
pub const DEFAULT_DISTRIBUTION_CHANNEL: &str = "direct";

/// Distribution channel categories.
pub const DISTRIBUTION_CHANNELS: &[KeywordRule] = &[
    KeywordRule {
        value: "online",
        keywords: &["website", "online", "e-commerce", "ecommerce", "marketplace", "app store"],
    },
    KeywordRule {
        value: "retail",
        keywords: &["retail", "store", "shop", "wholesale"],
    },
    KeywordRule {
        value: "partners",
        keywords: &["partner", "reseller", "distributor", "agency"],
    },
    KeywordRule {
        value: "direct",
        keywords: &["direct", "door-to-door", "field"],
    },
];

/// Fallback tool category.
pub const DEFAULT_TOOL_CATEGORY: &str = "productivity";

/// Tool categories.
pub const TOOL_CATEGORIES: &[KeywordRule] = &[
    KeywordRule {
        value: "crm",
        keywords: &["crm", "salesforce", "hubspot", "pipedrive"],
    },
    KeywordRule {
        value: "analytics",
        keywords: &["analytics", "tracking", "metrics", "dashboard", "mixpanel"],
    },
    KeywordRule {
        value: "marketing",
        keywords: &["email", "mailchimp", "social", "seo", "marketing", "buffer"],
    },
    KeywordRule {
        value: "design",
        keywords: &["design", "figma", "canva"],
    },
    KeywordRule {
        value: "project-management",
        keywords: &["project", "task", "trello", "asana", "jira", "notion"],
    },
    KeywordRule {
        value: "communication",
        keywords: &["chat", "slack", "video call", "zoom", "support"],
    },
];
