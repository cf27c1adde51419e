//! Business context shared by both strategy representations.

use serde::{Deserialize, Serialize};

/// The business plan a strategy was generated for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessContext {
    /// One-line description of the business idea.
    pub business_idea: String,
    /// Who the product is for.
    pub target_market: String,
    /// Why the target market should care.
    pub value_proposition: String,
    /// Planned phases of the business (e.g. "MVP", "Launch").
    pub implementation_phases: Vec<String>,
    /// Business goals.
    pub goals: Vec<String>,
    /// Known constraints (budget, team, regulation).
    pub constraints: Vec<String>,
}

impl BusinessContext {
    /// Create a context with the three headline fields set.
    pub fn new(
        business_idea: impl Into<String>,
        target_market: impl Into<String>,
        value_proposition: impl Into<String>,
    ) -> Self {
        Self {
            business_idea: business_idea.into(),
            target_market: target_market.into(),
            value_proposition: value_proposition.into(),
            ..Self::default()
        }
    }

    /// A context is empty when it names no business idea.
    pub fn is_empty(&self) -> bool {
        self.business_idea.trim().is_empty()
    }

    /// Stable fingerprint used to detect stale cache entries.
    ///
    /// blake3 over the canonical JSON form, truncated to 16 hex characters.
    pub fn fingerprint(&self) -> String {
        // Struct serialization cannot fail: every field is a string or list of strings.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let hash = blake3::hash(&canonical);
        hash.to_hex()[..16].to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        assert!(BusinessContext::default().is_empty());
        assert!(BusinessContext::new("  ", "devs", "fast").is_empty());
        assert!(!BusinessContext::new("Meal kits", "families", "saves time").is_empty());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = BusinessContext::new("Meal kits", "families", "saves time");
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn test_fingerprint_changes_with_context() {
        let a = BusinessContext::new("Meal kits", "families", "saves time");
        let mut b = a.clone();
        b.goals.push("1000 subscribers".to_string());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_deserialize_partial() {
        let ctx: BusinessContext =
            serde_json::from_str(r#"{"businessIdea":"Bike repair"}"#).unwrap();
        assert_eq!(ctx.business_idea, "Bike repair");
        assert!(ctx.goals.is_empty());
    }
}
