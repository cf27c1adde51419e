//! Currency, percentage and reach parsing.
//!
//! Only the symbol that was actually written is recorded; amounts in
//! different currencies are never reconciled.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([$€£¥])\s?(\d[\d,]*(?:\.\d+)?)(?:\s?([kKmM])\b)?").expect("Invalid money regex")
});

#[allow(clippy::expect_used)]
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("Invalid percentage regex"));

#[allow(clippy::expect_used)]
static REACH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?\s?[kKmM]?\+?)\s+(customers|users|people)")
        .expect("Invalid reach regex")
});

/// One amount found in text.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyAmount {
    /// Currency symbol as written.
    pub currency: String,
    /// Amount with `k`/`m` suffixes applied.
    pub amount: f64,
}

/// Every currency amount in `text`, in order of appearance.
pub fn money_amounts(text: &str) -> Vec<MoneyAmount> {
    MONEY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let currency = caps.get(1)?.as_str().to_string();
            let digits = caps.get(2)?.as_str().replace(',', "");
            let mut amount: f64 = digits.parse().ok()?;
            match caps.get(3).map(|m| m.as_str()) {
                Some("k") | Some("K") => amount *= 1_000.0,
                Some("m") | Some("M") => amount *= 1_000_000.0,
                _ => {}
            }
            Some(MoneyAmount { currency, amount })
        })
        .collect()
}

/// First `N%` in `text`, normalized as `"N%"`.
pub fn first_percentage(text: &str) -> Option<String> {
    PERCENT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("{}%", m.as_str()))
}

/// First `<number> customers|users|people` in `text`.
pub fn first_reach(text: &str) -> Option<String> {
    let caps = REACH_RE.captures(text)?;
    let count = caps.get(1)?.as_str().trim();
    let noun = caps.get(2)?.as_str().to_lowercase();
    Some(format!("{count} {noun}"))
}

/// Render an amount without a trailing `.0` for whole numbers.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{amount:.2}")
    }
}
