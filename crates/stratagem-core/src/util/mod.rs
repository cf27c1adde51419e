//! Utility functions shared across Stratagem crates.
//!
//! - [`ids`]: Identifier slugs for sections and items

pub mod ids;
