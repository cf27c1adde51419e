#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Stratagem Core
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`types`]: Structured and markup strategy models
//! - [`config`]: TOML configuration
//! - [`util`]: Identifier helpers

pub mod config;
pub mod error;
pub mod types;
pub mod util;

// Re-exports for convenience
pub use config::StratagemConfig;
pub use error::{Error, Result};
pub use types::{
    BusinessContext, ContentLengthVariant, MarkupMetadata, MarkupStrategy, Section, SectionType,
    StructuredStrategy, Subsection,
};
