//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stratagem_core::types::ContentLengthVariant;

/// Stratagem - go-to-market strategy conversion and cache administration
#[derive(Parser, Debug)]
#[command(name = "stratagem", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "STRATAGEM_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a structured strategy (JSON) as markup
    Render {
        /// Structured strategy JSON file
        file: PathBuf,

        /// Content length variant
        #[arg(long, default_value_t = ContentLengthVariant::Standard)]
        variant: ContentLengthVariant,

        /// Re-validate the rendered markup; print the recovery template on failure
        #[arg(long)]
        validate: bool,
    },

    /// Print the heading tree of a markup file as JSON
    Parse {
        /// Markup file
        file: PathBuf,
    },

    /// Extract a structured strategy (JSON) from a markup file
    Extract {
        /// Markup file
        file: PathBuf,

        /// Strategy id for the result
        #[arg(long, default_value = "extracted-strategy")]
        id: String,
    },

    /// Cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show entry counts and age range
    Stats,

    /// Write a snapshot of the cache as JSON
    Export {
        /// Output file; stdout when omitted
        file: Option<PathBuf>,
    },

    /// Merge a snapshot file into the cache
    Import {
        /// Snapshot file
        file: PathBuf,
    },

    /// Bring every entry to the current format
    Migrate,

    /// Remove cached entries for a context
    Invalidate {
        /// Context identifier
        context: String,

        /// Only this variant; every variant when omitted
        #[arg(long, conflicts_with = "all")]
        variant: Option<ContentLengthVariant>,

        /// Also remove the context's unpartitioned entry
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the resolved config file path
    Path,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let args =
            Args::try_parse_from(["stratagem", "render", "s.json", "--variant", "brief"]).unwrap();
        match args.command {
            Command::Render { variant, validate, .. } => {
                assert_eq!(variant, ContentLengthVariant::Brief);
                assert!(!validate);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invalidate_variant_conflicts_with_all() {
        let result = Args::try_parse_from([
            "stratagem",
            "cache",
            "invalidate",
            "ctx1",
            "--variant",
            "brief",
            "--all",
        ]);
        assert!(result.is_err());
    }
}
