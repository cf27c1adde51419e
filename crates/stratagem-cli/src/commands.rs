//! Command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use stratagem_cache::{CacheLifecycleManager, CacheStore, FileStorage};
use stratagem_content::parse_sections;
use stratagem_convert::StrategyConverter;
use stratagem_core::StratagemConfig;
use stratagem_core::types::{ContentLengthVariant, MarkupStrategy, StructuredStrategy};

use crate::cli::{CacheAction, ConfigAction};

// ============================================================================
// Conversion
// ============================================================================

/// Render a structured strategy file and print the markup.
///
/// With validation enabled, a failing render prints the recovery template
/// and returns an error so the process exits non-zero.
pub fn render(
    config: &StratagemConfig,
    file: &Path,
    variant: ContentLengthVariant,
    validate: bool,
) -> Result<()> {
    let strategy: StructuredStrategy = read_json(file)?;
    let mut converter_config = config.clone();
    converter_config.convert.validate_output |= validate;
    let converter = StrategyConverter::from_config(&converter_config);

    match converter.to_markup(&strategy, variant) {
        Ok(markup) => {
            tracing::debug!(
                words = markup.metadata.word_count,
                minutes = markup.metadata.read_time_minutes,
                "rendered strategy"
            );
            println!("{}", markup.raw_markup);
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            let recovered = converter.recover_from_failure(&strategy, variant, &e.to_string());
            println!("{}", recovered.raw_markup);
            bail!("rendering failed, recovery template printed: {e}")
        }
        Err(e) => Err(e).with_context(|| format!("Cannot render {}", file.display())),
    }
}

/// Print the heading forest of a markup file.
pub fn parse(file: &Path) -> Result<()> {
    let text = read_text(file)?;
    let forest = parse_sections(&text);
    println!("{}", serde_json::to_string_pretty(&forest)?);
    Ok(())
}

/// Reverse-convert a markup file and print the structured JSON.
pub fn extract(config: &StratagemConfig, file: &Path, id: &str) -> Result<()> {
    let markup = MarkupStrategy {
        id: id.to_string(),
        raw_markup: read_text(file)?,
        ..MarkupStrategy::default()
    };
    let extraction = StrategyConverter::from_config(config).to_structured(&markup);
    for warning in &extraction.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&extraction.strategy)?);
    Ok(())
}

// ============================================================================
// Cache
// ============================================================================

/// Dispatch a cache subcommand against the file-backed cache.
pub fn cache(config: &StratagemConfig, action: CacheAction) -> Result<()> {
    let dir = config
        .cache
        .resolve_storage_dir()
        .context("Could not determine a cache directory for this platform")?;
    tracing::debug!(dir = %dir.display(), "opening cache");
    let storage = FileStorage::open(&dir)
        .with_context(|| format!("Cannot open cache directory {}", dir.display()))?;
    let mut store = CacheStore::open(storage, &config.cache)?;
    let manager = CacheLifecycleManager::new(StrategyConverter::from_config(config));

    match action {
        CacheAction::Stats => {
            println!("{}", serde_json::to_string_pretty(&store.stats())?);
        }
        CacheAction::Export { file } => {
            let json = manager.export_json(&store)?;
            match file {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Cannot write {}", path.display()))?;
                    eprintln!("Exported {} entries to {}", store.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        CacheAction::Import { file } => {
            let input = read_text(&file)?;
            let report = manager.import(&mut store, &input);
            for warning in &report.warnings {
                eprintln!("skipped '{}': {}", warning.key, warning.reason);
            }
            if !report.success {
                bail!(
                    "Import failed: {}",
                    report.error.as_deref().unwrap_or("unknown error")
                );
            }
            eprintln!("Imported {} entries", report.imported);
        }
        CacheAction::Migrate => {
            let report = manager.migrate(&mut store);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        CacheAction::Invalidate {
            context,
            variant,
            all,
        } => {
            let removed = if all {
                store.invalidate_all(&context)
            } else {
                store.invalidate(&context, variant)
            };
            eprintln!("Removed {removed} entries for '{context}'");
        }
    }
    Ok(())
}

// ============================================================================
// Config
// ============================================================================

/// Dispatch a config subcommand.
pub fn config(config_path: Option<&str>, config: &StratagemConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => print!("{}", config.to_toml_string()?),
        ConfigAction::Path => {
            let path = StratagemConfig::resolve_config_path(config_path)
                .context("Could not determine config directory for this platform")?;
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist; defaults are in effect)");
            }
        }
    }
    Ok(())
}

fn read_text(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Cannot read {}", file.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T> {
    let text = read_text(file)?;
    serde_json::from_str(&text).with_context(|| format!("Cannot parse {}", file.display()))
}
