//! TOML configuration.
//!
//! Resolution order for the config file:
//!
//! 1. An explicit path passed by the caller
//! 2. The `STRATAGEM_CONFIG` environment variable
//! 3. `<config dir>/stratagem/config.toml`
//!
//! A missing file is not an error: every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "STRATAGEM_CONFIG";

const PROJECT_NAME: &str = "stratagem";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratagemConfig {
    /// Cache store settings.
    pub cache: CacheConfig,
    /// Conversion settings.
    pub convert: ConvertConfig,
    /// Field extraction settings.
    pub extract: ExtractConfig,
}

/// Cache store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries older than this are treated as absent.
    pub ttl_days: u32,
    /// Durable key of the full-entries blob.
    pub entries_key: String,
    /// Durable key of the markup-index blob.
    pub markup_index_key: String,
    /// Directory for file-backed storage.
    pub storage_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_days: 30,
            entries_key: "gtm-strategy-cache".to_string(),
            markup_index_key: "gtm-strategy-markup-cache".to_string(),
            storage_dir: None,
        }
    }
}

impl CacheConfig {
    /// Storage directory, falling back to the platform data directory.
    pub fn resolve_storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(PROJECT_NAME).join("cache")))
    }
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Re-validate rendered markup before returning it.
    pub validate_output: bool,
    /// Reading speed used for read-time estimates.
    pub words_per_minute: usize,
    /// Minimum rendered markup length accepted by validation.
    pub min_markup_chars: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            validate_output: false,
            words_per_minute: 200,
            min_markup_chars: 50,
        }
    }
}

/// Field extraction settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Seed for synthesized scores; OS entropy when unset.
    pub score_seed: Option<u64>,
}

impl StratagemConfig {
    /// Default config file location for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join(CONFIG_FILE))
    }

    /// Resolve which config file to read.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load configuration, using defaults when no file exists.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the store or converter misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_days == 0 {
            return Err(Error::config("cache.ttl_days must be at least 1"));
        }
        if self.convert.words_per_minute == 0 {
            return Err(Error::config("convert.words_per_minute must be at least 1"));
        }
        if self.cache.entries_key == self.cache.markup_index_key {
            return Err(Error::config(
                "cache.entries_key and cache.markup_index_key must differ",
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StratagemConfig::default();
        assert_eq!(config.cache.ttl_days, 30);
        assert_eq!(config.convert.words_per_minute, 200);
        assert_eq!(config.convert.min_markup_chars, 50);
        assert!(!config.convert.validate_output);
        assert!(config.extract.score_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache]\nttl_days = 7\n\n[extract]\nscore_seed = 42\n").unwrap();

        let config = StratagemConfig::load(path.to_str()).unwrap();
        assert_eq!(config.cache.ttl_days, 7);
        assert_eq!(config.cache.entries_key, "gtm-strategy-cache");
        assert_eq!(config.extract.score_seed, Some(42));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = StratagemConfig::load(path.to_str()).unwrap();
        assert_eq!(config, StratagemConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache\nttl_days = ").unwrap();
        let err = StratagemConfig::load(path.to_str()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = StratagemConfig::default();
        config.cache.ttl_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = StratagemConfig::default();
        config.cache.storage_dir = Some(PathBuf::from("/tmp/stratagem"));
        let rendered = config.to_toml_string().unwrap();
        let parsed: StratagemConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
