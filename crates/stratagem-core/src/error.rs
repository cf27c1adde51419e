//! Error types for Stratagem.

/// Errors that can occur while converting strategies or managing the cache.
///
/// Extraction never produces an error: heuristics degrade to defaults. Only
/// the forward conversion raises to its caller; per-entry import and
/// migration failures are reported as warnings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input to the forward conversion is missing a required field.
    #[error("Invalid input: {field}: {message}")]
    InvalidInput {
        /// Field that is missing or empty
        field: String,
        /// What went wrong
        message: String,
    },

    /// Rendering succeeded but the result is structurally insufficient.
    #[error("Conversion validation failed: {}", reasons.join("; "))]
    ConversionValidationFailed {
        /// Every structural check that failed
        reasons: Vec<String>,
    },

    /// Durable storage refused a write (quota, permissions, ...).
    #[error("Storage write failed for '{key}': {message}")]
    StorageWriteFailed {
        /// Storage key being written
        key: String,
        /// Underlying failure
        message: String,
    },

    /// Durable storage could not be read.
    #[error("Storage read failed for '{key}': {message}")]
    StorageReadFailed {
        /// Storage key being read
        key: String,
        /// Underlying failure
        message: String,
    },

    /// A snapshot could not be parsed at the top level.
    #[error("Malformed import: {message}")]
    ImportMalformed {
        /// Parse failure description
        message: String,
    },

    /// A single snapshot entry was invalid or unrecognized.
    #[error("Import entry '{key}' skipped: {reason}")]
    ImportEntrySkipped {
        /// Cache key of the skipped entry
        key: String,
        /// Why it was skipped
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

/// Convenience `Result` type alias for Stratagem operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether the caller has a defined way to carry on.
    ///
    /// A failed validation has the recovery template; a failed write leaves
    /// in-memory state authoritative; a skipped entry does not abort its
    /// import. Invalid input and malformed snapshots are terminal.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::ConversionValidationFailed { .. } => true,
            Error::StorageWriteFailed { .. } => true,
            Error::StorageReadFailed { .. } => true,
            Error::ImportEntrySkipped { .. } => true,
            Error::InvalidInput { .. } => false,
            Error::ImportMalformed { .. } => false,
            Error::Io(_) => false,
            Error::Serialization(_) => false,
            Error::Config { .. } => false,
        }
    }

    /// Creates a new invalid-input error.
    pub fn invalid_input<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a new conversion validation error from the failed checks.
    pub fn validation_failed(reasons: Vec<String>) -> Self {
        Error::ConversionValidationFailed { reasons }
    }

    /// Creates a new storage write error.
    pub fn storage_write<K, M>(key: K, message: M) -> Self
    where
        K: Into<String>,
        M: Into<String>,
    {
        Error::StorageWriteFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new storage read error.
    pub fn storage_read<K, M>(key: K, message: M) -> Self
    where
        K: Into<String>,
        M: Into<String>,
    {
        Error::StorageReadFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a new malformed-import error.
    pub fn import_malformed<S: Into<String>>(message: S) -> Self {
        Error::ImportMalformed {
            message: message.into(),
        }
    }

    /// Creates a new skipped-entry error.
    pub fn entry_skipped<K, R>(key: K, reason: R) -> Self
    where
        K: Into<String>,
        R: Into<String>,
    {
        Error::ImportEntrySkipped {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
