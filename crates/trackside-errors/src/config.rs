//! Configuration loading and validation errors.

/// Configuration failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse config file '{path}': {reason}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Parser message
        reason: String,
    },

    /// The file extension does not map to a known format.
    #[error("unsupported config format '{0}', expected .yaml, .yml or .json")]
    UnsupportedFormat(String),

    /// A value failed validation.
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Offending key
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create a validation error for a key.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
