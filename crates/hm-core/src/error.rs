//! Error types for the hm-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration loading
//! and validation failures.

/// Errors that can occur while loading or validating a [`SyncConfig`](crate::SyncConfig).
///
/// # Examples
///
/// ```
/// use hm_core::ConfigError;
///
/// let error = ConfigError::invalid_option("title_key", "must not be empty");
/// assert!(error.to_string().contains("title_key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// Failed to parse the configuration document.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Returns the option name for [`ConfigError::InvalidOption`].
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::InvalidOption { option, .. } => Some(option),
            Self::Parse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("property_prefixes", "entries must not contain ':'");
        let msg = error.to_string();
        assert!(msg.contains("property_prefixes"));
        assert!(msg.contains("must not contain"));
        assert_eq!(error.option(), Some("property_prefixes"));
    }

    #[test]
    fn test_parse_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConfigError::from(source);
        assert!(error.to_string().starts_with("failed to parse configuration"));
        assert!(error.option().is_none());
    }
}
