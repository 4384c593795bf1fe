//! Reconciliation settings.
//!
//! [`SyncConfig`] holds the vocabulary the reconciler works with: which
//! namespace prefixes are identified by `property`, which keys fan out to
//! social-sharing variants, and the special title/url keys. All fields have
//! defaults, so a partial JSON document is enough to override one setting.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::AttrName;

/// Configuration for a metadata reconciler.
///
/// # Examples
///
/// ```
/// use hm_core::SyncConfig;
///
/// let config = SyncConfig::default();
/// assert_eq!(config.property_prefixes, ["fb", "og", "product"]);
/// assert_eq!(config.event_name, "app-metadata");
///
/// let derived: Vec<_> = config.fanout("image").collect();
/// assert_eq!(derived, ["og:image", "twitter:image"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Namespace prefixes whose keys are identified by `property`.
    pub property_prefixes: Vec<String>,

    /// Keys that are also written under each of [`fanout_namespaces`](Self::fanout_namespaces).
    pub fanout_keys: Vec<String>,

    /// Namespaces a fan-out key is mirrored into (`og:<key>`, `twitter:<key>`).
    pub fanout_namespaces: Vec<String>,

    /// Key written to the document title instead of an element.
    pub title_key: String,

    /// Key that falls back to the document location when absent or empty.
    pub url_key: String,

    /// Name of the application event carrying metadata payloads.
    pub event_name: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            property_prefixes: vec!["fb".to_owned(), "og".to_owned(), "product".to_owned()],
            fanout_keys: vec![
                "title".to_owned(),
                "description".to_owned(),
                "image".to_owned(),
                "url".to_owned(),
            ],
            fanout_namespaces: vec!["og".to_owned(), "twitter".to_owned()],
            title_key: "title".to_owned(),
            url_key: "url".to_owned(),
            event_name: "app-metadata".to_owned(),
        }
    }
}

impl SyncConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use hm_core::SyncConfig;
    ///
    /// let config = SyncConfig::from_json(r#"{"event_name": "page-meta"}"#).unwrap();
    /// assert_eq!(config.event_name, "page-meta");
    /// assert_eq!(config.title_key, "title");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every option is usable.
    ///
    /// Prefixes and namespaces must be non-empty and colon-free, since they
    /// are compared against (or joined into) the first segment of a key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (option, value) in [
            ("title_key", &self.title_key),
            ("url_key", &self.url_key),
            ("event_name", &self.event_name),
        ] {
            if value.is_empty() {
                return Err(ConfigError::invalid_option(option, "must not be empty"));
            }
        }

        for (option, segments) in [
            ("property_prefixes", &self.property_prefixes),
            ("fanout_namespaces", &self.fanout_namespaces),
        ] {
            if let Some(bad) = segments.iter().find(|s| s.is_empty() || s.contains(':')) {
                return Err(ConfigError::invalid_option(
                    option,
                    format!("'{bad}' must be non-empty and must not contain ':'"),
                ));
            }
        }

        Ok(())
    }

    /// Returns the identifying attribute for `key`.
    #[inline]
    #[must_use]
    pub fn attr_name(&self, key: &str) -> AttrName {
        AttrName::for_key(key, &self.property_prefixes)
    }

    /// Returns `true` if `key` is mirrored into the fan-out namespaces.
    #[inline]
    #[must_use]
    pub fn is_fanout_key(&self, key: &str) -> bool {
        self.fanout_keys.iter().any(|k| k == key)
    }

    /// Yields the derived keys for `key`, or nothing if it does not fan out.
    pub fn fanout<'a>(&'a self, key: &'a str) -> impl Iterator<Item = String> + 'a {
        let namespaces: &[String] = if self.is_fanout_key(key) {
            &self.fanout_namespaces
        } else {
            &[]
        };
        namespaces.iter().map(move |ns| format!("{ns}:{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.fanout_keys, ["title", "description", "image", "url"]);
        assert_eq!(config.fanout_namespaces, ["og", "twitter"]);
        assert_eq!(config.title_key, "title");
        assert_eq!(config.url_key, "url");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_attr_name_uses_configured_prefixes() {
        let config = SyncConfig::default();
        assert_eq!(config.attr_name("product:price"), AttrName::Property);
        assert_eq!(config.attr_name("twitter:title"), AttrName::Name);

        let custom = SyncConfig {
            property_prefixes: vec!["article".to_owned()],
            ..SyncConfig::default()
        };
        assert_eq!(custom.attr_name("article:tag"), AttrName::Property);
        assert_eq!(custom.attr_name("og:title"), AttrName::Name);
    }

    #[test]
    fn test_fanout_only_for_registered_keys() {
        let config = SyncConfig::default();
        let derived: Vec<_> = config.fanout("title").collect();
        assert_eq!(derived, ["og:title", "twitter:title"]);
        assert_eq!(config.fanout("keywords").count(), 0);
        assert_eq!(config.fanout("og:title").count(), 0);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let config = SyncConfig::from_json(r#"{"fanout_namespaces": ["og"]}"#).unwrap();
        assert_eq!(config.fanout_namespaces, ["og"]);
        assert_eq!(config.property_prefixes, ["fb", "og", "product"]);
    }

    #[test]
    fn test_rejects_empty_event_name() {
        let err = SyncConfig::from_json(r#"{"event_name": ""}"#).unwrap_err();
        assert_eq!(err.option(), Some("event_name"));
    }

    #[test]
    fn test_rejects_colon_in_prefix() {
        let err = SyncConfig::from_json(r#"{"property_prefixes": ["og:x"]}"#).unwrap_err();
        assert_eq!(err.option(), Some("property_prefixes"));
        assert!(err.to_string().contains("og:x"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SyncConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = SyncConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SyncConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
