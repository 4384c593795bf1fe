//! Identifying attribute selection.
//!
//! Head metadata elements are identified either by a `name` attribute
//! (`<meta name="description">`) or, for Open Graph style vocabularies, by a
//! `property` attribute (`<meta property="og:title">`). Which one applies is
//! decided purely from the key's namespace prefix.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The attribute that identifies a metadata element in the document head.
///
/// # Examples
///
/// ```
/// use hm_core::AttrName;
///
/// let prefixes = ["fb", "og", "product"];
/// assert_eq!(AttrName::for_key("og:title", &prefixes), AttrName::Property);
/// assert_eq!(AttrName::for_key("twitter:card", &prefixes), AttrName::Name);
/// assert_eq!(AttrName::Property.as_str(), "property");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrName {
    /// `name="<key>"`, used for plain and unregistered-namespace keys.
    Name,
    /// `property="<key>"`, used for keys in a registered namespace.
    Property,
}

impl AttrName {
    /// Classifies `key` against the registered property prefixes.
    ///
    /// A key without a namespace prefix, or whose prefix is not registered,
    /// uses [`AttrName::Name`].
    #[must_use]
    pub fn for_key<S: AsRef<str>>(key: &str, property_prefixes: &[S]) -> Self {
        match namespace_prefix(key) {
            Some(prefix) if property_prefixes.iter().any(|p| p.as_ref() == prefix) => {
                Self::Property
            }
            _ => Self::Name,
        }
    }

    /// Returns the attribute name as it appears in markup.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the namespace prefix of a key: the text before its first colon.
///
/// # Examples
///
/// ```
/// use hm_core::namespace_prefix;
///
/// assert_eq!(namespace_prefix("og:image:width"), Some("og"));
/// assert_eq!(namespace_prefix("description"), None);
/// ```
#[inline]
#[must_use]
pub fn namespace_prefix(key: &str) -> Option<&str> {
    key.split_once(':').map(|(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIXES: [&str; 3] = ["fb", "og", "product"];

    #[test]
    fn test_registered_prefixes_use_property() {
        for key in ["og:title", "fb:app_id", "product:price", "og:image:width"] {
            assert_eq!(AttrName::for_key(key, &PREFIXES), AttrName::Property, "{key}");
        }
    }

    #[test]
    fn test_unregistered_keys_use_name() {
        for key in ["description", "custom:foo", "twitter:title", ":og", "ogx:title"] {
            assert_eq!(AttrName::for_key(key, &PREFIXES), AttrName::Name, "{key}");
        }
    }

    #[test]
    fn test_empty_prefix_list() {
        let none: [&str; 0] = [];
        assert_eq!(AttrName::for_key("og:title", &none), AttrName::Name);
    }

    #[test]
    fn test_display_matches_markup() {
        assert_eq!(AttrName::Name.to_string(), "name");
        assert_eq!(AttrName::Property.to_string(), "property");
    }

    #[test]
    fn test_namespace_prefix() {
        assert_eq!(namespace_prefix("product:price:amount"), Some("product"));
        assert_eq!(namespace_prefix(":orphan"), Some(""));
        assert_eq!(namespace_prefix("plain"), None);
    }
}
