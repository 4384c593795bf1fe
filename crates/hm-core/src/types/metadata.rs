//! Metadata payload types.
//!
//! A reconciliation pass takes a flat [`MetadataMap`] and, optionally,
//! [`EntryGroups`] for keys that need several independent elements (for
//! example multiple `article:tag` values). The index of a group is the
//! position of its elements among all elements sharing the same key.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flat metadata payload, iterated in insertion order.
///
/// Deserializes from a JSON object of string values:
///
/// ```
/// use hm_core::MetadataMap;
///
/// let data: MetadataMap =
///     serde_json::from_str(r#"{"title": "Home", "description": "Start page"}"#).unwrap();
/// let keys: Vec<_> = data.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["title", "description"]);
/// ```
pub type MetadataMap = IndexMap<String, String>;

/// Ordered groups of entries; group `i` addresses element position `i`.
pub type EntryGroups = Vec<Vec<MetadataEntry>>;

/// A single key/value pair inside an entry group.
///
/// # Examples
///
/// ```
/// use hm_core::MetadataEntry;
///
/// let entry = MetadataEntry::new("article:tag", "rust");
/// assert_eq!(entry.key, "article:tag");
/// assert_eq!(entry.value, "rust");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Metadata key, e.g. `article:tag`.
    pub key: String,
    /// Content value written to the element.
    pub value: String,
}

impl MetadataEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for MetadataEntry {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_map_preserves_insertion_order() {
        let mut data = MetadataMap::new();
        data.insert("url".to_owned(), "https://x.test".to_owned());
        data.insert("description".to_owned(), "D".to_owned());
        data.insert("title".to_owned(), "T".to_owned());

        let keys: Vec<_> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["url", "description", "title"]);
    }

    #[test]
    fn test_entry_groups_deserialize() {
        let json = r#"[[{"key": "a", "value": "1"}], [{"key": "a", "value": "2"}]]"#;
        let groups: EntryGroups = serde_json::from_str(json).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1][0], MetadataEntry::new("a", "2"));
    }

    #[test]
    fn test_entry_from_tuple() {
        let entry: MetadataEntry = ("og:image", "a.png").into();
        assert_eq!(entry, MetadataEntry::new("og:image", "a.png"));
    }

    #[test]
    fn test_entry_serialization_snapshot() {
        let entry = MetadataEntry::new("product:price", "9.99");
        insta::assert_json_snapshot!(entry, @r#"
        {
          "key": "product:price",
          "value": "9.99"
        }
        "#);
    }
}
