//! In-memory document head.
//!
//! [`MemoryDocument`] implements [`Document`] over a plain ordered list of
//! metadata elements. It backs the test suite and benchmarks, and can be used
//! by hosts that render the head themselves (server-side rendering, static
//! export) via [`MemoryDocument::render_head`].
//!
//! # Examples
//!
//! ```
//! use hm_core::AttrName;
//! use hm_sync::{Document, MemoryDocument};
//!
//! let mut doc = MemoryDocument::new("https://example.test/");
//! let el = doc.create_meta(AttrName::Name, "description").unwrap();
//! doc.set_content(&el, "An example").unwrap();
//!
//! assert_eq!(doc.content_of(AttrName::Name, "description", 0), Some("An example"));
//! assert_eq!(doc.len(), 1);
//! ```

use std::fmt::{self, Write as _};

use hm_core::AttrName;

use crate::document::Document;
use crate::error::DocumentError;

/// Stable identifier of an element in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Returns the raw identifier value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A metadata element in the head of a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaElement {
    id: ElementId,
    attr: AttrName,
    key: String,
    content: Option<String>,
}

impl MetaElement {
    /// Element identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Identifying attribute.
    #[inline]
    #[must_use]
    pub const fn attr(&self) -> AttrName {
        self.attr
    }

    /// Identifying attribute value.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Content value, if one has been set.
    #[inline]
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Counters of structural mutations performed on a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Elements appended by [`Document::create_meta`].
    pub created: usize,
    /// Elements removed by [`Document::remove`].
    pub removed: usize,
}

/// An in-memory document head.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    title: String,
    location: String,
    head: Vec<MetaElement>,
    next_id: u64,
    stats: DocumentStats,
}

impl MemoryDocument {
    /// Creates an empty document at the given location.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Changes the current location.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Inserts an element as if it had been present in the initial markup.
    ///
    /// Does not count towards [`DocumentStats::created`].
    pub fn insert_meta(&mut self, attr: AttrName, key: &str, content: &str) -> ElementId {
        let id = self.append(attr, key);
        if let Some(element) = self.head.last_mut() {
            element.content = Some(content.to_owned());
        }
        id
    }

    /// Removes an element without going through [`Document::remove`], the way
    /// unrelated page code might.
    pub fn detach(&mut self, id: ElementId) -> Option<MetaElement> {
        let position = self.position(id)?;
        Some(self.head.remove(position))
    }

    /// Returns the content of the `ordinal`-th element identified by `attr="key"`.
    #[must_use]
    pub fn content_of(&self, attr: AttrName, key: &str, ordinal: usize) -> Option<&str> {
        self.head
            .iter()
            .filter(|e| e.attr == attr && e.key == key)
            .nth(ordinal)?
            .content()
    }

    /// Returns the contents of all elements whose identifying value is `key`,
    /// in document order.
    #[must_use]
    pub fn contents(&self, key: &str) -> Vec<&str> {
        self.head
            .iter()
            .filter(|e| e.key == key)
            .map(|e| e.content().unwrap_or_default())
            .collect()
    }

    /// Returns the number of elements whose identifying value is `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.head.iter().filter(|e| e.key == key).count()
    }

    /// Iterates over all head elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &MetaElement> {
        self.head.iter()
    }

    /// Returns the element with the given id, if it is attached.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&MetaElement> {
        self.head.iter().find(|e| e.id == id)
    }

    /// Returns the number of metadata elements in the head.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len()
    }

    /// Returns `true` if the head has no metadata elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    /// Returns mutation counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> DocumentStats {
        self.stats
    }

    /// Renders the title and metadata elements as HTML, one tag per line.
    ///
    /// # Examples
    ///
    /// ```
    /// use hm_core::AttrName;
    /// use hm_sync::{Document, MemoryDocument};
    ///
    /// let mut doc = MemoryDocument::new("https://example.test/");
    /// doc.set_title("A & B");
    /// doc.insert_meta(AttrName::Property, "og:title", "\"quoted\"");
    ///
    /// assert_eq!(
    ///     doc.render_head(),
    ///     "<title>A &amp; B</title>\n<meta property=\"og:title\" content=\"&quot;quoted&quot;\">\n"
    /// );
    /// ```
    #[must_use]
    pub fn render_head(&self) -> String {
        HeadHtml(self).to_string()
    }

    fn append(&mut self, attr: AttrName, key: &str) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.head.push(MetaElement {
            id,
            attr,
            key: key.to_owned(),
            content: None,
        });
        id
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.head.iter().position(|e| e.id == id)
    }
}

impl Document for MemoryDocument {
    type Element = ElementId;

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn query_meta(&self, attr: AttrName, key: &str, ordinal: usize) -> Option<ElementId> {
        self.head
            .iter()
            .filter(|e| e.attr == attr && e.key == key)
            .nth(ordinal)
            .map(MetaElement::id)
    }

    fn create_meta(&mut self, attr: AttrName, key: &str) -> Result<ElementId, DocumentError> {
        self.stats.created += 1;
        Ok(self.append(attr, key))
    }

    fn set_content(&mut self, element: &ElementId, value: &str) -> Result<(), DocumentError> {
        let target = self
            .head
            .iter_mut()
            .find(|e| e.id == *element)
            .ok_or_else(|| DocumentError::Detached(element.to_string()))?;
        target.content = Some(value.to_owned());
        Ok(())
    }

    fn remove(&mut self, element: &ElementId) -> Result<(), DocumentError> {
        let position = self
            .position(*element)
            .ok_or_else(|| DocumentError::Detached(element.to_string()))?;
        self.head.remove(position);
        self.stats.removed += 1;
        Ok(())
    }
}

/// Head markup produced by [`MemoryDocument::render_head`].
struct HeadHtml<'a>(&'a MemoryDocument);

impl fmt::Display for HeadHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<title>{}</title>", Escaped(&self.0.title))?;
        for element in &self.0.head {
            write!(f, "<meta {}=\"{}\"", element.attr, Escaped(&element.key))?;
            if let Some(content) = &element.content {
                write!(f, " content=\"{}\"", Escaped(content))?;
            }
            f.write_str(">\n")?;
        }
        Ok(())
    }
}

/// HTML attribute/text escaping for [`MemoryDocument::render_head`].
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                _ => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_meta_by_ordinal() {
        let mut doc = MemoryDocument::new("https://x.test");
        let first = doc.insert_meta(AttrName::Name, "a", "1");
        doc.insert_meta(AttrName::Property, "a", "other attr");
        let second = doc.insert_meta(AttrName::Name, "a", "2");

        assert_eq!(doc.query_meta(AttrName::Name, "a", 0), Some(first));
        assert_eq!(doc.query_meta(AttrName::Name, "a", 1), Some(second));
        assert_eq!(doc.query_meta(AttrName::Name, "a", 2), None);
        assert_eq!(doc.query_meta(AttrName::Name, "b", 0), None);
    }

    #[test]
    fn test_create_and_remove_update_stats() {
        let mut doc = MemoryDocument::default();
        let el = doc.create_meta(AttrName::Name, "robots").unwrap();
        doc.set_content(&el, "noindex").unwrap();
        assert_eq!(doc.contents("robots"), ["noindex"]);

        doc.remove(&el).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.stats(), DocumentStats { created: 1, removed: 1 });
    }

    #[test]
    fn test_operations_on_detached_element_fail() {
        let mut doc = MemoryDocument::default();
        let el = doc.insert_meta(AttrName::Name, "a", "1");
        assert!(doc.detach(el).is_some());

        assert_eq!(
            doc.set_content(&el, "2"),
            Err(DocumentError::Detached(el.to_string()))
        );
        assert!(matches!(doc.remove(&el), Err(DocumentError::Detached(_))));
        assert_eq!(doc.stats().removed, 0);
    }

    #[test]
    fn test_insert_meta_is_not_counted_as_created() {
        let mut doc = MemoryDocument::default();
        doc.insert_meta(AttrName::Property, "og:type", "website");
        assert_eq!(doc.stats().created, 0);
        assert_eq!(doc.count("og:type"), 1);
    }

    #[test]
    fn test_render_head_snapshot() {
        let mut doc = MemoryDocument::new("https://x.test");
        doc.set_title("Docs <beta>");
        doc.insert_meta(AttrName::Name, "description", "Tips & tricks");
        doc.create_meta(AttrName::Property, "og:image").unwrap();

        insta::assert_snapshot!(doc.render_head().trim_end(), @r#"
        <title>Docs &lt;beta&gt;</title>
        <meta name="description" content="Tips &amp; tricks">
        <meta property="og:image">
        "#);
    }
}
