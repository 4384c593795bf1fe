//! The document capability consumed by the reconciler.
//!
//! The reconciler never touches a concrete DOM. Everything it needs from the
//! host is expressed by [`Document`], so the same algorithm runs against a
//! browser binding or the in-memory [`MemoryDocument`](crate::MemoryDocument)
//! used in tests.

use hm_core::AttrName;

use crate::error::DocumentError;

/// Head-scoped operations on a document.
///
/// Element handles are cheap to clone and compare; the reconciler keeps them
/// in its registry between passes. Two handles compare equal when they refer
/// to the same element.
///
/// # Implementing
///
/// ```
/// use hm_core::AttrName;
/// use hm_sync::{Document, DocumentError};
///
/// /// A document that only tracks its title and drops all metadata.
/// #[derive(Default)]
/// struct TitleOnly {
///     title: String,
/// }
///
/// impl Document for TitleOnly {
///     type Element = ();
///
///     fn title(&self) -> String {
///         self.title.clone()
///     }
///     fn set_title(&mut self, title: &str) {
///         title.clone_into(&mut self.title);
///     }
///     fn location(&self) -> String {
///         "about:blank".to_owned()
///     }
///     fn query_meta(&self, _: AttrName, _: &str, _: usize) -> Option<()> {
///         None
///     }
///     fn create_meta(&mut self, _: AttrName, _: &str) -> Result<(), DocumentError> {
///         Ok(())
///     }
///     fn set_content(&mut self, _: &(), _: &str) -> Result<(), DocumentError> {
///         Ok(())
///     }
///     fn remove(&mut self, _: &()) -> Result<(), DocumentError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Document {
    /// Handle to a metadata element owned by this document.
    type Element: Clone + PartialEq;

    /// Returns the current document title.
    fn title(&self) -> String;

    /// Replaces the document title.
    fn set_title(&mut self, title: &str);

    /// Returns the current location, used as the fallback `url` value.
    fn location(&self) -> String;

    /// Finds the `ordinal`-th head element whose `attr` attribute equals `key`.
    ///
    /// Ordinal 0 is the first match in document order.
    fn query_meta(&self, attr: AttrName, key: &str, ordinal: usize) -> Option<Self::Element>;

    /// Creates a metadata element identified by `attr="key"` and appends it
    /// to the head.
    fn create_meta(&mut self, attr: AttrName, key: &str) -> Result<Self::Element, DocumentError>;

    /// Sets the content value of `element`.
    fn set_content(&mut self, element: &Self::Element, value: &str) -> Result<(), DocumentError>;

    /// Removes `element` from the head.
    fn remove(&mut self, element: &Self::Element) -> Result<(), DocumentError>;
}
