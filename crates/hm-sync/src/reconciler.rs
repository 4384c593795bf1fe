//! The metadata reconciler.
//!
//! [`MetadataSync`] owns a [`Document`] and the [`ElementRegistry`] of the
//! elements it has written into it. Each call to [`MetadataSync::update`] is
//! one reconciliation pass:
//!
//! 1. fill in `url` from the document location when it is missing or empty
//! 2. write every key (the title key goes to the document title, fan-out keys
//!    are mirrored to `og:` and `twitter:` variants)
//! 3. write grouped entries at the position of their group
//! 4. remove every element that was not written during this pass

use std::fmt;

use hm_core::{EntryGroups, MetadataEntry, MetadataMap, SyncConfig};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::SyncError;
use crate::registry::{ElementRegistry, Touch};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Elements created and appended to the head.
    pub created: usize,
    /// Elements found in the head and taken over.
    pub adopted: usize,
    /// Elements reused from a previous pass.
    pub reused: usize,
    /// Unused elements removed from the head.
    pub removed: usize,
    /// Whether the document title was written.
    pub title_updated: bool,
}

impl SyncReport {
    /// Returns the number of element writes performed.
    #[inline]
    #[must_use]
    pub const fn written(&self) -> usize {
        self.created + self.adopted + self.reused
    }

    /// Returns `true` if the pass changed the set of elements in the head.
    #[inline]
    #[must_use]
    pub const fn changed_structure(&self) -> bool {
        self.created > 0 || self.removed > 0
    }

    fn record(&mut self, touch: Touch) {
        match touch {
            Touch::Reused => self.reused += 1,
            Touch::Adopted => self.adopted += 1,
            Touch::Created => self.created += 1,
        }
    }
}

/// Keeps a document's head metadata in sync with application metadata.
///
/// Construct one per document and route every update through it; the
/// registry it carries is what lets later passes reuse and clean up the
/// elements of earlier ones.
///
/// # Examples
///
/// ```
/// use hm_core::{AttrName, MetadataMap};
/// use hm_sync::{Document, MemoryDocument, MetadataSync};
///
/// let mut sync = MetadataSync::new(MemoryDocument::new("https://x.test/page"));
///
/// let mut data = MetadataMap::new();
/// data.insert("title".to_owned(), "Hi".to_owned());
/// sync.update(&data, None).unwrap();
///
/// let doc = sync.document();
/// assert_eq!(doc.title(), "Hi");
/// assert_eq!(doc.content_of(AttrName::Property, "og:title", 0), Some("Hi"));
/// assert_eq!(doc.content_of(AttrName::Name, "twitter:url", 0), Some("https://x.test/page"));
/// assert_eq!(doc.count("title"), 0);
/// ```
pub struct MetadataSync<D: Document> {
    document: D,
    registry: ElementRegistry<D::Element>,
    config: SyncConfig,
}

impl<D: Document> fmt::Debug for MetadataSync<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataSync")
            .field("config", &self.config)
            .field("tracked_elements", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl<D: Document> MetadataSync<D> {
    /// Creates a reconciler with the default configuration.
    #[must_use]
    pub fn new(document: D) -> Self {
        Self {
            document,
            registry: ElementRegistry::new(),
            config: SyncConfig::default(),
        }
    }

    /// Creates a reconciler with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the configuration does not validate.
    pub fn with_config(document: D, config: SyncConfig) -> Result<Self, SyncError> {
        config.validate()?;
        Ok(Self {
            document,
            registry: ElementRegistry::new(),
            config,
        })
    }

    /// Runs one reconciliation pass.
    ///
    /// `entries` groups repeated keys: every entry of group `i` is written at
    /// position `i` among the elements sharing its key.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the document rejects an operation. The pass
    /// is abandoned; elements written so far stay in place and the next pass
    /// starts with a clean usage record.
    pub fn update(
        &mut self,
        data: &MetadataMap,
        entries: Option<&[Vec<MetadataEntry>]>,
    ) -> Result<SyncReport, SyncError> {
        let result = self.run_pass(data, entries);
        match &result {
            Ok(report) => info!(
                created = report.created,
                adopted = report.adopted,
                reused = report.reused,
                removed = report.removed,
                "Metadata synced"
            ),
            Err(_) => self.registry.reset_pass(),
        }
        result
    }

    /// Like [`update`](Self::update), taking owned entry groups.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub fn update_with_groups(
        &mut self,
        data: &MetadataMap,
        entries: &EntryGroups,
    ) -> Result<SyncReport, SyncError> {
        self.update(data, Some(entries.as_slice()))
    }

    /// Returns the managed document.
    #[inline]
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Returns the managed document mutably.
    ///
    /// Removing elements the registry owns desynchronizes it until the next
    /// write to that key.
    #[inline]
    pub const fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Consumes the reconciler, returning the document.
    #[inline]
    pub fn into_document(self) -> D {
        self.document
    }

    /// Returns the element registry.
    #[inline]
    pub const fn registry(&self) -> &ElementRegistry<D::Element> {
        &self.registry
    }

    /// Returns the active configuration.
    #[inline]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn run_pass(
        &mut self,
        data: &MetadataMap,
        entries: Option<&[Vec<MetadataEntry>]>,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let data = self.with_url_fallback(data);

        for (key, value) in &data {
            if *key == self.config.title_key {
                self.document.set_title(value);
                report.title_updated = true;
            } else {
                self.write(0, key, value, &mut report)?;
            }

            let derived: SmallVec<[String; 2]> = self.config.fanout(key).collect();
            for derived_key in &derived {
                self.write(0, derived_key, value, &mut report)?;
            }
        }

        for (index, group) in entries.unwrap_or_default().iter().enumerate() {
            for entry in group {
                self.write(index, &entry.key, &entry.value, &mut report)?;
            }
        }

        report.removed = self.registry.cleanup(&mut self.document)?;
        Ok(report)
    }

    fn with_url_fallback(&self, data: &MetadataMap) -> MetadataMap {
        let mut data = data.clone();
        let url_key = &self.config.url_key;
        if data.get(url_key).is_none_or(String::is_empty) {
            let location = self.document.location();
            debug!(%location, "Using document location as url");
            data.insert(url_key.clone(), location);
        }
        data
    }

    fn write(
        &mut self,
        index: usize,
        key: &str,
        value: &str,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let attr = self.config.attr_name(key);
        let touch = self
            .registry
            .set_value(&mut self.document, attr, index, key, value)?;
        report.record(touch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hm_core::AttrName;

    use super::*;
    use crate::{DocumentError, MemoryDocument, MetaElement};

    fn map(pairs: &[(&str, &str)]) -> MetadataMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_present_url_keeps_its_position() {
        let mut sync = MetadataSync::new(MemoryDocument::new("https://fallback.test"));
        sync.update(&map(&[("url", "https://x.test"), ("description", "D")]), None)
            .unwrap();

        let keys: Vec<_> = sync.document().elements().map(|e| e.key().to_owned()).collect();
        assert_eq!(
            keys,
            [
                "url",
                "og:url",
                "twitter:url",
                "description",
                "og:description",
                "twitter:description"
            ]
        );
    }

    #[test]
    fn test_fallback_url_replaces_empty_value() {
        let mut sync = MetadataSync::new(MemoryDocument::new("https://fallback.test"));
        sync.update(&map(&[("url", ""), ("description", "D")]), None).unwrap();

        let doc = sync.document();
        assert_eq!(doc.contents("url"), ["https://fallback.test"]);
        assert_eq!(doc.elements().next().map(MetaElement::key), Some("url"));
    }

    #[test]
    fn test_missing_url_is_written_last() {
        let mut sync = MetadataSync::new(MemoryDocument::new("https://fallback.test"));
        sync.update(&map(&[("description", "D")]), None).unwrap();

        let doc = sync.document();
        assert_eq!(doc.contents("twitter:url"), ["https://fallback.test"]);
        assert_eq!(doc.elements().last().map(MetaElement::key), Some("twitter:url"));
    }

    #[test]
    fn test_report_counts() {
        let mut sync = MetadataSync::new(MemoryDocument::new("https://x.test"));
        let data = map(&[("title", "T")]);

        let first = sync.update(&data, None).unwrap();
        assert_eq!(
            first,
            SyncReport {
                created: 5,
                adopted: 0,
                reused: 0,
                removed: 0,
                title_updated: true,
            }
        );
        assert!(first.changed_structure());

        let second = sync.update(&data, None).unwrap();
        assert_eq!(second.reused, 5);
        assert_eq!(second.written(), 5);
        assert!(!second.changed_structure());
    }

    #[test]
    fn test_custom_config_namespaces() {
        let config = SyncConfig {
            fanout_namespaces: vec!["og".to_owned()],
            ..SyncConfig::default()
        };
        let mut sync =
            MetadataSync::with_config(MemoryDocument::new("https://x.test"), config).unwrap();
        sync.update(&map(&[("image", "a.png")]), None).unwrap();

        let doc = sync.document();
        assert_eq!(doc.content_of(AttrName::Property, "og:image", 0), Some("a.png"));
        assert_eq!(doc.count("twitter:image"), 0);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = SyncConfig {
            url_key: String::new(),
            ..SyncConfig::default()
        };
        let err = MetadataSync::with_config(MemoryDocument::default(), config).unwrap_err();
        assert!(matches!(&err, SyncError::Config(e) if e.option() == Some("url_key")));
        assert!(err.key().is_none());
    }

    /// Document whose element creation fails once a budget is exhausted and
    /// whose removals can be switched off.
    struct FailingDocument {
        inner: MemoryDocument,
        creations_left: usize,
        reject_removals: bool,
    }

    impl FailingDocument {
        fn new(creations_left: usize) -> Self {
            Self {
                inner: MemoryDocument::new("https://x.test"),
                creations_left,
                reject_removals: false,
            }
        }
    }

    impl Document for FailingDocument {
        type Element = <MemoryDocument as Document>::Element;

        fn title(&self) -> String {
            self.inner.title()
        }
        fn set_title(&mut self, title: &str) {
            self.inner.set_title(title);
        }
        fn location(&self) -> String {
            self.inner.location()
        }
        fn query_meta(&self, attr: AttrName, key: &str, ordinal: usize) -> Option<Self::Element> {
            self.inner.query_meta(attr, key, ordinal)
        }
        fn create_meta(&mut self, attr: AttrName, key: &str) -> Result<Self::Element, DocumentError> {
            if self.creations_left == 0 {
                return Err(DocumentError::Backend("quota exceeded".to_owned()));
            }
            self.creations_left -= 1;
            self.inner.create_meta(attr, key)
        }
        fn set_content(&mut self, element: &Self::Element, value: &str) -> Result<(), DocumentError> {
            self.inner.set_content(element, value)
        }
        fn remove(&mut self, element: &Self::Element) -> Result<(), DocumentError> {
            if self.reject_removals {
                return Err(DocumentError::Backend("removal rejected".to_owned()));
            }
            self.inner.remove(element)
        }
    }

    #[test]
    fn test_failed_pass_resets_usage() {
        let mut sync = MetadataSync::new(FailingDocument::new(4));

        let err = sync
            .update(&map(&[("description", "D"), ("keywords", "k")]), None)
            .unwrap_err();
        assert_eq!(err.key(), Some("url"));
        assert!(!err.is_recoverable());
        assert!(sync.registry().used_positions("description").is_empty());
        assert_eq!(sync.registry().len(), 4);

        sync.document_mut().creations_left = 10;
        let report = sync.update(&map(&[("keywords", "k")]), None).unwrap();
        assert_eq!(report.removed, 3);
        assert_eq!(sync.document().inner.count("description"), 0);
    }

    #[test]
    fn test_failed_removal_is_retried() {
        let mut sync = MetadataSync::new(FailingDocument::new(usize::MAX));
        sync.update(&map(&[("keywords", "k")]), None).unwrap();
        assert_eq!(sync.registry().positions("keywords"), [0]);

        sync.document_mut().reject_removals = true;
        let err = sync.update(&MetadataMap::new(), None).unwrap_err();
        assert!(matches!(
            &err,
            SyncError::Cleanup { key, source: DocumentError::Backend(_) } if key == "keywords"
        ));
        assert!(!err.is_recoverable());
        assert_eq!(sync.registry().positions("keywords"), [0]);
        assert_eq!(sync.document().inner.count("keywords"), 1);

        sync.document_mut().reject_removals = false;
        let report = sync.update(&MetadataMap::new(), None).unwrap();
        assert_eq!(report.removed, 1);
        assert!(sync.registry().positions("keywords").is_empty());
        assert_eq!(sync.document().inner.count("keywords"), 0);
    }
}
