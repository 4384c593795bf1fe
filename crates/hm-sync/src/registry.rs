//! Element registry with per-pass usage tracking.
//!
//! [`ElementRegistry`] remembers, for every metadata key, which element sits
//! at which position. During a pass every write marks its `(key, position)`
//! as used; [`ElementRegistry::cleanup`] then removes every recorded element
//! whose position was not used and resets the usage record.
//!
//! Positions are tracked as an explicit set, so a key written only at
//! position 2 keeps exactly that element. Nothing at positions 0 and 1 is
//! implied to be in use.
//!
//! # Lookup order
//!
//! ```text
//! set_value(index, key)
//!     │
//!     ├── recorded element at (key, index)?   ──► reuse
//!     ├── index-th `attr="key"` in the head,
//!     │   not recorded at another position?   ──► adopt
//!     └── otherwise                           ──► create + append
//! ```

use std::collections::BTreeMap;

use hm_core::{AttrName, FxHashMap};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::document::Document;
use crate::error::{DocumentError, SyncError};

/// How [`ElementRegistry::set_value`] obtained the element it wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Touch {
    /// The element was already recorded at that position.
    Reused,
    /// An element already in the document was taken over.
    Adopted,
    /// A new element was created and appended to the head.
    Created,
}

/// Positions used for one key during the current pass.
type UsedPositions = SmallVec<[usize; 4]>;

/// Maps metadata keys to the elements written for them.
///
/// # Examples
///
/// ```
/// use hm_core::AttrName;
/// use hm_sync::{ElementRegistry, MemoryDocument, Touch};
///
/// let mut doc = MemoryDocument::new("https://x.test");
/// let mut registry = ElementRegistry::new();
///
/// let touch = registry.set_value(&mut doc, AttrName::Name, 0, "description", "D").unwrap();
/// assert_eq!(touch, Touch::Created);
/// assert_eq!(registry.cleanup(&mut doc).unwrap(), 0);
///
/// // Nothing written in this pass: the element goes away.
/// assert_eq!(registry.cleanup(&mut doc).unwrap(), 1);
/// assert!(doc.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ElementRegistry<E> {
    /// Recorded elements by key, then by position.
    elements: FxHashMap<String, BTreeMap<usize, E>>,

    /// Positions written during the current pass.
    used: FxHashMap<String, UsedPositions>,
}

impl<E> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self {
            elements: FxHashMap::default(),
            used: FxHashMap::default(),
        }
    }
}

impl<E: Clone + PartialEq> ElementRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures an element exists at `index` for `key`, sets its content to
    /// `value` and marks the position used for this pass.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Document`] if the document fails to create or
    /// update the element. A recorded element that was detached behind the
    /// registry's back is forgotten and replaced rather than reported.
    pub fn set_value<D>(
        &mut self,
        document: &mut D,
        attr: AttrName,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<Touch, SyncError>
    where
        D: Document<Element = E>,
    {
        if let Some(element) = self.get(key, index).cloned() {
            match document.set_content(&element, value) {
                Ok(()) => {
                    trace!(key, index, "Reused element");
                    self.mark_used(key, index);
                    return Ok(Touch::Reused);
                }
                Err(DocumentError::Detached(id)) => {
                    warn!(key, index, element = %id, "Recorded element was detached, replacing");
                    self.forget(key, index);
                }
                Err(source) => return Err(SyncError::document(key, index, source)),
            }
        }

        let adoptable = document
            .query_meta(attr, key, index)
            .filter(|found| !self.is_recorded(key, found));
        let (element, touch) = match adoptable {
            Some(element) => (element, Touch::Adopted),
            None => {
                let element = document
                    .create_meta(attr, key)
                    .map_err(|source| SyncError::document(key, index, source))?;
                (element, Touch::Created)
            }
        };

        document
            .set_content(&element, value)
            .map_err(|source| SyncError::document(key, index, source))?;

        debug!(key, index, %attr, ?touch, "Recorded element");
        self.elements
            .entry(key.to_owned())
            .or_default()
            .insert(index, element);
        self.mark_used(key, index);

        Ok(touch)
    }

    /// Removes every recorded element whose position was not used during
    /// this pass, then resets the usage record for the next pass.
    ///
    /// Returns the number of elements removed from the document.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyncError::Cleanup`] raised by the document. The
    /// element it concerns stays recorded, so the next pass retries it.
    /// Elements already detached from the head are forgotten silently.
    pub fn cleanup<D>(&mut self, document: &mut D) -> Result<usize, SyncError>
    where
        D: Document<Element = E>,
    {
        let used = std::mem::take(&mut self.used);
        let mut removed = 0;
        let mut failure = None;

        self.elements.retain(|key, positions| {
            let keep = used.get(key);
            positions.retain(|index, element| {
                if keep.is_some_and(|k| k.contains(index)) {
                    return true;
                }
                match document.remove(element) {
                    Ok(()) => {
                        debug!(key = key.as_str(), index, "Removed unused element");
                        removed += 1;
                        false
                    }
                    Err(DocumentError::Detached(id)) => {
                        warn!(key = key.as_str(), index, element = %id, "Unused element was already detached");
                        false
                    }
                    Err(source) => {
                        warn!(key = key.as_str(), index, error = %source, "Failed to remove unused element");
                        failure.get_or_insert_with(|| SyncError::cleanup(key.as_str(), source));
                        true
                    }
                }
            });
            !positions.is_empty()
        });

        failure.map_or(Ok(removed), Err)
    }

    /// Discards the usage record of an abandoned pass without removing anything.
    pub fn reset_pass(&mut self) {
        self.used.clear();
    }

    /// Returns the element recorded for `key` at `index`.
    #[must_use]
    pub fn get(&self, key: &str, index: usize) -> Option<&E> {
        self.elements.get(key)?.get(&index)
    }

    /// Returns the recorded positions for `key`, ascending.
    #[must_use]
    pub fn positions(&self, key: &str) -> Vec<usize> {
        self.elements
            .get(key)
            .map(|p| p.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the positions of `key` written during the current pass, ascending.
    #[must_use]
    pub fn used_positions(&self, key: &str) -> Vec<usize> {
        let mut positions = self.used.get(key).map(|u| u.to_vec()).unwrap_or_default();
        positions.sort_unstable();
        positions
    }

    /// Returns the number of elements recorded for `key`.
    #[must_use]
    pub fn element_count(&self, key: &str) -> usize {
        self.elements.get(key).map_or(0, BTreeMap::len)
    }

    /// Iterates over the keys that currently have recorded elements.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Returns the total number of recorded elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no element is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn mark_used(&mut self, key: &str, index: usize) {
        if let Some(positions) = self.used.get_mut(key) {
            if !positions.contains(&index) {
                positions.push(index);
            }
        } else {
            let mut positions = UsedPositions::new();
            positions.push(index);
            self.used.insert(key.to_owned(), positions);
        }
    }

    fn is_recorded(&self, key: &str, element: &E) -> bool {
        self.elements
            .get(key)
            .is_some_and(|positions| positions.values().any(|e| e == element))
    }

    fn forget(&mut self, key: &str, index: usize) {
        if let Some(positions) = self.elements.get_mut(key) {
            positions.remove(&index);
            if positions.is_empty() {
                self.elements.remove(key);
            }
        }
    }
}
