//! Error types for the hm-sync crate.
//!
//! [`DocumentError`] is what a [`Document`](crate::Document) backend reports;
//! [`SyncError`] adds the key and position a reconciliation pass was working
//! on when the backend failed.
//!
//! # Error Recovery Strategy
//!
//! - **Detached element** ([`DocumentError::Detached`]): Recoverable - the
//!   element left the head behind the registry's back; the registry forgets
//!   it and the next write recreates it
//! - **Backend failure** ([`DocumentError::Backend`]): Fatal for the pass -
//!   propagated to the caller, per-pass bookkeeping is reset
//!
//! # Examples
//!
//! ```
//! use hm_sync::{DocumentError, SyncError};
//!
//! let err = SyncError::document("og:title", 0, DocumentError::Detached("#3".to_owned()));
//! assert!(err.is_recoverable());
//! assert_eq!(err.key(), Some("og:title"));
//! ```

use hm_core::ConfigError;

/// Errors reported by a [`Document`](crate::Document) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The element is no longer part of the document head.
    #[error("element {0} is not attached to the document head")]
    Detached(String),

    /// The underlying document rejected the operation.
    #[error("document backend error: {0}")]
    Backend(String),
}

/// Errors that can occur during a reconciliation pass.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Writing the element for `key` at `index` failed.
    #[error("failed to sync '{key}' at position {index}: {source}")]
    Document {
        /// The metadata key being written.
        key: String,
        /// Position of the element among elements sharing `key`.
        index: usize,
        /// The underlying document error.
        #[source]
        source: DocumentError,
    },

    /// Removing an unused element for `key` failed.
    #[error("failed to remove unused element for '{key}': {source}")]
    Cleanup {
        /// The metadata key whose element could not be removed.
        key: String,
        /// The underlying document error.
        #[source]
        source: DocumentError,
    },

    /// The reconciler was given an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// Creates a new [`SyncError::Document`] error.
    #[inline]
    pub fn document(key: impl Into<String>, index: usize, source: DocumentError) -> Self {
        Self::Document {
            key: key.into(),
            index,
            source,
        }
    }

    /// Creates a new [`SyncError::Cleanup`] error.
    #[inline]
    pub fn cleanup(key: impl Into<String>, source: DocumentError) -> Self {
        Self::Cleanup {
            key: key.into(),
            source,
        }
    }

    /// Returns `true` if the next pass can be expected to succeed unchanged.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Document {
                source: DocumentError::Detached(_),
                ..
            } | Self::Cleanup {
                source: DocumentError::Detached(_),
                ..
            }
        )
    }

    /// Returns the metadata key associated with this error, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Document { key, .. } | Self::Cleanup { key, .. } => Some(key),
            Self::Config(_) => None,
        }
    }
}
