//! Application event integration.
//!
//! Hosts announce new page metadata by emitting a named event (by default
//! `app-metadata`) whose payload is a flat string map. [`MetadataListener`]
//! subscribes to that event and forwards each payload into its
//! [`MetadataSync`], one pass at a time.
//!
//! # Event Flow
//!
//! ```text
//! host code ──► mpsc::Sender<MetadataEvent>
//!                       │
//!                       ▼
//!            MetadataListener::run
//!                       │  name == config.event_name
//!                       ▼
//!             MetadataSync::update(detail)
//! ```

use hm_core::MetadataMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::document::Document;
use crate::error::SyncError;
use crate::reconciler::{MetadataSync, SyncReport};

/// Default capacity for [`channel`].
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// A named application event carrying a metadata payload.
///
/// # Examples
///
/// ```
/// use hm_sync::MetadataEvent;
///
/// let event: MetadataEvent = serde_json::from_str(
///     r#"{"name": "app-metadata", "detail": {"title": "Docs"}}"#,
/// ).unwrap();
/// assert_eq!(event.detail["title"], "Docs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEvent {
    /// Event name.
    pub name: String,
    /// Metadata payload.
    pub detail: MetadataMap,
}

impl MetadataEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(name: impl Into<String>, detail: MetadataMap) -> Self {
        Self {
            name: name.into(),
            detail,
        }
    }
}

/// Creates a bounded channel for delivering [`MetadataEvent`]s to a listener.
#[must_use]
pub fn channel(capacity: usize) -> (mpsc::Sender<MetadataEvent>, mpsc::Receiver<MetadataEvent>) {
    mpsc::channel(capacity)
}

/// Forwards metadata events into a [`MetadataSync`].
///
/// # Examples
///
/// ```
/// use hm_core::MetadataMap;
/// use hm_sync::{MemoryDocument, MetadataEvent, MetadataListener, MetadataSync};
///
/// let mut listener = MetadataListener::new(MetadataSync::new(MemoryDocument::new("https://x.test")));
///
/// let mut detail = MetadataMap::new();
/// detail.insert("description".to_owned(), "D".to_owned());
///
/// assert!(listener.handle(&MetadataEvent::new("unrelated", detail.clone())).is_none());
/// assert!(listener.handle(&MetadataEvent::new("app-metadata", detail)).is_some());
/// assert_eq!(listener.sync().document().contents("description"), ["D"]);
/// ```
#[derive(Debug)]
pub struct MetadataListener<D: Document> {
    sync: MetadataSync<D>,
}

impl<D: Document> MetadataListener<D> {
    /// Creates a listener for the event name configured on `sync`.
    #[must_use]
    pub const fn new(sync: MetadataSync<D>) -> Self {
        Self { sync }
    }

    /// Returns the event name this listener subscribes to.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.sync.config().event_name
    }

    /// Handles a single event.
    ///
    /// Returns `None` if the event is not addressed to this listener,
    /// otherwise the result of the reconciliation pass it triggered.
    pub fn handle(&mut self, event: &MetadataEvent) -> Option<Result<SyncReport, SyncError>> {
        if event.name != self.event_name() {
            debug!(event = %event.name, "Ignoring event");
            return None;
        }
        Some(self.sync.update(&event.detail, None))
    }

    /// Processes events until every sender has been dropped.
    ///
    /// Events are handled strictly in arrival order. A failed pass is logged
    /// and does not stop the loop. Returns the listener so the caller can
    /// inspect the final document state.
    pub async fn run(mut self, mut events: mpsc::Receiver<MetadataEvent>) -> Self {
        while let Some(event) = events.recv().await {
            match self.handle(&event) {
                Some(Err(err)) if err.is_recoverable() => {
                    warn!(error = %err, "Metadata pass failed, will retry on next event");
                }
                Some(Err(err)) => error!(error = %err, "Metadata pass failed"),
                Some(Ok(_)) | None => {}
            }
        }
        debug!("Metadata event channel closed");
        self
    }

    /// Returns the reconciler.
    #[inline]
    pub const fn sync(&self) -> &MetadataSync<D> {
        &self.sync
    }

    /// Consumes the listener, returning the reconciler.
    #[inline]
    pub fn into_sync(self) -> MetadataSync<D> {
        self.sync
    }
}
