//! Reconciles application metadata onto document head elements.
//!
//! Every time the application's page metadata changes, [`MetadataSync`]
//! brings the document head in line with it: the title is written, each key
//! gets a `<meta>` element (Open Graph and Twitter variants for the common
//! keys), elements from earlier passes are reused, and elements nothing
//! refers to anymore are removed.
//!
//! # Overview
//!
//! - [`Document`]: the head operations the reconciler needs from its host
//! - [`MemoryDocument`]: in-memory implementation for tests and rendering
//! - [`ElementRegistry`]: key → positioned elements, with per-pass usage
//! - [`MetadataSync`]: the reconciliation pass
//! - [`MetadataListener`]: forwards `app-metadata` events into a pass
//!
//! # Example
//!
//! ```
//! use hm_core::{MetadataEntry, MetadataMap};
//! use hm_sync::{MemoryDocument, MetadataSync};
//!
//! let mut sync = MetadataSync::new(MemoryDocument::new("https://x.test"));
//!
//! let mut data = MetadataMap::new();
//! data.insert("title".to_owned(), "Release notes".to_owned());
//! let tags = vec![
//!     vec![MetadataEntry::new("article:tag", "rust")],
//!     vec![MetadataEntry::new("article:tag", "web")],
//! ];
//!
//! sync.update(&data, Some(tags.as_slice())).unwrap();
//! assert_eq!(sync.document().contents("article:tag"), ["rust", "web"]);
//!
//! // The next page has a single tag: the second element is removed.
//! sync.update(&data, Some(&tags[..1])).unwrap();
//! assert_eq!(sync.document().contents("article:tag"), ["rust"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! MetadataListener (event name filter)
//!     │
//!     └── MetadataSync (url fallback, title, fan-out, groups)
//!             │
//!             ├── ElementRegistry (reuse / adopt / create, cleanup)
//!             │
//!             └── D: Document (MemoryDocument, host bindings)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod document;
mod error;
mod listener;
mod memory;
mod reconciler;
mod registry;

pub use document::Document;
pub use error::{DocumentError, SyncError};
pub use listener::{DEFAULT_CHANNEL_CAPACITY, MetadataEvent, MetadataListener, channel};
pub use memory::{DocumentStats, ElementId, MemoryDocument, MetaElement};
pub use reconciler::{MetadataSync, SyncReport};
pub use registry::{ElementRegistry, Touch};
