//! Domain types for headmeta.
//!
//! # Module Organization
//!
//! - [`attr`] - Identifying attribute selection for metadata keys
//! - [`metadata`] - Metadata payloads (flat maps and grouped entries)
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use hm_core::{AttrName, MetadataEntry, MetadataMap};
//! ```

pub mod attr;
pub mod metadata;

pub use attr::{AttrName, namespace_prefix};
pub use metadata::{EntryGroups, MetadataEntry, MetadataMap};
