//! Core types, errors, and configuration for headmeta.
//!
//! This crate provides the foundational types shared by the workspace:
//!
//! - Metadata payload types ([`MetadataMap`], [`MetadataEntry`], [`EntryGroups`])
//! - Key classification ([`AttrName`], [`namespace_prefix`])
//! - Reconciliation settings ([`SyncConfig`]) and [`ConfigError`]
//! - The `FxHashMap` alias used for registry bookkeeping
//!
//! # Example
//!
//! ```
//! use hm_core::{AttrName, MetadataMap, SyncConfig};
//!
//! let config = SyncConfig::default();
//! assert_eq!(config.attr_name("og:title"), AttrName::Property);
//! assert_eq!(config.attr_name("description"), AttrName::Name);
//!
//! let mut data = MetadataMap::new();
//! data.insert("title".to_owned(), "Hello".to_owned());
//! assert_eq!(data.get("title").map(String::as_str), Some("Hello"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::SyncConfig;
pub use error::ConfigError;
pub use hash::FxHashMap;
pub use types::{AttrName, EntryGroups, MetadataEntry, MetadataMap, namespace_prefix};
