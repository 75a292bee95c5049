//! Foundation types for LedgerView.
//!
//! This crate provides the identifiers shared by every other LedgerView
//! crate: the composite key of a content entry, the key sequence that
//! addresses a node of the snapshot tree, and the names of the snapshot's
//! top-level regions and well-known entry fields.
//!
//! # Key Types
//!
//! - [`ContentKey`]: `author/permlink` identity of a post or comment
//! - [`Path`]: ordered sequence of keys into the snapshot tree
//! - [`regions`] / [`fields`]: canonical region and field names

pub mod error;
pub mod key;
pub mod names;
pub mod path;

pub use error::TypeError;
pub use key::ContentKey;
pub use names::{fields, regions};
pub use path::Path;
