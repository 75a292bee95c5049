//! Immutable, structurally shared path tree.
//!
//! Every LedgerView snapshot is a single [`Node`] tree. Container nodes are
//! `imbl` persistent collections (an RRB vector for lists, B-trees for
//! mappings and sets), so cloning a tree is O(1) and a write copies only
//! the chunks on the path it touches: O(log n) per container rather than
//! the whole container. Every untouched subtree is shared with the previous
//! tree.
//!
//! # Operations
//!
//! - [`Node::get_in`]: read the node at a [`Path`]
//! - [`Node::set_in`] / [`Node::update_in`] / [`Node::delete_in`]: persistent
//!   writes returning a new tree and leaving `self` untouched
//! - [`Node::with_mutations`]: batch scope: several writes staged on a
//!   [`Transient`] and committed as one structural-sharing pass
//!
//! # Totality
//!
//! Writes never fail and never allocate more than they store. Writing
//! through a scalar or set replaces it with an empty mapping. A numeric
//! segment at or past the end of a list appends a single item, however
//! large the index. A non-numeric segment under a list replaces the list
//! with a mapping. Deleting a missing path is a no-op.
//!
//! [`Path`]: lv_types::Path

pub mod convert;
pub mod node;
pub mod transient;

pub use node::Node;
pub use transient::Transient;
