//! Merge policies for LedgerView.
//!
//! Each update operation combines incoming data with what the snapshot
//! already holds under exactly one [`MergePolicy`]. The functions in this
//! crate are the policies themselves; they are pure over [`Node`] values or
//! edit an already-copied container in place.
//!
//! [`Node`]: lv_tree::Node

pub mod deep;
pub mod list;
pub mod policy;
pub mod votes;

pub use deep::{deep_merge, deep_merge_into, replace_clearing, shallow_merge};
pub use list::{append_unique, dedup, dedup_append, dedup_prepend, prepend_unique, remove_all};
pub use policy::{edit_membership, MergePolicy, Membership};
pub use votes::{upsert_vote, vote_record};
