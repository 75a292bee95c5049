//! The policy vocabulary and set-style membership edits.

use std::fmt;

use imbl::OrdSet;

/// How an operation combines new data with what a path already holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergePolicy {
    /// Recursive merge; absent keys never delete.
    DeepMerge,
    /// Top-level keys overwrite; nested containers replaced whole.
    ShallowMerge,
    /// Drop stale fields, then deep-merge.
    ReplaceClearingStale,
    /// Ordered insert at the end, skipping present keys.
    AppendUnique,
    /// Ordered insert at the front, skipping present keys.
    PrependUnique,
    /// Add or remove one member of a set.
    SetEdit,
    /// Overwrite the entry of the same voter or append a new one.
    VoteUpsert,
    /// Unconditional write of a whole value.
    Replace,
    /// Path deletion.
    Remove,
    /// Caller-supplied function over the current value.
    Update,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::DeepMerge => "deep-merge",
            MergePolicy::ShallowMerge => "shallow-merge",
            MergePolicy::ReplaceClearingStale => "replace-clearing-stale",
            MergePolicy::AppendUnique => "append-unique",
            MergePolicy::PrependUnique => "prepend-unique",
            MergePolicy::SetEdit => "set-edit",
            MergePolicy::VoteUpsert => "vote-upsert",
            MergePolicy::Replace => "replace",
            MergePolicy::Remove => "remove",
            MergePolicy::Update => "update",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a membership edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    Add,
    Remove,
}

impl From<bool> for Membership {
    /// `true` approves (adds), `false` unapproves (removes).
    fn from(approve: bool) -> Self {
        if approve {
            Membership::Add
        } else {
            Membership::Remove
        }
    }
}

/// Add or remove `member`. Idempotent; returns `true` if the set changed.
pub fn edit_membership(set: &mut OrdSet<String>, member: &str, edit: Membership) -> bool {
    match edit {
        Membership::Add => set.insert(member.to_string()).is_none(),
        Membership::Remove => set.remove(member).is_some(),
    }
}
