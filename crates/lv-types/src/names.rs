//! Canonical names of snapshot regions and well-known entry fields.

/// Top-level regions of a snapshot.
pub mod regions {
    /// Canonical dedup store of posts and comments, keyed by `author/permlink`.
    pub const CONTENT: &str = "content";
    /// Canonical dedup store of accounts, keyed by account name.
    pub const ACCOUNTS: &str = "accounts";
    /// Listing views: category -> sort order -> ordered content keys.
    pub const DISCUSSION_IDX: &str = "discussion_idx";
    /// Pagination bookkeeping: category -> sort order -> fetch status.
    pub const STATUS: &str = "status";
    /// Ephemeral per-form link metadata.
    pub const META_LINK_DATA: &str = "metaLinkData";
    /// Ephemeral dialog registry.
    pub const ACTIVE_DIALOGS: &str = "active_dialogs";
}

/// Field names inside content, account, and status entries.
pub mod fields {
    pub const AUTHOR: &str = "author";
    pub const PERMLINK: &str = "permlink";
    pub const PARENT_AUTHOR: &str = "parent_author";
    pub const PARENT_PERMLINK: &str = "parent_permlink";
    pub const TITLE: &str = "title";
    pub const BODY: &str = "body";
    pub const REPLIES: &str = "replies";
    pub const ACTIVE_VOTES: &str = "active_votes";
    pub const VOTER: &str = "voter";
    pub const PERCENT: &str = "percent";
    pub const COLLAPSED: &str = "collapsed";
    pub const NAME: &str = "name";
    pub const WITNESS_VOTES: &str = "witness_votes";
    pub const FETCHING: &str = "fetching";
    pub const LAST_FETCH: &str = "last_fetch";
    pub const PARAMS: &str = "params";
    pub const LINK: &str = "link";
    pub const RESULT: &str = "result";
    pub const ERROR: &str = "error";

    /// Sort order whose listing is keyed by account rather than category.
    pub const BY_AUTHOR: &str = "by_author";
    /// Sort order of the most-recent-first feed.
    pub const CREATED: &str = "created";
}
