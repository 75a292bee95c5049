//! Where each kind of record lives in the snapshot tree.

use lv_types::{fields, regions, ContentKey, Path};

pub fn content(key: &ContentKey) -> Path {
    Path::new([regions::CONTENT.to_string(), key.as_key()])
}

pub fn content_field(key: &ContentKey, field: &str) -> Path {
    content(key).child(field)
}

pub fn replies(key: &ContentKey) -> Path {
    content_field(key, fields::REPLIES)
}

pub fn active_votes(key: &ContentKey) -> Path {
    content_field(key, fields::ACTIVE_VOTES)
}

pub fn account(name: &str) -> Path {
    Path::from([regions::ACCOUNTS, name])
}

pub fn witness_votes(name: &str) -> Path {
    Path::from([regions::ACCOUNTS, name, fields::WITNESS_VOTES])
}

/// Per-account listing of permlinks in one category.
pub fn account_posts(name: &str, category: &str) -> Path {
    Path::from([regions::ACCOUNTS, name, category])
}

/// Listing of content keys for one category and sort order.
pub fn discussion(category: &str, order: &str) -> Path {
    Path::from([regions::DISCUSSION_IDX, category, order])
}

pub fn status(category: &str, order: &str) -> Path {
    Path::from([regions::STATUS, category, order])
}

pub fn dialog(name: &str) -> Path {
    Path::from([regions::ACTIVE_DIALOGS, name])
}

pub fn meta(id: &str) -> Path {
    Path::from([regions::META_LINK_DATA, id])
}
