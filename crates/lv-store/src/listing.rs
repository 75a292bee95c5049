//! Listing ingestion: discussion indexes and per-author listings.
//!
//! A page of records is appended to the listing it was fetched for, each
//! key at most once, and every record whose entry is not yet known is
//! stored under `content` and linked under its parent. Entries already
//! present are kept as they are: listing records are summaries and must
//! not overwrite a full record.

use lv_merge::{append_unique, prepend_unique};
use lv_tree::{Node, Transient};
use lv_types::{fields, ContentKey};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::normalize::{content_key_of, normalize_content};
use crate::operation::ReceiveData;
use crate::paths;
use crate::replies;
use crate::status;

/// Handle `RECEIVE_DATA`.
///
/// `by_author` pages are indexed by permlink under
/// `accounts[author][category]`; every other order is indexed by full key
/// under `discussion_idx[category][order]`. The listing's fetch status is
/// updated last.
pub fn receive_data(tx: &mut Transient, page: ReceiveData, batch_size: usize, clock: &dyn Clock) {
    let category = page.category.unwrap_or_default();
    let fetched = page.data.len();
    let records = keyed(page.data);

    let added = if page.order == fields::BY_AUTHOR {
        match page.author.as_deref().filter(|a| !a.is_empty()) {
            Some(author) => append_unique(
                tx.list_mut(&paths::account_posts(author, &category)),
                records.iter().map(|(key, _)| Node::from(key.permlink())),
            ),
            None => {
                warn!(category = %category, "by_author page without author; listing not indexed");
                0
            }
        }
    } else {
        append_unique(
            tx.list_mut(&paths::discussion(&category, &page.order)),
            records.iter().map(|(key, _)| Node::from(key.as_key())),
        )
    };
    let stored = store_missing(tx, records);
    debug!(
        category = %category,
        order = %page.order,
        fetched,
        added,
        stored,
        "listing page ingested"
    );

    status::mark_received(tx, &category, &page.order, fetched, batch_size, clock);
}

/// Handle `RECEIVE_RECENT_POSTS`: newest records go to the front of the
/// uncategorised `created` listing.
pub fn receive_recent_posts(tx: &mut Transient, data: Vec<Value>) {
    let records = keyed(data);
    let added = prepend_unique(
        tx.list_mut(&paths::discussion("", fields::CREATED)),
        records.iter().map(|(key, _)| Node::from(key.as_key())),
    );
    let stored = store_missing(tx, records);
    debug!(added, stored, "recent posts ingested");
}

fn keyed(data: Vec<Value>) -> Vec<(ContentKey, Value)> {
    data.into_iter()
        .filter_map(|record| match content_key_of(&record) {
            Some(key) => Some((key, record)),
            None => {
                warn!("listing record without author/permlink skipped");
                None
            }
        })
        .collect()
}

fn store_missing(tx: &mut Transient, records: Vec<(ContentKey, Value)>) -> usize {
    let mut stored = 0;
    for (key, record) in records {
        let path = paths::content(&key);
        if tx.set_if_absent(&path, normalize_content(record)) {
            replies::reconcile(tx, &key, None, replies::link_last);
            stored += 1;
        }
    }
    stored
}
