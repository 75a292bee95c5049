//! Bulk state ingestion (`RECEIVE_STATE`).
//!
//! A state fragment is an object keyed by region. Regions are merged one at
//! a time so that each can keep its own invariants:
//!
//! - `content`: every entry is merged like a fetched record, so local reply
//!   links survive and entries are listed under their parents
//! - `accounts` and `discussion_idx`: deep-merged, then every key list the
//!   fragment touched is deduplicated
//! - anything else: deep-merged as is

use lv_merge::{dedup, deep_merge_into};
use lv_tree::{Node, Transient};
use lv_types::{fields, regions, ContentKey, Path};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::content::merge_record;
use crate::normalize::{normalize_content, normalize_region};

/// Handle `RECEIVE_STATE`. Fragments that are not objects are ignored.
pub fn receive_state(tx: &mut Transient, fragment: Value) {
    let Value::Object(fragment) = fragment else {
        warn!("state fragment is not an object; ignored");
        return;
    };
    for (region, value) in fragment {
        match (region.as_str(), value) {
            (regions::CONTENT, Value::Object(records)) => merge_content(tx, records),
            (regions::ACCOUNTS | regions::DISCUSSION_IDX, value) => {
                let lists = key_lists(&region, &value);
                merge_region(tx, &region, value);
                let mut dropped = 0;
                for path in &lists {
                    if tx.get(path).and_then(Node::as_list).is_some() {
                        dropped += dedup(tx.list_mut(path));
                    }
                }
                if dropped > 0 {
                    debug!(region = %region, dropped, "repeated keys dropped from merged lists");
                }
            }
            (_, value) => merge_region(tx, &region, value),
        }
    }
}

fn merge_region(tx: &mut Transient, region: &str, value: Value) {
    let incoming = normalize_region(region, value);
    deep_merge_into(tx.slot_mut(&Path::from([region])), incoming);
}

fn merge_content(tx: &mut Transient, records: Map<String, Value>) {
    for (raw_key, record) in records {
        let incoming = normalize_content(record);
        match raw_key.parse::<ContentKey>() {
            Ok(key) => {
                // Only a record that carries votes supersedes the local ones.
                let stale: &[&str] = if incoming.child(fields::ACTIVE_VOTES).is_some() {
                    &[fields::ACTIVE_VOTES]
                } else {
                    &[]
                };
                merge_record(tx, &key, incoming, stale);
            }
            Err(_) => {
                warn!(key = %raw_key, "content entry under a malformed key merged without linking");
                deep_merge_into(tx.slot_mut(&Path::from([regions::CONTENT, raw_key.as_str()])), incoming);
            }
        }
    }
}

/// Paths of the string lists two levels below `region` in `value`
/// (`accounts[name][category]`, `discussion_idx[category][order]`).
fn key_lists(region: &str, value: &Value) -> Vec<Path> {
    let mut found = Vec::new();
    for (outer, inner) in value.as_object().into_iter().flatten() {
        for (name, list) in inner.as_object().into_iter().flatten() {
            if list.as_array().is_some_and(|items| items.iter().all(Value::is_string)) {
                found.push(Path::from([region, outer.as_str(), name.as_str()]));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ingest(source: &Node, fragment: Value) -> Node {
        source.with_mutations(|tx| receive_state(tx, fragment))
    }

    fn at<'a>(root: &'a Node, segments: &[&str]) -> Option<&'a Node> {
        root.get_in(&Path::from(segments))
    }

    // ---------------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------------

    #[test]
    fn state_with_empty_replies_keeps_local_links() {
        let source = Node::from(json!({"content": {
            "b/p0": {"author": "b", "permlink": "p0", "replies": ["a/p1"]},
            "a/p1": {"author": "a", "permlink": "p1", "parent_author": "b", "parent_permlink": "p0"}
        }}));
        let next = ingest(
            &source,
            json!({"content": {"b/p0": {"author": "b", "permlink": "p0", "title": "t", "replies": []}}}),
        );
        assert_eq!(
            at(&next, &["content", "b/p0", "replies"]),
            Some(&Node::list([Node::from("a/p1")]))
        );
        assert_eq!(at(&next, &["content", "b/p0", "title"]), Some(&Node::from("t")));
    }

    #[test]
    fn state_entries_link_under_their_parents() {
        let next = ingest(
            &Node::empty_map(),
            json!({"content": {
                "a/p1": {"author": "a", "permlink": "p1", "parent_author": "b", "parent_permlink": "p0"},
                "c/p2": {"author": "c", "permlink": "p2", "parent_author": "b", "parent_permlink": "p0"}
            }}),
        );
        assert_eq!(
            at(&next, &["content", "b/p0", "replies"]),
            Some(&Node::list([Node::from("a/p1"), Node::from("c/p2")]))
        );
    }

    #[test]
    fn state_votes_replace_only_when_carried() {
        let source = Node::from(json!({"content": {"a/p": {
            "author": "a", "permlink": "p",
            "active_votes": [{"voter": "x", "percent": 1}, {"voter": "y", "percent": 2}]
        }}}));
        let kept = ingest(&source, json!({"content": {"a/p": {"body": "b"}}}));
        assert_eq!(at(&kept, &["content", "a/p", "active_votes"]).map(Node::len), Some(2));

        let replaced = ingest(
            &source,
            json!({"content": {"a/p": {"active_votes": [{"voter": "y", "percent": 3}]}}}),
        );
        assert_eq!(
            at(&replaced, &["content", "a/p", "active_votes"]).map(Node::to_json),
            Some(json!([{"voter": "y", "percent": 3}]))
        );
    }

    #[test]
    fn malformed_content_key_is_merged_verbatim() {
        let next = ingest(&Node::empty_map(), json!({"content": {"nokey": {"body": "x"}}}));
        assert_eq!(at(&next, &["content", "nokey", "body"]), Some(&Node::from("x")));
    }

    // ---------------------------------------------------------------------------
    // Listings and other regions
    // ---------------------------------------------------------------------------

    #[test]
    fn listing_merge_never_repeats_keys() {
        let source = Node::from(json!({"discussion_idx": {"rust": {"hot": ["a/1", "b/2"]}}}));
        let next = ingest(&source, json!({"discussion_idx": {"rust": {"hot": ["b/2", "c/3", "a/1"]}}}));
        assert_eq!(
            at(&next, &["discussion_idx", "rust", "hot"]).map(Node::to_json),
            Some(json!(["b/2", "c/3", "a/1"]))
        );
    }

    #[test]
    fn account_listing_merge_never_repeats_permlinks() {
        let source = Node::from(json!({"accounts": {"x": {"name": "x", "blog": ["p1", "p2"]}}}));
        let next = ingest(&source, json!({"accounts": {"x": {"blog": ["p2"]}}}));
        assert_eq!(
            at(&next, &["accounts", "x", "blog"]).map(Node::to_json),
            Some(json!(["p2"]))
        );
    }

    #[test]
    fn other_regions_deep_merge() {
        let source = Node::from(json!({"props": {"head": 1, "supply": "10"}}));
        let next = ingest(&source, json!({"props": {"head": 2}}));
        assert_eq!(next.to_json(), json!({"props": {"head": 2, "supply": "10"}}));
    }
}
