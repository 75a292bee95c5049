//! Reply graph: parent entries list the keys of their direct replies.
//!
//! The child holds `parent_author`/`parent_permlink`, the parent holds the
//! child's key in `replies`. Every helper here keeps a key listed at most
//! once and creates a missing parent as an empty entry so a reply can be
//! linked before its parent has been fetched.

use lv_merge::{append_unique, dedup, dedup_append, dedup_prepend, remove_all};
use lv_tree::{Node, Transient};
use lv_types::{fields, ContentKey};
use tracing::debug;

use crate::content::ensure_entry;
use crate::normalize::parent_key_of;
use crate::operation::LinkReply;
use crate::paths;

/// Inserts a child key into its parent's replies.
pub type Link = fn(&mut Transient, &ContentKey, &ContentKey) -> bool;

/// List `child` first among `parent`'s replies. Returns `true` if added.
pub fn link_first(tx: &mut Transient, parent: &ContentKey, child: &ContentKey) -> bool {
    ensure_entry(tx, parent);
    dedup_prepend(tx.list_mut(&paths::replies(parent)), Node::from(child.as_key()))
}

/// List `child` last among `parent`'s replies. Returns `true` if added.
pub fn link_last(tx: &mut Transient, parent: &ContentKey, child: &ContentKey) -> bool {
    ensure_entry(tx, parent);
    dedup_append(tx.list_mut(&paths::replies(parent)), Node::from(child.as_key()))
}

/// Drop `child` from `parent`'s replies. A parent that is absent or does not
/// list the child is left untouched.
pub fn unlink(tx: &mut Transient, parent: &ContentKey, child: &ContentKey) -> usize {
    let path = paths::replies(parent);
    let child = Node::from(child.as_key());
    let listed = tx
        .get(&path)
        .and_then(Node::as_list)
        .is_some_and(|replies| replies.iter().any(|key| key == &child));
    if !listed {
        return 0;
    }
    remove_all(tx.list_mut(&path), &child)
}

/// Repair the reply graph around `key` after its entry was rewritten.
///
/// `before` is the entry as it stood before the write. Reply keys it listed
/// survive the write whatever the incoming record said about them, repeated
/// keys are dropped, and the entry is listed under its current parent with
/// `link`. If the write moved it to another parent it is unlinked from the
/// old one.
pub fn reconcile(tx: &mut Transient, key: &ContentKey, before: Option<&Node>, link: Link) {
    let path = paths::content(key);
    let Some(after) = tx.get(&path) else {
        return;
    };
    let parent = parent_key_of(after);

    let kept = before
        .and_then(|entry| entry.child(fields::REPLIES))
        .and_then(Node::as_list)
        .cloned()
        .unwrap_or_default();
    let replies = tx.list_mut(&paths::replies(key));
    let dropped = dedup(replies);
    let restored = append_unique(replies, kept);
    if dropped + restored > 0 {
        debug!(key = %key, dropped, restored, "replies repaired after merge");
    }

    if let Some(previous) = before.and_then(parent_key_of) {
        if parent.as_ref() != Some(&previous) {
            unlink(tx, &previous, key);
        }
    }
    match parent {
        Some(parent) if &parent != key => {
            link(tx, &parent, key);
        }
        _ => {}
    }
}

/// Handle `LINK_REPLY`: append the reply under its parent.
pub fn link_reply(tx: &mut Transient, link: &LinkReply) {
    let Some(parent) = ContentKey::parent(&link.parent_author, &link.parent_permlink) else {
        debug!(
            author = %link.author,
            permlink = %link.permlink,
            "reply without parent; nothing to link"
        );
        return;
    };
    let child = ContentKey::new(&link.author, &link.permlink);
    if parent == child {
        return;
    }
    link_last(tx, &parent, &child);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lv_types::Path;
    use serde_json::{json, Value};

    fn key(a: &str, p: &str) -> ContentKey {
        ContentKey::new(a, p)
    }

    fn replies_of(root: &Node, parent: &ContentKey) -> Vec<String> {
        root.get_in(&paths::replies(parent))
            .and_then(Node::as_list)
            .map(|replies| {
                replies
                    .iter()
                    .filter_map(|n| n.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn link_creates_missing_parent() {
        let parent = key("b", "p0");
        let next = Node::empty_map().with_mutations(|tx| {
            assert!(link_last(tx, &parent, &key("a", "p1")));
            assert!(!link_last(tx, &parent, &key("a", "p1")));
        });
        assert_eq!(replies_of(&next, &parent), vec!["a/p1"]);
        assert_eq!(
            next.get_in(&Path::from(["content", "b/p0", "author"])),
            Some(&Node::from("b"))
        );
    }

    #[test]
    fn link_first_puts_newest_on_top() {
        let parent = key("b", "p0");
        let next = Node::empty_map().with_mutations(|tx| {
            link_first(tx, &parent, &key("a", "p1"));
            link_first(tx, &parent, &key("c", "p2"));
            link_first(tx, &parent, &key("a", "p1"));
        });
        assert_eq!(replies_of(&next, &parent), vec!["c/p2", "a/p1"]);
    }

    #[test]
    fn unlink_absent_parent_is_noop() {
        let source = Node::map([("content", Node::empty_map())]);
        let next = source.with_mutations(|tx| {
            assert_eq!(unlink(tx, &key("b", "p0"), &key("a", "p1")), 0);
        });
        assert!(next.ptr_eq(&source));
        assert!(next.get_in(&Path::from(["content", "b/p0"])).is_none());
    }

    #[test]
    fn reconcile_restores_dropped_and_repeated_replies() {
        let entry = |replies: Value| {
            Node::from(json!({"author": "b", "permlink": "p0", "replies": replies}))
        };
        let before = entry(json!(["a/p1", "c/p2"]));
        let parent = key("b", "p0");
        let source = Node::map([(
            "content",
            Node::map([("b/p0", entry(json!(["c/p2", "c/p2"])))]),
        )]);
        let next = source.with_mutations(|tx| reconcile(tx, &parent, Some(&before), link_last));
        assert_eq!(replies_of(&next, &parent), vec!["c/p2", "a/p1"]);
    }

    #[test]
    fn reconcile_moves_entry_to_new_parent() {
        let child = key("a", "p1");
        let before = Node::from(json!({
            "author": "a", "permlink": "p1", "parent_author": "b", "parent_permlink": "p0"
        }));
        let source = Node::from(json!({"content": {
            "b/p0": {"replies": ["a/p1"]},
            "a/p1": {"author": "a", "permlink": "p1", "parent_author": "d", "parent_permlink": "q"}
        }}));
        let next = source.with_mutations(|tx| reconcile(tx, &child, Some(&before), link_last));
        assert!(replies_of(&next, &key("b", "p0")).is_empty());
        assert_eq!(replies_of(&next, &key("d", "q")), vec!["a/p1"]);
    }

    #[test]
    fn link_reply_needs_both_parent_fields() {
        let link = LinkReply {
            author: "a".into(),
            permlink: "p1".into(),
            parent_author: "b".into(),
            parent_permlink: String::new(),
        };
        let source = Node::empty_map();
        let next = source.with_mutations(|tx| link_reply(tx, &link));
        assert_eq!(next, source);
    }
}
