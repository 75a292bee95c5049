//! Handlers that write content entries.

use lv_merge::{deep_merge, replace_clearing, shallow_merge, upsert_vote};
use lv_tree::{Node, Transient};
use lv_types::{fields, regions, ContentKey, Path};
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{content_key_of, empty_content, empty_content_for, normalize_content, parent_key_of};
use crate::operation::{ReceiveComment, SetCollapsed, Voted};
use crate::paths;
use crate::replies;

/// Make sure an entry exists for `key`, creating the default shape if not.
pub fn ensure_entry(tx: &mut Transient, key: &ContentKey) {
    let path = paths::content(key);
    if !tx.contains(&path) {
        tx.set(&path, empty_content_for(key));
    }
}

/// Handle `RECEIVE_COMMENT`: merge the fields the comment carries into its
/// entry, then list it first under its parent.
pub fn receive_comment(tx: &mut Transient, comment: ReceiveComment) {
    let key = comment.key();
    let path = paths::content(&key);

    let mut incoming = vec![
        (fields::AUTHOR, Node::from(comment.author)),
        (fields::PERMLINK, Node::from(comment.permlink)),
        (fields::BODY, Node::from(comment.body.into_string())),
    ];
    if let Some(title) = comment.title {
        incoming.push((fields::TITLE, Node::from(title.into_string())));
    }
    if let Some(parent_author) = comment.parent_author {
        incoming.push((fields::PARENT_AUTHOR, Node::from(parent_author)));
    }
    if let Some(parent_permlink) = comment.parent_permlink {
        incoming.push((fields::PARENT_PERMLINK, Node::from(parent_permlink)));
    }
    let incoming = Node::map(incoming);
    let before = tx.get(&path).cloned();
    tx.update(&path, empty_content_for(&key), |entry| deep_merge(entry, incoming));
    replies::reconcile(tx, &key, before.as_ref(), replies::link_first);
}

/// Handle `RECEIVE_CONTENT`: the record replaces the entry's votes and is
/// deep-merged over everything else.
pub fn receive_content(tx: &mut Transient, record: Value) {
    let Some(key) = content_key_of(&record) else {
        warn!("content record without author/permlink ignored");
        return;
    };
    merge_record(tx, &key, normalize_content(record), &[fields::ACTIVE_VOTES]);
}

/// Deep-merge a normalized record over the entry at `key` after dropping
/// its `stale` fields, then repair the reply graph around the entry: reply
/// links recorded locally survive and the entry is listed last under its
/// parent.
pub fn merge_record(tx: &mut Transient, key: &ContentKey, incoming: Node, stale: &[&str]) {
    let path = paths::content(key);
    let before = tx.get(&path).cloned();
    tx.update(&path, empty_content_for(key), |entry| {
        replace_clearing(entry, incoming, stale)
    });
    replies::reconcile(tx, key, before.as_ref(), replies::link_last);
}

/// Handle `DELETE_CONTENT`: drop the entry and unlink it from its parent.
///
/// Replies of the deleted entry are left in place, still pointing at a
/// parent that no longer exists.
pub fn delete_content(tx: &mut Transient, key: &ContentKey) {
    let path = paths::content(key);
    let Some(entry) = tx.get(&path) else {
        debug!(key = %key, "delete of unknown entry; nothing to do");
        return;
    };
    let parent = parent_key_of(entry);
    tx.delete(&path);
    if let Some(parent) = parent {
        replies::unlink(tx, &parent, key);
    }
}

/// Handle `VOTED`: one vote per voter, the latest weight wins.
pub fn voted(tx: &mut Transient, vote: &Voted) {
    let key = ContentKey::new(&vote.author, &vote.permlink);
    ensure_entry(tx, &key);
    let appended = upsert_vote(
        tx.list_mut(&paths::active_votes(&key)),
        &vote.username,
        Node::from(vote.weight),
    );
    debug!(key = %key, voter = %vote.username, appended, "vote recorded");
}

/// Handle `SET_COLLAPSED`. The post is addressed by its raw key string.
pub fn set_collapsed(tx: &mut Transient, op: &SetCollapsed) {
    let path = Path::from([regions::CONTENT, op.post.as_str()]);
    let default = op
        .post
        .parse::<ContentKey>()
        .map(|key| empty_content_for(&key))
        .unwrap_or_else(|_| empty_content());
    let flag = Node::map([(fields::COLLAPSED, Node::from(op.collapsed))]);
    tx.update(&path, default, |entry| shallow_merge(entry, flag));
}
