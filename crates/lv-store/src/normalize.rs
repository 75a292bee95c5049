//! Entity normalizers: wire payloads to canonical tree shapes.
//!
//! Every payload is normalized exactly once, on ingestion, by the function
//! for its wire schema. Downstream code only ever sees the canonical shape:
//!
//! - content records: text fields decoded from byte buffers, `replies` and
//!   `active_votes` as lists
//! - account records: `witness_votes` as a set, everything else generic
//! - state fragments: each region routed to its record normalizer by
//!   [`normalize_region`]

use lv_tree::Node;
use lv_types::{fields, regions, ContentKey, Path};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Text that may arrive as a string or as a raw byte buffer.
///
/// Buffers are accepted as a bare byte array or as the
/// `{"type": "Buffer", "data": [...]}` object produced by JavaScript
/// clients, and are decoded as lossy UTF-8.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Plain(String),
    Bytes(Vec<u8>),
    Buffer {
        #[serde(rename = "type")]
        kind: String,
        data: Vec<u8>,
    },
}

impl Text {
    /// Decoded string form.
    pub fn into_string(self) -> String {
        match self {
            Text::Plain(text) => text,
            Text::Bytes(bytes) | Text::Buffer { data: bytes, .. } => {
                String::from_utf8_lossy(&bytes).into_owned()
            }
        }
    }

    /// Decode a JSON value if it has one of the text shapes.
    pub fn decode(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Array(_) | Value::Object(_) => match Text::deserialize(value).ok()? {
                Text::Buffer { kind, .. } if kind != "Buffer" => None,
                text => Some(text.into_string()),
            },
            _ => None,
        }
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::Plain(text.to_string())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Text::Plain(text)
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Key of a content record, if it names both an author and a permlink.
pub fn content_key_of(record: &Value) -> Option<ContentKey> {
    let author = record.get(fields::AUTHOR)?.as_str()?;
    let permlink = record.get(fields::PERMLINK)?.as_str()?;
    if author.is_empty() || permlink.is_empty() {
        return None;
    }
    Some(ContentKey::new(author, permlink))
}

/// The default shape of a content entry nobody has fetched yet.
///
/// Partial updates (a vote, a reply link) can target it without first
/// hydrating the full record.
pub fn empty_content() -> Node {
    Node::map([
        (fields::AUTHOR, Node::from("")),
        (fields::PERMLINK, Node::from("")),
        (fields::PARENT_AUTHOR, Node::from("")),
        (fields::PARENT_PERMLINK, Node::from("")),
        (fields::TITLE, Node::from("")),
        (fields::BODY, Node::from("")),
        (fields::REPLIES, Node::empty_list()),
        (fields::ACTIVE_VOTES, Node::empty_list()),
    ])
}

/// [`empty_content`] carrying its own identity.
pub fn empty_content_for(key: &ContentKey) -> Node {
    lv_merge::shallow_merge(
        empty_content(),
        Node::map([
            (fields::AUTHOR, Node::from(key.author())),
            (fields::PERMLINK, Node::from(key.permlink())),
        ]),
    )
}

/// Normalize a full or listing content record.
pub fn normalize_content(record: Value) -> Node {
    match record {
        Value::Object(mut map) => {
            for field in [fields::TITLE, fields::BODY] {
                if let Some(raw) = map.get(field) {
                    if let Some(text) = Text::decode(raw) {
                        map.insert(field.to_string(), Value::String(text));
                    }
                }
            }
            Node::from(Value::Object(map))
        }
        other => Node::from(other),
    }
}

/// Parent key recorded on a content entry, if any.
pub fn parent_key_of(entry: &Node) -> Option<ContentKey> {
    ContentKey::parent(
        entry.str_field(fields::PARENT_AUTHOR),
        entry.str_field(fields::PARENT_PERMLINK),
    )
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Name of an account record.
pub fn account_name_of(record: &Value) -> Option<&str> {
    record
        .get(fields::NAME)?
        .as_str()
        .filter(|name| !name.is_empty())
}

/// Normalize an account record: `witness_votes` becomes a set.
pub fn normalize_account(record: Value) -> Node {
    match record {
        Value::Object(mut map) => {
            let votes = map.remove(fields::WITNESS_VOTES);
            let mut node = Node::from(Value::Object(map));
            if let Some(votes) = votes {
                let members = votes
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                node = node.set_in(&Path::from(fields::WITNESS_VOTES), Node::set(members));
            }
            node
        }
        other => Node::from(other),
    }
}

// ---------------------------------------------------------------------------
// State fragments
// ---------------------------------------------------------------------------

/// Normalize one region of a bulk state fragment. `accounts` and `content`
/// entries go through their record normalizers; any other region is
/// converted generically.
pub fn normalize_region(region: &str, value: Value) -> Node {
    match (region, value) {
        (regions::ACCOUNTS, Value::Object(accounts)) => normalize_records(accounts, normalize_account),
        (regions::CONTENT, Value::Object(content)) => normalize_records(content, normalize_content),
        (_, other) => Node::from(other),
    }
}

fn normalize_records(records: Map<String, Value>, normalize: fn(Value) -> Node) -> Node {
    Node::map(
        records
            .into_iter()
            .map(|(key, record)| (key, normalize(record))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_shapes_decode() {
        assert_eq!(Text::decode(&json!("hi")), Some("hi".into()));
        assert_eq!(Text::decode(&json!([104, 105])), Some("hi".into()));
        assert_eq!(
            Text::decode(&json!({"type": "Buffer", "data": [114, 111, 111, 116]})),
            Some("root".into())
        );
        assert_eq!(Text::decode(&json!(42)), None);
        assert_eq!(Text::decode(&json!({"unrelated": true})), None);
        assert_eq!(Text::decode(&json!({"type": "Other", "data": [1]})), None);
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let text: Text = serde_json::from_value(json!([0xff, 0x61])).unwrap();
        assert_eq!(text.into_string(), "\u{fffd}a");
    }

    #[test]
    fn content_key_requires_both_fields() {
        assert_eq!(
            content_key_of(&json!({"author": "a", "permlink": "p"})),
            Some(ContentKey::new("a", "p"))
        );
        assert_eq!(content_key_of(&json!({"author": "a"})), None);
        assert_eq!(content_key_of(&json!({"author": "", "permlink": "p"})), None);
        assert_eq!(content_key_of(&json!("a/p")), None);
    }

    #[test]
    fn content_body_buffer_becomes_text() {
        let node = normalize_content(json!({
            "author": "a",
            "permlink": "p",
            "body": {"type": "Buffer", "data": [104, 105]},
            "active_votes": [{"voter": "x", "percent": 100}]
        }));
        assert_eq!(node.str_field("body"), "hi");
        assert_eq!(
            node.get_in(&Path::from(["active_votes"])).unwrap().len(),
            1
        );
    }

    #[test]
    fn empty_content_for_carries_identity() {
        let node = empty_content_for(&ContentKey::new("b", "p0"));
        assert_eq!(node.str_field("author"), "b");
        assert_eq!(node.str_field("permlink"), "p0");
        assert_eq!(node.get_in(&Path::from(["replies"])), Some(&Node::empty_list()));
        assert!(parent_key_of(&node).is_none());
    }

    #[test]
    fn account_witness_votes_become_set() {
        let node = normalize_account(json!({
            "name": "x",
            "witness_votes": ["w2", "w1", "w2"],
            "posts": ["p1", "p2"]
        }));
        assert_eq!(
            node.get_in(&Path::from(["witness_votes"])),
            Some(&Node::set(["w1", "w2"]))
        );
        assert_eq!(
            node.get_in(&Path::from(["posts"])),
            Some(&Node::list([Node::from("p1"), Node::from("p2")]))
        );
    }

    #[test]
    fn account_name() {
        assert_eq!(account_name_of(&json!({"name": "x"})), Some("x"));
        assert_eq!(account_name_of(&json!({"name": ""})), None);
        assert_eq!(account_name_of(&json!({})), None);
    }

    #[test]
    fn state_regions_route_to_record_normalizers() {
        let accounts = normalize_region(
            regions::ACCOUNTS,
            json!({"x": {"name": "x", "witness_votes": ["w"]}}),
        );
        assert_eq!(
            accounts.get_in(&Path::from(["x", "witness_votes"])),
            Some(&Node::set(["w"]))
        );
        let content = normalize_region(
            regions::CONTENT,
            json!({"a/p": {"author": "a", "permlink": "p", "body": [104]}}),
        );
        assert_eq!(content.get_in(&Path::from(["a/p", "body"])), Some(&Node::from("h")));
        let props = normalize_region("props", json!({"head_block": 7}));
        assert_eq!(
            props.get_in(&Path::from(["head_block"])),
            Some(&Node::from(7i64))
        );
    }
}
