//! The operation vocabulary: one variant per atomic transition.
//!
//! Operations travel as `{"type": "<KIND>", "payload": {...}}`. Payload
//! structs name the required fields; optional fields default so a sparse
//! notification decodes as readily as a full record.

use std::fmt;
use std::sync::Arc;

use lv_merge::MergePolicy;
use lv_tree::Node;
use lv_types::{ContentKey, Path};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::normalize::Text;

/// A tagged update submitted to the reducer.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// Deep-merge an arbitrary snapshot fragment (bulk hydration).
    ReceiveState(Value),
    ReceiveAccount(ReceiveAccount),
    ReceiveComment(ReceiveComment),
    ReceiveContent(ReceiveContent),
    LinkReply(LinkReply),
    UpdateAccountWitnessVote(WitnessVote),
    DeleteContent(DeleteContent),
    Voted(Voted),
    FetchingData(FetchingData),
    ReceiveData(ReceiveData),
    ReceiveRecentPosts(ReceiveRecentPosts),
    SetCollapsed(SetCollapsed),
    RequestMeta(RequestMeta),
    ReceiveMeta(ReceiveMeta),
    SetMetaData(SetMetaData),
    ClearMeta(ClearMeta),
    ClearMetaElement(ClearMetaElement),
    FetchJsonResult(FetchJsonResult),
    /// Debug/administrative write at an arbitrary path.
    Set(SetPath),
    /// Debug/administrative removal at an arbitrary path.
    Remove(RemovePath),
    /// Debug/administrative update at an arbitrary path. Carries a closure,
    /// so it is only constructible in-process.
    #[serde(skip_deserializing)]
    Update(UpdatePath),
    ShowDialog(ShowDialog),
    HideDialog(HideDialog),
}

impl Operation {
    /// Decode a wire operation.
    pub fn from_json(value: Value) -> StoreResult<Self> {
        if value.get("type").and_then(Value::as_str) == Some("UPDATE") {
            return Err(StoreError::InProcessOnly("UPDATE".into()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decode a wire operation from JSON text.
    pub fn from_json_str(text: &str) -> StoreResult<Self> {
        Self::from_json(serde_json::from_str(text)?)
    }

    /// Wire name of the operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::ReceiveState(_) => "RECEIVE_STATE",
            Operation::ReceiveAccount(_) => "RECEIVE_ACCOUNT",
            Operation::ReceiveComment(_) => "RECEIVE_COMMENT",
            Operation::ReceiveContent(_) => "RECEIVE_CONTENT",
            Operation::LinkReply(_) => "LINK_REPLY",
            Operation::UpdateAccountWitnessVote(_) => "UPDATE_ACCOUNT_WITNESS_VOTE",
            Operation::DeleteContent(_) => "DELETE_CONTENT",
            Operation::Voted(_) => "VOTED",
            Operation::FetchingData(_) => "FETCHING_DATA",
            Operation::ReceiveData(_) => "RECEIVE_DATA",
            Operation::ReceiveRecentPosts(_) => "RECEIVE_RECENT_POSTS",
            Operation::SetCollapsed(_) => "SET_COLLAPSED",
            Operation::RequestMeta(_) => "REQUEST_META",
            Operation::ReceiveMeta(_) => "RECEIVE_META",
            Operation::SetMetaData(_) => "SET_META_DATA",
            Operation::ClearMeta(_) => "CLEAR_META",
            Operation::ClearMetaElement(_) => "CLEAR_META_ELEMENT",
            Operation::FetchJsonResult(_) => "FETCH_JSON_RESULT",
            Operation::Set(_) => "SET",
            Operation::Remove(_) => "REMOVE",
            Operation::Update(_) => "UPDATE",
            Operation::ShowDialog(_) => "SHOW_DIALOG",
            Operation::HideDialog(_) => "HIDE_DIALOG",
        }
    }

    /// The merge policy governing the operation's primary write.
    pub fn policy(&self) -> MergePolicy {
        match self {
            Operation::ReceiveState(_)
            | Operation::ReceiveAccount(_)
            | Operation::ReceiveComment(_) => MergePolicy::DeepMerge,
            Operation::ReceiveContent(_) => MergePolicy::ReplaceClearingStale,
            Operation::LinkReply(_) | Operation::ReceiveData(_) => MergePolicy::AppendUnique,
            Operation::ReceiveRecentPosts(_) => MergePolicy::PrependUnique,
            Operation::UpdateAccountWitnessVote(_) => MergePolicy::SetEdit,
            Operation::Voted(_) => MergePolicy::VoteUpsert,
            Operation::SetCollapsed(_) | Operation::ReceiveMeta(_) => MergePolicy::ShallowMerge,
            Operation::FetchingData(_)
            | Operation::RequestMeta(_)
            | Operation::SetMetaData(_)
            | Operation::FetchJsonResult(_)
            | Operation::Set(_)
            | Operation::ShowDialog(_) => MergePolicy::Replace,
            Operation::DeleteContent(_)
            | Operation::ClearMeta(_)
            | Operation::ClearMetaElement(_)
            | Operation::Remove(_)
            | Operation::HideDialog(_) => MergePolicy::Remove,
            Operation::Update(_) => MergePolicy::Update,
        }
    }
}

// ---------------------------------------------------------------------------
// Content and accounts
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct ReceiveAccount {
    pub account: Value,
}

/// A comment created or edited on chain.
#[derive(Clone, Debug, Deserialize)]
pub struct ReceiveComment {
    pub author: String,
    pub permlink: String,
    pub body: Text,
    #[serde(default)]
    pub title: Option<Text>,
    #[serde(default)]
    pub parent_author: Option<String>,
    #[serde(default)]
    pub parent_permlink: Option<String>,
}

impl ReceiveComment {
    pub fn key(&self) -> ContentKey {
        ContentKey::new(&self.author, &self.permlink)
    }
}

/// A full content object fetched from the ledger.
#[derive(Clone, Debug, Deserialize)]
pub struct ReceiveContent {
    pub content: Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LinkReply {
    pub author: String,
    pub permlink: String,
    #[serde(default)]
    pub parent_author: String,
    #[serde(default)]
    pub parent_permlink: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WitnessVote {
    pub account: String,
    pub witness: String,
    pub approve: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeleteContent {
    pub author: String,
    pub permlink: String,
}

/// A vote notification; `weight` is recorded as the vote's `percent`.
#[derive(Clone, Debug, Deserialize)]
pub struct Voted {
    pub username: String,
    pub author: String,
    pub permlink: String,
    pub weight: i64,
}

// ---------------------------------------------------------------------------
// Listings and fetch status
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct FetchingData {
    pub order: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// One fetched page of a listing.
#[derive(Clone, Debug, Deserialize)]
pub struct ReceiveData {
    pub data: Vec<Value>,
    pub order: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub permlink: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReceiveRecentPosts {
    pub data: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Ephemeral UI state
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct SetCollapsed {
    /// Content key (`author/permlink`) of the post.
    pub post: String,
    pub collapsed: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RequestMeta {
    pub id: String,
    pub link: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReceiveMeta {
    pub id: String,
    pub meta: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SetMetaData {
    pub id: String,
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClearMeta {
    pub id: String,
}

/// Removable elements of a form's link metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaElement {
    Description,
    Image,
}

impl MetaElement {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaElement::Description => "description",
            MetaElement::Image => "image",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClearMetaElement {
    #[serde(rename = "formId")]
    pub form_id: String,
    pub element: MetaElement,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FetchJsonResult {
    pub id: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ShowDialog {
    pub name: String,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HideDialog {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Generic path operations
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct SetPath {
    pub key: Path,
    #[serde(default)]
    pub value: Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RemovePath {
    pub key: Path,
}

#[derive(Clone, Debug)]
pub struct UpdatePath {
    pub key: Path,
    /// Value handed to the updater when nothing is stored at `key`.
    pub not_set: Node,
    pub updater: Updater,
}

/// Function applied by an [`Operation::Update`].
#[derive(Clone)]
pub struct Updater(Arc<dyn Fn(Node) -> Node + Send + Sync>);

impl Updater {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Node) -> Node + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, node: Node) -> Node {
        (self.0)(node)
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Updater(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_receive_comment_with_buffer_body() {
        let op = Operation::from_json(json!({
            "type": "RECEIVE_COMMENT",
            "payload": {
                "author": "a",
                "permlink": "p1",
                "parent_author": "b",
                "parent_permlink": "p0",
                "body": {"type": "Buffer", "data": [104, 105]}
            }
        }))
        .unwrap();
        match op {
            Operation::ReceiveComment(c) => {
                assert_eq!(c.key(), ContentKey::new("a", "p1"));
                assert_eq!(c.body.into_string(), "hi");
                assert!(c.title.is_none());
            }
            other => panic!("expected ReceiveComment, got {other:?}"),
        }
    }

    #[test]
    fn decode_witness_vote_kind() {
        let op = Operation::from_json(json!({
            "type": "UPDATE_ACCOUNT_WITNESS_VOTE",
            "payload": {"account": "x", "witness": "w", "approve": true}
        }))
        .unwrap();
        assert_eq!(op.kind(), "UPDATE_ACCOUNT_WITNESS_VOTE");
        assert_eq!(op.policy(), MergePolicy::SetEdit);
    }

    #[test]
    fn decode_receive_state_takes_any_fragment() {
        let op = Operation::from_json_str(
            r#"{"type": "RECEIVE_STATE", "payload": {"props": {"head_block": 1}}}"#,
        )
        .unwrap();
        assert_eq!(op.policy(), MergePolicy::DeepMerge);
    }

    #[test]
    fn decode_set_with_string_key() {
        let op = Operation::from_json(json!({
            "type": "SET",
            "payload": {"key": "debug", "value": {"on": true}}
        }))
        .unwrap();
        match op {
            Operation::Set(set) => assert_eq!(set.key, Path::from(["debug"])),
            other => panic!("expected Set, got {other:?}"),
        }
    }

    #[test]
    fn decode_clear_meta_element() {
        let op = Operation::from_json(json!({
            "type": "CLEAR_META_ELEMENT",
            "payload": {"formId": "f1", "element": "image"}
        }))
        .unwrap();
        match op {
            Operation::ClearMetaElement(clear) => {
                assert_eq!(clear.form_id, "f1");
                assert_eq!(clear.element, MetaElement::Image);
            }
            other => panic!("expected ClearMetaElement, got {other:?}"),
        }
    }

    #[test]
    fn update_is_rejected_on_the_wire() {
        let err = Operation::from_json(json!({
            "type": "UPDATE",
            "payload": {"key": ["x"]}
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::InProcessOnly(_)));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = Operation::from_json(json!({
            "type": "VOTED",
            "payload": {"username": "v", "author": "a", "permlink": "p"}
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidOperation(_)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Operation::from_json(json!({"type": "FETCH_JSON", "payload": {}})).is_err());
    }

    #[test]
    fn updater_applies() {
        let updater = Updater::new(|n| Node::from(n.as_i64().unwrap_or(0) * 2));
        assert_eq!(updater.apply(Node::from(21i64)), Node::from(42i64));
        assert_eq!(format!("{updater:?}"), "Updater(..)");
    }
}
