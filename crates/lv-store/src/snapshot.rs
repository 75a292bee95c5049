//! Read side of the store.

use imbl::OrdSet;
use lv_tree::Node;
use lv_types::{fields, regions, ContentKey, Path};
use serde::Serialize;
use serde_json::Value;

use crate::paths;
use crate::status::FetchStatus;

/// One immutable state of the client.
///
/// Cloning is cheap: every region is shared with the snapshot it was
/// cloned from. Accessors return empty results for records that have not
/// been fetched rather than failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    root: Node,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            root: Node::map([(regions::STATUS, Node::empty_map())]),
        }
    }
}

impl Snapshot {
    /// The initial state: `{status: {}}`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn get(&self, path: &Path) -> Option<&Node> {
        self.root.get_in(path)
    }

    pub fn content(&self, key: &ContentKey) -> Option<&Node> {
        self.get(&paths::content(key))
    }

    /// Keys of the direct replies of `key`, in display order.
    pub fn replies(&self, key: &ContentKey) -> Vec<&str> {
        strings(self.get(&paths::replies(key)))
    }

    pub fn active_votes(&self, key: &ContentKey) -> Vec<&Node> {
        self.get(&paths::active_votes(key))
            .and_then(Node::as_list)
            .map(|votes| votes.iter().collect())
            .unwrap_or_default()
    }

    pub fn account(&self, name: &str) -> Option<&Node> {
        self.get(&paths::account(name))
    }

    pub fn witness_votes(&self, name: &str) -> Option<&OrdSet<String>> {
        self.get(&paths::witness_votes(name)).and_then(Node::as_set)
    }

    /// Content keys listed for a category and sort order.
    pub fn discussion(&self, category: &str, order: &str) -> Vec<&str> {
        strings(self.get(&paths::discussion(category, order)))
    }

    /// Permlinks of `name`'s posts in `category`.
    pub fn account_posts(&self, name: &str, category: &str) -> Vec<&str> {
        strings(self.get(&paths::account_posts(name, category)))
    }

    pub fn fetch_status(&self, category: &str, order: &str) -> Option<FetchStatus> {
        self.get(&paths::status(category, order))
            .and_then(FetchStatus::from_node)
    }

    /// Parameters of an open dialog, or `None` if it is closed.
    pub fn dialog(&self, name: &str) -> Option<&Node> {
        self.get(&paths::dialog(name).child(fields::PARAMS))
    }

    pub fn meta(&self, id: &str) -> Option<&Node> {
        self.get(&paths::meta(id))
    }

    /// Whether `region` is physically shared with `other`'s.
    pub fn shares_region(&self, other: &Snapshot, region: &str) -> bool {
        match (self.root.child(region), other.root.child(region)) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }
}

fn strings(node: Option<&Node>) -> Vec<&str> {
    node.and_then(Node::as_list)
        .map(|items| items.iter().filter_map(Node::as_str).collect())
        .unwrap_or_default()
}
