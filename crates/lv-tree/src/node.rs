//! The tree value model.

use imbl::{OrdMap, OrdSet, Vector};
use lv_types::Path;
use serde_json::Number;

use crate::transient::Transient;

/// One node of a snapshot tree.
///
/// Scalars are stored inline; containers are persistent collections, so a
/// clone is O(1) and a write copies only the O(log n) chunk path it touches
/// inside each container, whatever the container's width.
/// `Set` models membership-only collections (e.g. witness votes) where
/// order carries no meaning and duplicates are impossible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vector<Node>),
    Set(OrdSet<String>),
    Map(OrdMap<String, Node>),
}

impl Node {
    // ---------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------

    pub fn empty_map() -> Self {
        Node::Map(OrdMap::new())
    }

    pub fn empty_list() -> Self {
        Node::List(Vector::new())
    }

    pub fn empty_set() -> Self {
        Node::Set(OrdSet::new())
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Node)>,
        K: Into<String>,
    {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list from its items.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Node::List(items.into_iter().collect())
    }

    /// Build a set from its members.
    pub fn set<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::Set(members.into_iter().map(Into::into).collect())
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vector<Node>> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&OrdSet<String>> {
        match self {
            Node::Set(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrdMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Number of direct children; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Node::List(items) => items.len(),
            Node::Set(members) => members.len(),
            Node::Map(map) => map.len(),
            _ => 0,
        }
    }

    /// Returns `true` for scalars and empty containers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child addressed by a single key.
    ///
    /// Maps are indexed by key, lists by a decimal index. Scalars and sets
    /// have no children.
    pub fn child(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key),
            Node::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// String field of a mapping, or `""` when absent or not a string.
    pub fn str_field(&self, key: &str) -> &str {
        self.child(key).and_then(Node::as_str).unwrap_or_default()
    }

    /// Returns `true` when both nodes are containers sharing the same
    /// storage, i.e. one is an untouched structural copy of the other.
    ///
    /// Two empty containers of the same kind count as shared. Non-empty
    /// lists short enough to be stored inline never do.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::List(a), Node::List(b)) => a.ptr_eq(b) || (a.is_empty() && b.is_empty()),
            (Node::Set(a), Node::Set(b)) => a.ptr_eq(b) || (a.is_empty() && b.is_empty()),
            (Node::Map(a), Node::Map(b)) => a.ptr_eq(b) || (a.is_empty() && b.is_empty()),
            _ => false,
        }
    }

    // ---------------------------------------------------------------
    // Path operations
    // ---------------------------------------------------------------

    /// Node at `path`, or `None` if any segment is missing.
    pub fn get_in(&self, path: &Path) -> Option<&Node> {
        path.segments()
            .iter()
            .try_fold(self, |node, key| node.child(key))
    }

    /// Returns `true` if a node exists at `path`.
    pub fn has_in(&self, path: &Path) -> bool {
        self.get_in(path).is_some()
    }

    /// New tree with `value` written at `path`.
    pub fn set_in(&self, path: &Path, value: Node) -> Node {
        self.with_mutations(|tx| tx.set(path, value))
    }

    /// New tree with the node at `path` replaced by `f(existing)`, or by
    /// `f(default)` when nothing is stored there yet.
    pub fn update_in<F>(&self, path: &Path, default: Node, f: F) -> Node
    where
        F: FnOnce(Node) -> Node,
    {
        self.with_mutations(|tx| tx.update(path, default, f))
    }

    /// New tree without the node at `path`.
    pub fn delete_in(&self, path: &Path) -> Node {
        self.with_mutations(|tx| tx.delete(path))
    }

    /// Run several writes against a staged copy of this tree.
    ///
    /// Container chunks are copied the first time a write reaches them;
    /// later writes in the same scope mutate the copy in place. `self` is never
    /// modified and keeps sharing every untouched subtree with the result.
    pub fn with_mutations<F>(&self, f: F) -> Node
    where
        F: FnOnce(&mut Transient),
    {
        let mut tx = Transient::new(self.clone());
        f(&mut tx);
        tx.into_node()
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(value.into())
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Number(value.into())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::List(items.into_iter().collect())
    }
}

impl From<Vector<Node>> for Node {
    fn from(items: Vector<Node>) -> Self {
        Node::List(items)
    }
}

impl From<OrdMap<String, Node>> for Node {
    fn from(map: OrdMap<String, Node>) -> Self {
        Node::Map(map)
    }
}

impl From<OrdSet<String>> for Node {
    fn from(members: OrdSet<String>) -> Self {
        Node::Set(members)
    }
}
