//! Batch mutation scope over a tree.

use std::mem;

use imbl::{OrdSet, Vector};
use lv_types::Path;
use tracing::warn;

use crate::node::Node;

/// A tree being edited inside [`Node::with_mutations`].
///
/// Each chunk on a written path is copied at most once per scope: the first
/// write finds it shared with the source tree and copies it, later writes
/// find it uniquely owned and edit it in place. This keeps bulk edits
/// (ingesting a page of listings, for example) linear instead of copying the
/// same ancestors once per item.
#[derive(Debug)]
pub struct Transient {
    root: Node,
}

impl Transient {
    pub(crate) fn new(root: Node) -> Self {
        Self { root }
    }

    /// Finish the scope and return the new tree.
    pub fn into_node(self) -> Node {
        self.root
    }

    pub fn get(&self, path: &Path) -> Option<&Node> {
        self.root.get_in(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.root.has_in(path)
    }

    /// Write `value` at `path`, creating intermediate mappings as needed.
    ///
    /// Segments are resolved against whatever already sits on the path:
    ///
    /// - a decimal segment under a list addresses that item; an index at or
    ///   past the end appends one item instead of padding, so the written
    ///   value may land at a smaller index than requested
    /// - any other segment under a list replaces the whole list with a
    ///   mapping holding only the new key (logged at `warn`)
    /// - a segment under a scalar or set replaces it with a mapping
    pub fn set(&mut self, path: &Path, value: Node) {
        *self.slot_mut(path) = value;
    }

    /// Write `value` at `path` only if nothing is stored there yet.
    ///
    /// Returns `true` if the value was written.
    pub fn set_if_absent(&mut self, path: &Path, value: Node) -> bool {
        if self.contains(path) {
            return false;
        }
        self.set(path, value);
        true
    }

    /// Replace the node at `path` with `f(existing)`, or `f(default)` when
    /// the path is absent.
    pub fn update<F>(&mut self, path: &Path, default: Node, f: F)
    where
        F: FnOnce(Node) -> Node,
    {
        let present = self.contains(path);
        let slot = self.slot_mut(path);
        let current = if present {
            mem::take(slot)
        } else {
            default
        };
        *slot = f(current);
    }

    /// Remove the node at `path`. Missing paths are left untouched, so the
    /// containers along them stay shared with the source tree.
    pub fn delete(&mut self, path: &Path) {
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };
        if !self.contains(path) {
            return;
        }
        match descend(&mut self.root, parents) {
            Node::Map(map) => {
                map.remove(last.as_str());
            }
            Node::List(items) => {
                if let Ok(index) = last.parse::<usize>() {
                    if index < items.len() {
                        items.remove(index);
                    }
                }
            }
            _ => {}
        }
    }

    /// Mutable access to the node at `path`, creating it as `Null` (and any
    /// missing ancestors as mappings) when absent. Segments resolve as in
    /// [`Transient::set`].
    pub fn slot_mut(&mut self, path: &Path) -> &mut Node {
        descend(&mut self.root, path.segments())
    }

    /// Mutable access to the list at `path`.
    ///
    /// A missing or non-list node is replaced by an empty list first.
    pub fn list_mut(&mut self, path: &Path) -> &mut Vector<Node> {
        ensure_list(self.slot_mut(path))
    }

    /// Mutable access to the set at `path`.
    ///
    /// A list of strings is converted to a set of its members; any other
    /// missing or non-set node is replaced by an empty set.
    pub fn set_mut(&mut self, path: &Path) -> &mut OrdSet<String> {
        ensure_set(self.slot_mut(path))
    }
}

fn ensure_list(slot: &mut Node) -> &mut Vector<Node> {
    match slot {
        Node::List(items) => items,
        other => {
            *other = Node::empty_list();
            ensure_list(other)
        }
    }
}

fn ensure_set(slot: &mut Node) -> &mut OrdSet<String> {
    match slot {
        Node::Set(members) => members,
        other => {
            let members: OrdSet<String> = other
                .as_list()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|n| n.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            *other = Node::from(members);
            ensure_set(other)
        }
    }
}

/// Walk `path` from `node`, copying shared chunks on the way down.
fn descend<'a>(node: &'a mut Node, path: &[String]) -> &'a mut Node {
    match path.split_first() {
        None => node,
        Some((key, rest)) => descend(child_mut(node, key), rest),
    }
}

/// How a segment resolves against the node it is applied to.
enum Step {
    Item(usize),
    Append,
    Key,
}

fn child_mut<'a>(node: &'a mut Node, key: &str) -> &'a mut Node {
    let step = match &*node {
        Node::List(items) => match key.parse::<usize>() {
            Ok(index) if index < items.len() => Step::Item(index),
            Ok(_) => Step::Append,
            Err(_) => {
                warn!(segment = key, len = items.len(), "non-index segment replaces list with a mapping");
                Step::Key
            }
        },
        _ => Step::Key,
    };
    match (node, step) {
        (Node::List(items), Step::Item(index)) => &mut items[index],
        (Node::List(items), Step::Append) => {
            items.push_back(Node::Null);
            let last = items.len() - 1;
            &mut items[last]
        }
        (Node::Map(map), _) => map.entry(key.to_string()).or_insert(Node::Null),
        (other, _) => {
            *other = Node::empty_map();
            child_mut(other, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_writes_copy_each_container_once() {
        let source = Node::map([
            ("content", Node::empty_map()),
            ("accounts", Node::empty_map()),
        ]);
        let next = source.with_mutations(|tx| {
            for i in 0..50 {
                let key = format!("a/p{i}");
                tx.set(&Path::from(["content", key.as_str(), "title"]), Node::from("t"));
            }
        });

        assert_eq!(source.get_in(&Path::from(["content"])).unwrap().len(), 0);
        assert_eq!(next.get_in(&Path::from(["content"])).unwrap().len(), 50);
        assert!(source
            .get_in(&Path::from(["accounts"]))
            .unwrap()
            .ptr_eq(next.get_in(&Path::from(["accounts"])).unwrap()));
    }

    #[test]
    fn reads_inside_scope_see_staged_writes() {
        let source = Node::empty_map();
        source.with_mutations(|tx| {
            let path = Path::from(["a", "b"]);
            assert!(!tx.contains(&path));
            tx.set(&path, Node::from(1i64));
            assert_eq!(tx.get(&path), Some(&Node::from(1i64)));
        });
    }

    #[test]
    fn set_if_absent_keeps_existing() {
        let source = Node::map([("k", Node::from("rich"))]);
        let next = source.with_mutations(|tx| {
            assert!(!tx.set_if_absent(&Path::from(["k"]), Node::from("thin")));
            assert!(tx.set_if_absent(&Path::from(["j"]), Node::from("new")));
        });
        assert_eq!(next.get_in(&Path::from(["k"])), Some(&Node::from("rich")));
        assert_eq!(next.get_in(&Path::from(["j"])), Some(&Node::from("new")));
    }

    #[test]
    fn list_mut_creates_and_edits_in_place() {
        let source = Node::empty_map();
        let path = Path::from(["discussion_idx", "", "trending"]);
        let next = source.with_mutations(|tx| {
            tx.list_mut(&path).push_back(Node::from("a/p1"));
            tx.list_mut(&path).push_back(Node::from("b/p2"));
        });
        assert_eq!(next.get_in(&path).unwrap().len(), 2);
    }

    #[test]
    fn list_mut_does_not_leak_into_source() {
        let path = Path::from(["xs"]);
        let source = Node::map([("xs", Node::list([Node::from("a")]))]);
        let next = source.with_mutations(|tx| tx.list_mut(&path).push_back(Node::from("b")));
        assert_eq!(source.get_in(&path).unwrap().len(), 1);
        assert_eq!(next.get_in(&path).unwrap().len(), 2);
    }

    #[test]
    fn set_mut_converts_string_list() {
        let path = Path::from(["votes"]);
        let source = Node::map([(
            "votes",
            Node::list([Node::from("w1"), Node::from("w2"), Node::from("w1")]),
        )]);
        let next = source.with_mutations(|tx| {
            tx.set_mut(&path).insert("w3".to_string());
        });
        assert_eq!(next.get_in(&path), Some(&Node::set(["w1", "w2", "w3"])));
    }

    #[test]
    fn delete_root_path_is_noop() {
        let source = Node::map([("a", Node::from(1i64))]);
        let next = source.delete_in(&Path::root());
        assert_eq!(next, source);
    }

    #[test]
    fn writes_past_list_end_append_one_item_each() {
        let path = Path::from(["xs"]);
        let source = Node::map([("xs", Node::empty_list())]);
        let next = source.with_mutations(|tx| {
            for index in ["7", "18446744073709551615"] {
                tx.set(&path.child(index), Node::from(index));
            }
        });
        let items = next.get_in(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.child("0"), Some(&Node::from("7")));
        assert_eq!(items.child("1"), Some(&Node::from("18446744073709551615")));
    }
}
