//! Ordered-list insertion with duplicate suppression.
//!
//! Index lists (replies, listings, feeds) hold each key at most once. The
//! single-item forms scan the list; the bulk forms build a membership set
//! first so a page of `m` keys costs O(n + m) instead of O(n * m).

use std::collections::HashSet;

use imbl::Vector;
use lv_tree::Node;

/// Push `item` at the end unless already present. Returns `true` if inserted.
pub fn dedup_append(list: &mut Vector<Node>, item: Node) -> bool {
    if list.iter().any(|existing| existing == &item) {
        return false;
    }
    list.push_back(item);
    true
}

/// Insert `item` at the front unless already present. Returns `true` if
/// inserted.
pub fn dedup_prepend(list: &mut Vector<Node>, item: Node) -> bool {
    if list.iter().any(|existing| existing == &item) {
        return false;
    }
    list.push_front(item);
    true
}

/// Append every item not yet present, in arrival order. Duplicates within
/// `items` are also suppressed. Returns the number of items inserted.
pub fn append_unique<I>(list: &mut Vector<Node>, items: I) -> usize
where
    I: IntoIterator<Item = Node>,
{
    let mut seen: HashSet<Node> = list.iter().cloned().collect();
    let before = list.len();
    for item in items {
        if seen.insert(item.clone()) {
            list.push_back(item);
        }
    }
    list.len() - before
}

/// Prepend every item not yet present, one at a time, so the last new item
/// ends up first (most recent first). Returns the number of items inserted.
pub fn prepend_unique<I>(list: &mut Vector<Node>, items: I) -> usize
where
    I: IntoIterator<Item = Node>,
{
    let mut seen: HashSet<Node> = list.iter().cloned().collect();
    let before = list.len();
    for item in items {
        if seen.insert(item.clone()) {
            list.push_front(item);
        }
    }
    list.len() - before
}

/// Remove every occurrence of `item`. Returns the number removed.
pub fn remove_all(list: &mut Vector<Node>, item: &Node) -> usize {
    if !list.iter().any(|existing| existing == item) {
        return 0;
    }
    let before = list.len();
    list.retain(|existing| existing != item);
    before - list.len()
}

/// Drop repeated items, keeping the first occurrence of each. Returns the
/// number removed. A list without repeats is left shared.
pub fn dedup(list: &mut Vector<Node>) -> usize {
    let repeated = {
        let mut seen = HashSet::with_capacity(list.len());
        !list.iter().all(|item| seen.insert(item))
    };
    if !repeated {
        return 0;
    }
    let mut kept = HashSet::with_capacity(list.len());
    let before = list.len();
    list.retain(|item| kept.insert(item.clone()));
    before - list.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keys(list: &Vector<Node>) -> Vec<&str> {
        list.iter().filter_map(Node::as_str).collect()
    }

    fn nodes(items: &[&str]) -> Vector<Node> {
        items.iter().map(|s| Node::from(*s)).collect()
    }

    #[test]
    fn append_skips_present() {
        let mut list = nodes(&["a/1"]);
        assert!(dedup_append(&mut list, Node::from("a/2")));
        assert!(!dedup_append(&mut list, Node::from("a/1")));
        assert_eq!(keys(&list), ["a/1", "a/2"]);
    }

    #[test]
    fn prepend_skips_present() {
        let mut list = nodes(&["a/1"]);
        assert!(dedup_prepend(&mut list, Node::from("a/2")));
        assert!(!dedup_prepend(&mut list, Node::from("a/2")));
        assert_eq!(keys(&list), ["a/2", "a/1"]);
    }

    #[test]
    fn append_unique_keeps_arrival_order() {
        let mut list = nodes(&["a/1", "a/2"]);
        let inserted = append_unique(&mut list, nodes(&["a/2", "a/3", "a/4", "a/3"]));
        assert_eq!(inserted, 2);
        assert_eq!(keys(&list), ["a/1", "a/2", "a/3", "a/4"]);
    }

    #[test]
    fn prepend_unique_puts_latest_first() {
        let mut list = nodes(&["old/1"]);
        let inserted = prepend_unique(&mut list, nodes(&["n/1", "old/1", "n/2", "n/1"]));
        assert_eq!(inserted, 2);
        assert_eq!(keys(&list), ["n/2", "n/1", "old/1"]);
    }

    #[test]
    fn prepend_unique_matches_repeated_single_prepend() {
        let incoming = nodes(&["x/1", "x/2", "x/1", "x/3"]);
        let mut bulk = nodes(&["x/2"]);
        let mut single = bulk.clone();
        prepend_unique(&mut bulk, incoming.clone());
        for item in incoming {
            dedup_prepend(&mut single, item);
        }
        assert_eq!(bulk, single);
    }

    #[test]
    fn remove_all_filters() {
        let mut list = nodes(&["a/1", "a/2", "a/1"]);
        assert_eq!(remove_all(&mut list, &Node::from("a/1")), 2);
        assert_eq!(keys(&list), ["a/2"]);
        assert_eq!(remove_all(&mut list, &Node::from("zzz")), 0);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut list = nodes(&["b/2", "a/1", "b/2", "c/3", "a/1"]);
        assert_eq!(dedup(&mut list), 2);
        assert_eq!(keys(&list), ["b/2", "a/1", "c/3"]);
    }

    #[test]
    fn dedup_without_repeats_leaves_list_shared() {
        let source: Vector<Node> = (0..200i64).map(Node::from).collect();
        let mut list = source.clone();
        assert_eq!(dedup(&mut list), 0);
        assert!(list.ptr_eq(&source));
    }

    proptest! {
        #[test]
        fn bulk_inserts_never_duplicate(
            pages in proptest::collection::vec(proptest::collection::vec("[a-e]/[0-3]", 0..8), 1..6),
            front in any::<bool>(),
        ) {
            let mut list = Vector::new();
            for page in pages {
                let page: Vec<Node> = page.into_iter().map(Node::from).collect();
                if front {
                    prepend_unique(&mut list, page);
                } else {
                    append_unique(&mut list, page);
                }
                let distinct: HashSet<&Node> = list.iter().collect();
                prop_assert_eq!(distinct.len(), list.len());
            }
        }
    }
}
