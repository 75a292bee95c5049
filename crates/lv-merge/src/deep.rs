//! Mapping merges: deep, shallow, and replace-clearing-stale.

use lv_tree::Node;

/// Recursively combine `incoming` into `existing`.
///
/// - mapping + mapping: merged key by key; keys absent from `incoming` are
///   kept as they are
/// - list + list: merged index by index; items past the end of the shorter
///   list are kept from whichever side has them, so an empty incoming list
///   leaves the existing one untouched
/// - set + set: union
/// - anything else (scalars, mismatched kinds): `incoming` wins
///
/// Index-wise list merging can repeat a key that moved position; callers
/// that keep key lists unique run [`dedup`](crate::dedup) afterwards.
pub fn deep_merge(existing: Node, incoming: Node) -> Node {
    let mut merged = existing;
    deep_merge_into(&mut merged, incoming);
    merged
}

/// In-place form of [`deep_merge`]. Only the containers that actually
/// receive new data are copied.
pub fn deep_merge_into(target: &mut Node, incoming: Node) {
    if target.ptr_eq(&incoming) {
        return;
    }
    match (target, incoming) {
        (Node::Map(existing), Node::Map(incoming)) => {
            if existing.is_empty() {
                *existing = incoming;
                return;
            }
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => deep_merge_into(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Node::List(existing), Node::List(incoming)) => {
            if existing.is_empty() {
                *existing = incoming;
                return;
            }
            for (index, value) in incoming.into_iter().enumerate() {
                if index < existing.len() {
                    deep_merge_into(&mut existing[index], value);
                } else {
                    existing.push_back(value);
                }
            }
        }
        (Node::Set(existing), Node::Set(incoming)) => {
            if !incoming.is_subset(&*existing) {
                for member in incoming.iter() {
                    existing.insert(member.clone());
                }
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// One-level merge: top-level keys of `incoming` overwrite those of
/// `existing`, nested containers are taken from `incoming` as a whole.
pub fn shallow_merge(existing: Node, incoming: Node) -> Node {
    match (existing, incoming) {
        (Node::Map(mut existing), Node::Map(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key, value);
            }
            Node::Map(existing)
        }
        (_, incoming) => incoming,
    }
}

/// Drop `stale` fields from `existing`, then deep-merge `incoming`.
///
/// Used when a full object supersedes a cached stub whose listed fields
/// must not survive (locally recorded votes, for example).
pub fn replace_clearing(existing: Node, incoming: Node, stale: &[&str]) -> Node {
    let cleared = match existing {
        Node::Map(mut map) if stale.iter().any(|field| map.contains_key(*field)) => {
            for field in stale {
                map.remove(*field);
            }
            Node::Map(map)
        }
        other => other,
    };
    deep_merge(cleared, incoming)
}
