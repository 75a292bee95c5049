//! Conversions between [`Node`] and `serde_json::Value`.
//!
//! The conversion from JSON is the generic normalization: arrays become
//! lists and objects become mappings. Schema-specific coercions (sets,
//! byte buffers) are applied on top of it by the ingestion layer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::node::Node;

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Set(members) => {
                Value::Array(members.iter().cloned().map(Value::String).collect())
            }
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl Node {
    /// JSON rendering of this tree. Sets render as sorted arrays.
    pub fn to_json(&self) -> Value {
        Value::from(self)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::List(items) => serializer.collect_seq(items.iter()),
            Node::Set(members) => serializer.collect_seq(members.iter()),
            Node::Map(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lv_types::Path;
    use serde_json::json;

    #[test]
    fn arrays_become_lists_and_objects_become_maps() {
        let node = Node::from(json!({
            "author": "a",
            "replies": ["b/p2"],
            "stats": {"votes": 3, "hidden": false},
            "gone": null
        }));
        assert!(node.as_map().is_some());
        assert_eq!(
            node.get_in(&Path::from(["replies"])),
            Some(&Node::list([Node::from("b/p2")]))
        );
        assert_eq!(
            node.get_in(&Path::from(["stats", "votes"])),
            Some(&Node::from(3i64))
        );
        assert!(node.get_in(&Path::from(["gone"])).unwrap().is_null());
    }

    #[test]
    fn sets_render_as_sorted_arrays() {
        let node = Node::map([("witness_votes", Node::set(["zed", "amy"]))]);
        assert_eq!(node.to_json(), json!({"witness_votes": ["amy", "zed"]}));
    }

    #[test]
    fn serialize_matches_to_json() {
        let node = Node::from(json!({"a": [1, 2.5, "x"], "b": {"c": true}}));
        let text = serde_json::to_string(&node).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, node.to_json());
    }

    #[test]
    fn deserialize_from_json_text() {
        let node: Node = serde_json::from_str(r#"{"k": [true, null]}"#).unwrap();
        assert_eq!(
            node,
            Node::map([("k", Node::list([Node::from(true), Node::Null]))])
        );
    }
}
