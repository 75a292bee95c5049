//! Client-side state: link metadata, dialogs, and raw fetch results.
//!
//! None of it comes from the ledger; it is kept in the same snapshot so a
//! single transition function covers the whole client.

use lv_merge::shallow_merge;
use lv_tree::{Node, Transient};
use lv_types::{fields, Path};
use serde_json::{Map, Value};

use crate::operation::{ClearMetaElement, FetchJsonResult, ReceiveMeta, RequestMeta, SetMetaData, ShowDialog};
use crate::paths;

/// `REQUEST_META`: a lookup for `link` has started.
pub fn request_meta(tx: &mut Transient, op: RequestMeta) {
    tx.set(
        &paths::meta(&op.id),
        Node::map([(fields::LINK, Node::from(op.link))]),
    );
}

/// `RECEIVE_META`: shallow-merge the fetched metadata into the record.
pub fn receive_meta(tx: &mut Transient, op: ReceiveMeta) {
    let incoming = Node::from(Value::Object(op.meta));
    tx.update(&paths::meta(&op.id), Node::empty_map(), |meta| {
        shallow_merge(meta, incoming)
    });
}

/// `SET_META_DATA`: replace the record outright. An absent payload stores
/// an empty record.
pub fn set_meta_data(tx: &mut Transient, op: SetMetaData) {
    let meta = op.meta.map(Node::from).unwrap_or_else(Node::empty_map);
    tx.set(&paths::meta(&op.id), meta);
}

pub fn clear_meta(tx: &mut Transient, id: &str) {
    tx.delete(&paths::meta(id));
}

/// `CLEAR_META_ELEMENT`: drop one field of a form's metadata record.
pub fn clear_meta_element(tx: &mut Transient, op: &ClearMetaElement) {
    tx.delete(&paths::meta(&op.form_id).child(op.element.as_str()));
}

/// `FETCH_JSON_RESULT`: store the outcome of a raw fetch at the root under
/// its request id.
pub fn fetch_json_result(tx: &mut Transient, op: FetchJsonResult) {
    tx.set(
        &Path::from([op.id.as_str()]),
        Node::map([
            (fields::RESULT, Node::from(op.result)),
            (fields::ERROR, Node::from(op.error)),
        ]),
    );
}

/// `SHOW_DIALOG`: open a dialog with its parameters, replacing any previous
/// parameters.
pub fn show_dialog(tx: &mut Transient, op: ShowDialog) {
    let params = Value::Object(op.params.unwrap_or_else(Map::new));
    tx.set(
        &paths::dialog(&op.name),
        Node::map([(fields::PARAMS, Node::from(params))]),
    );
}

pub fn hide_dialog(tx: &mut Transient, name: &str) {
    tx.delete(&paths::dialog(name));
}
