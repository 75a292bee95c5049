//! The transition function: `(snapshot, operation) -> snapshot`.

use std::fmt;
use std::sync::Arc;

use lv_tree::{Node, Transient};
use lv_types::ContentKey;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::operation::{Operation, SetPath, UpdatePath};
use crate::snapshot::Snapshot;
use crate::{accounts, content, ephemeral, listing, replies, state, status};

/// Applies operations to snapshots.
///
/// `reduce` is total and never mutates its input. Every write of one
/// operation runs inside a single mutation scope, so each container it
/// touches is copied once and everything else stays shared with the input.
#[derive(Clone)]
pub struct Reducer {
    config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl Reducer {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn reduce(&self, snapshot: &Snapshot, op: Operation) -> Snapshot {
        debug!(kind = op.kind(), policy = %op.policy(), "reduce");
        let root = snapshot.root().with_mutations(|tx| self.apply(tx, op));
        Snapshot::from_root(root)
    }

    fn apply(&self, tx: &mut Transient, op: Operation) {
        match op {
            Operation::ReceiveState(fragment) => state::receive_state(tx, fragment),
            Operation::ReceiveAccount(op) => accounts::receive_account(tx, op.account),
            Operation::ReceiveComment(op) => content::receive_comment(tx, op),
            Operation::ReceiveContent(op) => content::receive_content(tx, op.content),
            Operation::LinkReply(op) => replies::link_reply(tx, &op),
            Operation::UpdateAccountWitnessVote(op) => accounts::witness_vote(tx, &op),
            Operation::DeleteContent(op) => {
                content::delete_content(tx, &ContentKey::new(op.author, op.permlink))
            }
            Operation::Voted(op) => content::voted(tx, &op),
            Operation::FetchingData(op) => {
                status::mark_fetching(tx, op.category.as_deref().unwrap_or_default(), &op.order)
            }
            Operation::ReceiveData(op) => listing::receive_data(
                tx,
                op,
                self.config.fetch_batch_size,
                self.clock.as_ref(),
            ),
            Operation::ReceiveRecentPosts(op) => listing::receive_recent_posts(tx, op.data),
            Operation::SetCollapsed(op) => content::set_collapsed(tx, &op),
            Operation::RequestMeta(op) => ephemeral::request_meta(tx, op),
            Operation::ReceiveMeta(op) => ephemeral::receive_meta(tx, op),
            Operation::SetMetaData(op) => ephemeral::set_meta_data(tx, op),
            Operation::ClearMeta(op) => ephemeral::clear_meta(tx, &op.id),
            Operation::ClearMetaElement(op) => ephemeral::clear_meta_element(tx, &op),
            Operation::FetchJsonResult(op) => ephemeral::fetch_json_result(tx, op),
            Operation::Set(op) => set_path(tx, op),
            Operation::Remove(op) => tx.delete(&op.key),
            Operation::Update(op) => update_path(tx, op),
            Operation::ShowDialog(op) => ephemeral::show_dialog(tx, op),
            Operation::HideDialog(op) => ephemeral::hide_dialog(tx, &op.name),
        }
    }
}

impl Default for Reducer {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn set_path(tx: &mut Transient, op: SetPath) {
    if op.key.is_empty() {
        warn!("SET on the root path ignored");
        return;
    }
    tx.set(&op.key, Node::from(op.value));
}

fn update_path(tx: &mut Transient, op: UpdatePath) {
    let UpdatePath {
        key,
        not_set,
        updater,
    } = op;
    if key.is_empty() {
        warn!("UPDATE on the root path ignored");
        return;
    }
    tx.update(&key, not_set, |node| updater.apply(node));
}
