//! Handlers that write account records.

use lv_merge::{deep_merge, edit_membership};
use lv_tree::{Node, Transient};
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{account_name_of, normalize_account};
use crate::operation::WitnessVote;
use crate::paths;

/// Handle `RECEIVE_ACCOUNT`: deep-merge the normalized record into
/// `accounts[name]`.
pub fn receive_account(tx: &mut Transient, record: Value) {
    let Some(name) = account_name_of(&record).map(str::to_string) else {
        warn!("account record without name ignored");
        return;
    };
    let incoming = normalize_account(record);
    tx.update(&paths::account(&name), Node::empty_map(), |account| {
        deep_merge(account, incoming)
    });
}

/// Handle `UPDATE_ACCOUNT_WITNESS_VOTE`: add or remove the witness from the
/// account's `witness_votes` set.
pub fn witness_vote(tx: &mut Transient, vote: &WitnessVote) {
    let changed = edit_membership(
        tx.set_mut(&paths::witness_votes(&vote.account)),
        &vote.witness,
        vote.approve.into(),
    );
    debug!(
        account = %vote.account,
        witness = %vote.witness,
        approve = vote.approve,
        changed,
        "witness vote"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use lv_types::Path;
    use serde_json::json;

    fn votes_path() -> Path {
        Path::from(["accounts", "x", "witness_votes"])
    }

    #[test]
    fn account_merge_unions_witness_votes() {
        let next = Node::empty_map().with_mutations(|tx| {
            receive_account(tx, json!({"name": "x", "witness_votes": ["w1"], "balance": "1"}));
            receive_account(tx, json!({"name": "x", "witness_votes": ["w2"]}));
        });
        assert_eq!(next.get_in(&votes_path()), Some(&Node::set(["w1", "w2"])));
        assert_eq!(
            next.get_in(&Path::from(["accounts", "x", "balance"])),
            Some(&Node::from("1"))
        );
    }

    #[test]
    fn nameless_account_is_ignored() {
        let source = Node::empty_map();
        let next = source.with_mutations(|tx| receive_account(tx, json!({"balance": "1"})));
        assert_eq!(next, source);
    }

    #[test]
    fn witness_toggle() {
        let vote = |approve| WitnessVote {
            account: "x".into(),
            witness: "w".into(),
            approve,
        };
        let approved = Node::empty_map().with_mutations(|tx| witness_vote(tx, &vote(true)));
        assert_eq!(approved.get_in(&votes_path()), Some(&Node::set(["w"])));

        let revoked = approved.with_mutations(|tx| witness_vote(tx, &vote(false)));
        assert_eq!(revoked.get_in(&votes_path()), Some(&Node::empty_set()));
    }
}
