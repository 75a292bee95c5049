//! Vote upsert: one entry per voter, last write wins.

use imbl::Vector;
use lv_tree::Node;
use lv_types::fields;

/// A `{voter, percent}` record.
pub fn vote_record(voter: &str, percent: Node) -> Node {
    Node::map([
        (fields::VOTER, Node::from(voter)),
        (fields::PERCENT, percent),
    ])
}

/// Overwrite the vote cast by `voter` in place, or append a new one.
///
/// Returns `true` if a new entry was appended.
pub fn upsert_vote(votes: &mut Vector<Node>, voter: &str, percent: Node) -> bool {
    let record = vote_record(voter, percent);
    match votes
        .iter()
        .position(|vote| vote.child(fields::VOTER).and_then(Node::as_str) == Some(voter))
    {
        Some(index) => {
            votes[index] = record;
            false
        }
        None => {
            votes.push_back(record);
            true
        }
    }
}
