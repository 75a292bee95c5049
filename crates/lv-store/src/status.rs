//! Fetch status per listing.

use chrono::{DateTime, SecondsFormat, Utc};
use lv_tree::{Node, Transient};
use lv_types::fields;
use tracing::debug;

use crate::clock::Clock;
use crate::paths;

/// Typed view of a `status[category][order]` record.
///
/// `last_fetch` is only present once a page came back shorter than the
/// batch size, i.e. the listing has nothing older left to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchStatus {
    pub fetching: bool,
    pub last_fetch: Option<DateTime<Utc>>,
}

impl FetchStatus {
    pub fn in_flight() -> Self {
        Self {
            fetching: true,
            last_fetch: None,
        }
    }

    pub fn idle() -> Self {
        Self {
            fetching: false,
            last_fetch: None,
        }
    }

    pub fn exhausted(at: DateTime<Utc>) -> Self {
        Self {
            fetching: false,
            last_fetch: Some(at),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.last_fetch.is_some()
    }

    pub fn to_node(&self) -> Node {
        let mut entries = vec![(fields::FETCHING, Node::from(self.fetching))];
        if let Some(at) = self.last_fetch {
            entries.push((
                fields::LAST_FETCH,
                Node::from(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ));
        }
        Node::map(entries)
    }

    /// Read a status record back. Returns `None` for anything that is not a
    /// mapping; an unparseable timestamp reads as absent.
    pub fn from_node(node: &Node) -> Option<Self> {
        node.as_map()?;
        let fetching = node
            .child(fields::FETCHING)
            .and_then(Node::as_bool)
            .unwrap_or(false);
        let last_fetch = node
            .child(fields::LAST_FETCH)
            .and_then(Node::as_str)
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
            .map(|at| at.with_timezone(&Utc));
        Some(Self {
            fetching,
            last_fetch,
        })
    }
}

/// A fetch for the listing has been issued.
pub fn mark_fetching(tx: &mut Transient, category: &str, order: &str) {
    tx.set(&paths::status(category, order), FetchStatus::in_flight().to_node());
}

/// A page of `fetched` items arrived. The listing is exhausted when the page
/// is shorter than `batch_size`.
pub fn mark_received(
    tx: &mut Transient,
    category: &str,
    order: &str,
    fetched: usize,
    batch_size: usize,
    clock: &dyn Clock,
) {
    let status = if fetched < batch_size {
        debug!(category, order, fetched, batch_size, "listing exhausted");
        FetchStatus::exhausted(clock.now())
    } else {
        FetchStatus::idle()
    };
    tx.set(&paths::status(category, order), status.to_node());
}
