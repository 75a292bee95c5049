use serde_json::Value;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::operation::Operation;
use crate::reducer::Reducer;
use crate::snapshot::Snapshot;

/// Holds the current snapshot and applies operations to it in order.
///
/// Each dispatch replaces the current snapshot with the reducer's output.
/// Snapshots handed out earlier are unaffected.
#[derive(Debug, Default)]
pub struct Store {
    reducer: Reducer,
    current: Snapshot,
    transitions: u64,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_reducer(Reducer::new(config))
    }

    pub fn with_reducer(reducer: Reducer) -> Self {
        info!(
            fetch_batch_size = reducer.config().fetch_batch_size,
            "store initialised"
        );
        Self {
            reducer,
            current: Snapshot::new(),
            transitions: 0,
        }
    }

    /// Start from an existing snapshot instead of the initial state.
    pub fn from_snapshot(reducer: Reducer, snapshot: Snapshot) -> Self {
        Self {
            reducer,
            current: snapshot,
            transitions: 0,
        }
    }

    pub fn dispatch(&mut self, op: Operation) -> &Snapshot {
        self.current = self.reducer.reduce(&self.current, op);
        self.transitions += 1;
        &self.current
    }

    /// Decode a wire operation and dispatch it. A malformed operation leaves
    /// the store unchanged.
    pub fn dispatch_json(&mut self, value: Value) -> StoreResult<&Snapshot> {
        let op = Operation::from_json(value)?;
        Ok(self.dispatch(op))
    }

    /// The current snapshot. Cheap to clone and keep.
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn config(&self) -> &StoreConfig {
        self.reducer.config()
    }

    /// Number of operations applied so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}
