//! # lv-store
//!
//! The client state store of LedgerView.
//!
//! A [`Snapshot`] is one immutable state of the client: content entries,
//! accounts, listing indexes, fetch status, and a handful of UI regions.
//! Operations arrive as tagged JSON messages, are decoded into
//! [`Operation`], and the [`Reducer`] turns `(snapshot, operation)` into
//! the next snapshot. Each operation kind applies one merge policy, and
//! the handlers keep the reply graph and the listing indexes consistent
//! with the content they describe.
//!
//! ```
//! use lv_store::Store;
//! use lv_types::ContentKey;
//! use serde_json::json;
//!
//! let mut store = Store::default();
//! store.dispatch_json(json!({
//!     "type": "RECEIVE_COMMENT",
//!     "payload": {
//!         "author": "a", "permlink": "p1", "body": "hi",
//!         "parent_author": "b", "parent_permlink": "p0"
//!     }
//! })).unwrap();
//! assert_eq!(store.snapshot().replies(&ContentKey::new("b", "p0")), vec!["a/p1"]);
//! ```

pub mod accounts;
pub mod clock;
pub mod config;
pub mod content;
pub mod ephemeral;
pub mod error;
pub mod listing;
pub mod normalize;
pub mod operation;
pub mod paths;
pub mod reducer;
pub mod replies;
pub mod snapshot;
pub mod state;
pub mod status;
pub mod store;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use operation::{Operation, Updater};
pub use reducer::Reducer;
pub use snapshot::Snapshot;
pub use status::FetchStatus;
pub use store::Store;
pub use window::HistoryWindow;
