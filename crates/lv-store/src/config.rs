use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Tunables of the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Page size requested from the listing service. A page shorter than
    /// this marks the listing as exhausted.
    pub fetch_batch_size: usize,
    /// Rows per page of a paginated history window.
    pub history_window: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fetch_batch_size: 20,
            history_window: 10,
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|source| StoreError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
