use std::path::PathBuf;

/// Errors raised at the store boundary.
///
/// Transitions themselves never fail; these cover decoding operations from
/// the wire and loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The JSON did not decode into a known operation.
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] serde_json::Error),

    /// The operation kind exists but cannot travel over the wire.
    #[error("operation {0} is only available in-process")]
    InProcessOnly(String),

    /// The configuration file could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store boundary operations.
pub type StoreResult<T> = Result<T, StoreError>;
