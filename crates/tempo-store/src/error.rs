//! Error types for the session store seam.

/// Errors that can occur in the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A Redis-compatible backend operation failed.
    #[error("redis error: {0}")]
    Redis(#[from] fred::error::Error),

    /// A stored entry could not be interpreted (e.g. a click log entry
    /// that is not a board square).
    #[error("corrupt entry at {key}: {message}")]
    Corrupt {
        /// The backend key the entry was read from.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// A configuration error (e.g. an unparsable backend URL).
    #[error("store configuration error: {0}")]
    Config(String),
}
