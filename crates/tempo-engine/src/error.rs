//! Error types for the session engine.

use tempo_rules::RulesError;
use tempo_store::StoreError;

/// Errors that can occur while coordinating a session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The session store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The rules oracle failed (unparsable snapshot, illegal apply).
    #[error("rules error: {0}")]
    Rules(#[from] RulesError),
}
