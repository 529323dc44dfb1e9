use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("block not found: {0}")]
    NotFound(String),

    #[error("invalid key to store block under: {key}, block identifies as {expected}")]
    InvalidKey { key: String, expected: String },

    #[error("malformed block record for {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("index inconsistency: {0}")]
    InconsistentIndex(String),

    #[error("chain update requires at least one new block")]
    EmptyChainUpdate,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Store(#[from] cairn_store::StoreError),
}
