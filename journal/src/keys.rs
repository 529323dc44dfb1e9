//! Key namespace layout for the underlying key-value store.
//!
//! Every entry the journal writes lives under one of four prefixes, so block
//! records, index entries, and the head pointer can never collide even when
//! the same identifier string appears in more than one domain:
//!
//! - `b:` block records
//! - `t:` batch index entries
//! - `x:` transaction index entries
//! - `m:` journal metadata (the chain head pointer)

use cairn_types::{BatchId, BlockId, TxnId};

/// Prefix under which block records are stored.
pub(crate) const BLOCK_PREFIX: &[u8] = b"b:";

/// Prefix under which batch index entries are stored.
pub(crate) const BATCH_PREFIX: &[u8] = b"t:";

/// Prefix under which transaction index entries are stored.
pub(crate) const TXN_PREFIX: &[u8] = b"x:";

/// The reserved key holding the chain head block identifier.
pub(crate) const CHAIN_HEAD_KEY: &[u8] = b"m:chain_head_id";

fn prefixed(prefix: &[u8], id: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + id.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(id);
    key
}

/// Build the record key for a block.
pub(crate) fn block_key(id: &BlockId) -> Vec<u8> {
    prefixed(BLOCK_PREFIX, id.as_bytes())
}

/// Build the index key for a batch.
pub(crate) fn batch_key(id: &BatchId) -> Vec<u8> {
    prefixed(BATCH_PREFIX, id.as_bytes())
}

/// Build the index key for a transaction.
pub(crate) fn txn_key(id: &TxnId) -> Vec<u8> {
    prefixed(TXN_PREFIX, id.as_bytes())
}

/// Recover the block identifier from a block record key. Returns `None` for
/// keys outside the block namespace or with non-UTF-8 identifier bytes.
pub(crate) fn block_id_from_key(key: &[u8]) -> Option<BlockId> {
    key.strip_prefix(BLOCK_PREFIX)
        .and_then(|id| std::str::from_utf8(id).ok())
        .map(BlockId::new)
}
