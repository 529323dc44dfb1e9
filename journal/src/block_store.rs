//! The chain-indexed block store facade.

use cairn_store::{KvStore, StoreError};
use cairn_types::{BatchId, Block, BlockId, TxnId};

use crate::keys;
use crate::ops;
use crate::record::BlockRecord;
use crate::JournalError;

/// Map-like access to blocks by identifier, batch and transaction lookup
/// indices, and the chain head pointer, maintained atomically over an
/// ordered key-value store.
///
/// The store holds no state of its own and takes no locks; atomicity and
/// reader isolation come from the adapter's `set_batch`. Callers must not
/// run more than one chain update at a time.
pub struct BlockStore<D: KvStore> {
    db: D,
}

impl<D: KvStore> BlockStore<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    /// The underlying key-value store.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Retrieve and decode the block stored under `id`.
    pub fn get(&self, id: &BlockId) -> Result<Block, JournalError> {
        let bytes = self
            .db
            .get(&keys::block_key(id))?
            .ok_or_else(|| JournalError::NotFound(id.to_string()))?;
        let record = BlockRecord::from_bytes(id, &bytes)?;
        record.decode(id)
    }

    /// Store `block` under `id`, together with an index entry for every
    /// contained batch and transaction, as one atomic batch.
    ///
    /// `id` must equal the block's own identifier; on mismatch the call
    /// fails with `InvalidKey` and writes nothing.
    pub fn put(&self, id: &BlockId, block: &Block) -> Result<(), JournalError> {
        if id != &block.id {
            return Err(JournalError::InvalidKey {
                key: id.to_string(),
                expected: block.id.to_string(),
            });
        }
        let puts = ops::build_add_ops(block)?;
        self.db.set_batch(puts, Vec::new())?;
        Ok(())
    }

    /// Remove the block record stored under `id`.
    ///
    /// Index entries for the block's batches and transactions stay in
    /// place: `delete` is the cheap single-record primitive, and full
    /// cleanup belongs to [`BlockStore::update_chain`].
    pub fn delete(&self, id: &BlockId) -> Result<(), JournalError> {
        self.db.delete(&keys::block_key(id)).map_err(|e| match e {
            StoreError::NotFound(_) => JournalError::NotFound(id.to_string()),
            other => JournalError::Store(other),
        })
    }

    /// Whether a block record exists under `id`.
    pub fn contains(&self, id: &BlockId) -> Result<bool, JournalError> {
        Ok(self.db.contains(&keys::block_key(id))?)
    }

    /// Number of stored blocks. Index entries and the head pointer are not
    /// counted.
    pub fn len(&self) -> Result<u64, JournalError> {
        Ok(self.db.count_prefix(keys::BLOCK_PREFIX)?)
    }

    /// Whether the store holds no blocks.
    pub fn is_empty(&self) -> Result<bool, JournalError> {
        Ok(self.len()? == 0)
    }

    /// Identifiers of every stored block, in ascending identifier order.
    pub fn ids(&self) -> Result<Vec<BlockId>, JournalError> {
        let record_keys = self.db.keys_with_prefix(keys::BLOCK_PREFIX)?;
        let mut ids = Vec::with_capacity(record_keys.len());
        for key in record_keys {
            let id = keys::block_id_from_key(&key).ok_or_else(|| {
                JournalError::InconsistentIndex(format!(
                    "block record key is not a valid identifier: {key:?}"
                ))
            })?;
            ids.push(id);
        }
        Ok(ids)
    }

    /// Whether any stored block contains the batch `id`.
    pub fn has_batch(&self, id: &BatchId) -> Result<bool, JournalError> {
        Ok(self.db.contains(&keys::batch_key(id))?)
    }

    /// Whether any stored block contains the transaction `id`.
    pub fn has_transaction(&self, id: &TxnId) -> Result<bool, JournalError> {
        Ok(self.db.contains(&keys::txn_key(id))?)
    }

    /// Resolve a transaction identifier to the block containing it.
    ///
    /// Fails with `NotFound` when the transaction is not indexed, and also
    /// when the index entry references a block that is no longer present
    /// (a single-record `delete` leaves such entries behind).
    pub fn get_by_transaction(&self, id: &TxnId) -> Result<Block, JournalError> {
        let block_id = self.resolve_index(&keys::txn_key(id), id.as_str())?;
        match self.get(&block_id) {
            Err(JournalError::NotFound(_)) => {
                tracing::warn!(
                    txn = %id,
                    block = %block_id,
                    "transaction index references a missing block"
                );
                Err(JournalError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    /// The identifier the chain head pointer references, or `None` when no
    /// chain has been adopted yet.
    pub fn chain_head_id(&self) -> Result<Option<BlockId>, JournalError> {
        match self.db.get(keys::CHAIN_HEAD_KEY)? {
            Some(bytes) => {
                let raw = String::from_utf8(bytes).map_err(|_| {
                    JournalError::InconsistentIndex(
                        "chain head pointer is not a valid identifier".to_string(),
                    )
                })?;
                Ok(Some(BlockId::new(raw)))
            }
            None => Ok(None),
        }
    }

    /// The current chain head block, or `None` when no chain has been
    /// adopted yet.
    ///
    /// A head pointer referencing a missing block is a fatal inconsistency:
    /// `update_chain` installs the pointer in the same atomic batch as the
    /// head's record, so the two can only diverge through external damage.
    pub fn chain_head(&self) -> Result<Option<Block>, JournalError> {
        let id = match self.chain_head_id()? {
            Some(id) => id,
            None => return Ok(None),
        };
        match self.get(&id) {
            Ok(block) => Ok(Some(block)),
            Err(JournalError::NotFound(_)) => Err(JournalError::InconsistentIndex(format!(
                "chain head {id} references a block that is not in the store"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Swap the stored chain in one atomic batch: add every block in
    /// `new_chain`, remove every block in `old_chain` together with its
    /// index entries, and point the chain head at `new_chain[0]`.
    ///
    /// Callers pass the new head first. No linkage or existence checks are
    /// performed here; the caller has already decided the new chain wins,
    /// and this is the mechanical index update that makes the decision
    /// visible all at once. A block appearing in both chains survives with
    /// its new content.
    pub fn update_chain(
        &self,
        new_chain: &[Block],
        old_chain: &[Block],
    ) -> Result<(), JournalError> {
        let head = new_chain.first().ok_or(JournalError::EmptyChainUpdate)?;

        let mut puts = Vec::new();
        for block in new_chain {
            puts.extend(ops::build_add_ops(block)?);
        }
        puts.push((keys::CHAIN_HEAD_KEY.to_vec(), head.id.as_bytes().to_vec()));

        let mut deletes = Vec::new();
        for block in old_chain {
            deletes.extend(ops::build_remove_ops(block));
        }

        tracing::debug!(
            head = %head.id,
            adding = new_chain.len(),
            removing = old_chain.len(),
            "updating chain"
        );
        self.db.set_batch(puts, deletes)?;
        Ok(())
    }

    fn resolve_index(&self, key: &[u8], id: &str) -> Result<BlockId, JournalError> {
        let bytes = self
            .db
            .get(key)?
            .ok_or_else(|| JournalError::NotFound(id.to_string()))?;
        let raw = String::from_utf8(bytes).map_err(|_| {
            JournalError::InconsistentIndex(format!(
                "index entry for {id} does not hold a valid block identifier"
            ))
        })?;
        Ok(BlockId::new(raw))
    }
}
