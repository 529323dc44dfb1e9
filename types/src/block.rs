//! The block object model: transactions grouped into batches, batches
//! grouped into blocks.

use serde::{Deserialize, Serialize};

use crate::ids::{BatchId, BlockId, TxnId};
use crate::weight::Weight;

/// The validity state of a block as seen by this node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockStatus {
    /// Not yet validated.
    Unknown,
    /// Failed validation; never persisted.
    Invalid,
    /// Passed validation.
    Valid,
}

impl BlockStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A single transaction. Only the identifier matters to the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxnId,
}

impl Transaction {
    pub fn new(id: impl Into<TxnId>) -> Self {
        Self { id: id.into() }
    }
}

/// An ordered group of transactions submitted as a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub transactions: Vec<Transaction>,
}

impl Batch {
    pub fn new(id: impl Into<BatchId>, transactions: Vec<Transaction>) -> Self {
        Self {
            id: id.into(),
            transactions,
        }
    }
}

/// A fully materialized block: identifier, contained batches, fork-choice
/// weight, and validity status.
///
/// Weight and status ride alongside the structural content rather than inside
/// it, so `Block` itself carries no serde derives; persisting blocks is the
/// journal's record codec's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub batches: Vec<Batch>,
    pub weight: Weight,
    pub status: BlockStatus,
}

impl Block {
    /// Construct a validated block. The store only ever persists blocks it
    /// considers structurally valid, so the status starts at `Valid`.
    pub fn new(id: impl Into<BlockId>, batches: Vec<Batch>, weight: Weight) -> Self {
        Self {
            id: id.into(),
            batches,
            weight,
            status: BlockStatus::Valid,
        }
    }

    /// Identifiers of every batch in this block, in block order.
    pub fn batch_ids(&self) -> impl Iterator<Item = &BatchId> {
        self.batches.iter().map(|b| &b.id)
    }

    /// Identifiers of every transaction in this block, in batch order.
    pub fn transaction_ids(&self) -> impl Iterator<Item = &TxnId> {
        self.batches
            .iter()
            .flat_map(|b| b.transactions.iter().map(|t| &t.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::new(
            "b1",
            vec![
                Batch::new("t1", vec![Transaction::new("x1"), Transaction::new("x2")]),
                Batch::new("t2", vec![Transaction::new("x3")]),
            ],
            Weight::new(7),
        )
    }

    #[test]
    fn new_block_starts_valid() {
        let block = sample_block();
        assert_eq!(block.status, BlockStatus::Valid);
        assert!(block.status.is_valid());
    }

    #[test]
    fn batch_ids_in_block_order() {
        let block = sample_block();
        let ids: Vec<&str> = block.batch_ids().map(BatchId::as_str).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn transaction_ids_flatten_across_batches() {
        let block = sample_block();
        let ids: Vec<&str> = block.transaction_ids().map(TxnId::as_str).collect();
        assert_eq!(ids, vec!["x1", "x2", "x3"]);
    }
}
