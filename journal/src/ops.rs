//! Expansion of single blocks into key-value batch operations.
//!
//! Adding a block writes its record plus one index entry per contained
//! batch and transaction; removing a block deletes the same key set. Both
//! expansions are pure functions of the block, so `update_chain` can
//! accumulate them across many blocks into one atomic batch.

use cairn_types::Block;

use crate::keys;
use crate::record::BlockRecord;
use crate::JournalError;

fn op_count(block: &Block) -> usize {
    let txns: usize = block.batches.iter().map(|b| b.transactions.len()).sum();
    1 + block.batches.len() + txns
}

/// Expand a block into the put operations that make it fully visible: the
/// block record first, then an index entry for every batch and for every
/// transaction inside that batch, each valued with the block identifier.
pub(crate) fn build_add_ops(block: &Block) -> Result<Vec<(Vec<u8>, Vec<u8>)>, JournalError> {
    let record = BlockRecord::encode(block)?;
    let id_bytes = block.id.as_bytes();

    let mut ops = Vec::with_capacity(op_count(block));
    ops.push((keys::block_key(&block.id), record.to_bytes()?));
    for batch in &block.batches {
        ops.push((keys::batch_key(&batch.id), id_bytes.to_vec()));
        for txn in &batch.transactions {
            ops.push((keys::txn_key(&txn.id), id_bytes.to_vec()));
        }
    }
    Ok(ops)
}

/// The key set `build_add_ops` writes for this block, for removal.
pub(crate) fn build_remove_ops(block: &Block) -> Vec<Vec<u8>> {
    let mut ops = Vec::with_capacity(op_count(block));
    ops.push(keys::block_key(&block.id));
    for batch in &block.batches {
        ops.push(keys::batch_key(&batch.id));
        for txn in &batch.transactions {
            ops.push(keys::txn_key(&txn.id));
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_types::{Batch, Transaction, Weight};

    fn two_batch_block() -> Block {
        Block::new(
            "b1",
            vec![
                Batch::new("t1", vec![Transaction::new("x1"), Transaction::new("x2")]),
                Batch::new("t2", vec![Transaction::new("x3")]),
            ],
            Weight::new(5),
        )
    }

    #[test]
    fn add_ops_emit_record_then_nested_index_entries() {
        let block = two_batch_block();
        let ops = build_add_ops(&block).expect("add ops");

        let keys: Vec<&[u8]> = ops.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(
            keys,
            vec![
                b"b:b1".as_slice(),
                b"t:t1".as_slice(),
                b"x:x1".as_slice(),
                b"x:x2".as_slice(),
                b"t:t2".as_slice(),
                b"x:x3".as_slice(),
            ]
        );

        // Every index entry points back at the block.
        for (key, value) in &ops[1..] {
            assert_eq!(value, b"b1", "index value for {:?}", key);
        }
    }

    #[test]
    fn remove_ops_cover_exactly_the_added_keys() {
        let block = two_batch_block();
        let added: Vec<Vec<u8>> = build_add_ops(&block)
            .expect("add ops")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(build_remove_ops(&block), added);
    }

    #[test]
    fn batchless_block_expands_to_its_record_alone() {
        let block = Block::new("solo", vec![], Weight::ZERO);
        let ops = build_add_ops(&block).expect("add ops");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].0, b"b:solo".to_vec());
        assert_eq!(build_remove_ops(&block), vec![b"b:solo".to_vec()]);
    }
}
