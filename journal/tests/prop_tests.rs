use proptest::prelude::*;

use cairn_journal::{BlockRecord, BlockStore};
use cairn_store::MemoryKvStore;
use cairn_types::{Batch, Block, Transaction, Weight};

fn arb_block() -> impl Strategy<Value = Block> {
    (
        "[0-9a-f]{8,64}",
        prop::collection::vec(
            (
                "[0-9a-f]{8,64}",
                prop::collection::vec("[0-9a-f]{8,64}", 0..4),
            ),
            0..4,
        ),
        any::<u64>(),
    )
        .prop_map(|(id, batches, weight)| {
            let batches = batches
                .into_iter()
                .map(|(batch_id, txns)| {
                    Batch::new(
                        batch_id,
                        txns.into_iter().map(Transaction::new).collect(),
                    )
                })
                .collect();
            Block::new(id, batches, Weight::new(weight))
        })
}

proptest! {
    /// Record codec roundtrip: encode -> bytes -> record -> block preserves
    /// the block exactly, weight included.
    #[test]
    fn record_roundtrip(block in arb_block()) {
        let record = BlockRecord::encode(&block).unwrap();
        let bytes = record.to_bytes().unwrap();
        let restored = BlockRecord::from_bytes(&block.id, &bytes).unwrap();
        prop_assert_eq!(restored.weight, block.weight);
        let decoded = restored.decode(&block.id).unwrap();
        prop_assert_eq!(decoded, block);
    }

    /// Store roundtrip: any block put under its own identifier comes back
    /// equal.
    #[test]
    fn put_get_roundtrip(block in arb_block()) {
        let store = BlockStore::new(MemoryKvStore::new());
        store.put(&block.id, &block).unwrap();
        prop_assert_eq!(store.get(&block.id).unwrap(), block);
    }

    /// After a put, every contained batch and transaction identifier is
    /// resolvable back to the block.
    #[test]
    fn put_indexes_all_identifiers(block in arb_block()) {
        let store = BlockStore::new(MemoryKvStore::new());
        store.put(&block.id, &block).unwrap();

        for batch_id in block.batch_ids() {
            prop_assert!(store.has_batch(batch_id).unwrap());
        }
        for txn_id in block.transaction_ids() {
            prop_assert!(store.has_transaction(txn_id).unwrap());
            prop_assert_eq!(&store.get_by_transaction(txn_id).unwrap(), &block);
        }
    }

    /// A chain update followed by a full reversal leaves no trace of the
    /// reversed block in any namespace.
    #[test]
    fn reorg_removes_every_trace(winner in arb_block(), loser in arb_block()) {
        prop_assume!(winner.id != loser.id);

        let store = BlockStore::new(MemoryKvStore::new());
        store.update_chain(&[loser.clone()], &[]).unwrap();
        store.update_chain(&[winner.clone()], &[loser.clone()]).unwrap();

        prop_assert_eq!(store.chain_head().unwrap(), Some(winner.clone()));
        prop_assert!(!store.contains(&loser.id).unwrap());
        for batch_id in loser.batch_ids() {
            if !winner.batch_ids().any(|w| w == batch_id) {
                prop_assert!(!store.has_batch(batch_id).unwrap());
            }
        }
        for txn_id in loser.transaction_ids() {
            if !winner.transaction_ids().any(|w| w == txn_id) {
                prop_assert!(!store.has_transaction(txn_id).unwrap());
            }
        }
    }
}
