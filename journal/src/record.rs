//! The persisted block record and its codec.
//!
//! A block is stored as `BlockRecord { payload, weight }`: the payload is
//! the bincode encoding of the block's structural content (identifier plus
//! batches), and the weight rides next to it so fork-choice metadata stays
//! readable without touching block content. The record itself is bincode
//! encoded into the adapter value.

use serde::{Deserialize, Serialize};

use cairn_types::{Batch, Block, BlockId, Weight};

use crate::JournalError;

/// The serialized structural content of a block.
#[derive(Serialize, Deserialize)]
struct BlockBody {
    id: BlockId,
    batches: Vec<Batch>,
}

/// What is physically stored under a block record key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Serialized block body. The store holds the only durable copy.
    pub payload: Vec<u8>,
    /// Fork-choice weight, stored alongside the payload.
    pub weight: Weight,
}

impl BlockRecord {
    /// Serialize a block into its stored record form.
    pub fn encode(block: &Block) -> Result<Self, JournalError> {
        let body = BlockBody {
            id: block.id.clone(),
            batches: block.batches.clone(),
        };
        let payload =
            bincode::serialize(&body).map_err(|e| JournalError::Serialization(e.to_string()))?;
        Ok(Self {
            payload,
            weight: block.weight,
        })
    }

    /// Reconstruct the full block from this record.
    ///
    /// `id` is the identifier the record was fetched under; it supplies
    /// error context only. Decoded blocks come back tagged valid, since
    /// only validated blocks are ever persisted.
    pub fn decode(&self, id: &BlockId) -> Result<Block, JournalError> {
        let body: BlockBody =
            bincode::deserialize(&self.payload).map_err(|e| JournalError::MalformedRecord {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Block::new(body.id, body.batches, self.weight))
    }

    /// Encode this record into adapter value bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, JournalError> {
        bincode::serialize(self).map_err(|e| JournalError::Serialization(e.to_string()))
    }

    /// Decode a record from adapter value bytes.
    pub fn from_bytes(id: &BlockId, bytes: &[u8]) -> Result<Self, JournalError> {
        bincode::deserialize(bytes).map_err(|e| JournalError::MalformedRecord {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}
