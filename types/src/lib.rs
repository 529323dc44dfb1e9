//! Fundamental types for the Cairn block store.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! block, batch, and transaction identifiers, fork-choice weight, and the block
//! object model that the journal persists and serves.

pub mod block;
pub mod ids;
pub mod weight;

pub use block::{Batch, Block, BlockStatus, Transaction};
pub use ids::{BatchId, BlockId, TxnId};
pub use weight::Weight;
