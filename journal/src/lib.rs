//! Chain-indexed block store.
//!
//! Sits atop any [`cairn_store::KvStore`] and gives it block semantics:
//! serialized block records keyed by block identifier, lookup indices from
//! batch and transaction identifiers back to their containing block, and a
//! single chain head pointer. A multi-key write (a block record, its index
//! entries, the head pointer) is always submitted as one atomic batch, so
//! the head pointer can never get ahead of the blocks actually present.
//!
//! Deciding which chain wins is someone else's job; this crate only makes
//! the winning chain durable and queryable.

pub mod block_store;
pub mod error;
pub mod record;

mod keys;
mod ops;

pub use block_store::BlockStore;
pub use error::JournalError;
pub use record::BlockRecord;
