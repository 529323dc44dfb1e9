//! Key-value storage contract for the Cairn block store.
//!
//! Every storage backend (LMDB, in-memory for testing) implements the
//! [`KvStore`] trait. The journal depends only on the trait, never on a
//! concrete backend.

pub mod error;
pub mod kv;
pub mod memory;

pub use error::StoreError;
pub use kv::KvStore;
pub use memory::MemoryKvStore;
