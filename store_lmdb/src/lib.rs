//! LMDB storage backend for the Cairn block store.
//!
//! Implements the [`cairn_store::KvStore`] trait using the `heed` LMDB
//! bindings. All entries live in a single named database within one
//! environment; batch atomicity comes from LMDB write transactions.

pub mod error;
pub mod kv;

pub use error::LmdbError;
pub use kv::{LmdbKvStore, DEFAULT_MAP_SIZE};
