//! The key-value storage trait every backend implements.

use crate::StoreError;

/// An ordered byte-keyed, byte-valued store with an atomic batch primitive.
///
/// Keys are opaque byte strings ordered lexicographically. `set_batch` is the
/// only compound operation: backends must apply its puts and deletes as one
/// indivisible unit, so that concurrent readers observe either none of the
/// batch or all of it.
pub trait KvStore: Send + Sync {
    /// Retrieve the value stored under `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any existing value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Fails with `NotFound` if the key is absent.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Check if `key` is present.
    fn contains(&self, key: &[u8]) -> Result<bool, StoreError>;

    /// Total number of entries across the whole keyspace.
    fn len(&self) -> Result<u64, StoreError>;

    /// Whether the store holds no entries at all.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// All keys starting with `prefix`, in ascending key order.
    ///
    /// The empty prefix yields every key in the store.
    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Number of keys starting with `prefix`.
    fn count_prefix(&self, prefix: &[u8]) -> Result<u64, StoreError> {
        Ok(self.keys_with_prefix(prefix)?.len() as u64)
    }

    /// Apply `puts` and `deletes` as one atomic unit.
    ///
    /// Deletes are applied first, then puts: a key appearing in both sets
    /// ends up present with its new value. Deleting an absent key inside a
    /// batch is a no-op, not an error.
    fn set_batch(
        &self,
        puts: Vec<(Vec<u8>, Vec<u8>)>,
        deletes: Vec<Vec<u8>>,
    ) -> Result<(), StoreError>;
}
