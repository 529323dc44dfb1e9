//! In-memory reference backend, thread-safe for tests and light use.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{KvStore, StoreError};

/// An in-memory `KvStore` over an ordered map.
///
/// `set_batch` holds the write lock for the whole batch, so readers see
/// either the pre-batch or post-batch state, never a partial one.
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(String::from_utf8_lossy(key).into_owned()))
    }

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.entries.read().unwrap().contains_key(key))
    }

    fn len(&self) -> Result<u64, StoreError> {
        Ok(self.entries.read().unwrap().len() as u64)
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn set_batch(
        &self,
        puts: Vec<(Vec<u8>, Vec<u8>)>,
        deletes: Vec<Vec<u8>>,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        for key in deletes {
            entries.remove(&key);
        }
        for (key, value) in puts {
            entries.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_roundtrip() {
        let store = MemoryKvStore::new();
        store.put(b"alpha", b"1").expect("put");
        assert_eq!(store.get(b"alpha").expect("get"), Some(b"1".to_vec()));
        assert_eq!(store.get(b"beta").expect("get"), None);
    }

    #[test]
    fn put_replaces_existing_value() {
        let store = MemoryKvStore::new();
        store.put(b"alpha", b"1").expect("put");
        store.put(b"alpha", b"2").expect("put");
        assert_eq!(store.get(b"alpha").expect("get"), Some(b"2".to_vec()));
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn delete_removes_and_is_strict() {
        let store = MemoryKvStore::new();
        store.put(b"alpha", b"1").expect("put");
        store.delete(b"alpha").expect("delete");
        assert_eq!(store.get(b"alpha").expect("get"), None);
        assert!(matches!(
            store.delete(b"alpha"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn contains_and_len() {
        let store = MemoryKvStore::new();
        assert!(store.is_empty().expect("is_empty"));
        store.put(b"a", b"1").expect("put");
        store.put(b"b", b"2").expect("put");
        assert!(store.contains(b"a").expect("contains"));
        assert!(!store.contains(b"c").expect("contains"));
        assert_eq!(store.len().expect("len"), 2);
        assert!(!store.is_empty().expect("is_empty"));
    }

    #[test]
    fn keys_with_prefix_ordered_and_bounded() {
        let store = MemoryKvStore::new();
        store.put(b"b:2", b"").expect("put");
        store.put(b"a:1", b"").expect("put");
        store.put(b"b:1", b"").expect("put");
        store.put(b"c:1", b"").expect("put");

        let keys = store.keys_with_prefix(b"b:").expect("scan");
        assert_eq!(keys, vec![b"b:1".to_vec(), b"b:2".to_vec()]);
        assert_eq!(store.count_prefix(b"b:").expect("count"), 2);

        let all = store.keys_with_prefix(b"").expect("scan");
        assert_eq!(
            all,
            vec![b"a:1".to_vec(), b"b:1".to_vec(), b"b:2".to_vec(), b"c:1".to_vec()]
        );
    }

    #[test]
    fn set_batch_applies_all_operations() {
        let store = MemoryKvStore::new();
        store.put(b"old", b"x").expect("put");

        store
            .set_batch(
                vec![(b"new1".to_vec(), b"1".to_vec()), (b"new2".to_vec(), b"2".to_vec())],
                vec![b"old".to_vec()],
            )
            .expect("batch");

        assert_eq!(store.get(b"old").expect("get"), None);
        assert_eq!(store.get(b"new1").expect("get"), Some(b"1".to_vec()));
        assert_eq!(store.get(b"new2").expect("get"), Some(b"2".to_vec()));
    }

    #[test]
    fn set_batch_put_wins_over_delete_of_same_key() {
        let store = MemoryKvStore::new();
        store.put(b"shared", b"old").expect("put");

        store
            .set_batch(
                vec![(b"shared".to_vec(), b"new".to_vec())],
                vec![b"shared".to_vec()],
            )
            .expect("batch");

        assert_eq!(store.get(b"shared").expect("get"), Some(b"new".to_vec()));
    }

    #[test]
    fn set_batch_tolerates_absent_deletes() {
        let store = MemoryKvStore::new();
        store
            .set_batch(vec![(b"k".to_vec(), b"v".to_vec())], vec![b"missing".to_vec()])
            .expect("batch");
        assert_eq!(store.get(b"k").expect("get"), Some(b"v".to_vec()));
    }
}
