//! LMDB implementation of the key-value storage contract.

use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use cairn_store::{KvStore, StoreError};

use crate::LmdbError;

/// Default LMDB map size: 2 GiB.
pub const DEFAULT_MAP_SIZE: usize = 2 << 30;

const KV_DB_NAME: &str = "kv";

/// Compute the exclusive upper bound for a prefix scan: increment the last
/// non-0xFF byte and truncate after it. Returns `false` when the prefix is
/// empty or all 0xFF bytes, in which case no finite upper bound exists.
fn increment_prefix(prefix: &mut Vec<u8>) -> bool {
    while let Some(last) = prefix.last_mut() {
        if *last == 0xFF {
            prefix.pop();
        } else {
            *last += 1;
            return true;
        }
    }
    false
}

/// A durable key-value store backed by a single LMDB database.
///
/// `set_batch` maps to one LMDB write transaction; its commit is the only
/// fsync. Readers run on MVCC snapshots and never observe a half-applied
/// batch.
pub struct LmdbKvStore {
    env: Arc<Env>,
    db: Database<Bytes, Bytes>,
}

impl LmdbKvStore {
    /// Open or create the store at `path` with the default map size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    /// Open or create the store at `path` with an explicit map size.
    pub fn open_with_map_size(
        path: impl AsRef<Path>,
        map_size: usize,
    ) -> Result<Self, LmdbError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size);
        options.max_dbs(1);
        let env = unsafe { options.open(path) }?;

        let mut wtxn = env.write_txn()?;
        let db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(KV_DB_NAME))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB key-value store");

        Ok(Self {
            env: Arc::new(env),
            db,
        })
    }
}

impl KvStore for LmdbKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.put(&mut wtxn, key, value).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let removed = self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        if !removed {
            return Err(
                LmdbError::NotFound(String::from_utf8_lossy(key).into_owned()).into(),
            );
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.is_some())
    }

    fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut upper = prefix.to_vec();
        let bounded = increment_prefix(&mut upper);

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bounds = (
            Bound::Included(prefix),
            if bounded {
                Bound::Excluded(upper.as_slice())
            } else {
                Bound::Unbounded
            },
        );
        let iter = self.db.range(&rtxn, &bounds).map_err(LmdbError::from)?;
        let mut keys = Vec::new();
        for result in iter {
            let (key, _val) = result.map_err(LmdbError::from)?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    fn set_batch(
        &self,
        puts: Vec<(Vec<u8>, Vec<u8>)>,
        deletes: Vec<Vec<u8>>,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for key in &deletes {
            // Absent keys are a no-op inside a batch.
            self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        }
        for (key, value) in &puts {
            self.db.put(&mut wtxn, key, value).map_err(LmdbError::from)?;
        }
        // The only fsync for the whole batch.
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
