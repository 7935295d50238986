//! In-memory store for dev/tests.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use brewhouse_core::Entity;

use super::{EntityStore, Sort, StoreError, StoreResult, StoreTx, TxMode};

type KeyGen<K> = Box<dyn Fn() -> K + Send + Sync>;

/// In-memory entity store backed by an `RwLock`'d map.
///
/// Each operation is atomic under the lock, so the transaction handle is a
/// plain token; commit and rollback are no-ops.
pub struct MemoryStore<T: Entity> {
    rows: RwLock<BTreeMap<T::Key, T>>,
    key_gen: Option<KeyGen<T::Key>>,
}

impl<T: Entity> MemoryStore<T> {
    /// Store that mints sequential integer keys, starting at 1.
    pub fn with_serial_keys() -> Self
    where
        T::Key: From<i64>,
    {
        let counter = AtomicI64::new(0);
        Self {
            rows: RwLock::new(BTreeMap::new()),
            key_gen: Some(Box::new(move || {
                T::Key::from(counter.fetch_add(1, Ordering::Relaxed) + 1)
            })),
        }
    }

    /// Store whose callers supply the key (natural keys).
    pub fn with_natural_keys() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            key_gen: None,
        }
    }

    /// Number of stored rows (test helper).
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// No-op transaction token for [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTx;

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self) -> StoreResult<()> {
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("row lock poisoned".to_string())
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryStore<T> {
    type Tx = MemoryTx;

    async fn begin(&self, _mode: TxMode) -> StoreResult<MemoryTx> {
        Ok(MemoryTx)
    }

    async fn save(&self, _tx: &mut MemoryTx, mut entity: T) -> StoreResult<T> {
        let key = match entity.key() {
            Some(key) => key.clone(),
            None => match &self.key_gen {
                Some(key_gen) => {
                    let key = key_gen();
                    entity.set_key(key.clone());
                    key
                }
                None => return Err(StoreError::MissingKey { entity: T::NAME }),
            },
        };

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(key, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, _tx: &mut MemoryTx, key: &T::Key) -> StoreResult<Option<T>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(key).cloned())
    }

    async fn find_all(&self, _tx: &mut MemoryTx, sort: Option<&Sort>) -> StoreResult<Vec<T>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        // BTreeMap iteration is ascending key order.
        let mut all: Vec<T> = rows.values().cloned().collect();
        if let Some(sort) = sort {
            if sort.field == T::KEY_FIELD {
                if sort.descending {
                    all.reverse();
                }
            } else {
                tracing::debug!(
                    entity = T::NAME,
                    field = %sort.field,
                    "memory store only sorts by the key field; leaving key order"
                );
            }
        }
        Ok(all)
    }

    async fn exists_by_id(&self, _tx: &mut MemoryTx, key: &T::Key) -> StoreResult<bool> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.contains_key(key))
    }

    async fn delete_by_id(&self, _tx: &mut MemoryTx, key: &T::Key) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.remove(key);
        Ok(())
    }
}
