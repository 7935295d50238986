//! Entity service orchestration (application-level).
//!
//! One generic component instead of a copy per entity: the CRUD contract is
//! identical in shape for every entity, parameterized by entity and key type.
//!
//! ## Transaction discipline
//!
//! Every call acquires its own transaction handle from the store — read-only
//! for pure reads, read-write for mutations — commits on success, and rolls
//! back on every error path. No transaction spans more than one call.
//!
//! ## Merge-patch
//!
//! `partial_update` looks up the row, overwrites exactly the fields the patch
//! carries, and persists the merged row — all inside one read-write
//! transaction, so there is no window between lookup and write.

use std::marker::PhantomData;

use thiserror::Error;

use brewhouse_core::{Entity, Patch};

use crate::store::{EntityStore, Sort, StoreError, StoreTx, TxMode};

/// Service-layer error.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation requires an identity the payload does not carry.
    #[error("missing identity")]
    MissingId,

    /// The storage layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Generic CRUD service over one entity store.
pub struct EntityService<T, S> {
    store: S,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S> EntityService<T, S>
where
    T: Entity,
    S: EntityStore<T>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Persist an entity: create (key assigned by the store) or full replace.
    pub async fn save(&self, entity: T) -> Result<T, ServiceError> {
        tracing::debug!(entity = T::NAME, "request to save");
        let mut tx = self.store.begin(TxMode::ReadWrite).await?;
        match self.store.save(&mut tx, entity).await {
            Ok(saved) => {
                tx.commit().await?;
                Ok(saved)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }

    /// Merge-patch an existing row; `None` when no row carries the patch's
    /// identity.
    pub async fn partial_update<P: Patch<T>>(&self, patch: P) -> Result<Option<T>, ServiceError> {
        let Some(key) = patch.key().cloned() else {
            return Err(ServiceError::MissingId);
        };
        tracing::debug!(entity = T::NAME, key = %key, "request to partially update");

        let mut tx = self.store.begin(TxMode::ReadWrite).await?;
        let found = match self.store.find_by_id(&mut tx, &key).await {
            Ok(found) => found,
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        };
        let Some(mut existing) = found else {
            tx.commit().await?;
            return Ok(None);
        };

        patch.apply_to(&mut existing);
        match self.store.save(&mut tx, existing).await {
            Ok(saved) => {
                tx.commit().await?;
                Ok(Some(saved))
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }

    /// All rows, optionally sorted.
    pub async fn find_all(&self, sort: Option<&Sort>) -> Result<Vec<T>, ServiceError> {
        tracing::debug!(entity = T::NAME, "request to get all");
        let mut tx = self.store.begin(TxMode::ReadOnly).await?;
        match self.store.find_all(&mut tx, sort).await {
            Ok(all) => {
                tx.commit().await?;
                Ok(all)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }

    /// One row by key.
    pub async fn find_one(&self, key: &T::Key) -> Result<Option<T>, ServiceError> {
        tracing::debug!(entity = T::NAME, key = %key, "request to get");
        let mut tx = self.store.begin(TxMode::ReadOnly).await?;
        match self.store.find_by_id(&mut tx, key).await {
            Ok(found) => {
                tx.commit().await?;
                Ok(found)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }

    /// Existence probe used by transport precondition checks.
    pub async fn exists(&self, key: &T::Key) -> Result<bool, ServiceError> {
        let mut tx = self.store.begin(TxMode::ReadOnly).await?;
        match self.store.exists_by_id(&mut tx, key).await {
            Ok(exists) => {
                tx.commit().await?;
                Ok(exists)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }

    /// Remove a row; absent rows are a no-op.
    pub async fn delete(&self, key: &T::Key) -> Result<(), ServiceError> {
        tracing::debug!(entity = T::NAME, key = %key, "request to delete");
        let mut tx = self.store.begin(TxMode::ReadWrite).await?;
        match self.store.delete_by_id(&mut tx, key).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use brewhouse_catalog::{Coffee, CoffeePatch};

    fn coffee_service() -> EntityService<Coffee, MemoryStore<Coffee>> {
        EntityService::new(MemoryStore::with_serial_keys())
    }

    #[tokio::test]
    async fn save_assigns_an_unused_key_and_keeps_fields() {
        let service = coffee_service();

        let saved = service.save(Coffee::new("Espresso", 2.5)).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.name, "Espresso");
        assert_eq!(saved.price, 2.5);

        let again = service.save(Coffee::new("Latte", 4.0)).await.unwrap();
        assert_ne!(again.id, saved.id);
    }

    #[tokio::test]
    async fn save_with_key_replaces_all_fields() {
        let service = coffee_service();
        let saved = service.save(Coffee::new("Espresso", 2.5)).await.unwrap();

        let replacement = Coffee {
            id: saved.id,
            name: "Ristretto".to_string(),
            price: 2.8,
        };
        service.save(replacement.clone()).await.unwrap();

        let found = service.find_one(&saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found, replacement);
        assert_eq!(service.find_all(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn partial_update_merges_present_fields_only() {
        let service = coffee_service();
        let saved = service.save(Coffee::new("Espresso", 2.5)).await.unwrap();

        let merged = service
            .partial_update(CoffeePatch {
                id: saved.id,
                name: None,
                price: Some(2.9),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(merged.name, "Espresso");
        assert_eq!(merged.price, 2.9);

        let found = service.find_one(&saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found, merged);
    }

    #[tokio::test]
    async fn partial_update_of_missing_row_is_none() {
        let service = coffee_service();

        let result = service
            .partial_update(CoffeePatch {
                id: Some(404),
                name: Some("Ghost".to_string()),
                price: None,
            })
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(service.find_all(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_update_without_identity_is_an_error() {
        let service = coffee_service();

        let err = service
            .partial_update(CoffeePatch {
                id: None,
                name: Some("Nameless".to_string()),
                price: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::MissingId));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row() {
        let service = coffee_service();
        let first = service.save(Coffee::new("Espresso", 2.5)).await.unwrap();
        service.save(Coffee::new("Latte", 4.0)).await.unwrap();

        service.delete(&first.id.unwrap()).await.unwrap();

        let all = service.find_all(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(service.find_one(&first.id.unwrap()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_unknown_key_succeeds() {
        let service = coffee_service();
        service.delete(&12345).await.unwrap();
    }

    #[tokio::test]
    async fn exists_tracks_the_lifecycle() {
        let service = coffee_service();
        assert!(!service.exists(&1).await.unwrap());

        let saved = service.save(Coffee::new("Espresso", 2.5)).await.unwrap();
        assert!(service.exists(&saved.id.unwrap()).await.unwrap());

        service.delete(&saved.id.unwrap()).await.unwrap();
        assert!(!service.exists(&saved.id.unwrap()).await.unwrap());
    }
}
