//! Store adapters: translate entity operations into data-store operations.
//!
//! Every operation takes an explicit transaction handle acquired from
//! [`EntityStore::begin`]; the service layer commits or rolls back on each
//! exit path. Absence is represented by empty results, never by errors.

use async_trait::async_trait;
use thiserror::Error;

use brewhouse_core::Entity;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{MemoryStore, MemoryTx};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity carries no key and this store cannot mint one.
    #[error("{entity} has no identity and the store cannot assign one")]
    MissingKey { entity: &'static str },

    /// The storage backend failed (connection, SQL, poisoned lock).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Transaction scope requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// Sort directive, parsed from the wire format `field`, `field,asc` or
/// `field,desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(2, ',');
        let field = parts.next()?.trim();
        if field.is_empty() {
            return None;
        }
        let descending = parts
            .next()
            .map(|dir| dir.trim().eq_ignore_ascii_case("desc"))
            .unwrap_or(false);
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }
}

/// Transaction handle: scoped to a single service call.
///
/// Implementations must make dropping without commit equivalent to rollback.
#[async_trait]
pub trait StoreTx: Send {
    async fn commit(self) -> StoreResult<()>;
    async fn rollback(self) -> StoreResult<()>;
}

/// Store adapter contract for one entity type.
///
/// A leaf component: no logic beyond translation. "Not found" is an empty
/// result at this layer, and `delete_by_id` of an absent row is a no-op.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    type Tx: StoreTx;

    /// Acquire a transaction handle in the requested mode.
    async fn begin(&self, mode: TxMode) -> StoreResult<Self::Tx>;

    /// Persist the entity and return the stored row.
    ///
    /// A missing key is assigned by the store (sequence-keyed entities); a
    /// present key replaces the stored row (upsert).
    async fn save(&self, tx: &mut Self::Tx, entity: T) -> StoreResult<T>;

    async fn find_by_id(&self, tx: &mut Self::Tx, key: &T::Key) -> StoreResult<Option<T>>;

    /// All rows; ordering unspecified unless a sort directive is supplied.
    async fn find_all(&self, tx: &mut Self::Tx, sort: Option<&Sort>) -> StoreResult<Vec<T>>;

    async fn exists_by_id(&self, tx: &mut Self::Tx, key: &T::Key) -> StoreResult<bool>;

    async fn delete_by_id(&self, tx: &mut Self::Tx, key: &T::Key) -> StoreResult<()>;
}
