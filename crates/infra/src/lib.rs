//! Infrastructure layer: store adapters, transaction handles, entity services.

pub mod service;
pub mod store;

pub use service::{EntityService, ServiceError};
pub use store::{EntityStore, MemoryStore, Sort, StoreError, StoreResult, StoreTx, TxMode};
