//! Service wiring: store backend selection + per-entity CRUD services.
//!
//! Mirrors the deployment split: in-memory stores for dev/tests, postgres
//! stores behind the `postgres` feature when `DATABASE_URL` is set.

use brewhouse_auth::Authority;
use brewhouse_catalog::{Coffee, CoffeePatch};
use brewhouse_core::Entity;
use brewhouse_customers::{Customer, CustomerPatch};
use brewhouse_infra::service::{EntityService, ServiceError};
use brewhouse_infra::store::{MemoryStore, Sort};

#[cfg(feature = "postgres")]
use brewhouse_infra::store::postgres::{PgAuthorityStore, PgCoffeeStore, PgCustomerStore};
#[cfg(feature = "postgres")]
use sqlx::PgPool;

pub enum AppServices {
    InMemory {
        coffees: EntityService<Coffee, MemoryStore<Coffee>>,
        customers: EntityService<Customer, MemoryStore<Customer>>,
        authorities: EntityService<Authority, MemoryStore<Authority>>,
    },
    #[cfg(feature = "postgres")]
    Postgres {
        coffees: EntityService<Coffee, PgCoffeeStore>,
        customers: EntityService<Customer, PgCustomerStore>,
        authorities: EntityService<Authority, PgAuthorityStore>,
    },
}

pub fn build_in_memory_services() -> AppServices {
    AppServices::InMemory {
        coffees: EntityService::new(MemoryStore::with_serial_keys()),
        customers: EntityService::new(MemoryStore::with_serial_keys()),
        authorities: EntityService::new(MemoryStore::with_natural_keys()),
    }
}

#[cfg(feature = "postgres")]
pub fn build_postgres_services(pool: PgPool) -> AppServices {
    AppServices::Postgres {
        coffees: EntityService::new(PgCoffeeStore::new(pool.clone())),
        customers: EntityService::new(PgCustomerStore::new(pool.clone())),
        authorities: EntityService::new(PgAuthorityStore::new(pool)),
    }
}

/// Pick the store backend: postgres when compiled in and `DATABASE_URL` is
/// set and reachable, in-memory otherwise.
pub async fn build_services() -> AppServices {
    #[cfg(feature = "postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        match PgPool::connect(&url).await {
            Ok(pool) => {
                tracing::info!("using postgres store backend");
                return build_postgres_services(pool);
            }
            Err(err) => {
                tracing::warn!(%err, "DATABASE_URL set but unreachable; using in-memory stores");
            }
        }
    }

    build_in_memory_services()
}

// Per-entity delegate methods: same CRUD surface regardless of backend.
macro_rules! entity_services {
    (
        $field:ident : $entity:ty {
            save: $save:ident,
            find_all: $find_all:ident,
            find_one: $find_one:ident,
            exists: $exists:ident,
            delete: $delete:ident
            $(, partial_update($patch:ty): $partial_update:ident)?
        }
    ) => {
        impl AppServices {
            pub async fn $save(&self, entity: $entity) -> Result<$entity, ServiceError> {
                match self {
                    Self::InMemory { $field, .. } => $field.save(entity).await,
                    #[cfg(feature = "postgres")]
                    Self::Postgres { $field, .. } => $field.save(entity).await,
                }
            }

            pub async fn $find_all(
                &self,
                sort: Option<&Sort>,
            ) -> Result<Vec<$entity>, ServiceError> {
                match self {
                    Self::InMemory { $field, .. } => $field.find_all(sort).await,
                    #[cfg(feature = "postgres")]
                    Self::Postgres { $field, .. } => $field.find_all(sort).await,
                }
            }

            pub async fn $find_one(
                &self,
                key: &<$entity as Entity>::Key,
            ) -> Result<Option<$entity>, ServiceError> {
                match self {
                    Self::InMemory { $field, .. } => $field.find_one(key).await,
                    #[cfg(feature = "postgres")]
                    Self::Postgres { $field, .. } => $field.find_one(key).await,
                }
            }

            pub async fn $exists(
                &self,
                key: &<$entity as Entity>::Key,
            ) -> Result<bool, ServiceError> {
                match self {
                    Self::InMemory { $field, .. } => $field.exists(key).await,
                    #[cfg(feature = "postgres")]
                    Self::Postgres { $field, .. } => $field.exists(key).await,
                }
            }

            pub async fn $delete(
                &self,
                key: &<$entity as Entity>::Key,
            ) -> Result<(), ServiceError> {
                match self {
                    Self::InMemory { $field, .. } => $field.delete(key).await,
                    #[cfg(feature = "postgres")]
                    Self::Postgres { $field, .. } => $field.delete(key).await,
                }
            }

            $(
                pub async fn $partial_update(
                    &self,
                    patch: $patch,
                ) -> Result<Option<$entity>, ServiceError> {
                    match self {
                        Self::InMemory { $field, .. } => $field.partial_update(patch).await,
                        #[cfg(feature = "postgres")]
                        Self::Postgres { $field, .. } => $field.partial_update(patch).await,
                    }
                }
            )?
        }
    };
}

entity_services!(coffees: Coffee {
    save: coffees_save,
    find_all: coffees_find_all,
    find_one: coffees_find_one,
    exists: coffees_exists,
    delete: coffees_delete,
    partial_update(CoffeePatch): coffees_partial_update
});

entity_services!(customers: Customer {
    save: customers_save,
    find_all: customers_find_all,
    find_one: customers_find_one,
    exists: customers_exists,
    delete: customers_delete,
    partial_update(CustomerPatch): customers_partial_update
});

entity_services!(authorities: Authority {
    save: authorities_save,
    find_all: authorities_find_all,
    find_one: authorities_find_one,
    exists: authorities_exists,
    delete: authorities_delete
});
