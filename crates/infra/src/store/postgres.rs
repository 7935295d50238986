//! Postgres-backed entity stores.
//!
//! One concrete store per entity over a shared connection pool. Upserts use
//! `INSERT … ON CONFLICT … DO UPDATE`; key assignment is the table sequence.
//! The expected schema lives in `schema.sql` next to this crate.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use brewhouse_auth::Authority;
use brewhouse_catalog::Coffee;
use brewhouse_customers::Customer;

use super::{EntityStore, Sort, StoreError, StoreResult, StoreTx, TxMode};

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Postgres transaction handle. Dropping without commit rolls back (sqlx
/// default).
pub struct PgTx {
    inner: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self) -> StoreResult<()> {
        self.inner.commit().await.map_err(backend)
    }

    async fn rollback(self) -> StoreResult<()> {
        self.inner.rollback().await.map_err(backend)
    }
}

async fn begin_tx(pool: &PgPool, mode: TxMode) -> StoreResult<PgTx> {
    let mut inner = pool.begin().await.map_err(backend)?;
    if mode == TxMode::ReadOnly {
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *inner)
            .await
            .map_err(backend)?;
    }
    Ok(PgTx { inner })
}

/// `ORDER BY` clause for a sort directive, restricted to a per-entity column
/// whitelist; unknown fields fall back to unordered.
fn order_clause(sort: Option<&Sort>, allowed: &[&str]) -> String {
    match sort {
        Some(sort) if allowed.contains(&sort.field.as_str()) => {
            let direction = if sort.descending { "DESC" } else { "ASC" };
            format!(" ORDER BY {} {}", sort.field, direction)
        }
        Some(sort) => {
            tracing::debug!(field = %sort.field, "ignoring sort on unknown column");
            String::new()
        }
        None => String::new(),
    }
}

// -------------------------
// Coffee
// -------------------------

const COFFEE_COLUMNS: &str = "id, name, price";
const COFFEE_SORTABLE: &[&str] = &["id", "name", "price"];

pub struct PgCoffeeStore {
    pool: PgPool,
}

impl PgCoffeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn coffee_from_row(row: &PgRow) -> StoreResult<Coffee> {
    Ok(Coffee {
        id: Some(row.try_get("id").map_err(backend)?),
        name: row.try_get("name").map_err(backend)?,
        price: row.try_get("price").map_err(backend)?,
    })
}

#[async_trait]
impl EntityStore<Coffee> for PgCoffeeStore {
    type Tx = PgTx;

    async fn begin(&self, mode: TxMode) -> StoreResult<PgTx> {
        begin_tx(&self.pool, mode).await
    }

    async fn save(&self, tx: &mut PgTx, entity: Coffee) -> StoreResult<Coffee> {
        let row = match entity.id {
            Some(id) => {
                sqlx::query(
                    "INSERT INTO coffee (id, name, price) VALUES ($1, $2, $3) \
                     ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, price = EXCLUDED.price \
                     RETURNING id, name, price",
                )
                .bind(id)
                .bind(&entity.name)
                .bind(entity.price)
                .fetch_one(&mut *tx.inner)
                .await
                .map_err(backend)?
            }
            None => {
                sqlx::query("INSERT INTO coffee (name, price) VALUES ($1, $2) RETURNING id, name, price")
                    .bind(&entity.name)
                    .bind(entity.price)
                    .fetch_one(&mut *tx.inner)
                    .await
                    .map_err(backend)?
            }
        };
        coffee_from_row(&row)
    }

    async fn find_by_id(&self, tx: &mut PgTx, key: &i64) -> StoreResult<Option<Coffee>> {
        let row = sqlx::query(&format!("SELECT {COFFEE_COLUMNS} FROM coffee WHERE id = $1"))
            .bind(key)
            .fetch_optional(&mut *tx.inner)
            .await
            .map_err(backend)?;
        row.as_ref().map(coffee_from_row).transpose()
    }

    async fn find_all(&self, tx: &mut PgTx, sort: Option<&Sort>) -> StoreResult<Vec<Coffee>> {
        let sql = format!(
            "SELECT {COFFEE_COLUMNS} FROM coffee{}",
            order_clause(sort, COFFEE_SORTABLE)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *tx.inner)
            .await
            .map_err(backend)?;
        rows.iter().map(coffee_from_row).collect()
    }

    async fn exists_by_id(&self, tx: &mut PgTx, key: &i64) -> StoreResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM coffee WHERE id = $1)")
            .bind(key)
            .fetch_one(&mut *tx.inner)
            .await
            .map_err(backend)?;
        row.try_get(0).map_err(backend)
    }

    async fn delete_by_id(&self, tx: &mut PgTx, key: &i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM coffee WHERE id = $1")
            .bind(key)
            .execute(&mut *tx.inner)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

// -------------------------
// Customer
// -------------------------

const CUSTOMER_COLUMNS: &str = "id, name, phone_number";
const CUSTOMER_SORTABLE: &[&str] = &["id", "name", "phone_number"];

pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn customer_from_row(row: &PgRow) -> StoreResult<Customer> {
    Ok(Customer {
        id: Some(row.try_get("id").map_err(backend)?),
        name: row.try_get("name").map_err(backend)?,
        phone_number: row.try_get("phone_number").map_err(backend)?,
    })
}

#[async_trait]
impl EntityStore<Customer> for PgCustomerStore {
    type Tx = PgTx;

    async fn begin(&self, mode: TxMode) -> StoreResult<PgTx> {
        begin_tx(&self.pool, mode).await
    }

    async fn save(&self, tx: &mut PgTx, entity: Customer) -> StoreResult<Customer> {
        let row = match entity.id {
            Some(id) => {
                sqlx::query(
                    "INSERT INTO customer (id, name, phone_number) VALUES ($1, $2, $3) \
                     ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, phone_number = EXCLUDED.phone_number \
                     RETURNING id, name, phone_number",
                )
                .bind(id)
                .bind(&entity.name)
                .bind(&entity.phone_number)
                .fetch_one(&mut *tx.inner)
                .await
                .map_err(backend)?
            }
            None => {
                sqlx::query(
                    "INSERT INTO customer (name, phone_number) VALUES ($1, $2) \
                     RETURNING id, name, phone_number",
                )
                .bind(&entity.name)
                .bind(&entity.phone_number)
                .fetch_one(&mut *tx.inner)
                .await
                .map_err(backend)?
            }
        };
        customer_from_row(&row)
    }

    async fn find_by_id(&self, tx: &mut PgTx, key: &i64) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(&mut *tx.inner)
        .await
        .map_err(backend)?;
        row.as_ref().map(customer_from_row).transpose()
    }

    async fn find_all(&self, tx: &mut PgTx, sort: Option<&Sort>) -> StoreResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer{}",
            order_clause(sort, CUSTOMER_SORTABLE)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *tx.inner)
            .await
            .map_err(backend)?;
        rows.iter().map(customer_from_row).collect()
    }

    async fn exists_by_id(&self, tx: &mut PgTx, key: &i64) -> StoreResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM customer WHERE id = $1)")
            .bind(key)
            .fetch_one(&mut *tx.inner)
            .await
            .map_err(backend)?;
        row.try_get(0).map_err(backend)
    }

    async fn delete_by_id(&self, tx: &mut PgTx, key: &i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(key)
            .execute(&mut *tx.inner)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

// -------------------------
// Authority
// -------------------------

pub struct PgAuthorityStore {
    pool: PgPool,
}

impl PgAuthorityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn authority_from_row(row: &PgRow) -> StoreResult<Authority> {
    Ok(Authority {
        name: row.try_get("name").map_err(backend)?,
    })
}

#[async_trait]
impl EntityStore<Authority> for PgAuthorityStore {
    type Tx = PgTx;

    async fn begin(&self, mode: TxMode) -> StoreResult<PgTx> {
        begin_tx(&self.pool, mode).await
    }

    async fn save(&self, tx: &mut PgTx, entity: Authority) -> StoreResult<Authority> {
        // The name is the whole row; a conflict leaves it untouched.
        let row = sqlx::query(
            "INSERT INTO authority (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING name",
        )
        .bind(&entity.name)
        .fetch_one(&mut *tx.inner)
        .await
        .map_err(backend)?;
        authority_from_row(&row)
    }

    async fn find_by_id(&self, tx: &mut PgTx, key: &String) -> StoreResult<Option<Authority>> {
        let row = sqlx::query("SELECT name FROM authority WHERE name = $1")
            .bind(key)
            .fetch_optional(&mut *tx.inner)
            .await
            .map_err(backend)?;
        row.as_ref().map(authority_from_row).transpose()
    }

    async fn find_all(&self, tx: &mut PgTx, sort: Option<&Sort>) -> StoreResult<Vec<Authority>> {
        let sql = format!(
            "SELECT name FROM authority{}",
            order_clause(sort, &["name"])
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *tx.inner)
            .await
            .map_err(backend)?;
        rows.iter().map(authority_from_row).collect()
    }

    async fn exists_by_id(&self, tx: &mut PgTx, key: &String) -> StoreResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM authority WHERE name = $1)")
            .bind(key)
            .fetch_one(&mut *tx.inner)
            .await
            .map_err(backend)?;
        row.try_get(0).map_err(backend)
    }

    async fn delete_by_id(&self, tx: &mut PgTx, key: &String) -> StoreResult<()> {
        sqlx::query("DELETE FROM authority WHERE name = $1")
            .bind(key)
            .execute(&mut *tx.inner)
            .await
            .map_err(backend)?;
        Ok(())
    }
}
