//! Postgres-backed table store.
//!
//! All tables share one `bistro_rows` relation holding JSONB rows keyed by
//! `(tenant_id, table_name, id)`. Queries load the tenant's rows for one table
//! and filter in process.
//!
//! ## Error mapping
//!
//! | SQLx error | Code | StoreError |
//! |------------|------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed / other | n/a | `Backend` |

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use bistro_core::{RecordId, TenantId};

use super::{Patch, Query, StoreError, Table, Updated};
use crate::rows::TableRow;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bistro_rows (
    tenant_id   UUID        NOT NULL,
    table_name  TEXT        NOT NULL,
    id          UUID        NOT NULL,
    row         JSONB       NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (tenant_id, table_name, id)
)
"#;

/// Create the backing relation if it does not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}

pub struct PostgresTable<R> {
    pool: Arc<PgPool>,
    _row: PhantomData<fn() -> R>,
}

impl<R> PostgresTable<R> {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            _row: PhantomData,
        }
    }
}

impl<R> Clone for PostgresTable<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

fn encode<R: TableRow>(row: &R) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(row).map_err(|e| StoreError::Codec {
        table: R::TABLE,
        message: e.to_string(),
    })
}

fn decode<R: TableRow>(value: serde_json::Value) -> Result<R, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Codec {
        table: R::TABLE,
        message: e.to_string(),
    })
}

#[async_trait]
impl<R: TableRow> Table<R> for PostgresTable<R> {
    #[instrument(skip(self, query), fields(table = R::TABLE, tenant_id = %tenant_id), err)]
    async fn select(&self, tenant_id: TenantId, query: Query<R>) -> Result<Vec<R>, StoreError> {
        let rows = sqlx::query(
            "SELECT row FROM bistro_rows WHERE tenant_id = $1 AND table_name = $2 ORDER BY id ASC",
        )
        .bind(tenant_id.as_uuid())
        .bind(R::TABLE)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("select", e))?;

        let decoded = rows
            .into_iter()
            .map(|r| {
                let value: serde_json::Value =
                    r.try_get("row").map_err(|e| map_sqlx_error("select", e))?;
                decode::<R>(value)
            })
            .collect::<Result<Vec<R>, StoreError>>()?;

        Ok(query.apply(decoded))
    }

    #[instrument(skip(self), fields(table = R::TABLE, tenant_id = %tenant_id), err)]
    async fn get(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError> {
        let row = sqlx::query(
            "SELECT row FROM bistro_rows WHERE tenant_id = $1 AND table_name = $2 AND id = $3",
        )
        .bind(tenant_id.as_uuid())
        .bind(R::TABLE)
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|r| {
            let value: serde_json::Value = r.try_get("row").map_err(|e| map_sqlx_error("get", e))?;
            decode::<R>(value)
        })
        .transpose()
    }

    #[instrument(skip(self, row), fields(table = R::TABLE, tenant_id = %tenant_id), err)]
    async fn insert(&self, tenant_id: TenantId, row: R) -> Result<R, StoreError> {
        let id = *row.id();
        let value = encode(&row)?;

        sqlx::query("INSERT INTO bistro_rows (tenant_id, table_name, id, row) VALUES ($1, $2, $3, $4)")
            .bind(tenant_id.as_uuid())
            .bind(R::TABLE)
            .bind(id.as_uuid())
            .bind(value)
            .execute(&*self.pool)
            .await
            .map_err(|e| match map_sqlx_error("insert", e) {
                StoreError::Backend { message, .. } if message.starts_with(UNIQUE_VIOLATION) => {
                    StoreError::Duplicate { table: R::TABLE, id }
                }
                other => other,
            })?;

        Ok(row)
    }

    #[instrument(skip(self, patch), fields(table = R::TABLE, tenant_id = %tenant_id), err)]
    async fn update(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        patch: Patch<R>,
    ) -> Result<Updated<R>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update.begin", e))?;

        let stored = sqlx::query(
            "SELECT row FROM bistro_rows WHERE tenant_id = $1 AND table_name = $2 AND id = $3 FOR UPDATE",
        )
        .bind(tenant_id.as_uuid())
        .bind(R::TABLE)
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update.load", e))?
        .ok_or(StoreError::NotFound { table: R::TABLE })?;

        let value: serde_json::Value = stored
            .try_get("row")
            .map_err(|e| map_sqlx_error("update.load", e))?;
        let previous = decode::<R>(value)?;

        // Dropping `tx` on error rolls back.
        let mut current = previous.clone();
        patch(&mut current)?;

        sqlx::query(
            "UPDATE bistro_rows SET row = $4, updated_at = NOW() WHERE tenant_id = $1 AND table_name = $2 AND id = $3",
        )
        .bind(tenant_id.as_uuid())
        .bind(R::TABLE)
        .bind(id.as_uuid())
        .bind(encode(&current)?)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update.write", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update.commit", e))?;

        Ok(Updated { previous, current })
    }
}

const UNIQUE_VIOLATION: &str = "unique violation";

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = match db_err.code().as_deref() {
                Some("23505") => format!("{UNIQUE_VIOLATION}: {}", db_err.message()),
                _ => db_err.message().to_string(),
            };
            StoreError::Backend { operation, message }
        }
        sqlx::Error::PoolClosed => StoreError::Backend {
            operation,
            message: "connection pool closed".to_string(),
        },
        other => StoreError::Backend {
            operation,
            message: other.to_string(),
        },
    }
}
