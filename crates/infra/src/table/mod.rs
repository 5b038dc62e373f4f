//! Tenant-isolated table storage.
//!
//! Every row lives under a `(tenant, table, id)` key. Stores expose four
//! operations: `select`, `get`, `insert`, `update`. There is no delete.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use bistro_core::{DomainError, DomainResult, RecordId, TenantId};

use crate::rows::TableRow;

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod realtime;

pub use in_memory::InMemoryTable;
#[cfg(feature = "postgres")]
pub use postgres::PostgresTable;
pub use realtime::RealtimeTable;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{table} row not found")]
    NotFound { table: &'static str },

    #[error("{table} row {id} already exists")]
    Duplicate { table: &'static str, id: RecordId },

    /// A patch refused the change; the stored row is untouched.
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error("row codec error in {table}: {message}")]
    Codec { table: &'static str, message: String },

    #[error("store backend error in {operation}: {message}")]
    Backend { operation: &'static str, message: String },

    #[error("store lock poisoned")]
    Poisoned,
}

/// In-place edit of a stored row. Returning `Err` aborts the update.
pub type Patch<R> = Box<dyn FnOnce(&mut R) -> DomainResult<()> + Send>;

/// Both sides of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<R> {
    pub previous: R,
    pub current: R,
}

type Filter<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;
type Order<R> = Box<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// Row filters, an ordering and an optional limit.
///
/// Rows without an explicit ordering come back in id order, which for v7 ids
/// is insertion order.
pub struct Query<R> {
    filters: Vec<Filter<R>>,
    order: Option<Order<R>>,
    limit: Option<usize>,
}

impl<R> Default for Query<R> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl<R> Query<R> {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, f: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(f));
        self
    }

    pub fn order_by(mut self, cmp: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static) -> Self {
        self.order = Some(Box::new(cmp));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn matches(&self, row: &R) -> bool {
        self.filters.iter().all(|f| f(row))
    }

    /// Filter, sort and truncate rows already in id order.
    pub fn apply(&self, rows: impl IntoIterator<Item = R>) -> Vec<R> {
        let mut out: Vec<R> = rows.into_iter().filter(|r| self.matches(r)).collect();
        if let Some(order) = &self.order {
            out.sort_by(|a, b| order(a, b));
        }
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

impl<R> core::fmt::Debug for Query<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters.len())
            .field("ordered", &self.order.is_some())
            .field("limit", &self.limit)
            .finish()
    }
}

#[async_trait]
pub trait Table<R: TableRow>: Send + Sync {
    async fn select(&self, tenant_id: TenantId, query: Query<R>) -> Result<Vec<R>, StoreError>;

    async fn get(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the id is taken.
    async fn insert(&self, tenant_id: TenantId, row: R) -> Result<R, StoreError>;

    /// Apply `patch` to a copy of the stored row and write it back.
    ///
    /// The stored row is left unchanged when the patch fails.
    async fn update(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        patch: Patch<R>,
    ) -> Result<Updated<R>, StoreError>;
}

#[async_trait]
impl<R, T> Table<R> for Arc<T>
where
    R: TableRow,
    T: Table<R> + ?Sized,
{
    async fn select(&self, tenant_id: TenantId, query: Query<R>) -> Result<Vec<R>, StoreError> {
        (**self).select(tenant_id, query).await
    }

    async fn get(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError> {
        (**self).get(tenant_id, id).await
    }

    async fn insert(&self, tenant_id: TenantId, row: R) -> Result<R, StoreError> {
        (**self).insert(tenant_id, row).await
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        patch: Patch<R>,
    ) -> Result<Updated<R>, StoreError> {
        (**self).update(tenant_id, id, patch).await
    }
}
