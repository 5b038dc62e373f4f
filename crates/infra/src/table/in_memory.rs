use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use bistro_core::{RecordId, TenantId};

use super::{Patch, Query, StoreError, Table, Updated};
use crate::rows::TableRow;

/// In-memory tenant-isolated table for tests/dev.
#[derive(Debug)]
pub struct InMemoryTable<R> {
    inner: RwLock<HashMap<TenantId, BTreeMap<RecordId, R>>>,
}

impl<R> InMemoryTable<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<R> Default for InMemoryTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: TableRow> Table<R> for InMemoryTable<R> {
    async fn select(&self, tenant_id: TenantId, query: Query<R>) -> Result<Vec<R>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let rows = map
            .get(&tenant_id)
            .into_iter()
            .flat_map(|rows| rows.values().cloned());
        Ok(query.apply(rows))
    }

    async fn get(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&tenant_id).and_then(|rows| rows.get(&id)).cloned())
    }

    async fn insert(&self, tenant_id: TenantId, row: R) -> Result<R, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let rows = map.entry(tenant_id).or_default();
        let id = *row.id();
        if rows.contains_key(&id) {
            return Err(StoreError::Duplicate { table: R::TABLE, id });
        }
        rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        patch: Patch<R>,
    ) -> Result<Updated<R>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let stored = map
            .get_mut(&tenant_id)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or(StoreError::NotFound { table: R::TABLE })?;

        let mut next = stored.clone();
        patch(&mut next)?;
        let previous = std::mem::replace(stored, next.clone());
        Ok(Updated {
            previous,
            current: next,
        })
    }
}
