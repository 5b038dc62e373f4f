use async_trait::async_trait;

use bistro_core::{RecordId, TenantId};
use bistro_events::{ChangeEnvelope, EventBus};

use super::{Patch, Query, StoreError, Table, Updated};
use crate::rows::TableRow;

/// Publishes a [`ChangeEnvelope`] after every successful insert or update.
///
/// Publication follows the write. A publish failure is logged and does not
/// fail the write.
pub struct RealtimeTable<T, B> {
    inner: T,
    bus: B,
}

impl<T, B> RealtimeTable<T, B> {
    pub fn new(inner: T, bus: B) -> Self {
        Self { inner, bus }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T, B> RealtimeTable<T, B>
where
    B: EventBus<ChangeEnvelope>,
{
    fn publish(&self, envelope: ChangeEnvelope) {
        let topic = envelope.topic();
        if let Err(e) = self.bus.publish(envelope) {
            tracing::warn!(%topic, error = ?e, "realtime publish failed");
        }
    }
}

fn to_json<R: TableRow>(row: &R) -> Option<serde_json::Value> {
    match serde_json::to_value(row) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(table = R::TABLE, error = %e, "row not serializable for realtime");
            None
        }
    }
}

#[async_trait]
impl<R, T, B> Table<R> for RealtimeTable<T, B>
where
    R: TableRow,
    T: Table<R>,
    B: EventBus<ChangeEnvelope>,
{
    async fn select(&self, tenant_id: TenantId, query: Query<R>) -> Result<Vec<R>, StoreError> {
        self.inner.select(tenant_id, query).await
    }

    async fn get(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError> {
        self.inner.get(tenant_id, id).await
    }

    async fn insert(&self, tenant_id: TenantId, row: R) -> Result<R, StoreError> {
        let row = self.inner.insert(tenant_id, row).await?;
        if let Some(json) = to_json(&row) {
            self.publish(ChangeEnvelope::insert(tenant_id, R::TABLE, *row.id(), json));
        }
        Ok(row)
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: RecordId,
        patch: Patch<R>,
    ) -> Result<Updated<R>, StoreError> {
        let updated = self.inner.update(tenant_id, id, patch).await?;
        if let (Some(previous), Some(current)) = (to_json(&updated.previous), to_json(&updated.current)) {
            self.publish(ChangeEnvelope::update(tenant_id, R::TABLE, id, previous, current));
        }
        Ok(updated)
    }
}
