use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bistro_core::{RecordId, TenantId};

/// What happened to a row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
        }
    }
}

/// Envelope for a row change on a table, carried on the realtime bus.
///
/// - **Multi-tenancy** is enforced here via `tenant_id`; consumers filter on it.
/// - `row` is the full new row as JSON (the shape of the table's record type).
/// - `previous` is the row before an update, when the store knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEnvelope {
    event_id: Uuid,
    tenant_id: TenantId,
    table: String,
    kind: ChangeKind,
    record_id: RecordId,
    occurred_at: DateTime<Utc>,
    row: serde_json::Value,
    previous: Option<serde_json::Value>,
}

impl ChangeEnvelope {
    pub fn insert(
        tenant_id: TenantId,
        table: impl Into<String>,
        record_id: RecordId,
        row: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            tenant_id,
            table: table.into(),
            kind: ChangeKind::Insert,
            record_id,
            occurred_at: Utc::now(),
            row,
            previous: None,
        }
    }

    pub fn update(
        tenant_id: TenantId,
        table: impl Into<String>,
        record_id: RecordId,
        previous: serde_json::Value,
        row: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            tenant_id,
            table: table.into(),
            kind: ChangeKind::Update,
            record_id,
            occurred_at: Utc::now(),
            row,
            previous: Some(previous),
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn row(&self) -> &serde_json::Value {
        &self.row
    }

    pub fn previous(&self) -> Option<&serde_json::Value> {
        self.previous.as_ref()
    }

    /// Topic name used on the realtime channel, e.g. `interview_resources.insert`.
    pub fn topic(&self) -> String {
        format!("{}.{}", self.table, self.kind.as_str())
    }

    /// Decode the new row into a typed record.
    pub fn decode_row<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.row.clone())
    }

    /// Decode the previous row, if any.
    pub fn decode_previous<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<Result<T, serde_json::Error>> {
        self.previous.clone().map(serde_json::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_combines_table_and_kind() {
        let env = ChangeEnvelope::insert(
            TenantId::new(),
            "interview_resources",
            RecordId::new(),
            serde_json::json!({}),
        );
        assert_eq!(env.topic(), "interview_resources.insert");
        assert!(env.previous().is_none());
    }

    #[test]
    fn update_keeps_previous_row() {
        let env = ChangeEnvelope::update(
            TenantId::new(),
            "inventory_items",
            RecordId::new(),
            serde_json::json!({ "current_stock": 30 }),
            serde_json::json!({ "current_stock": 10 }),
        );
        assert_eq!(env.kind(), ChangeKind::Update);
        assert_eq!(env.previous().unwrap()["current_stock"], 30);
    }
}
