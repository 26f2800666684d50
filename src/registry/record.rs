use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

/// A persisted schema document for one event type, plus metadata.
///
/// Records are immutable once created: the store assigns `id` and
/// `created_at` exactly once, and no update or delete path exists.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub event_type: String,
    pub source: String,
    pub schema_body: String,
    pub is_public: bool,
}

impl SchemaRecord {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            created_at: row.get("created_at"),
            event_type: row.get("event_type"),
            source: row.get("source"),
            schema_body: row.get("schema_body"),
            is_public: row.get("is_public"),
        }
    }
}
