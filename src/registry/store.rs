//! Storage backends for schema records.
//!
//! `SchemaStore` is the contract between the HTTP layer and persistence:
//! create, exact lookup by event type, and the ordered public listing.
//! Filtering and ordering are pushed down to the backend, which is the
//! long-term source of truth and may hold more public records than fit
//! comfortably in memory.

use crate::config::Config;
use crate::error::Result;
use crate::registry::SchemaRecord;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::{Config as PoolConfig, Pool, Runtime};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_postgres::NoTls;
use tracing::info;

/// Persistence contract for schema records.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Persist a new record with a store-assigned id and timestamp.
    ///
    /// Publishing never makes a record public; flipping the flag is an
    /// administrative edit performed directly in the store.
    async fn create(&self, event_type: &str, source: &str, schema_body: &str)
        -> Result<SchemaRecord>;

    /// Exact, case-sensitive lookup. `Ok(None)` means the store was
    /// reachable but holds no match, which is distinct from a failure.
    async fn find_one_by_type(&self, event_type: &str) -> Result<Option<SchemaRecord>>;

    /// All public records, ordered by event type ascending.
    async fn list_public_ordered_by_type(&self) -> Result<Vec<SchemaRecord>>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<()>;
}

const BOOTSTRAP_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_records (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    event_type TEXT NOT NULL,
    source TEXT NOT NULL,
    schema_body TEXT NOT NULL,
    is_public BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE INDEX IF NOT EXISTS schema_records_event_type_idx
    ON schema_records (event_type);
";

const RECORD_COLUMNS: &str = "id, created_at, event_type, source, schema_body, is_public";

/// PostgreSQL-backed store.
///
/// Each operation checks a client out of the pool for its duration; the
/// guard returns it on every exit path, including errors.
pub struct PostgresSchemaStore {
    pool: Pool,
}

impl PostgresSchemaStore {
    /// Build the pool, verify the store is reachable, and bootstrap the
    /// collection. Failure here is fatal at startup, not per-request.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database_url, config.max_pool_size)?;

        let client = pool
            .get()
            .await
            .context("Failed to connect to PostgreSQL")?;
        client
            .batch_execute(BOOTSTRAP_SQL)
            .await
            .context("Failed to bootstrap schema_records")?;

        info!("Connected to PostgreSQL schema store");

        Ok(Self { pool })
    }
}

#[async_trait]
impl SchemaStore for PostgresSchemaStore {
    async fn create(
        &self,
        event_type: &str,
        source: &str,
        schema_body: &str,
    ) -> Result<SchemaRecord> {
        let client = self.pool.get().await?;

        // Single INSERT .. RETURNING: the record either exists with every
        // field set, or not at all.
        let statement = format!(
            "INSERT INTO schema_records (event_type, source, schema_body, is_public) \
             VALUES ($1, $2, $3, FALSE) RETURNING {}",
            RECORD_COLUMNS
        );
        let row = client
            .query_one(statement.as_str(), &[&event_type, &source, &schema_body])
            .await?;

        Ok(SchemaRecord::from_row(&row))
    }

    async fn find_one_by_type(&self, event_type: &str) -> Result<Option<SchemaRecord>> {
        let client = self.pool.get().await?;

        // Lowest id wins among duplicates so repeated lookups agree.
        let statement = format!(
            "SELECT {} FROM schema_records WHERE event_type = $1 ORDER BY id LIMIT 1",
            RECORD_COLUMNS
        );
        let row = client.query_opt(statement.as_str(), &[&event_type]).await?;

        Ok(row.map(|r| SchemaRecord::from_row(&r)))
    }

    async fn list_public_ordered_by_type(&self) -> Result<Vec<SchemaRecord>> {
        let client = self.pool.get().await?;

        // COLLATE "C" keeps the ordering byte-wise rather than
        // locale-dependent.
        let statement = format!(
            "SELECT {} FROM schema_records WHERE is_public \
             ORDER BY event_type COLLATE \"C\", id",
            RECORD_COLUMNS
        );
        let rows = client.query(statement.as_str(), &[]).await?;

        Ok(rows.iter().map(SchemaRecord::from_row).collect())
    }

    async fn ping(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client.execute("SELECT 1", &[]).await?;
        Ok(())
    }
}

fn create_pool(database_url: &str, max_size: u32) -> anyhow::Result<Pool> {
    let mut cfg = PoolConfig::new();
    cfg.url = Some(database_url.to_string());

    cfg.pool = Some(deadpool_postgres::PoolConfig {
        max_size: max_size as usize,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(Duration::from_secs(5)),
            create: Some(Duration::from_secs(5)),
            recycle: Some(Duration::from_secs(5)),
        },
        ..Default::default()
    });

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| anyhow::anyhow!("Failed to create pool: {}", e))
}

/// In-memory store implementing the same contract, for tests and local
/// runs without a database.
pub struct MemorySchemaStore {
    records: RwLock<Vec<SchemaRecord>>,
    next_id: AtomicI64,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Flip a stored record public. No API path does this; it stands in
    /// for the administrative edit made directly in a real store.
    pub async fn set_public(&self, id: i64) -> bool {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.is_public = true;
                true
            }
            None => false,
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for MemorySchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn create(
        &self,
        event_type: &str,
        source: &str,
        schema_body: &str,
    ) -> Result<SchemaRecord> {
        let record = SchemaRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            created_at: Utc::now(),
            event_type: event_type.to_string(),
            source: source.to_string(),
            schema_body: schema_body.to_string(),
            is_public: false,
        };

        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_one_by_type(&self, event_type: &str) -> Result<Option<SchemaRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.event_type == event_type)
            .min_by_key(|r| r.id)
            .cloned())
    }

    async fn list_public_ordered_by_type(&self) -> Result<Vec<SchemaRecord>> {
        let records = self.records.read().await;
        let mut public: Vec<SchemaRecord> =
            records.iter().filter(|r| r.is_public).cloned().collect();
        public.sort_by(|a, b| {
            a.event_type
                .cmp(&b.event_type)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(public)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
