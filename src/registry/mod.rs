//! Schema Store
//!
//! Persistence and querying for schema records. The store holds one
//! logical collection of immutable records; the production backend is
//! PostgreSQL, with an in-memory backend for tests and local runs.

mod record;
mod store;

pub use record::SchemaRecord;
pub use store::{MemorySchemaStore, PostgresSchemaStore, SchemaStore};
