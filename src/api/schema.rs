use crate::api::AppState;
use crate::error::{RegistryError, Result};
use crate::registry::SchemaRecord;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Strip a `.json` suffix from a requested type.
///
/// The rule is a literal last-index truncation, not a suffix check: the
/// last occurrence of `.json` anywhere in the string cuts it off, and an
/// occurrence at index 0 is left alone. Existing producers and consumers
/// depend on these exact semantics.
pub fn strip_json_suffix(event_type: &str) -> &str {
    match event_type.rfind(".json") {
        Some(idx) if idx > 0 => &event_type[..idx],
        _ => event_type,
    }
}

async fn find_schema(state: &AppState, event_type: &str) -> Result<SchemaRecord> {
    debug!("Looking up schema for type {}", event_type);
    state
        .store
        .find_one_by_type(event_type)
        .await?
        .ok_or_else(|| RegistryError::SchemaNotFound {
            event_type: event_type.to_string(),
        })
}

/// Browser view of a single schema record.
pub async fn get_schema(
    State(state): State<Arc<AppState>>,
    Path(event_type): Path<String>,
) -> Result<Html<String>> {
    let event_type = strip_json_suffix(&event_type);
    let record = find_schema(&state, event_type).await?;

    let html = state.renderer.render("get", &json!({ "schema": record }))?;
    Ok(Html(html))
}

/// Raw schema body, served as JSON content.
pub async fn download_schema(
    State(state): State<Arc<AppState>>,
    Path(event_type): Path<String>,
) -> Result<impl IntoResponse> {
    let event_type = strip_json_suffix(&event_type);
    let record = find_schema(&state, event_type).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        record.schema_body,
    ))
}
