use crate::api::AppState;
use crate::error::{RegistryError, Result};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// JSON payload for publishing a schema.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    pub schema: String,
}

pub async fn publish_schema(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<StatusCode> {
    // Parse by hand so malformed input is rejected before the store is
    // touched, with the registry's own 400 body.
    let request: PublishRequest =
        serde_json::from_str(&body).map_err(|e| RegistryError::MalformedRequest {
            message: e.to_string(),
        })?;

    let record = state
        .store
        .create(&request.event_type, &request.source, &request.schema)
        .await?;

    info!("Accepted schema for type {}", record.event_type);

    Ok(StatusCode::CREATED)
}
