use crate::api::AppState;
use crate::error::Result;
use axum::{extract::State, response::Html};
use serde_json::json;
use std::sync::Arc;

/// Index of publicly visible schemas, ordered by event type.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let records = state.store.list_public_ordered_by_type().await?;

    let html = state.renderer.render("index", &json!({ "schemas": records }))?;
    Ok(Html(html))
}
