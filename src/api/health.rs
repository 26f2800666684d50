use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store_connected: bool,
    uptime_seconds: u64,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    // A dead store degrades the report; it never fails the probe itself.
    let store_connected = state.store.ping().await.is_ok();

    Json(HealthResponse {
        status: if store_connected {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        store_connected,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
