//! HTTP API endpoints
//!
//! - POST /publish - Publish a schema document for an event type
//! - GET /download/{type} - Download the raw schema body
//! - GET /schema/{type} - Browse a schema record as HTML
//! - GET / - Index of publicly visible schemas
//! - GET /health - Liveness probe

mod health;
mod index;
mod publish;
mod schema;

pub use health::health_check;
pub use index::index;
pub use publish::{publish_schema, PublishRequest};
pub use schema::{download_schema, get_schema, strip_json_suffix};

use crate::registry::SchemaStore;
use crate::render::Renderer;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;

/// Shared state for all endpoints. Immutable after startup; the store is
/// the only shared resource and coordinates its own access.
pub struct AppState {
    pub store: Arc<dyn SchemaStore>,
    pub renderer: Renderer,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self {
            store,
            renderer: Renderer::new(),
            start_time: Instant::now(),
        }
    }
}

/// Build the registry router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/publish", post(publish_schema))
        .route("/download/{type}", get(download_schema))
        .route("/schema/{type}", get(get_schema))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RegistryError, Result};
    use crate::registry::{MemorySchemaStore, SchemaRecord};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    /// Store double for "store unreachable": every operation fails the
    /// same way a dead backend would.
    struct UnreachableStore;

    #[async_trait]
    impl SchemaStore for UnreachableStore {
        async fn create(&self, _: &str, _: &str, _: &str) -> Result<SchemaRecord> {
            Err(unreachable_err())
        }

        async fn find_one_by_type(&self, _: &str) -> Result<Option<SchemaRecord>> {
            Err(unreachable_err())
        }

        async fn list_public_ordered_by_type(&self) -> Result<Vec<SchemaRecord>> {
            Err(unreachable_err())
        }

        async fn ping(&self) -> Result<()> {
            Err(unreachable_err())
        }
    }

    fn unreachable_err() -> RegistryError {
        RegistryError::BackendUnavailable {
            cause: "connection refused".to_string(),
        }
    }

    fn memory_app() -> (Arc<MemorySchemaStore>, Router) {
        let store = Arc::new(MemorySchemaStore::new());
        let app = router(Arc::new(AppState::new(store.clone())));
        (store, app)
    }

    fn unreachable_app() -> Router {
        router(Arc::new(AppState::new(Arc::new(UnreachableStore))))
    }

    fn publish_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/publish")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_publish_then_download() {
        let (_, app) = memory_app();

        let response = app
            .clone()
            .oneshot(publish_request(
                r#"{"type":"order.created","source":"svc-a","schema":"{\"x\":1}"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(get_request("/download/order.created"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_string(response).await, "{\"x\":1}");
    }

    #[tokio::test]
    async fn test_download_strips_json_suffix() {
        let (_, app) = memory_app();

        app.clone()
            .oneshot(publish_request(
                r#"{"type":"order.created","source":"svc-a","schema":"{\"x\":1}"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(get_request("/download/order.created.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "{\"x\":1}");
    }

    #[tokio::test]
    async fn test_download_unknown_type_is_404() {
        let (_, app) = memory_app();

        let response = app
            .oneshot(get_request("/download/unknown.created"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(response).await,
            "Schema not found for type: unknown.created"
        );
    }

    #[tokio::test]
    async fn test_not_found_echoes_normalized_type() {
        let (_, app) = memory_app();

        let response = app
            .oneshot(get_request("/download/unknown.created.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(response).await,
            "Schema not found for type: unknown.created"
        );
    }

    #[tokio::test]
    async fn test_malformed_publish_never_reaches_store() {
        let (store, app) = memory_app();

        for body in [
            "{not json",
            r#"{"type":"a","source":"b"}"#,
            r#"{"type":"a","source":"b","schema":42}"#,
        ] {
            let response = app.clone().oneshot(publish_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_string(response).await, "Unable to parse message");
        }

        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_published_schema_stays_off_the_index() {
        let (store, app) = memory_app();

        app.clone()
            .oneshot(publish_request(
                r#"{"type":"order.created","source":"svc-a","schema":"{}"}"#,
            ))
            .await
            .unwrap();

        let record = store
            .find_one_by_type("order.created")
            .await
            .unwrap()
            .unwrap();
        assert!(!record.is_public);

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(!body.contains("order.created"));
        assert!(body.contains("No public schemas."));
    }

    #[tokio::test]
    async fn test_index_lists_public_records_ordered() {
        let (store, app) = memory_app();

        for event_type in ["zeta", "alpha", "mid"] {
            let record = store.create(event_type, "svc", "{}").await.unwrap();
            store.set_public(record.id).await;
        }
        store.create("hidden.type", "svc", "{}").await.unwrap();

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(!body.contains("hidden.type"));
        let alpha = body.find(">alpha<").unwrap();
        let mid = body.find(">mid<").unwrap();
        let zeta = body.find(">zeta<").unwrap();
        assert!(alpha < mid);
        assert!(mid < zeta);
    }

    #[tokio::test]
    async fn test_schema_html_view() {
        let (_, app) = memory_app();

        app.clone()
            .oneshot(publish_request(
                r#"{"type":"order.created","source":"svc-a","schema":"{\"x\":1}"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(get_request("/schema/order.created.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let body = body_string(response).await;
        assert!(body.contains("order.created"));
        assert!(body.contains("svc-a"));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_500_not_404() {
        let app = unreachable_app();

        let response = app
            .clone()
            .oneshot(get_request("/download/order.created"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Unable to connect to database");

        let response = app
            .clone()
            .oneshot(publish_request(
                r#"{"type":"a","source":"b","schema":"{}"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_reports_store_state() {
        let (_, app) = memory_app();
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"healthy\""));

        let response = unreachable_app()
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"degraded\""));
    }
}
