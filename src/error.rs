use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unable to parse message: {message}")]
    MalformedRequest { message: String },

    #[error("Store unavailable: {cause}")]
    BackendUnavailable { cause: String },

    #[error("Schema not found for type: {event_type}")]
    SchemaNotFound { event_type: String },

    #[error("Failed to render template '{template}': {cause}")]
    RenderFailure { template: String, cause: String },
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        // A single request's failure must never take the process down;
        // every variant becomes a status plus a short diagnostic body.
        let (status, body) = match &self {
            RegistryError::MalformedRequest { message } => {
                warn!("Rejected request: {}", message);
                (StatusCode::BAD_REQUEST, "Unable to parse message".to_string())
            }
            RegistryError::BackendUnavailable { cause } => {
                error!("Store unavailable: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unable to connect to database".to_string(),
                )
            }
            RegistryError::SchemaNotFound { event_type } => (
                StatusCode::NOT_FOUND,
                format!("Schema not found for type: {}", event_type),
            ),
            RegistryError::RenderFailure { template, cause } => {
                error!("Failed to render template '{}': {}", template, cause);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error.".to_string())
            }
        };

        (status, body).into_response()
    }
}

impl From<tokio_postgres::Error> for RegistryError {
    fn from(err: tokio_postgres::Error) -> Self {
        RegistryError::BackendUnavailable {
            cause: err.to_string(),
        }
    }
}

impl From<deadpool_postgres::PoolError> for RegistryError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        RegistryError::BackendUnavailable {
            cause: format!("Pool error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
