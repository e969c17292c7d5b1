use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sim_core::error::SimError;
use thiserror::Error;
use tracing::warn;

/// Startup and serve-loop failures of the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// A rejected API operation, rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub SimError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SimError::NotFound { .. } => StatusCode::NOT_FOUND,
            SimError::InvalidState(_) | SimError::InvalidConfiguration { .. } => {
                StatusCode::BAD_REQUEST
            }
            SimError::DuplicateId { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self.0, "request rejected");
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::error::EntityKind;

    #[test]
    fn maps_error_taxonomy_to_status_codes() {
        assert_eq!(
            ApiError(SimError::not_found(EntityKind::Driver, "d")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(SimError::InvalidState("nope".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(SimError::InvalidConfiguration {
                requested: "x".to_string(),
                valid: "balanced".to_string(),
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(SimError::duplicate(EntityKind::Rider, "r")).status(),
            StatusCode::CONFLICT
        );
    }
}
