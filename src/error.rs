use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a detection or translation call.
///
/// `Validation` is the caller's fault and is always echoed back. The other
/// variants are operation failures whose detail is only exposed in debug mode.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Language detection failed: {0}")]
    Detection(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// JSON error response: `{"detail": "..."}` with the matching status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    /// Map a service failure onto an HTTP error. `public_message` replaces the
    /// internal cause of operation failures unless `debug` is set.
    pub fn from_service(err: ServiceError, public_message: &str, debug: bool) -> Self {
        match err {
            ServiceError::Validation { field, message } => {
                tracing::warn!("Validation error on {}: {}", field, message);
                Self {
                    status: StatusCode::BAD_REQUEST,
                    detail: message,
                }
            }
            ServiceError::Unavailable(message) => {
                tracing::error!("Service unavailable: {}", message);
                Self {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    detail: message,
                }
            }
            other => {
                tracing::error!("{}", other);
                let detail = if debug {
                    format!("{}: {}", public_message, other)
                } else {
                    public_message.to_string()
                };
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Body of the catch-all 500 produced for panics inside handlers.
pub fn internal_error_response(detail: Option<String>) -> Response {
    let detail = detail.unwrap_or_else(|| "An error occurred".to_string());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "detail": detail,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_message() {
        let err = ServiceError::validation("text", "Text cannot be empty");
        let api = ApiError::from_service(err, "Translation failed", false);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.detail, "Text cannot be empty");
    }

    #[test]
    fn unavailable_maps_to_503() {
        let err = ServiceError::Unavailable("ML models not loaded".into());
        let api = ApiError::from_service(err, "Translation failed", false);
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn operation_detail_hidden_unless_debug() {
        let hidden = ApiError::from_service(
            ServiceError::Translation("CUDA out of memory".into()),
            "Translation failed",
            false,
        );
        assert_eq!(hidden.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hidden.detail, "Translation failed");

        let shown = ApiError::from_service(
            ServiceError::Translation("CUDA out of memory".into()),
            "Translation failed",
            true,
        );
        assert!(shown.detail.contains("CUDA out of memory"));
    }
}
