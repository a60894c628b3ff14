use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the ATS core. Parsing, matching and scoring never fail;
/// only input validation and vocabulary loading do.
#[derive(Debug, Error)]
pub enum AtsError {
    #[error("{field} cannot be empty")]
    MalformedInput { field: &'static str },

    #[error("Failed to read vocabulary file: {0}")]
    VocabularyIo(#[from] std::io::Error),

    #[error("Invalid vocabulary JSON: {0}")]
    VocabularyJson(#[from] serde_json::Error),

    #[error("Invalid vocabulary: {0}")]
    VocabularyFormat(String),

    #[error("Invalid vocabulary pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AtsError> for AppError {
    fn from(err: AtsError) -> Self {
        match err {
            invalid @ AtsError::MalformedInput { .. } => AppError::Validation(invalid.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_maps_to_validation() {
        let err: AppError = AtsError::MalformedInput { field: "resumeText" }.into();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "resumeText cannot be empty"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_vocabulary_errors_map_to_internal() {
        let err: AppError = AtsError::VocabularyFormat("chain".to_string()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        let resp = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
