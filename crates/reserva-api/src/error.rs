use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Sync failed: {0}")]
    SyncFailed(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Wire shape for error responses
///
/// `message` only appears on sync failures, matching the contract the
/// admin console already parses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<reserva_core::Error> for AppError {
    fn from(error: reserva_core::Error) -> Self {
        match error {
            reserva_core::Error::NotFound(what) => Self::NotFound(what),
            reserva_core::Error::InvalidInput(what) => Self::BadRequest(what),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Missing token".to_string(),
                    message: None,
                },
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: "Invalid token".to_string(),
                    message: None,
                },
            ),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    message: None,
                },
            ),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: format!("Not found: {what}"),
                    message: None,
                },
            ),
            Self::SyncFailed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Sync failed".to_string(),
                    message: Some(message),
                },
            ),
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: message,
                    message: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_failure_body_carries_message() {
        let body = ErrorBody {
            error: "Sync failed".to_string(),
            message: Some("constraint violation".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Sync failed");
        assert_eq!(json["message"], "constraint violation");
    }

    #[test]
    fn auth_error_body_has_no_message_field() {
        let body = ErrorBody {
            error: "Missing token".to_string(),
            message: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("message").is_none());
    }

    #[test]
    fn core_not_found_maps_to_404() {
        let error: AppError = reserva_core::Error::NotFound("customer 7".to_string()).into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}
