//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A request parameter could not be interpreted. Raised before any query runs.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Connectivity or query failure in the incident data source. Never retried.
    #[error("Data source error: {0}")]
    DataSource(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error was caused by the caller's input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this error originated in the data source.
    pub fn is_data_source(&self) -> bool {
        matches!(self, Self::DataSource(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
            }
            AppError::DataSource(e) => {
                tracing::error!(error = %e, "Data source error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATA_SOURCE_ERROR",
                    "The incident data source is unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json["error"].is_null());
    }

    #[test]
    fn api_response_error() {
        let response = ApiResponse::<()>::error("INVALID_ARGUMENT", "page must be an integer");
        let json = serde_json::to_value(&response.0).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "INVALID_ARGUMENT");
        assert_eq!(json["error"]["message"], "page must be an integer");
    }

    #[test]
    fn invalid_argument_is_client_error() {
        let err = AppError::InvalidArgument("perPage".to_string());
        assert!(err.is_invalid_argument());
        assert!(!err.is_data_source());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn app_error_display() {
        let err = AppError::InvalidArgument("range must be 'all' or a number".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: range must be 'all' or a number"
        );
    }

    #[test]
    fn data_source_error_from_sqlx() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_data_source());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
