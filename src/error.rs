// Error handling module for the Price API
// Centralized error path for everything a resource handler does not answer itself

use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Errors that are not specific to one resource
///
/// Resource modules wrap this type and forward to it, so every unexpected
/// failure is logged and rendered in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Decoded request body failed field validation
    /// Maps to HTTP 400 Bad Request
    #[error("Request validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Request body could not be decoded into the expected schema
    /// Keeps the extractor's status (400, 415 or 422)
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    /// Database operation errors
    /// Maps to HTTP 500, details stay in the logs
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Consistent error body
///
/// `code` is machine-readable, `msg` is meant for humans.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "PRICE_NOT_FOUND")]
    pub code: String,
    #[schema(example = "Price not found")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            msg: msg.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        msg: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            msg: msg.into(),
            details: Some(details),
        }
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Client errors are logged at debug level, server errors at error level.
    /// Server error details are never copied into the response.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details(
                        "VALIDATION_ERROR",
                        "Request validation failed",
                        serde_json::to_value(errors).unwrap_or(serde_json::json!({})),
                    ),
                )
            }
            ApiError::InvalidBody { status, message } => {
                debug!("Rejected request body: {}", message);

                (*status, ErrorResponse::new("INVALID_BODY", message.clone()))
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Fallback for requests that match no route
pub async fn route_not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    debug!("No route for {}", uri);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "ROUTE_NOT_FOUND",
            format!("No route for {}", uri.path()),
        )),
    )
}
