use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::{ApiError, ErrorResponse};

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Outcomes of price operations that are not a price
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Price not found")]
    NotFound,

    #[error("Price not created")]
    NotCreated,

    /// Another price already uses this schedule and currency
    #[error("Price for schedule {schedule_id} in {currency} already exists")]
    Conflict { schedule_id: String, currency: String },

    /// Anything else goes through the shared error path
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PriceError {
    /// True when a database error is a unique constraint violation
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        )
    }
}

impl From<sqlx::Error> for PriceError {
    fn from(err: sqlx::Error) -> Self {
        PriceError::Api(ApiError::DatabaseError(err))
    }
}

impl From<validator::ValidationErrors> for PriceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PriceError::Api(ApiError::ValidationError(errors))
    }
}

impl From<axum::extract::rejection::JsonRejection> for PriceError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        PriceError::Api(ApiError::from(rejection))
    }
}

impl IntoResponse for PriceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PriceError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("PRICE_NOT_FOUND", "Price not found"),
            ),
            PriceError::NotCreated => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("PRICE_NOT_CREATED", "Price not created"),
            ),
            PriceError::Conflict {
                schedule_id,
                currency,
            } => {
                tracing::warn!(
                    "Price conflict for schedule {} in {}",
                    schedule_id,
                    currency
                );
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(
                        "PRICE_CONFLICT",
                        format!(
                            "A price for schedule '{}' in {} already exists",
                            schedule_id, currency
                        ),
                    ),
                )
            }
            PriceError::Api(err) => return err.into_response(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = PriceError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_created_status() {
        let response = PriceError::NotCreated.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_status() {
        let response = PriceError::Conflict {
            schedule_id: "s1".to_string(),
            currency: "USD".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_database_error_forwards_to_shared_path() {
        let err = PriceError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, PriceError::Api(ApiError::DatabaseError(_))));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!PriceError::is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
