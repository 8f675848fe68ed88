use crate::model::status::UnknownStatus;
use crate::model::teacher::EligibilityReport;
use crate::response::ApiResponse;
use anyhow::anyhow;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use deadpool_diesel::InteractError;
use deadpool_diesel::postgres::PoolError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String), // 400

    #[error("Not Found: {0}")]
    NotFound(String), // 404

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String), // 422

    #[error("Unprocessable Entity: {message}")]
    PreconditionFailed {
        message: String,
        report: EligibilityReport,
    }, // 422

    #[error("Configuration Error: {0}")]
    Configuration(String), // 500

    #[error("Internal Server Error: {0}")]
    InternalServerError(#[from] anyhow::Error), // 500
}

impl From<PoolError> for AppError {
    fn from(err: PoolError) -> Self {
        error!("Database pool error encountered: {:?}", err);
        AppError::InternalServerError(anyhow::Error::new(err).context("Database pool error"))
    }
}

impl From<InteractError> for AppError {
    fn from(err: InteractError) -> Self {
        error!("Database interaction error encountered: {:?}", err);
        AppError::InternalServerError(anyhow!("Database interaction error: {}", err))
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                error!(
                    "Diesel NotFound error reached generic conversion: {:?}",
                    err
                );
                AppError::NotFound("Resource not found (database query)".to_string())
            }
            _ => {
                error!("Unhandled Diesel error encountered: {:?}", err);
                AppError::InternalServerError(
                    anyhow::Error::new(err).context("Database query error"),
                )
            }
        }
    }
}

impl From<UnknownStatus> for AppError {
    fn from(err: UnknownStatus) -> Self {
        error!("Stored status could not be parsed: {}", err);
        AppError::InternalServerError(anyhow::Error::new(err).context("Corrupt status column"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, report) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AppError::UnprocessableEntity(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, None)
            }
            AppError::PreconditionFailed { message, report } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(report))
            }
            AppError::Configuration(message) => {
                error!("Responding with 500 due to misconfiguration: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
            AppError::InternalServerError(source) => {
                error!(
                    "Responding with 500 Internal Server Error. Source: {:?}",
                    source
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        ApiResponse::<EligibilityReport>::failure(status, error_message, report).into_response()
    }
}
