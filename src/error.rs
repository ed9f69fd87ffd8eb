//! Error taxonomy shared by the ledgers and the HTTP layer.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::BookingStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// A lifecycle event that is not allowed from the booking's current status.
    pub fn transition(event: &str, booking_id: i64, from: BookingStatus) -> Self {
        AppError::InvalidTransition(format!(
            "cannot {event} booking {booking_id}: booking is {from}"
        ))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Storage(e) => {
                log::error!("storage failure: {e}");
                "internal storage error".to_string()
            }
            other => {
                log::warn!("request rejected: {other}");
                other.to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error })
    }
}
