use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::types::TimeSlot;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Invalid booking: {0}")]
    Validation(String),

    #[error("Yacht {yacht_id} is already booked for the {slot} slot on {date}")]
    Conflict {
        yacht_id: i32,
        date: chrono::NaiveDate,
        slot: TimeSlot,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Payment error: {0}")]
    Payment(String),
}

impl BookingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::InvalidSlot(_) | BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict { .. } => StatusCode::CONFLICT,
            BookingError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::Network(_) | BookingError::Payment(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BookingError::Validation(errors.to_string())
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(err: reqwest::Error) -> Self {
        BookingError::Network(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
