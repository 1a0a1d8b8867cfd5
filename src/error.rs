use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::error;

use crate::models::ClassId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("Fitness class {0} not found.")]
    NotFound(ClassId),
    #[error("Cannot book a class that has already started or finished.")]
    ClassExpired(ClassId),
    #[error("No available slots for this class.")]
    SlotsExhausted(ClassId),
    #[error("You have already booked this class.")]
    DuplicateBooking { class_id: ClassId, email: String },
}

impl BookingError {
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::Validation(_) => "validation_error",
            BookingError::NotFound(_) => "not_found",
            BookingError::ClassExpired(_) => "class_expired",
            BookingError::SlotsExhausted(_) => "slots_exhausted",
            BookingError::DuplicateBooking { .. } => "duplicate_booking",
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Booking(BookingError),
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
            ApiError::Booking(err) => {
                let status = match err {
                    BookingError::NotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.kind(), err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = self.parts();
        let body = Json(serde_json::json!({
            "status": "error",
            "kind": kind,
            "message": message,
        }));
        (status, body).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(value: BookingError) -> Self {
        ApiError::Booking(value)
    }
}

impl From<JoinError> for ApiError {
    fn from(value: JoinError) -> Self {
        error!("Blocking task failed: {value}");
        ApiError::Internal("Failed to process the request".into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", value.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_error_status_mapping() {
        let (status, kind, _) = ApiError::from(BookingError::NotFound(3)).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(kind, "not_found");

        let (status, kind, message) = ApiError::from(BookingError::SlotsExhausted(3)).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, "slots_exhausted");
        assert_eq!(message, "No available slots for this class.");
    }

    #[test]
    fn test_duplicate_booking_message() {
        let err = BookingError::DuplicateBooking {
            class_id: 1,
            email: "a@x.com".to_string(),
        };
        assert_eq!(err.kind(), "duplicate_booking");
        assert_eq!(err.to_string(), "You have already booked this class.");
    }
}
