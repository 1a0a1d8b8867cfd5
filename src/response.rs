use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

pub fn list<T: Serialize>(data: Vec<T>, message: impl Into<String>) -> Response {
    let envelope = Envelope {
        status: "success",
        message: message.into(),
        count: Some(data.len()),
        data,
    };
    (StatusCode::OK, Json(envelope)).into_response()
}

pub fn single<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    with_status(StatusCode::OK, data, message)
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    with_status(StatusCode::CREATED, data, message)
}

fn with_status<T: Serialize>(status: StatusCode, data: T, message: impl Into<String>) -> Response {
    let envelope = Envelope {
        status: "success",
        message: message.into(),
        count: None,
        data,
    };
    (status, Json(envelope)).into_response()
}
