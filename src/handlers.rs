use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Json, http::StatusCode};
use chrono::Utc;
use http::header;

use crate::{
    AppState,
    error::ApiError,
    models::{BookingRequest, BookingView, ClassId, ClassView, NewClass},
    response,
};

#[derive(Debug, serde::Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

#[utoipa::path(get, path = "/", tag = "booking")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Fitness Booking API",
        "endpoints": {
            "/api/v1/classes": "List upcoming classes or create a class",
            "/api/v1/classes.ical": "Download upcoming classes as iCal file",
            "/api/v1/book": "Book a slot in a class",
            "/api/v1/bookings?email=": "List bookings for a client email"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "booking")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "booking")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/api/v1/classes",
    responses(
        (status = 200, description = "Upcoming classes, earliest first", body = [ClassView])
    ),
    tag = "classes"
)]
pub async fn list_classes(State(state): State<AppState>) -> Response {
    let classes: Vec<ClassView> = state
        .service
        .list_upcoming_classes(Utc::now())
        .iter()
        .map(|c| ClassView::new(c, state.tz))
        .collect();
    response::list(classes, "Data fetched successfully")
}

#[utoipa::path(
    post,
    path = "/api/v1/classes",
    request_body = NewClass,
    responses(
        (status = 201, description = "Class created", body = ClassView),
        (status = 400, description = "Invalid class data")
    ),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<NewClass>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(new_class) = payload?;
    let class = state.service.create_class(new_class)?;
    Ok(response::created(
        ClassView::new(&class, state.tz),
        "Created successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/classes/{id}",
    params(("id" = u64, Path, description = "Fitness class id")),
    responses(
        (status = 200, description = "Class details", body = ClassView),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Response, ApiError> {
    let class = state.service.get_class(id)?;
    Ok(response::single(
        ClassView::new(&class, state.tz),
        "Data fetched successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/classes/{id}",
    params(("id" = u64, Path, description = "Fitness class id")),
    responses(
        (status = 200, description = "Class and its bookings removed"),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<ClassId>,
) -> Result<Response, ApiError> {
    let service = Arc::clone(&state.service);
    let removed = tokio::task::spawn_blocking(move || service.delete_class(id)).await??;
    Ok(response::single(
        serde_json::json!({ "id": id, "bookings_removed": removed }),
        "Deleted successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/classes.ical",
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 404, description = "No upcoming classes")
    ),
    tag = "classes"
)]
pub async fn get_ical(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let classes = state.service.list_upcoming_classes(Utc::now());
    if classes.is_empty() {
        return Err(ApiError::NotFound("No upcoming classes found".into()));
    }

    let body = state.exporter.generate(&classes);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=fitness_classes.ics",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/book",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking successful", body = BookingView),
        (status = 400, description = "Invalid booking data, expired class, no slots left or duplicate booking"),
        (status = 404, description = "Class not found")
    ),
    tag = "bookings"
)]
pub async fn book_class(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    // The reservation may wait on a class lock; keep that off the runtime
    // workers so other classes stay bookable.
    let service = Arc::clone(&state.service);
    let details = tokio::task::spawn_blocking(move || service.book(&request)).await??;
    Ok(response::created(
        BookingView::new(&details, state.tz),
        "Booking successful!",
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(("email" = String, Query, description = "Email address to filter bookings")),
    responses(
        (status = 200, description = "Bookings for the email, newest first", body = [BookingView]),
        (status = 400, description = "Missing email parameter")
    ),
    tag = "bookings"
)]
pub async fn get_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> Result<Response, ApiError> {
    let email = query.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::BadRequest(
            "Email query parameter is required.".into(),
        ));
    }

    let bookings: Vec<BookingView> = state
        .service
        .find_bookings_by_email(email)
        .iter()
        .map(|d| BookingView::new(d, state.tz))
        .collect();
    Ok(response::list(bookings, format!("Bookings for {email}")))
}
