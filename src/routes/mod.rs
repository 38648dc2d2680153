//! Router assembly and the shared API wire format.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every endpoint speaks JSON. Failures are a `{message}` body with the
//! status code carrying the error class: 400 validation/duplicate-key, 401
//! auth, 403 role mismatch, 404 missing entity, 500 anything unexpected.
//! Propagation is local to the request; nothing is retried or escalated.

pub mod auth;
pub mod bookings;
pub mod lab_results;
pub mod services;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use serde::Serialize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/services",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/api/services/{id}",
            put(services::update_service).delete(services::delete_service),
        )
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/my", get(bookings::my_bookings))
        .route("/api/bookings/all", get(bookings::all_bookings))
        .route("/api/bookings/{id}/status", put(bookings::update_status))
        .route("/api/labresults", post(lab_results::upload_result))
        .route("/api/labresults/my", get(lab_results::my_results))
        .route("/api/labresults/all", get(lab_results::all_results))
        .route("/api/labresults/{id}/status", put(lab_results::update_status))
        .route("/api/users", get(users::list_users))
        .route("/api/user/profile", get(users::profile))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERROR ENVELOPE
// =============================================================================

/// API error: a status code plus the JSON `{message}` body clients display.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    /// Duplicate unique key. The wire contract pins this to 400, not 409.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self { status: StatusCode::FORBIDDEN, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into() }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "message": self.message }));
        (self.status, body).into_response()
    }
}

// =============================================================================
// SUCCESS ENVELOPES
// =============================================================================

/// Listing envelope: `{success, count, data}`.
#[derive(Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self { success: true, count: data.len(), data }
    }
}

/// Mutation envelope: `{message}` plus the affected entity when there is one.
#[derive(Serialize)]
pub struct MessageResponse<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

// =============================================================================
// SHARED INPUT HELPERS
// =============================================================================

/// Treat missing and blank-after-trim fields the same way.
pub(crate) fn non_blank(field: Option<&String>) -> Option<&str> {
    field.map(|s| s.trim()).filter(|s| !s.is_empty())
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Validate a `YYYY-MM-DD` date string, returning the normalized form.
pub(crate) fn parse_date(raw: &str) -> Option<String> {
    let date = time::Date::parse(raw.trim(), DATE_FORMAT).ok()?;
    date.format(DATE_FORMAT).ok()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
