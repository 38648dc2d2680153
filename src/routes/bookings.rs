//! Booking routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::{AdminUser, AuthUser};
use super::{ApiError, ListResponse, MessageResponse, non_blank, parse_date};
use crate::services::booking::{self, Address, BookingStatus, NewBooking};
use crate::state::AppState;

const DEFAULT_COUNTRY: &str = "India";
const NOTES_MAX_LEN: usize = 200;

#[derive(Deserialize)]
pub struct AddressBody {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "zipCode")]
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingBody {
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub address: Option<AddressBody>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct OwnerResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub country: String,
}

#[derive(Serialize)]
pub struct BookingResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: OwnerResponse,
    pub service: String,
    pub date: String,
    pub time: String,
    pub address: AddressResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

fn to_response(record: booking::BookingRecord) -> BookingResponse {
    BookingResponse {
        id: record.id,
        user: OwnerResponse {
            id: record.owner.id,
            name: record.owner.name,
            email: record.owner.email,
        },
        service: record.service,
        date: record.date,
        time: record.time,
        address: AddressResponse {
            street: record.address.street,
            city: record.address.city,
            state: record.address.state,
            zip_code: record.address.zip_code,
            country: record.address.country,
        },
        notes: record.notes,
        status: record.status,
        created_at: record.created_at,
    }
}

/// Check required fields, the date shape, and the notes cap. The country
/// defaults rather than being required.
pub(crate) fn validate_create(user_id: Uuid, body: &CreateBookingBody) -> Result<NewBooking, ApiError> {
    let address = body.address.as_ref();
    let (Some(service), Some(date), Some(time), Some(street), Some(city), Some(state), Some(zip_code)) = (
        non_blank(body.service.as_ref()),
        non_blank(body.date.as_ref()),
        non_blank(body.time.as_ref()),
        address.and_then(|a| non_blank(a.street.as_ref())),
        address.and_then(|a| non_blank(a.city.as_ref())),
        address.and_then(|a| non_blank(a.state.as_ref())),
        address.and_then(|a| non_blank(a.zip_code.as_ref())),
    ) else {
        return Err(ApiError::validation(
            "Please provide all required booking details including full address.",
        ));
    };

    let Some(date) = parse_date(date) else {
        return Err(ApiError::validation("Please provide a valid date (YYYY-MM-DD)."));
    };

    let notes = non_blank(body.notes.as_ref()).map(str::to_owned);
    if notes.as_ref().is_some_and(|n| n.len() > NOTES_MAX_LEN) {
        return Err(ApiError::validation("Notes cannot be more than 200 characters"));
    }

    let country = address
        .and_then(|a| non_blank(a.country.as_ref()))
        .unwrap_or(DEFAULT_COUNTRY);

    Ok(NewBooking {
        user_id,
        service: service.to_owned(),
        date,
        time: time.to_owned(),
        address: Address {
            street: street.to_owned(),
            city: city.to_owned(),
            state: state.to_owned(),
            zip_code: zip_code.to_owned(),
            country: country.to_owned(),
        },
        notes,
    })
}

/// `POST /api/bookings` — book a home visit; starts out `pending`.
pub async fn create_booking(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<MessageResponse<BookingResponse>>), ApiError> {
    let new = validate_create(identity.id, &body)?;
    let record = booking::create_booking(&state.pool, new)
        .await
        .map_err(|e| booking_error_to_api(e, "Server Error: Could not create booking"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Booking created successfully",
            data: Some(to_response(record)),
        }),
    ))
}

/// `GET /api/bookings/my` — the caller's bookings, newest first.
pub async fn my_bookings(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ListResponse<BookingResponse>>, ApiError> {
    let records = booking::list_for_user(&state.pool, identity.id)
        .await
        .map_err(|e| booking_error_to_api(e, "Server Error: Could not fetch user bookings"))?;

    Ok(Json(ListResponse::new(records.into_iter().map(to_response).collect())))
}

/// `GET /api/bookings/all` — every booking with its owner joined in.
pub async fn all_bookings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ListResponse<BookingResponse>>, ApiError> {
    let records = booking::list_all(&state.pool)
        .await
        .map_err(|e| booking_error_to_api(e, "Server Error: Could not fetch bookings"))?;

    Ok(Json(ListResponse::new(records.into_iter().map(to_response).collect())))
}

/// `PUT /api/bookings/:id/status` — overwrite the status; any value may
/// replace any other.
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<MessageResponse<BookingResponse>>, ApiError> {
    let status = non_blank(body.status.as_ref())
        .and_then(BookingStatus::from_str)
        .ok_or_else(|| ApiError::validation("Invalid booking status."))?;

    let record = booking::update_status(&state.pool, id, status)
        .await
        .map_err(|e| booking_error_to_api(e, "Server Error: Could not update booking status"))?;

    tracing::info!(booking = %id, admin = %admin.id, status = status.as_str(), "booking status updated");

    Ok(Json(MessageResponse {
        message: "Booking status updated successfully",
        data: Some(to_response(record)),
    }))
}

pub(crate) fn booking_error_to_api(err: booking::BookingError, server_message: &'static str) -> ApiError {
    match err {
        booking::BookingError::ServiceUnavailable => {
            ApiError::validation("Selected service is not valid or available.")
        }
        booking::BookingError::NotFound(_) => ApiError::not_found("Booking not found"),
        booking::BookingError::Db(e) => {
            tracing::error!(error = %e, "booking database error");
            ApiError::server(server_message)
        }
    }
}

#[cfg(test)]
#[path = "bookings_test.rs"]
mod tests;
