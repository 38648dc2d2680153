//! Booking lifecycle — home-visit appointments from creation to completion.
//!
//! DESIGN
//! ======
//! The status column is a fixed enumeration with no transition graph: an
//! admin may overwrite any status with any other, and concurrent updates
//! race with last-write-wins. Listings join the owning user at read time;
//! the `service` column stays free text rather than a catalog foreign key.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::account::Owner;

/// Ordered booking lifecycle. Wire strings are lowercase, some multi-word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "confirmed")]
    Confirmed,
    #[serde(rename = "assigned")]
    Assigned,
    #[serde(rename = "on the way")]
    OnTheWay,
    #[serde(rename = "sample collected")]
    SampleCollected,
    #[serde(rename = "sample processing")]
    SampleProcessing,
    #[serde(rename = "reports generation")]
    ReportsGeneration,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "rescheduled")]
    Rescheduled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Assigned => "assigned",
            BookingStatus::OnTheWay => "on the way",
            BookingStatus::SampleCollected => "sample collected",
            BookingStatus::SampleProcessing => "sample processing",
            BookingStatus::ReportsGeneration => "reports generation",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rescheduled => "rescheduled",
        }
    }

    /// Parse a client-supplied status, normalizing case and whitespace.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "assigned" => Some(BookingStatus::Assigned),
            "on the way" => Some(BookingStatus::OnTheWay),
            "sample collected" => Some(BookingStatus::SampleCollected),
            "sample processing" => Some(BookingStatus::SampleProcessing),
            "reports generation" => Some(BookingStatus::ReportsGeneration),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "rescheduled" => Some(BookingStatus::Rescheduled),
            _ => None,
        }
    }
}

/// Visit address embedded in each booking.
#[derive(Debug, Clone)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Fields for a new booking. `date` is a validated `YYYY-MM-DD` string.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub service: String,
    pub date: String,
    pub time: String,
    pub address: Address,
    pub notes: Option<String>,
}

/// Booking row with the owning user joined in.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub id: Uuid,
    pub owner: Owner,
    pub service: String,
    pub date: String,
    pub time: String,
    pub address: Address,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("service not bookable")]
    ServiceUnavailable,
    #[error("booking not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Create a booking with status `pending`.
///
/// # Errors
///
/// `ServiceUnavailable` if the named service does not exist or is inactive,
/// database errors otherwise.
pub async fn create_booking(pool: &PgPool, new: NewBooking) -> Result<BookingRecord, BookingError> {
    let bookable = sqlx::query("SELECT 1 FROM services WHERE name = $1 AND is_active = TRUE")
        .bind(&new.service)
        .fetch_optional(pool)
        .await?;
    if bookable.is_none() {
        return Err(BookingError::ServiceUnavailable);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO bookings
             (id, user_id, service, visit_date, time_slot, street, city, state, zip_code, country, notes, status)
         VALUES ($1, $2, $3, $4::date, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(id)
    .bind(new.user_id)
    .bind(&new.service)
    .bind(&new.date)
    .bind(&new.time)
    .bind(&new.address.street)
    .bind(&new.address.city)
    .bind(&new.address.state)
    .bind(&new.address.zip_code)
    .bind(&new.address.country)
    .bind(&new.notes)
    .bind(BookingStatus::Pending.as_str())
    .execute(pool)
    .await?;

    fetch_booking(pool, id).await?.ok_or(BookingError::NotFound(id))
}

/// List the caller's bookings, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<BookingRecord>, BookingError> {
    let rows = sqlx::query(&format!(
        "{BOOKING_SELECT} WHERE b.user_id = $1 ORDER BY b.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(record_from_row).collect())
}

/// List every booking with its owner, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_all(pool: &PgPool) -> Result<Vec<BookingRecord>, BookingError> {
    let rows = sqlx::query(&format!("{BOOKING_SELECT} ORDER BY b.created_at DESC"))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(record_from_row).collect())
}

/// Overwrite a booking's status. No transition check: any status may
/// replace any other.
///
/// # Errors
///
/// `NotFound` if the booking is absent, database errors otherwise.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: BookingStatus,
) -> Result<BookingRecord, BookingError> {
    let result = sqlx::query("UPDATE bookings SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(BookingError::NotFound(id));
    }

    fetch_booking(pool, id).await?.ok_or(BookingError::NotFound(id))
}

const BOOKING_SELECT: &str = r#"SELECT b.id, b.service,
       to_char(b.visit_date, 'YYYY-MM-DD') AS visit_date,
       b.time_slot, b.street, b.city, b.state, b.zip_code, b.country, b.notes, b.status,
       to_char(b.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
       u.id AS owner_id, u.name AS owner_name, u.email AS owner_email
FROM bookings b
JOIN users u ON u.id = b.user_id"#;

async fn fetch_booking(pool: &PgPool, id: Uuid) -> Result<Option<BookingRecord>, BookingError> {
    let row = sqlx::query(&format!("{BOOKING_SELECT} WHERE b.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> BookingRecord {
    let status_raw: String = row.get("status");
    BookingRecord {
        id: row.get("id"),
        owner: Owner {
            id: row.get("owner_id"),
            name: row.get("owner_name"),
            email: row.get("owner_email"),
        },
        service: row.get("service"),
        date: row.get("visit_date"),
        time: row.get("time_slot"),
        address: Address {
            street: row.get("street"),
            city: row.get("city"),
            state: row.get("state"),
            zip_code: row.get("zip_code"),
            country: row.get("country"),
        },
        notes: row.get("notes"),
        status: BookingStatus::from_str(&status_raw).unwrap_or(BookingStatus::Pending),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;
