//! Lab result management — admin upload, per-patient reads.
//!
//! Results are attached to a patient by email lookup at upload time and are
//! read-only to the owning user. Like bookings, the status column is a
//! fixed enumeration with no transition constraint.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::account::Owner;

/// Report lifecycle for an uploaded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResultStatus {
    #[serde(rename = "pending review")]
    PendingReview,
    #[serde(rename = "finalized")]
    Finalized,
    #[serde(rename = "published")]
    Published,
    #[serde(rename = "archived")]
    Archived,
}

impl ResultStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::PendingReview => "pending review",
            ResultStatus::Finalized => "finalized",
            ResultStatus::Published => "published",
            ResultStatus::Archived => "archived",
        }
    }

    /// Parse a client-supplied status, normalizing case and whitespace.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending review" => Some(ResultStatus::PendingReview),
            "finalized" => Some(ResultStatus::Finalized),
            "published" => Some(ResultStatus::Published),
            "archived" => Some(ResultStatus::Archived),
            _ => None,
        }
    }
}

/// Fields for a new result. `test_date` is a validated `YYYY-MM-DD` string;
/// `result_value` is text so qualitative results ("Positive") fit.
#[derive(Debug, Clone)]
pub struct NewLabResult {
    pub patient_email: String,
    pub test_name: String,
    pub test_date: String,
    pub result_value: String,
    pub units: Option<String>,
    pub reference_range: Option<String>,
    pub interpretation: Option<String>,
    pub status: ResultStatus,
}

/// Result row with the owning patient joined in.
#[derive(Debug, Clone)]
pub struct LabResultRecord {
    pub id: Uuid,
    pub owner: Owner,
    pub test_name: String,
    pub test_date: String,
    pub result_value: String,
    pub units: Option<String>,
    pub reference_range: Option<String>,
    pub interpretation: Option<String>,
    pub status: ResultStatus,
    pub created_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LabResultError {
    #[error("no user for patient email")]
    PatientNotFound,
    #[error("lab result not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Upload a result for the patient with the given email.
///
/// # Errors
///
/// `PatientNotFound` if no user matches the email, database errors
/// otherwise.
pub async fn upload(pool: &PgPool, new: NewLabResult) -> Result<LabResultRecord, LabResultError> {
    let patient = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(new.patient_email.trim().to_ascii_lowercase())
        .fetch_optional(pool)
        .await?;
    let Some(patient) = patient else {
        return Err(LabResultError::PatientNotFound);
    };
    let patient_id: Uuid = patient.get("id");

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO lab_results
             (id, user_id, test_name, test_date, result_value, units, reference_range, interpretation, status)
         VALUES ($1, $2, $3, $4::date, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(patient_id)
    .bind(&new.test_name)
    .bind(&new.test_date)
    .bind(&new.result_value)
    .bind(&new.units)
    .bind(&new.reference_range)
    .bind(&new.interpretation)
    .bind(new.status.as_str())
    .execute(pool)
    .await?;

    fetch_result(pool, id).await?.ok_or(LabResultError::NotFound(id))
}

/// List the caller's results, most recent test first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<LabResultRecord>, LabResultError> {
    let rows = sqlx::query(&format!(
        "{RESULT_SELECT} WHERE r.user_id = $1 ORDER BY r.test_date DESC, r.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(record_from_row).collect())
}

/// List every result with its owner, most recent test first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_all(pool: &PgPool) -> Result<Vec<LabResultRecord>, LabResultError> {
    let rows = sqlx::query(&format!(
        "{RESULT_SELECT} ORDER BY r.test_date DESC, r.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(record_from_row).collect())
}

/// Overwrite a result's status, any value to any other.
///
/// # Errors
///
/// `NotFound` if the result is absent, database errors otherwise.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: ResultStatus,
) -> Result<LabResultRecord, LabResultError> {
    let result = sqlx::query("UPDATE lab_results SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(LabResultError::NotFound(id));
    }

    fetch_result(pool, id).await?.ok_or(LabResultError::NotFound(id))
}

const RESULT_SELECT: &str = r#"SELECT r.id, r.test_name,
       to_char(r.test_date, 'YYYY-MM-DD') AS test_date,
       r.result_value, r.units, r.reference_range, r.interpretation, r.status,
       to_char(r.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
       u.id AS owner_id, u.name AS owner_name, u.email AS owner_email
FROM lab_results r
JOIN users u ON u.id = r.user_id"#;

async fn fetch_result(pool: &PgPool, id: Uuid) -> Result<Option<LabResultRecord>, LabResultError> {
    let row = sqlx::query(&format!("{RESULT_SELECT} WHERE r.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> LabResultRecord {
    let status_raw: String = row.get("status");
    LabResultRecord {
        id: row.get("id"),
        owner: Owner {
            id: row.get("owner_id"),
            name: row.get("owner_name"),
            email: row.get("owner_email"),
        },
        test_name: row.get("test_name"),
        test_date: row.get("test_date"),
        result_value: row.get("result_value"),
        units: row.get("units"),
        reference_range: row.get("reference_range"),
        interpretation: row.get("interpretation"),
        status: ResultStatus::from_str(&status_raw).unwrap_or(ResultStatus::PendingReview),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
#[path = "lab_result_test.rs"]
mod tests;
