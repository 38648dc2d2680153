//! Lab result routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::{AdminUser, AuthUser};
use super::bookings::OwnerResponse;
use super::{ApiError, ListResponse, MessageResponse, non_blank, parse_date};
use crate::services::lab_result::{self, NewLabResult, ResultStatus};
use crate::state::AppState;

const REFERENCE_RANGE_MAX_LEN: usize = 100;
const INTERPRETATION_MAX_LEN: usize = 500;

#[derive(Deserialize)]
pub struct UploadResultBody {
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
    #[serde(rename = "testName")]
    pub test_name: Option<String>,
    #[serde(rename = "testDate")]
    pub test_date: Option<String>,
    #[serde(rename = "resultValue")]
    pub result_value: Option<String>,
    pub units: Option<String>,
    #[serde(rename = "referenceRange")]
    pub reference_range: Option<String>,
    pub interpretation: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct LabResultResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: OwnerResponse,
    #[serde(rename = "testName")]
    pub test_name: String,
    #[serde(rename = "testDate")]
    pub test_date: String,
    #[serde(rename = "resultValue")]
    pub result_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(rename = "referenceRange", skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    pub status: ResultStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

fn to_response(record: lab_result::LabResultRecord) -> LabResultResponse {
    LabResultResponse {
        id: record.id,
        user: OwnerResponse {
            id: record.owner.id,
            name: record.owner.name,
            email: record.owner.email,
        },
        test_name: record.test_name,
        test_date: record.test_date,
        result_value: record.result_value,
        units: record.units,
        reference_range: record.reference_range,
        interpretation: record.interpretation,
        status: record.status,
        created_at: record.created_at,
    }
}

/// Check required fields, the date shape, the optional-status value, and
/// the free-text caps. Status defaults to `pending review`.
pub(crate) fn validate_upload(body: &UploadResultBody) -> Result<NewLabResult, ApiError> {
    let (Some(user_email), Some(test_name), Some(test_date), Some(result_value)) = (
        non_blank(body.user_email.as_ref()),
        non_blank(body.test_name.as_ref()),
        non_blank(body.test_date.as_ref()),
        non_blank(body.result_value.as_ref()),
    ) else {
        return Err(ApiError::validation(
            "Please provide user email, test name, test date, and result value.",
        ));
    };

    let Some(test_date) = parse_date(test_date) else {
        return Err(ApiError::validation("Please provide a valid test date (YYYY-MM-DD)."));
    };

    let status = match non_blank(body.status.as_ref()) {
        Some(raw) => ResultStatus::from_str(raw)
            .ok_or_else(|| ApiError::validation("Invalid result status."))?,
        None => ResultStatus::PendingReview,
    };

    let reference_range = non_blank(body.reference_range.as_ref()).map(str::to_owned);
    if reference_range.as_ref().is_some_and(|r| r.len() > REFERENCE_RANGE_MAX_LEN) {
        return Err(ApiError::validation("Reference range cannot be more than 100 characters"));
    }
    let interpretation = non_blank(body.interpretation.as_ref()).map(str::to_owned);
    if interpretation.as_ref().is_some_and(|i| i.len() > INTERPRETATION_MAX_LEN) {
        return Err(ApiError::validation("Interpretation cannot be more than 500 characters"));
    }

    Ok(NewLabResult {
        patient_email: user_email.to_owned(),
        test_name: test_name.to_owned(),
        test_date,
        result_value: result_value.to_owned(),
        units: non_blank(body.units.as_ref()).map(str::to_owned),
        reference_range,
        interpretation,
        status,
    })
}

/// `POST /api/labresults` — upload a result for the patient matching the
/// given email.
pub async fn upload_result(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<UploadResultBody>,
) -> Result<(StatusCode, Json<MessageResponse<LabResultResponse>>), ApiError> {
    let new = validate_upload(&body)?;
    let record = lab_result::upload(&state.pool, new)
        .await
        .map_err(|e| lab_result_error_to_api(e, "Server Error: Could not create lab test result"))?;

    tracing::info!(result = %record.id, admin = %admin.id, "lab result uploaded");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Lab test result created successfully",
            data: Some(to_response(record)),
        }),
    ))
}

/// `GET /api/labresults/my` — the caller's results, most recent test first.
pub async fn my_results(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ListResponse<LabResultResponse>>, ApiError> {
    let records = lab_result::list_for_user(&state.pool, identity.id)
        .await
        .map_err(|e| lab_result_error_to_api(e, "Server Error: Could not fetch your lab test results"))?;

    Ok(Json(ListResponse::new(records.into_iter().map(to_response).collect())))
}

/// `GET /api/labresults/all` — every result with its owner joined in.
pub async fn all_results(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ListResponse<LabResultResponse>>, ApiError> {
    let records = lab_result::list_all(&state.pool)
        .await
        .map_err(|e| lab_result_error_to_api(e, "Server Error: Could not fetch lab test results"))?;

    Ok(Json(ListResponse::new(records.into_iter().map(to_response).collect())))
}

/// `PUT /api/labresults/:id/status` — overwrite the report status.
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<MessageResponse<LabResultResponse>>, ApiError> {
    let status = non_blank(body.status.as_ref())
        .and_then(ResultStatus::from_str)
        .ok_or_else(|| ApiError::validation("Invalid result status."))?;

    let record = lab_result::update_status(&state.pool, id, status)
        .await
        .map_err(|e| lab_result_error_to_api(e, "Server Error: Could not update result status"))?;

    Ok(Json(MessageResponse {
        message: "Result status updated successfully",
        data: Some(to_response(record)),
    }))
}

pub(crate) fn lab_result_error_to_api(
    err: lab_result::LabResultError,
    server_message: &'static str,
) -> ApiError {
    match err {
        lab_result::LabResultError::PatientNotFound => {
            ApiError::not_found("User not found with the provided email.")
        }
        lab_result::LabResultError::NotFound(_) => ApiError::not_found("Lab test result not found"),
        lab_result::LabResultError::Db(e) => {
            tracing::error!(error = %e, "lab result database error");
            ApiError::server(server_message)
        }
    }
}

#[cfg(test)]
#[path = "lab_results_test.rs"]
mod tests;
