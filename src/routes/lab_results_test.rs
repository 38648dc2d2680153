use super::*;
use crate::services::lab_result::LabResultError;

fn full_body() -> UploadResultBody {
    UploadResultBody {
        user_email: Some("asha@example.com".into()),
        test_name: Some("Blood Glucose".into()),
        test_date: Some("2026-07-01".into()),
        result_value: Some("5.4".into()),
        units: Some("mmol/L".into()),
        reference_range: Some("3.9-5.6".into()),
        interpretation: Some("Within normal limits".into()),
        status: Some("finalized".into()),
    }
}

#[test]
fn validate_upload_accepts_full_body() {
    let new = validate_upload(&full_body()).expect("full body should validate");
    assert_eq!(new.patient_email, "asha@example.com");
    assert_eq!(new.test_name, "Blood Glucose");
    assert_eq!(new.test_date, "2026-07-01");
    assert_eq!(new.status, ResultStatus::Finalized);
    assert_eq!(new.units.as_deref(), Some("mmol/L"));
}

#[test]
fn validate_upload_rejects_missing_required_fields() {
    for strip in 0..4 {
        let mut body = full_body();
        match strip {
            0 => body.user_email = None,
            1 => body.test_name = Some("   ".into()),
            2 => body.test_date = None,
            _ => body.result_value = None,
        }
        let err = validate_upload(&body).expect_err("missing field should be rejected");
        assert_eq!(
            err.message(),
            "Please provide user email, test name, test date, and result value."
        );
    }
}

#[test]
fn validate_upload_defaults_status_to_pending_review() {
    let mut body = full_body();
    body.status = None;
    let new = validate_upload(&body).expect("body should validate");
    assert_eq!(new.status, ResultStatus::PendingReview);
}

#[test]
fn validate_upload_rejects_unknown_status() {
    let mut body = full_body();
    body.status = Some("draft".into());
    let err = validate_upload(&body).expect_err("unknown status should be rejected");
    assert_eq!(err.message(), "Invalid result status.");
}

#[test]
fn validate_upload_rejects_malformed_date() {
    let mut body = full_body();
    body.test_date = Some("01/07/2026".into());
    assert!(validate_upload(&body).is_err());
}

#[test]
fn validate_upload_caps_free_text_lengths() {
    let mut body = full_body();
    body.reference_range = Some("x".repeat(101));
    let err = validate_upload(&body).expect_err("long range should be rejected");
    assert_eq!(err.message(), "Reference range cannot be more than 100 characters");

    let mut body = full_body();
    body.interpretation = Some("x".repeat(501));
    let err = validate_upload(&body).expect_err("long interpretation should be rejected");
    assert_eq!(err.message(), "Interpretation cannot be more than 500 characters");
}

#[test]
fn lab_result_errors_map_to_expected_responses() {
    use axum::http::StatusCode;

    let unknown_patient = lab_result_error_to_api(
        LabResultError::PatientNotFound,
        "Server Error: Could not create lab test result",
    );
    assert_eq!(unknown_patient.status(), StatusCode::NOT_FOUND);
    assert_eq!(unknown_patient.message(), "User not found with the provided email.");

    let missing = lab_result_error_to_api(
        LabResultError::NotFound(Uuid::nil()),
        "Server Error: Could not update result status",
    );
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Lab test result not found");

    let db = lab_result_error_to_api(
        LabResultError::Db(sqlx::Error::PoolClosed),
        "Server Error: Could not fetch lab test results",
    );
    assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(db.message(), "Server Error: Could not fetch lab test results");
}

#[test]
fn result_response_uses_original_wire_keys() {
    use crate::services::account::Owner;
    use crate::services::lab_result::LabResultRecord;

    let record = LabResultRecord {
        id: Uuid::nil(),
        owner: Owner { id: Uuid::nil(), name: "Asha".into(), email: "asha@example.com".into() },
        test_name: "Blood Glucose".into(),
        test_date: "2026-07-01".into(),
        result_value: "Positive".into(),
        units: None,
        reference_range: None,
        interpretation: None,
        status: ResultStatus::PendingReview,
        created_at: "2026-08-01T10:00:00Z".into(),
    };

    let value = serde_json::to_value(to_response(record)).unwrap();
    assert!(value.get("_id").is_some());
    assert_eq!(value.get("testName"), Some(&serde_json::json!("Blood Glucose")));
    assert_eq!(value.get("testDate"), Some(&serde_json::json!("2026-07-01")));
    assert_eq!(value.get("resultValue"), Some(&serde_json::json!("Positive")));
    assert_eq!(value.get("status"), Some(&serde_json::json!("pending review")));
    assert!(value.get("units").is_none(), "absent optionals are omitted");
}
