use super::*;

#[test]
fn api_error_constructors_carry_expected_status() {
    assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::conflict("x").status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
    assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::server("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn api_error_renders_json_message_body() {
    let response = ApiError::not_found("Booking not found").into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("body should be JSON");
    assert_eq!(value, serde_json::json!({ "message": "Booking not found" }));
}

#[test]
fn list_response_counts_data() {
    let response = ListResponse::new(vec!["a", "b", "c"]);
    assert!(response.success);
    assert_eq!(response.count, 3);

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value.get("count"), Some(&serde_json::json!(3)));
    assert_eq!(value.get("success"), Some(&serde_json::json!(true)));
}

#[test]
fn message_response_omits_missing_data() {
    let response = MessageResponse::<String> { message: "Service removed successfully", data: None };
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, serde_json::json!({ "message": "Service removed successfully" }));
}

#[test]
fn non_blank_trims_and_filters() {
    let some = "  hello ".to_owned();
    let blank = "   ".to_owned();
    assert_eq!(non_blank(Some(&some)), Some("hello"));
    assert_eq!(non_blank(Some(&blank)), None);
    assert_eq!(non_blank(None), None);
}

#[test]
fn parse_date_accepts_iso_dates() {
    assert_eq!(parse_date("2026-09-01"), Some("2026-09-01".to_owned()));
    assert_eq!(parse_date(" 2026-01-31 "), Some("2026-01-31".to_owned()));
}

#[test]
fn parse_date_rejects_bad_shapes() {
    assert_eq!(parse_date("not-a-date"), None);
    assert_eq!(parse_date("2026-02-30"), None);
    assert_eq!(parse_date("01-09-2026"), None);
    assert_eq!(parse_date(""), None);
}
