use super::*;
use crate::services::catalog::CatalogError;

fn full_body() -> CreateServiceBody {
    CreateServiceBody {
        name: Some("CBC Panel".into()),
        description: Some("Complete blood count".into()),
        price: Some(499.0),
        service_type: Some("Blood Test".into()),
    }
}

#[test]
fn validate_create_accepts_full_body() {
    let new = validate_create(&full_body()).expect("full body should validate");
    assert_eq!(new.name, "CBC Panel");
    assert_eq!(new.service_type, ServiceType::BloodTest);
    assert!((new.price - 499.0).abs() < f64::EPSILON);
}

#[test]
fn validate_create_rejects_missing_fields() {
    for strip in 0..4 {
        let mut body = full_body();
        match strip {
            0 => body.name = None,
            1 => body.description = Some("   ".into()),
            2 => body.price = None,
            _ => body.service_type = None,
        }
        let err = validate_create(&body).expect_err("missing field should be rejected");
        assert_eq!(err.message(), "Please provide all service details.");
    }
}

#[test]
fn validate_create_rejects_unknown_type() {
    let mut body = full_body();
    body.service_type = Some("X-Ray".into());
    let err = validate_create(&body).expect_err("unknown type should be rejected");
    assert_eq!(err.message(), "Invalid service type.");
}

#[test]
fn validate_create_rejects_oversized_description() {
    let mut body = full_body();
    body.description = Some("x".repeat(501));
    let err = validate_create(&body).expect_err("long description should be rejected");
    assert_eq!(err.message(), "Description cannot be more than 500 characters");
}

#[test]
fn validate_update_parses_type_and_passes_partial_fields() {
    let update = validate_update(UpdateServiceBody {
        service_type: Some("ECG".into()),
        is_active: Some(false),
        ..UpdateServiceBody::default()
    })
    .expect("partial update should validate");

    assert_eq!(update.service_type, Some(ServiceType::Ecg));
    assert_eq!(update.is_active, Some(false));
    assert!(update.name.is_none());
    assert!(update.price.is_none());
}

#[test]
fn validate_update_rejects_unknown_type() {
    let result = validate_update(UpdateServiceBody {
        service_type: Some("MRI".into()),
        ..UpdateServiceBody::default()
    });
    assert!(result.is_err());
}

#[test]
fn catalog_errors_map_to_expected_responses() {
    use axum::http::StatusCode;

    let taken = catalog_error_to_api(CatalogError::NameTaken, "Server Error: Could not create service");
    assert_eq!(taken.status(), StatusCode::BAD_REQUEST);
    assert_eq!(taken.message(), "Service with this name already exists.");

    let price = catalog_error_to_api(CatalogError::InvalidPrice, "Server Error: Could not create service");
    assert_eq!(price.status(), StatusCode::BAD_REQUEST);
    assert_eq!(price.message(), "Price cannot be negative.");

    let missing = catalog_error_to_api(
        CatalogError::NotFound(Uuid::nil()),
        "Server Error: Could not update service",
    );
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Service not found");

    let db = catalog_error_to_api(
        CatalogError::Db(sqlx::Error::PoolClosed),
        "Server Error: Could not fetch services",
    );
    assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(db.message(), "Server Error: Could not fetch services");
}

#[test]
fn service_response_uses_original_wire_keys() {
    let response = ServiceResponse {
        id: Uuid::nil(),
        name: "CBC Panel".into(),
        description: "Complete blood count".into(),
        price: 499.0,
        service_type: ServiceType::BloodTest,
        is_active: true,
        created_at: "2026-08-01T10:00:00Z".into(),
        updated_at: "2026-08-01T10:00:00Z".into(),
    };

    let value = serde_json::to_value(&response).unwrap();
    assert!(value.get("_id").is_some());
    assert_eq!(value.get("type"), Some(&serde_json::json!("Blood Test")));
    assert_eq!(value.get("isActive"), Some(&serde_json::json!(true)));
    assert!(value.get("createdAt").is_some());
    assert!(value.get("is_active").is_none());
}
