//! Service catalog routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::AdminUser;
use super::{ApiError, ListResponse, MessageResponse, non_blank};
use crate::services::catalog::{self, NewService, ServiceType, ServiceUpdate};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateServiceBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateServiceBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct ServiceResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

fn to_response(record: catalog::ServiceRecord) -> ServiceResponse {
    ServiceResponse {
        id: record.id,
        name: record.name,
        description: record.description,
        price: record.price,
        service_type: record.service_type,
        is_active: record.is_active,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub(crate) fn validate_create(body: &CreateServiceBody) -> Result<NewService, ApiError> {
    let (Some(name), Some(description), Some(type_raw)) = (
        non_blank(body.name.as_ref()),
        non_blank(body.description.as_ref()),
        non_blank(body.service_type.as_ref()),
    ) else {
        return Err(ApiError::validation("Please provide all service details."));
    };
    let Some(price) = body.price else {
        return Err(ApiError::validation("Please provide all service details."));
    };
    let Some(service_type) = ServiceType::from_str(type_raw) else {
        return Err(ApiError::validation("Invalid service type."));
    };
    if description.len() > 500 {
        return Err(ApiError::validation("Description cannot be more than 500 characters"));
    }

    Ok(NewService {
        name: name.to_owned(),
        description: description.to_owned(),
        price,
        service_type,
    })
}

pub(crate) fn validate_update(body: UpdateServiceBody) -> Result<ServiceUpdate, ApiError> {
    let service_type = match body.service_type.as_deref() {
        Some(raw) => {
            let Some(parsed) = ServiceType::from_str(raw) else {
                return Err(ApiError::validation("Invalid service type."));
            };
            Some(parsed)
        }
        None => None,
    };
    if let Some(description) = &body.description {
        if description.len() > 500 {
            return Err(ApiError::validation("Description cannot be more than 500 characters"));
        }
    }

    Ok(ServiceUpdate {
        name: body.name,
        description: body.description,
        price: body.price,
        service_type,
        is_active: body.is_active,
    })
}

/// `GET /api/services` — public listing; inactive entries included.
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ServiceResponse>>, ApiError> {
    let records = catalog::list_services(&state.pool)
        .await
        .map_err(|e| catalog_error_to_api(e, "Server Error: Could not fetch services"))?;

    Ok(Json(ListResponse::new(records.into_iter().map(to_response).collect())))
}

/// `POST /api/services` — create a catalog entry.
pub async fn create_service(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateServiceBody>,
) -> Result<(StatusCode, Json<MessageResponse<ServiceResponse>>), ApiError> {
    let new = validate_create(&body)?;
    let record = catalog::create_service(&state.pool, new)
        .await
        .map_err(|e| catalog_error_to_api(e, "Server Error: Could not create service"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Service created successfully",
            data: Some(to_response(record)),
        }),
    ))
}

/// `PUT /api/services/:id` — partial update, including toggling `isActive`.
pub async fn update_service(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateServiceBody>,
) -> Result<Json<MessageResponse<ServiceResponse>>, ApiError> {
    let update = validate_update(body)?;
    let record = catalog::update_service(&state.pool, id, update)
        .await
        .map_err(|e| catalog_error_to_api(e, "Server Error: Could not update service"))?;

    Ok(Json(MessageResponse {
        message: "Service updated successfully",
        data: Some(to_response(record)),
    }))
}

/// `DELETE /api/services/:id` — hard delete; existing bookings keep the name.
pub async fn delete_service(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse<ServiceResponse>>, ApiError> {
    catalog::delete_service(&state.pool, id)
        .await
        .map_err(|e| catalog_error_to_api(e, "Server Error: Could not delete service"))?;

    Ok(Json(MessageResponse { message: "Service removed successfully", data: None }))
}

pub(crate) fn catalog_error_to_api(err: catalog::CatalogError, server_message: &'static str) -> ApiError {
    match err {
        catalog::CatalogError::NameTaken => {
            ApiError::conflict("Service with this name already exists.")
        }
        catalog::CatalogError::InvalidPrice => ApiError::validation("Price cannot be negative."),
        catalog::CatalogError::NotFound(_) => ApiError::not_found("Service not found"),
        catalog::CatalogError::Db(e) => {
            tracing::error!(error = %e, "catalog database error");
            ApiError::server(server_message)
        }
    }
}

#[cfg(test)]
#[path = "services_test.rs"]
mod tests;
