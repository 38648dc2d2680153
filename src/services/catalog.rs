//! Service catalog — the bookable home-visit tests and packages.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Fixed service categories offered by the lab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Blood Test")]
    BloodTest,
    #[serde(rename = "Urine Test")]
    UrineTest,
    #[serde(rename = "ECG")]
    Ecg,
    #[serde(rename = "Health Package")]
    HealthPackage,
    #[serde(rename = "Other")]
    Other,
}

impl ServiceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::BloodTest => "Blood Test",
            ServiceType::UrineTest => "Urine Test",
            ServiceType::Ecg => "ECG",
            ServiceType::HealthPackage => "Health Package",
            ServiceType::Other => "Other",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Blood Test" => Some(ServiceType::BloodTest),
            "Urine Test" => Some(ServiceType::UrineTest),
            "ECG" => Some(ServiceType::Ecg),
            "Health Package" => Some(ServiceType::HealthPackage),
            "Other" => Some(ServiceType::Other),
            _ => None,
        }
    }
}

/// Catalog row as stored.
#[derive(Debug, Clone)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub service_type: ServiceType,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for a new catalog entry. New entries start active.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub service_type: ServiceType,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub service_type: Option<ServiceType>,
    pub is_active: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("service name already exists")]
    NameTaken,
    #[error("invalid price")]
    InvalidPrice,
    #[error("service not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub(crate) fn price_is_valid(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Create a catalog entry.
///
/// # Errors
///
/// `InvalidPrice` for a negative or non-finite price, `NameTaken` if the
/// name is already in use, database errors otherwise.
pub async fn create_service(pool: &PgPool, new: NewService) -> Result<ServiceRecord, CatalogError> {
    if !price_is_valid(new.price) {
        return Err(CatalogError::InvalidPrice);
    }

    let exists = sqlx::query("SELECT 1 FROM services WHERE name = $1")
        .bind(&new.name)
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(CatalogError::NameTaken);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO services (id, name, description, price, service_type) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(new.service_type.as_str())
    .execute(pool)
    .await?;

    fetch_service(pool, id).await?.ok_or(CatalogError::NotFound(id))
}

/// List every catalog entry, active or not; clients filter where relevant.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_services(pool: &PgPool) -> Result<Vec<ServiceRecord>, CatalogError> {
    let rows = sqlx::query(&format!(
        "{SERVICE_SELECT} ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(record_from_row).collect())
}

/// Apply a partial update to a catalog entry.
///
/// # Errors
///
/// `NotFound` if the id is absent, `NameTaken` when renaming onto another
/// entry's name, `InvalidPrice` for a bad price, database errors otherwise.
pub async fn update_service(
    pool: &PgPool,
    id: Uuid,
    update: ServiceUpdate,
) -> Result<ServiceRecord, CatalogError> {
    let current = fetch_service(pool, id).await?.ok_or(CatalogError::NotFound(id))?;

    if let Some(price) = update.price {
        if !price_is_valid(price) {
            return Err(CatalogError::InvalidPrice);
        }
    }

    if let Some(name) = &update.name {
        if *name != current.name {
            let taken = sqlx::query("SELECT 1 FROM services WHERE name = $1 AND id <> $2")
                .bind(name)
                .bind(id)
                .fetch_optional(pool)
                .await?;
            if taken.is_some() {
                return Err(CatalogError::NameTaken);
            }
        }
    }

    let name = update.name.unwrap_or(current.name);
    let description = update.description.unwrap_or(current.description);
    let price = update.price.unwrap_or(current.price);
    let service_type = update.service_type.unwrap_or(current.service_type);
    let is_active = update.is_active.unwrap_or(current.is_active);

    sqlx::query(
        "UPDATE services
         SET name = $2, description = $3, price = $4, service_type = $5, is_active = $6, updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(&name)
    .bind(&description)
    .bind(price)
    .bind(service_type.as_str())
    .bind(is_active)
    .execute(pool)
    .await?;

    fetch_service(pool, id).await?.ok_or(CatalogError::NotFound(id))
}

/// Hard-delete a catalog entry. Existing bookings referencing its name are
/// left as they are.
///
/// # Errors
///
/// `NotFound` if the id is absent, database errors otherwise.
pub async fn delete_service(pool: &PgPool, id: Uuid) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound(id));
    }
    Ok(())
}

const SERVICE_SELECT: &str = r#"SELECT id, name, description, price, service_type, is_active,
       to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
       to_char(updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
FROM services"#;

async fn fetch_service(pool: &PgPool, id: Uuid) -> Result<Option<ServiceRecord>, CatalogError> {
    let row = sqlx::query(&format!("{SERVICE_SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> ServiceRecord {
    let type_raw: String = row.get("service_type");
    ServiceRecord {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        service_type: ServiceType::from_str(&type_raw).unwrap_or(ServiceType::Other),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
