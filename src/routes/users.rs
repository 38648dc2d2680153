//! User listing and profile routes.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use uuid::Uuid;

use super::auth::{AdminUser, AuthUser};
use super::{ApiError, ListResponse};
use crate::services::account::{self, Role};
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub data: ProfileData,
}

#[derive(Serialize)]
pub struct ProfileData {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub role: Role,
    #[serde(rename = "secretInfo")]
    pub secret_info: &'static str,
}

/// `GET /api/users` — every registered user, password hash excluded.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ListResponse<UserResponse>>, ApiError> {
    let records = account::list_users(&state.pool).await.map_err(|e| {
        super::auth::account_error_to_api(e, "Server Error: Could not fetch users")
    })?;

    Ok(Json(ListResponse::new(
        records
            .into_iter()
            .map(|r| UserResponse {
                id: r.id,
                name: r.name,
                email: r.email,
                role: r.role,
                created_at: r.created_at,
            })
            .collect(),
    )))
}

/// `GET /api/user/profile` — echo the verified identity back to any
/// authenticated role.
pub async fn profile(AuthUser(identity): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: format!("Welcome to your protected profile, user ID: {}", identity.id),
        data: ProfileData {
            user_id: identity.id,
            role: identity.role,
            secret_info: "This is top secret!",
        },
    })
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
