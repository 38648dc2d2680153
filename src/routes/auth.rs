//! Auth routes — registration, login, and the Bearer-token extractors.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, non_blank};
use crate::services::account::{self, Role};
use crate::services::token::{self, Identity};
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub(crate) fn parse_bearer(header: Option<&str>) -> Option<&str> {
    let token = header?.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

pub(crate) fn ensure_admin(identity: Identity) -> Result<(), ApiError> {
    if identity.role == Role::Admin {
        return Ok(());
    }
    Err(ApiError::forbidden(format!(
        "Not authorized to access this route: Role '{}' is not allowed.",
        identity.role.as_str()
    )))
}

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Authenticated identity extracted from the Bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let Some(raw) = parse_bearer(header) else {
            return Err(ApiError::unauthorized("Not authorized, no token"));
        };

        let app_state = AppState::from_ref(state);
        let identity = token::verify(&app_state.tokens, raw)
            .map_err(|_| ApiError::unauthorized("Not authorized, token failed"))?;

        Ok(Self(identity))
    }
}

/// Authenticated identity that must carry the admin role.
/// Use as a handler parameter to gate admin-only routes.
pub struct AdminUser(pub Identity);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        ensure_admin(identity)?;
        Ok(Self(identity))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Session response returned by both register and login.
#[derive(Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// `POST /api/auth/register` — create an account and issue a session token.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (Some(name), Some(email), Some(password)) = (
        non_blank(body.name.as_ref()),
        non_blank(body.email.as_ref()),
        non_blank(body.password.as_ref()),
    ) else {
        return Err(ApiError::validation("Please enter all fields: name, email, password"));
    };

    let account = account::register(&state.pool, name, email, password)
        .await
        .map_err(|e| account_error_to_api(e, "Server Error during registration"))?;

    let token = token::issue(&state.tokens, account.id, account.role).map_err(|e| {
        tracing::error!(error = %e, "token issue failed");
        ApiError::server("Server Error during registration")
    })?;

    Ok((StatusCode::CREATED, Json(session_response(account, token))))
}

/// `POST /api/auth/login` — check credentials and issue a fresh token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(email), Some(password)) = (
        non_blank(body.email.as_ref()),
        non_blank(body.password.as_ref()),
    ) else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let account = account::login(&state.pool, email, password)
        .await
        .map_err(|e| account_error_to_api(e, "Server Error during login"))?;

    let token = token::issue(&state.tokens, account.id, account.role).map_err(|e| {
        tracing::error!(error = %e, "token issue failed");
        ApiError::server("Server Error during login")
    })?;

    Ok(Json(session_response(account, token)))
}

fn session_response(account: account::Account, token: String) -> AuthResponse {
    AuthResponse {
        id: account.id,
        name: account.name,
        email: account.email,
        role: account.role,
        token,
    }
}

pub(crate) fn account_error_to_api(err: account::AccountError, server_message: &'static str) -> ApiError {
    match err {
        account::AccountError::InvalidEmail => {
            ApiError::validation("Please provide a valid email address.")
        }
        account::AccountError::EmailTaken => ApiError::conflict("User already exists"),
        account::AccountError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
        account::AccountError::Hash(e) => {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::server(server_message)
        }
        account::AccountError::Db(e) => {
            tracing::error!(error = %e, "account database error");
            ApiError::server(server_message)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
