//! Account service — registration, credential checks, user listing.
//!
//! Passwords are bcrypt-hashed before they reach the table and the hash
//! never leaves this module. Login reports the same `InvalidCredentials`
//! for an unknown email and a wrong password so callers cannot probe which
//! addresses are registered.

use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Account role. Stored as lowercase text in the `role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Registered account, as returned to the auth handlers.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// User row for admin listings. Never carries the password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

/// Owning user joined into booking and lab-result listings.
#[derive(Debug, Clone)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Register a new account with the default `user` role.
///
/// # Errors
///
/// `InvalidEmail` for a malformed address, `EmailTaken` if the address is
/// already registered, otherwise hashing or database errors.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Account, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;

    // Pre-check mirrors the single-document model: a concurrent duplicate
    // insert still trips the unique index and surfaces as a database error.
    let exists = sqlx::query("SELECT 1 FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(AccountError::EmailTaken);
    }

    let password_hash = hash(password, DEFAULT_COST)?;
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .bind(Role::User.as_str())
    .execute(pool)
    .await?;

    Ok(Account { id, name: name.to_owned(), email, role: Role::User })
}

/// Check credentials and return the account.
///
/// # Errors
///
/// `InvalidCredentials` for an unknown email or a hash mismatch; hashing or
/// database errors otherwise.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<Account, AccountError> {
    let Some(email) = normalize_email(email) else {
        return Err(AccountError::InvalidCredentials);
    };

    let row = sqlx::query("SELECT id, name, email, password_hash, role FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Err(AccountError::InvalidCredentials);
    };

    let password_hash: String = row.get("password_hash");
    if !verify(password, &password_hash)? {
        return Err(AccountError::InvalidCredentials);
    }

    let role_raw: String = row.get("role");
    Ok(Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: Role::from_str(&role_raw).unwrap_or(Role::User),
    })
}

/// List every registered user, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRecord>, AccountError> {
    let rows = sqlx::query(
        r#"SELECT id, name, email, role,
                  to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
           FROM users
           ORDER BY created_at DESC"#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| {
            let role_raw: String = r.get("role");
            UserRecord {
                id: r.get("id"),
                name: r.get("name"),
                email: r.get("email"),
                role: Role::from_str(&role_raw).unwrap_or(Role::User),
                created_at: r.get("created_at"),
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
