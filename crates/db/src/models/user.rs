//! User entity model and DTOs.

use capitalympics_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub password_hash: String,
    /// Preferred UI language (ISO 639-1 code).
    pub language: String,
    /// Denormalized overall mastery level, -1 until the first quiz attempt.
    pub level: i32,
    pub last_activity: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub language: String,
    pub level: i32,
    pub last_activity: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            language: user.language,
            level: user.level,
            last_activity: user.last_activity,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password arrives pre-hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub password_hash: String,
    pub language: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub language: Option<String>,
}
