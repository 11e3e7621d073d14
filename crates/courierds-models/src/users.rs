//! User domain models and DTOs.

use std::fmt;

use chrono::{DateTime, Utc};
use courierds_core::validation::{
    validate_email_or_empty, validate_password_strength, validate_username,
    validate_username_or_empty,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// Access level of an account. Changed only by an admin edit or by
/// dispatcher promotion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Dispatcher,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Dispatcher => "dispatcher",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "dispatcher" => Ok(UserRole::Dispatcher),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A user account as exposed by the API. The password hash never leaves
/// the store through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row including the bcrypt hash, for credential checks only.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

/// Admin-side account creation. Any role may be assigned.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "rider_01")]
    pub username: String,
    #[validate(email(message = "email is invalid"))]
    #[schema(example = "rider@courier.dev")]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Courier#2024")]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Admin-side edit. Absent or empty fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(custom(function = "validate_username_or_empty"))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_email_or_empty"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

/// Self-service profile edit. Absent or empty fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(custom(function = "validate_username_or_empty"))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_email_or_empty"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "old_password is required"))]
    pub old_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
    #[validate(length(min = 1, message = "confirm_password is required"))]
    pub confirm_password: String,
}

/// Returns `candidate` unless it is absent or empty.
pub fn keep_or_replace(current: String, candidate: Option<String>) -> String {
    match candidate {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => current,
    }
}
