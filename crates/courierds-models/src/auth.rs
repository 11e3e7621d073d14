//! Signup, login and session DTOs.

use courierds_core::validation::{validate_password_strength, validate_username};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// Public signup. The role is always `user`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "rider_01")]
    pub username: String,
    #[validate(email(message = "email is invalid"))]
    #[schema(example = "rider@courier.dev")]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Courier#2024")]
    pub password: String,
    #[validate(length(min = 1, message = "confirm_password is required"))]
    #[schema(example = "Courier#2024")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "Courier#2024")]
    pub password: String,
}

/// Returned on login. The same token is also set as the `jwt` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub id: UserId,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
