//! Field rules used through `#[validate(custom(function = ...))]`.
//!
//! Each DTO names the rules it needs at its own fields; nothing is
//! registered globally.

use std::borrow::Cow;

use validator::{ValidateEmail, ValidationError};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#~$%^&*()+|_.,<>?/{}-";

/// Password must be at least eight characters long and contain an
/// uppercase letter, a digit and one of [`PASSWORD_SPECIAL_CHARS`].
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if long_enough && has_upper && has_digit && has_special {
        return Ok(());
    }

    Err(ValidationError::new("password_strength").with_message(Cow::Borrowed(
        "password must be at least 8 characters and contain an uppercase letter, a number and a special character",
    )))
}

/// Rejects values made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Ok(());
    }
    Err(ValidationError::new("username_length")
        .with_message(Cow::Borrowed("username must be between 3 and 50 characters")))
}

/// Profile edits treat an empty value as "keep the stored one".
pub fn validate_username_or_empty(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Ok(());
    }
    validate_username(username)
}

pub fn validate_email_or_empty(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::Borrowed("email is invalid")))
}
