use courierds_core::hash_password;
use courierds_core::validation::{
    validate_email_or_empty, validate_password_strength, validate_username,
};
use courierds_models::{UserId, UserRole};
use sqlx::PgPool;
use validator::ValidationError;

fn describe(err: ValidationError) -> String {
    err.message
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

/// Inserts an admin account. Signup only ever creates `user` accounts, so
/// the first admin has to come from here.
pub async fn create_admin(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    let username = username.trim();
    let email = email.trim().to_lowercase();

    validate_username(username).map_err(describe)?;
    if email.is_empty() {
        return Err("email is required".into());
    }
    validate_email_or_empty(&email).map_err(describe)?;
    validate_password_strength(password).map_err(describe)?;

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(username)
    .bind(&email)
    .bind(&hashed_password)
    .bind(UserRole::Admin)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "A user with this username or email already exists".into())
}
