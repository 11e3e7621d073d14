use anyhow::{Context, anyhow};
use courierds_core::{AppError, hash_password};
use courierds_db::with_timeout;
use courierds_models::users::keep_or_replace;
use courierds_models::{CreateUserDto, UpdateUserDto, User, UserId, UserWithPassword};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

use crate::metrics::track_user_created;

const USER_COLUMNS: &str = "id, username, email, role, created_at, updated_at";

/// Maps unique violations on `users` to a conflict naming the taken field.
pub(crate) fn map_user_write_error(e: sqlx::Error, action: &'static str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("username") => "username",
                _ => "email",
            };
            return AppError::conflict(anyhow!("a user with this {} already exists", field));
        }
    }
    error!(error = %e, action, "User write failed");
    AppError::database(anyhow::Error::from(e).context(action))
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "users", user.role = %dto.role))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let query = format!(
            "INSERT INTO users (username, email, password, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let user = with_timeout(
            sqlx::query_as::<_, User>(&query)
                .bind(dto.username.trim())
                .bind(dto.email.trim().to_lowercase())
                .bind(&password_hash)
                .bind(dto.role)
                .fetch_one(db),
        )
        .await
        .map_err(|e| map_user_write_error(e, "failed to create user"))?;

        info!(user_id = %user.id, role = %user.role, "User created");
        track_user_created(user.role.as_str());
        Ok(user)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn list_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        let users = with_timeout(sqlx::query_as::<_, User>(&query).fetch_all(db))
            .await
            .context("failed to fetch users")
            .map_err(AppError::database)?;

        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_by_id(db: &PgPool, id: UserId) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        with_timeout(sqlx::query_as::<_, User>(&query).bind(id).fetch_optional(db))
            .await
            .context("failed to fetch user")
            .map_err(AppError::database)
    }

    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("user not found")))
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_by_email_with_password(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        let query = format!(
            "SELECT {}, password FROM users WHERE email = $1",
            USER_COLUMNS
        );
        with_timeout(
            sqlx::query_as::<_, UserWithPassword>(&query)
                .bind(email.trim().to_lowercase())
                .fetch_optional(db),
        )
        .await
        .context("failed to fetch user")
        .map_err(AppError::database)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn get_with_password(db: &PgPool, id: UserId) -> Result<UserWithPassword, AppError> {
        let query = format!("SELECT {}, password FROM users WHERE id = $1", USER_COLUMNS);
        with_timeout(
            sqlx::query_as::<_, UserWithPassword>(&query)
                .bind(id)
                .fetch_optional(db),
        )
        .await
        .context("failed to fetch user")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("user not found")))
    }

    /// Applies the non-empty fields of `dto`; the rest keep their stored value.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_user(db: &PgPool, id: UserId, dto: UpdateUserDto) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let username = keep_or_replace(existing.username, dto.username);
        let email = keep_or_replace(existing.email, dto.email.map(|e| e.to_lowercase()));
        let role = dto.role.unwrap_or(existing.role);

        let query = format!(
            "UPDATE users SET username = $1, email = $2, role = $3, updated_at = NOW() WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        );
        let user = with_timeout(
            sqlx::query_as::<_, User>(&query)
                .bind(&username)
                .bind(&email)
                .bind(role)
                .bind(id)
                .fetch_optional(db),
        )
        .await
        .map_err(|e| map_user_write_error(e, "failed to update user"))?
        .ok_or_else(|| AppError::not_found(anyhow!("user not found")))?;

        info!(user_id = %user.id, role = %user.role, "User updated");
        Ok(user)
    }

    #[instrument(skip(db, password_hash), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_password(
        db: &PgPool,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), AppError> {
        let result = with_timeout(
            sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(db),
        )
        .await
        .context("failed to update password")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("user not found")));
        }
        Ok(())
    }

    /// Deletes the account. Applications and dispatcher records cascade.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "users"))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = with_timeout(sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(db))
            .await
            .context("failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("user not found")));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
