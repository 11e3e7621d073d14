use anyhow::anyhow;
use courierds_auth::create_access_token;
use courierds_config::JwtConfig;
use courierds_core::{AppError, hash_password, verify_password};
use courierds_models::{
    ChangePasswordDto, CreateUserDto, LoginRequest, LoginResponse, SignupRequest,
    UpdateProfileDto, UpdateUserDto, User, UserId, UserRole,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::metrics::track_user_login;
use crate::modules::users::service::UserService;

pub const INVALID_CREDENTIALS: &str = "invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Public signup. Whatever the body says, the account gets the `user` role.
    #[instrument(skip(db, dto))]
    pub async fn signup(db: &PgPool, dto: SignupRequest) -> Result<User, AppError> {
        if dto.password != dto.confirm_password {
            return Err(AppError::bad_request(anyhow!("passwords do not match")));
        }

        UserService::create_user(
            db,
            CreateUserDto {
                username: dto.username,
                email: dto.email,
                password: dto.password,
                role: UserRole::User,
            },
        )
        .await
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(record) = UserService::find_by_email_with_password(db, &dto.email).await? else {
            warn!("Login attempt for unknown email");
            track_user_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &record.password)? {
            warn!(user_id = %record.user.id, "Login attempt with wrong password");
            track_user_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = record.user;
        let token = create_access_token(user.id.into_inner(), user.role.as_str(), jwt_config)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        track_user_login(true);

        Ok(LoginResponse {
            id: user.id,
            username: user.username,
            token,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        UserService::update_user(
            db,
            user_id,
            UpdateUserDto {
                username: dto.username,
                email: dto.email,
                role: None,
            },
        )
        .await
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: UserId,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        if dto.new_password != dto.confirm_password {
            return Err(AppError::bad_request(anyhow!("passwords do not match")));
        }

        let record = UserService::get_with_password(db, user_id).await?;

        if !verify_password(&dto.old_password, &record.password)? {
            return Err(AppError::unauthorized("invalid password"));
        }

        if dto.new_password == dto.old_password {
            return Err(AppError::bad_request(anyhow!("use a different password")));
        }

        let password_hash = hash_password(&dto.new_password)?;
        UserService::update_password(db, user_id, &password_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
