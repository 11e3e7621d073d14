use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use courierds_core::ErrorResponse;
use courierds_models::{
    ApplicationId, ApplicationStatus, ApplyDispatcherDto, ChangePasswordDto, CreateUserDto,
    Dispatcher, DispatcherApplication, DispatcherId, HealthResponse, LoginRequest, LoginResponse,
    MessageResponse, ReviewResponse, SignupRequest, UpdateProfileDto, UpdateUserDto, User, UserId,
    UserRole, VehicleType,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::update_profile,
        crate::modules::auth::controller::change_password,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::dispatchers::controller::apply,
        crate::modules::dispatchers::controller::my_application,
        crate::modules::dispatchers::controller::list_applications,
        crate::modules::dispatchers::controller::get_application,
        crate::modules::dispatchers::controller::review_application,
        crate::modules::dispatchers::controller::list_dispatchers,
        crate::modules::health::controller::health_check,
    ),
    components(
        schemas(
            User,
            UserId,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            UpdateProfileDto,
            ChangePasswordDto,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ApplicationId,
            ApplicationStatus,
            VehicleType,
            ApplyDispatcherDto,
            DispatcherApplication,
            DispatcherId,
            Dispatcher,
            ReviewResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login and self-service account endpoints"),
        (name = "Dispatchers", description = "Applying to become a dispatcher"),
        (name = "Admin", description = "User management and dispatcher application review"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "CourierDS API",
        version = "0.1.0",
        description = "Courier delivery backend: accounts, roles and dispatcher onboarding.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}
