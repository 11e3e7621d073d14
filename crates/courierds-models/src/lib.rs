//! # CourierDS Models
//!
//! Persisted entities and request/response DTOs.
//!
//! - [`ids`]: typed uuid identifiers
//! - [`users`]: users, roles and user management DTOs
//! - [`auth`]: signup, login and session DTOs
//! - [`dispatchers`]: dispatcher applications and promoted dispatchers
//! - [`health`]: health probe payload

pub mod auth;
pub mod dispatchers;
pub mod health;
pub mod ids;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};
pub use dispatchers::{
    ApplicationStatus, ApplyDispatcherDto, Dispatcher, DispatcherApplication, ReviewResponse,
    VehicleType,
};
pub use health::HealthResponse;
pub use ids::{ApplicationId, DispatcherId, UserId};
pub use users::{
    ChangePasswordDto, CreateUserDto, UpdateProfileDto, UpdateUserDto, User, UserRole,
    UserWithPassword,
};
