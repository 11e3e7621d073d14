//! Dispatcher applications and promoted dispatchers.

use std::fmt;

use chrono::{DateTime, Utc};
use courierds_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ApplicationId, DispatcherId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vehicle_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Motorcycle => "motorcycle",
        }
    }
}

/// Lifecycle of an application.
///
/// `Pending` moves to `Approved` (terminal) or the row is deleted on
/// rejection, so `Rejected` is never persisted by the review flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A user's request to become a dispatcher. At most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DispatcherApplication {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub vehicle_type: VehicleType,
    #[schema(example = "ABCD1234")]
    pub vehicle_plate_number: String,
    #[schema(example = 2018)]
    pub vehicle_year: i32,
    #[schema(example = "Honda CB500X")]
    pub vehicle_model: String,
    #[schema(example = "123456789012")]
    pub driver_license: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Created exactly once, when an application is approved. Vehicle and
/// license fields are copied from the application at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Dispatcher {
    pub id: DispatcherId,
    pub user_id: UserId,
    pub application_id: ApplicationId,
    pub vehicle_type: VehicleType,
    pub vehicle_plate_number: String,
    pub vehicle_year: i32,
    pub vehicle_model: String,
    pub driver_license: String,
    pub approved_at: DateTime<Utc>,
    pub is_active: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /dispatchers/apply`.
///
/// Only presence is checked here. Plate, license and year constraints are
/// applied when an admin reviews the application.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApplyDispatcherDto {
    pub vehicle_type: VehicleType,
    #[validate(custom(function = "validate_not_blank", message = "vehicle_plate_number is required"))]
    #[schema(example = "ABCD1234")]
    pub vehicle_plate_number: String,
    #[validate(range(min = 1, message = "vehicle_year is required"))]
    #[schema(example = 2018)]
    pub vehicle_year: i32,
    #[validate(custom(function = "validate_not_blank", message = "vehicle_model is required"))]
    #[schema(example = "Honda CB500X")]
    pub vehicle_model: String,
    #[validate(custom(function = "validate_not_blank", message = "driver_license is required"))]
    #[schema(example = "123456789012")]
    pub driver_license: String,
}

/// Outcome of a review. `dispatcher` is present only on approval.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatcher: Option<Dispatcher>,
}
