//! # CourierDS Core
//!
//! Core types, errors, and utilities shared by every CourierDS crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`validation`]: Custom field rules plugged into `validator` derives
//!
//! # Example
//!
//! ```ignore
//! use courierds_core::errors::AppError;
//! use courierds_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("user not found"));
//! let hash = hash_password("Secur3!pass")?;
//! ```

pub mod errors;
pub mod password;
pub mod validation;

pub use errors::{AppError, ErrorResponse};
pub use password::{hash_password, verify_password};
