//! # CourierDS Auth
//!
//! Session token claims and HS256 token utilities.
//!
//! - [`claims`]: the claim set carried by every access token
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use courierds_auth::{create_access_token, verify_token};
//! use courierds_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "user", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "user");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{REQUIRED_CLAIMS, create_access_token, verify_token};
