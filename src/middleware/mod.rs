//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: resolves the bearer token (or `jwt` cookie) into the calling [`User`](courierds_models::User)
//! - [`role`]: role allow-list gate
//! - [`application`]: pre-fetches the dispatcher application named in the path
//! - [`basic_auth`]: credential check for the health probe
//! - [`rate_limit`]: per-IP limit on the credential endpoints
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` (or the `jwt` cookie set at login)
//! 2. The token is verified and its subject loaded from the store
//! 3. Role gates compare the stored role against their allow-list
//! 4. The handler receives the resolved user as a typed argument

pub mod application;
pub mod auth;
pub mod basic_auth;
pub mod rate_limit;
pub mod role;
