//! # CourierDS CLI
//!
//! Administrative tools for CourierDS: bootstrapping the first admin
//! account and seeding development data.
//!
//! ## Usage
//!
//! ```ignore
//! use courierds_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::new(200).with_applications(50)).await?;
//! ```

pub mod admin;
pub mod seeder;
