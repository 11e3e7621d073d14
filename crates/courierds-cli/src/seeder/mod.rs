//! Development data: fake users and dispatcher applications.

pub mod applications;
pub mod models;
pub mod users;

pub use models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig};

use courierds_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

/// Seeds users, then applications for the first of them.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    // bcrypt is slow; hash once and share
    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_ids = users::seed_users(db, config.num_users, &password_hash).await?;
    let applicants = &user_ids[..config.effective_applications().min(user_ids.len())];
    applications::seed_applications(db, applicants).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Seeded accounts use the password: {}", SEED_PASSWORD);
    Ok(())
}

pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    users::clear_users(db).await?;
    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
