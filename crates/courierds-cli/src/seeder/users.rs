//! Fake user generation and batched inserts.

use courierds_core::validation::USERNAME_MAX_LEN;
use courierds_models::{UserId, UserRole};
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

/// Generates `count` users with the `user` role.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user(idx, password_hash))
        .collect()
}

fn generate_user(idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let username = seed_username(&first_name, &last_name, idx);
    let email = format!("{}@{}", username, SEED_EMAIL_DOMAIN);

    UserSeed {
        username,
        email,
        password_hash: password_hash.to_string(),
        role: UserRole::User,
    }
}

/// `first.last<idx>`, lowercased, ASCII only and trimmed to the username
/// limit while keeping the index suffix that makes it unique.
pub fn seed_username(first_name: &str, last_name: &str, idx: usize) -> String {
    let suffix = idx.to_string();
    let stem: String = format!("{}.{}", first_name, last_name)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .take(USERNAME_MAX_LEN - suffix.len())
        .collect();
    format!("{}{}", stem, suffix)
}

pub async fn seed_users(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let users = generate_users(count, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts users in one transaction, returning ids in input order.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    let mut all_ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        all_ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (username, email, password, role) VALUES ");

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, UserId>(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes every seeded account. Applications and dispatchers go with
/// them through the foreign keys.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> 'admin'")
        .bind(pattern)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courierds_core::validation::validate_username;

    #[test]
    fn test_seed_username_is_valid_and_indexed() {
        let username = seed_username("Mary-Jane", "O'Neil", 42);
        assert_eq!(username, "maryjane.oneil42");
        assert!(validate_username(&username).is_ok());
    }

    #[test]
    fn test_seed_username_respects_max_length() {
        let long = "x".repeat(80);
        let username = seed_username(&long, &long, 123456);
        assert_eq!(username.chars().count(), USERNAME_MAX_LEN);
        assert!(username.ends_with("123456"));
    }

    #[test]
    fn test_generate_users_are_unique() {
        let users = generate_users(200, "hash");
        let mut emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), 200);
        assert!(users.iter().all(|u| u.role == UserRole::User));
        assert!(users.iter().all(|u| u.email.ends_with(SEED_EMAIL_DOMAIN)));
    }
}
