//! Fake dispatcher applications.
//!
//! Every fourth application breaks one review rule so a seeded database
//! exercises both review outcomes.

use courierds_models::{UserId, VehicleType};
use fake::Fake;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::ApplicationSeed;

const VEHICLE_MODELS: &[(VehicleType, &str)] = &[
    (VehicleType::Motorcycle, "Honda CB500X"),
    (VehicleType::Motorcycle, "Yamaha MT-07"),
    (VehicleType::Motorcycle, "Bajaj Boxer"),
    (VehicleType::Car, "Toyota Corolla"),
    (VehicleType::Car, "Ford Fiesta"),
    (VehicleType::Car, "Kia Picanto"),
];

const PLATE_LETTERS: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ";

fn random_plate() -> String {
    let letters: String = (0..4)
        .map(|_| PLATE_LETTERS[(0..PLATE_LETTERS.len()).fake::<usize>()] as char)
        .collect();
    format!("{}{:04}", letters, (0..10_000u32).fake::<u32>())
}

fn random_license() -> String {
    format!("{:012}", (0..1_000_000_000_000u64).fake::<u64>())
}

pub fn generate_applications(user_ids: &[UserId]) -> Vec<ApplicationSeed> {
    user_ids
        .par_iter()
        .enumerate()
        .map(|(idx, &user_id)| generate_application(user_id, idx))
        .collect()
}

fn generate_application(user_id: UserId, idx: usize) -> ApplicationSeed {
    let (vehicle_type, model) = VEHICLE_MODELS[(0..VEHICLE_MODELS.len()).fake::<usize>()];

    let mut seed = ApplicationSeed {
        user_id,
        vehicle_type,
        vehicle_plate_number: random_plate(),
        vehicle_year: (2008..2026).fake::<i32>(),
        vehicle_model: model.to_string(),
        driver_license: random_license(),
    };

    if idx % 4 == 3 {
        match (idx / 4) % 3 {
            0 => seed.vehicle_year = (1995..2008).fake::<i32>(),
            1 => seed.vehicle_plate_number.truncate(6),
            _ => seed.driver_license.truncate(9),
        }
    }

    seed
}

pub async fn seed_applications(
    db: &PgPool,
    user_ids: &[UserId],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🛵 Seeding {} dispatcher applications...", user_ids.len());

    let applications = generate_applications(user_ids);

    let mut tx = db.begin().await?;

    // 6 params per application
    const BATCH_SIZE: usize = 1000;

    let mut inserted = 0;
    for chunk in applications.chunks(BATCH_SIZE) {
        inserted += insert_applications_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} applications in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_applications_chunk(
    tx: &mut Transaction<'_, Postgres>,
    applications: &[ApplicationSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if applications.is_empty() {
        return Ok(0);
    }

    let mut query = String::from(
        "INSERT INTO dispatcher_applications \
         (user_id, vehicle_type, vehicle_plate_number, vehicle_year, vehicle_model, driver_license) VALUES ",
    );

    for (i, _) in applications.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }

    query.push_str(" ON CONFLICT (user_id) DO NOTHING");

    let mut q = sqlx::query(&query);
    for app in applications {
        q = q
            .bind(app.user_id)
            .bind(app.vehicle_type)
            .bind(&app.vehicle_plate_number)
            .bind(app.vehicle_year)
            .bind(&app.vehicle_model)
            .bind(&app.driver_license);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passes_review(seed: &ApplicationSeed) -> bool {
        seed.vehicle_plate_number.len() == 8
            && seed.driver_license.len() == 12
            && seed.vehicle_year >= 2008
    }

    #[test]
    fn test_plate_and_license_shapes() {
        for _ in 0..50 {
            assert_eq!(random_plate().len(), 8);
            let license = random_license();
            assert_eq!(license.len(), 12);
            assert!(license.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_every_fourth_application_fails_review() {
        let ids: Vec<UserId> = (0..40).map(|_| UserId::new()).collect();
        let applications = generate_applications(&ids);

        for (idx, app) in applications.iter().enumerate() {
            assert_eq!(app.user_id, ids[idx]);
            assert_eq!(passes_review(app), idx % 4 != 3, "application {idx}");
        }
    }
}
