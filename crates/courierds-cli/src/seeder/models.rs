//! Seed records and configuration.

use courierds_models::{UserId, UserRole, VehicleType};

/// Domain every seeded email ends with. `clear-seed` deletes by it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.courierds.dev";

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "Password@123";

pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

pub struct ApplicationSeed {
    pub user_id: UserId,
    pub vehicle_type: VehicleType,
    pub vehicle_plate_number: String,
    pub vehicle_year: i32,
    pub vehicle_model: String,
    pub driver_license: String,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub num_users: usize,
    /// Pending applications, filed by the first seeded users.
    pub num_applications: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_users: 50,
            num_applications: 10,
        }
    }
}

impl SeedConfig {
    pub fn new(num_users: usize) -> Self {
        Self {
            num_users,
            ..Default::default()
        }
    }

    /// Capped at the number of users since each user files at most one.
    pub fn with_applications(mut self, num_applications: usize) -> Self {
        self.num_applications = num_applications;
        self
    }

    pub fn effective_applications(&self) -> usize {
        self.num_applications.min(self.num_users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applications_capped_by_users() {
        let config = SeedConfig::new(5).with_applications(20);
        assert_eq!(config.effective_applications(), 5);

        let config = SeedConfig::new(100).with_applications(20);
        assert_eq!(config.effective_applications(), 20);
    }
}
