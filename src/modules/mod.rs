pub mod auth;
pub mod dispatchers;
pub mod health;
pub mod users;
