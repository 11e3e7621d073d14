pub mod controller;
pub mod review;
pub mod router;
pub mod service;
