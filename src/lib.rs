pub mod config;
pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod uploads;

/// Role required to create, change or delete products.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
