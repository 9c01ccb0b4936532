pub mod endpoints;
pub mod middleware;
pub mod application;
pub mod migrations;
pub mod models;
pub mod schemas;
pub mod services;
pub mod state;

pub mod test_helpers;

// Re-export from application for convenience
pub use application::bootstrapper;
pub use application::config;
pub use application::database as db;
pub use application::error;
