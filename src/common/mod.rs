// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod query_builder;
pub mod repository;
pub mod response;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod test_db;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::ApiError;
pub use helpers::{safe_email_log, safe_token_log};
pub use id_generator::*;
pub use response::{DataResponse, MessageResponse};
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
