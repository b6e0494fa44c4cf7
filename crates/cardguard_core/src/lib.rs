//! Core domain logic for CardGuard card registration.
//! This crate is the single source of truth for validation and storage rules.

pub mod api;
pub mod config;
pub mod db;
pub mod hashing;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{ensure_schema, submit_card, submit_card_with_init, SubmissionResponse};
pub use config::{AppConfig, ConfigError};
pub use hashing::hash_text;
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LoggingError,
};
pub use model::card::{CardId, CardRecord, CardRecordError, NewCardRecord};
pub use model::submission::{
    extract_card_digits, validate_submission, NormalizedSubmission, SubmissionForm,
    SubmissionValidationError,
};
pub use repo::card_repo::{CardRepository, RepoError, RepoResult, SqliteCardRepository};
pub use service::registration_service::{RegistrationError, RegistrationService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
