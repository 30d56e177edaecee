//! Core domain logic for staffbook.
//! This crate is the single source of truth for record validation and storage.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::person::{Person, PersonType, UnknownPersonType};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult};
pub use repo::xml_person_repo::XmlPersonRepository;
pub use search::filter::PersonFilter;
pub use service::person_service::{PersonService, ServiceError, ServiceResult};
pub use store::open_store;
pub use validation::{validate_new, validate_update, PersonValidationError};

/// Minimal health-check API for smoke checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
