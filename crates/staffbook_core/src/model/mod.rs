//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the record shape shared by validation, storage and services.
//!
//! # Invariants
//! - Every record is identified by a stable `person_id`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod person;
