//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the person data access contract.
//! - Keep file layout and document format out of the service layer.
//!
//! # Invariants
//! - Repositories never validate; the service validates before calling them.
//! - Repository APIs return storage errors unchanged; absence is `None`/`false`.

pub mod person_repo;
pub mod xml_person_repo;
