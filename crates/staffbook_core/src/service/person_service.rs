//! Person use-case service.
//!
//! # Responsibility
//! - Gate every mutation behind validation.
//! - Enforce id uniqueness and existence across type partitions.
//!
//! # Invariants
//! - Nothing reaches the repository before validation passes.
//! - Failed checks leave the store untouched.
//! - The check-then-write sequence is not locked; one caller at a time is assumed.

use crate::model::person::Person;
use crate::repo::person_repo::{PersonRepository, RepoError};
use crate::search::filter::PersonFilter;
use crate::validation::{validate_new, validate_update, PersonValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for person use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A field violates a format rule.
    Validation(PersonValidationError),
    /// A record with this id already exists in some partition.
    AlreadyExists(String),
    /// No record with this id exists.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AlreadyExists(id) => write!(f, "Person with id {id} already exists"),
            Self::NotFound(id) => write!(f, "Person with id {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::AlreadyExists(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<PersonValidationError> for ServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Person service facade over repository implementations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Mints an id for a record that is about to be created.
    pub fn new_id() -> String {
        Person::generate_id()
    }

    /// Validates and stores a new record.
    ///
    /// # Errors
    /// - `Validation` when a field is malformed.
    /// - `AlreadyExists` when the id is taken in either partition.
    pub fn create(&self, person: &Person) -> ServiceResult<()> {
        if let Err(err) = validate_new(person) {
            warn!(
                "event=person_create module=service status=rejected person_id={} reason={}",
                person.person_id(),
                err
            );
            return Err(err.into());
        }
        if self.repo.find_by_id(person.person_id())?.is_some() {
            warn!(
                "event=person_create module=service status=duplicate person_id={}",
                person.person_id()
            );
            return Err(ServiceError::AlreadyExists(person.person_id().to_string()));
        }
        self.repo.create(person)?;
        info!(
            "event=person_create module=service status=ok person_id={} type={}",
            person.person_id(),
            person.kind()
        );
        Ok(())
    }

    /// Validates a reconstructed record and replaces the stored one.
    ///
    /// # Errors
    /// - `Validation` when a field is malformed.
    /// - `NotFound` when no record has this id.
    pub fn modify(&self, person: &Person) -> ServiceResult<()> {
        if let Err(err) = validate_update(person) {
            warn!(
                "event=person_modify module=service status=rejected person_id={} reason={}",
                person.person_id(),
                err
            );
            return Err(err.into());
        }
        if self.repo.find_by_id(person.person_id())?.is_none() {
            warn!(
                "event=person_modify module=service status=not_found person_id={}",
                person.person_id()
            );
            return Err(ServiceError::NotFound(person.person_id().to_string()));
        }
        self.repo.update(person)?;
        info!(
            "event=person_modify module=service status=ok person_id={} type={}",
            person.person_id(),
            person.kind()
        );
        Ok(())
    }

    /// Deletes a record; returns whether one existed.
    pub fn remove(&self, person_id: &str) -> ServiceResult<bool> {
        let removed = self.repo.remove(person_id)?;
        info!(
            "event=person_remove module=service status={} person_id={person_id}",
            if removed { "ok" } else { "absent" }
        );
        Ok(removed)
    }

    /// Returns the first record matching `filter`, in listing order.
    pub fn find(&self, filter: &PersonFilter) -> ServiceResult<Option<Person>> {
        Ok(self.repo.find_by(filter)?.into_iter().next())
    }

    /// Returns every record matching `filter`.
    pub fn find_all_by(&self, filter: &PersonFilter) -> ServiceResult<Vec<Person>> {
        Ok(self.repo.find_by(filter)?)
    }

    /// Looks a record up by id.
    pub fn get(&self, person_id: &str) -> ServiceResult<Option<Person>> {
        Ok(self.repo.find_by_id(person_id)?)
    }
}
