//! Person repository contract and storage errors.
//!
//! # Responsibility
//! - Define the persistence API used by the service layer.
//! - Report storage failures with the offending path attached.
//!
//! # Invariants
//! - Repositories never validate field formats; callers do that first.
//! - Read paths surface corrupt data as errors instead of skipping it.

use crate::model::person::Person;
use crate::search::filter::PersonFilter;
use crate::store::codec::CodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-layer error for person persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Filesystem operation failed.
    Io { path: PathBuf, source: io::Error },
    /// A record file exists but could not be decoded, or names another id.
    InvalidData { path: PathBuf, source: CodecError },
    /// A record file already sits at the target path.
    AlreadyExists(PathBuf),
    /// The id cannot be used as a file name.
    InvalidId(String),
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error at `{}`: {source}", path.display()),
            Self::InvalidData { path, source } => {
                write!(f, "failed to parse `{}`: {source}", path.display())
            }
            Self::AlreadyExists(path) => write!(f, "file already exists: {}", path.display()),
            Self::InvalidId(id) => write!(f, "person id `{id}` cannot be used as a file name"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidData { source, .. } => Some(source),
            Self::AlreadyExists(_) => None,
            Self::InvalidId(_) => None,
        }
    }
}

/// Repository interface for person records.
pub trait PersonRepository {
    /// Looks a record up by id across every type partition.
    fn find_by_id(&self, person_id: &str) -> RepoResult<Option<Person>>;

    /// Loads every stored record, in filesystem listing order.
    fn find_all(&self) -> RepoResult<Vec<Person>>;

    /// Loads every record selected by `filter`.
    fn find_by(&self, filter: &PersonFilter) -> RepoResult<Vec<Person>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|person| filter.matches(person))
            .collect())
    }

    /// Stores a new record; fails if its target file already exists.
    fn create(&self, person: &Person) -> RepoResult<()>;

    /// Deletes the record with `person_id`; returns whether one was deleted.
    fn remove(&self, person_id: &str) -> RepoResult<bool>;

    /// Replaces the stored record with the same id, relocating it when the
    /// type changed.
    fn update(&self, person: &Person) -> RepoResult<()>;
}

impl<R: PersonRepository + ?Sized> PersonRepository for &R {
    fn find_by_id(&self, person_id: &str) -> RepoResult<Option<Person>> {
        (**self).find_by_id(person_id)
    }

    fn find_all(&self) -> RepoResult<Vec<Person>> {
        (**self).find_all()
    }

    fn find_by(&self, filter: &PersonFilter) -> RepoResult<Vec<Person>> {
        (**self).find_by(filter)
    }

    fn create(&self, person: &Person) -> RepoResult<()> {
        (**self).create(person)
    }

    fn remove(&self, person_id: &str) -> RepoResult<bool> {
        (**self).remove(person_id)
    }

    fn update(&self, person: &Person) -> RepoResult<()> {
        (**self).update(person)
    }
}
