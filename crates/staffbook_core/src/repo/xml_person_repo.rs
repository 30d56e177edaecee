//! XML file-per-record person repository.
//!
//! # Responsibility
//! - Map each record to `<root>/<TypeDir>/<id>.xml`.
//! - Keep every write atomic at the file level.
//!
//! # Invariants
//! - At most one file per id; a type change moves the file.
//! - The record type is derived from the directory, never read from the file.
//! - A single undecodable file fails the whole scan, as does a file whose
//!   `personId` differs from its file name.

use crate::model::person::{Person, PersonType};
use crate::repo::person_repo::{PersonRepository, RepoError, RepoResult};
use crate::store::atomic::write_atomically;
use crate::store::codec::{decode_person, encode_person, CodecError};
use crate::store::RECORD_EXTENSION;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Person repository storing one XML document per record.
#[derive(Debug, Clone)]
pub struct XmlPersonRepository {
    root: PathBuf,
}

impl XmlPersonRepository {
    /// Creates a repository over `root` and makes sure both type
    /// directories exist.
    pub fn try_new(root: impl Into<PathBuf>) -> RepoResult<Self> {
        let repo = Self { root: root.into() };
        for kind in PersonType::ALL {
            let dir = repo.type_dir(kind);
            fs::create_dir_all(&dir).map_err(|err| RepoError::io(&dir, err))?;
        }
        Ok(repo)
    }

    /// Data root holding the type directories.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding records of `kind`.
    pub fn type_dir(&self, kind: PersonType) -> PathBuf {
        self.root.join(kind.directory_name())
    }

    /// File path a record with this type and id is stored at.
    pub fn path_of(&self, kind: PersonType, person_id: &str) -> PathBuf {
        self.type_dir(kind)
            .join(format!("{person_id}.{RECORD_EXTENSION}"))
    }

    fn locate(&self, person_id: &str) -> Option<(PersonType, PathBuf)> {
        if !is_safe_file_stem(person_id) {
            return None;
        }
        PersonType::ALL
            .into_iter()
            .map(|kind| (kind, self.path_of(kind, person_id)))
            .find(|(_, path)| path.is_file())
    }

    fn target_of(&self, person: &Person) -> RepoResult<PathBuf> {
        if !is_safe_file_stem(person.person_id()) {
            return Err(RepoError::InvalidId(person.person_id().to_string()));
        }
        Ok(self.path_of(person.kind(), person.person_id()))
    }

    fn write_person(&self, person: &Person, target: &Path) -> RepoResult<()> {
        let bytes = encode_person(person).map_err(|source| RepoError::InvalidData {
            path: target.to_path_buf(),
            source,
        })?;
        write_atomically(target, &bytes).map_err(|err| RepoError::io(target, err))
    }

    fn scan_dir(&self, kind: PersonType, out: &mut Vec<Person>) -> RepoResult<()> {
        let dir = self.type_dir(kind);
        let entries = fs::read_dir(&dir).map_err(|err| RepoError::io(&dir, err))?;
        for entry in entries {
            let entry = entry.map_err(|err| RepoError::io(&dir, err))?;
            let path = entry.path();
            if !is_record_file(&path) {
                continue;
            }
            out.push(read_person(&path, kind)?);
        }
        Ok(())
    }
}

impl PersonRepository for XmlPersonRepository {
    fn find_by_id(&self, person_id: &str) -> RepoResult<Option<Person>> {
        match self.locate(person_id) {
            Some((kind, path)) => read_person(&path, kind).map(Some),
            None => Ok(None),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Person>> {
        let mut people = Vec::new();
        for kind in PersonType::ALL {
            self.scan_dir(kind, &mut people)?;
        }
        debug!(
            "event=repo_scan module=repo status=ok count={}",
            people.len()
        );
        Ok(people)
    }

    fn create(&self, person: &Person) -> RepoResult<()> {
        let target = self.target_of(person)?;
        if target.exists() {
            return Err(RepoError::AlreadyExists(target));
        }
        self.write_person(person, &target)?;
        info!(
            "event=repo_create module=repo status=ok person_id={} path={}",
            person.person_id(),
            target.display()
        );
        Ok(())
    }

    fn remove(&self, person_id: &str) -> RepoResult<bool> {
        let Some((_, path)) = self.locate(person_id) else {
            return Ok(false);
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(
                    "event=repo_remove module=repo status=ok person_id={person_id} path={}",
                    path.display()
                );
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(RepoError::io(&path, err)),
        }
    }

    fn update(&self, person: &Person) -> RepoResult<()> {
        let target = self.target_of(person)?;
        let previous = self.locate(person.person_id()).map(|(_, path)| path);

        self.write_person(person, &target)?;

        if let Some(previous) = previous.filter(|path| *path != target) {
            match fs::remove_file(&previous) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(
                        "event=repo_update module=repo status=error person_id={} stale_path={} error={}",
                        person.person_id(),
                        previous.display(),
                        err
                    );
                    return Err(RepoError::io(&previous, err));
                }
            }
            info!(
                "event=repo_relocate module=repo status=ok person_id={} from={} to={}",
                person.person_id(),
                previous.display(),
                target.display()
            );
        }

        info!(
            "event=repo_update module=repo status=ok person_id={} path={}",
            person.person_id(),
            target.display()
        );
        Ok(())
    }
}

fn read_person(path: &Path, kind: PersonType) -> RepoResult<Person> {
    let xml = fs::read_to_string(path).map_err(|err| RepoError::io(path, err))?;
    let person = decode_person(&xml, kind).map_err(|source| invalid_data(path, source))?;

    let stem = path.file_stem().and_then(|stem| stem.to_str());
    if stem != Some(person.person_id()) {
        return Err(invalid_data(
            path,
            CodecError::InvalidShape(format!(
                "personId `{}` does not match the file name",
                person.person_id()
            )),
        ));
    }
    Ok(person)
}

fn invalid_data(path: &Path, source: CodecError) -> RepoError {
    warn!(
        "event=repo_decode module=repo status=error path={} error={}",
        path.display(),
        source
    );
    RepoError::InvalidData {
        path: path.to_path_buf(),
        source,
    }
}

fn is_record_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXTENSION) && path.is_file()
}

fn is_safe_file_stem(person_id: &str) -> bool {
    !person_id.trim().is_empty()
        && person_id != "."
        && person_id != ".."
        && !person_id.contains(['/', '\\', '\0'])
}
