//! Data-root bootstrap.
//!
//! # Invariants
//! - Returned repositories have both type directories created.

use crate::repo::person_repo::RepoResult;
use crate::repo::xml_person_repo::XmlPersonRepository;
use log::{error, info};
use std::path::Path;
use std::time::Instant;

/// Opens (creating when needed) the data root at `root`.
///
/// # Side effects
/// - Creates `root` and its type directories.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(root: impl AsRef<Path>) -> RepoResult<XmlPersonRepository> {
    let root = root.as_ref();
    let started_at = Instant::now();
    info!(
        "event=store_open module=store status=start root={}",
        root.display()
    );

    match XmlPersonRepository::try_new(root) {
        Ok(repo) => {
            info!(
                "event=store_open module=store status=ok root={} duration_ms={}",
                root.display(),
                started_at.elapsed().as_millis()
            );
            Ok(repo)
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error root={} duration_ms={} error_code=store_init_failed error={}",
                root.display(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}
