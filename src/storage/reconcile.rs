//! Reconciling the on-disk tree with the in-memory model.
//!
//! After a save, folders belonging to entities that are no longer present
//! in memory are deleted. Deletion is depth-first with children removed
//! before parents, and idempotent: entries that are already gone are
//! ignored. It is not transactional; a crash mid-delete leaves a partially
//! removed tree.

use std::{fs, io, path::Path};

use walkdir::WalkDir;

/// Recursively deletes a directory subtree, including the root folder
/// itself.
///
/// Files are removed before the directories containing them. A path that
/// does not exist (or vanishes mid-walk) is not an error.
///
/// # Errors
///
/// Returns an error if an entry cannot be removed for any reason other
/// than it already being gone.
pub fn delete_folder(path: &Path) -> io::Result<()> {
    for entry in WalkDir::new(path).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_not_found(&e) => continue,
            Err(e) => return Err(e.into()),
        };
        let result = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        match result {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            other => other?,
        }
    }
    Ok(())
}

/// Deletes every direct subdirectory of `dir` whose name is not in `keep`.
///
/// Plain files in `dir` are left alone. Subdirectory names that are not
/// valid UTF-8 cannot match any alias and are removed.
pub(crate) fn prune_unknown_dirs(dir: &Path, keep: &[&str]) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if keep.contains(&name.as_ref()) {
            continue;
        }
        tracing::info!("pruning orphaned folder {}", entry.path().display());
        delete_folder(&entry.path())?;
    }
    Ok(())
}

fn is_not_found(error: &walkdir::Error) -> bool {
    error
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}
