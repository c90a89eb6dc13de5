//! Project discovery.
//!
//! A directory is a project when it, or one of its ancestors, holds a
//! [`PROJECT_FILE`]. The file marks the project root and may carry CLI
//! settings under its `settings` key.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::{TnError, TnResult};

/// Name of the file marking a project root.
pub const PROJECT_FILE: &str = ".tn.yaml";

/// Canonicalise `path` using platform-specific rules.
///
/// On Windows `dunce` is used so diagnostics do not show UNC prefixes.
///
/// # Errors
///
/// Returns [`TnError::File`] if canonicalisation fails.
pub fn canonicalise(path: &Path) -> TnResult<PathBuf> {
    #[cfg(windows)]
    {
        dunce::canonicalize(path).map_err(|e| TnError::file(path, e))
    }
    #[cfg(not(windows))]
    {
        std::fs::canonicalize(path).map_err(|e| TnError::file(path, e))
    }
}

/// Returns the first project file found in `start` or any of its ancestors.
///
/// # Errors
///
/// Returns [`TnError::File`] when `start` cannot be canonicalised.
pub fn find_project_file(start: &Path) -> TnResult<Option<PathBuf>> {
    let root = canonicalise(start)?;
    let found = root
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE))
        .find(|candidate| candidate.is_file());
    debug!(start = %root.display(), found = ?found, "project discovery");
    Ok(found)
}

/// Like [`find_project_file`], but a missing project is an error.
///
/// # Errors
///
/// Returns [`TnError::NotAProject`] when no project file exists, or
/// [`TnError::File`] when `start` cannot be canonicalised.
pub fn require_project_file(start: &Path) -> TnResult<PathBuf> {
    find_project_file(start)?.ok_or_else(|| {
        Arc::new(TnError::NotAProject {
            start: start.to_path_buf(),
        })
    })
}

/// Create an empty project file in `dir`.
///
/// Returns the path of the new file.
///
/// # Errors
///
/// Returns [`TnError::AlreadyInitialised`] when `dir` already belongs to a
/// project, or [`TnError::File`] when the file cannot be created.
pub fn init_project(dir: &Path) -> TnResult<PathBuf> {
    if let Some(existing) = find_project_file(dir)? {
        return Err(Arc::new(TnError::AlreadyInitialised { path: existing }));
    }
    let path = canonicalise(dir)?.join(PROJECT_FILE);
    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(_) => {
            info!(path = %path.display(), "initialised project");
            Ok(path)
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            Err(Arc::new(TnError::AlreadyInitialised { path }))
        }
        Err(err) => Err(TnError::file(&path, err)),
    }
}

#[cfg(test)]
mod tests;
