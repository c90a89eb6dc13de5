//! Project file discovery and initialisation.

use anyhow::{Context, Result, anyhow, ensure};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{PROJECT_FILE, canonicalise, find_project_file, init_project, require_project_file};
use crate::TnError;

#[fixture]
fn scratch() -> TempDir {
    TempDir::new().unwrap_or_else(|err| panic!("create temp dir: {err}"))
}

#[rstest]
fn finds_the_project_file_from_nested_directories(scratch: TempDir) -> Result<()> {
    let nested = scratch.path().join("experiments/vision");
    std::fs::create_dir_all(&nested)?;
    std::fs::write(scratch.path().join(PROJECT_FILE), "")?;

    let found = find_project_file(&nested)
        .map_err(|err| anyhow!(err.to_string()))?
        .context("project file should be found")?;
    let expected = canonicalise(scratch.path())
        .map_err(|err| anyhow!(err.to_string()))?
        .join(PROJECT_FILE);
    ensure!(found == expected, "found {} instead of {}", found.display(), expected.display());
    Ok(())
}

#[rstest]
fn the_nearest_project_file_wins(scratch: TempDir) -> Result<()> {
    let inner = scratch.path().join("inner");
    std::fs::create_dir_all(&inner)?;
    std::fs::write(scratch.path().join(PROJECT_FILE), "")?;
    std::fs::write(inner.join(PROJECT_FILE), "")?;

    let found = find_project_file(&inner)
        .map_err(|err| anyhow!(err.to_string()))?
        .context("project file should be found")?;
    ensure!(found.parent().is_some_and(|dir| dir.ends_with("inner")), "found {}", found.display());
    Ok(())
}

#[rstest]
fn missing_projects_are_reported(scratch: TempDir) -> Result<()> {
    // A stray project file above the temp dir would make this test meaningless.
    if find_project_file(scratch.path())
        .map_err(|err| anyhow!(err.to_string()))?
        .is_some()
    {
        return Ok(());
    }
    let err = require_project_file(scratch.path())
        .err()
        .context("discovery must fail")?;
    ensure!(
        matches!(err.as_ref(), TnError::NotAProject { .. }),
        "unexpected error: {err:?}"
    );
    ensure!(
        err.to_string()
            .starts_with("not a tn repository (or any of the parent directories): .tn.yaml"),
        "unexpected message: {err}"
    );
    Ok(())
}

#[rstest]
fn init_creates_an_empty_project_file(scratch: TempDir) -> Result<()> {
    if find_project_file(scratch.path())
        .map_err(|err| anyhow!(err.to_string()))?
        .is_some()
    {
        return Ok(());
    }
    let created = init_project(scratch.path()).map_err(|err| anyhow!(err.to_string()))?;
    ensure!(created.ends_with(PROJECT_FILE), "unexpected path {}", created.display());
    ensure!(std::fs::read_to_string(&created)?.is_empty(), "project file should be empty");

    let err = init_project(scratch.path())
        .err()
        .context("second init must fail")?;
    ensure!(
        matches!(err.as_ref(), TnError::AlreadyInitialised { path } if *path == created),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[rstest]
fn init_refuses_nested_projects(scratch: TempDir) -> Result<()> {
    let nested = scratch.path().join("sub");
    std::fs::create_dir_all(&nested)?;
    std::fs::write(scratch.path().join(PROJECT_FILE), "")?;
    let err = init_project(&nested).err().context("nested init must fail")?;
    ensure!(
        matches!(err.as_ref(), TnError::AlreadyInitialised { .. }),
        "unexpected error: {err:?}"
    );
    ensure!(!nested.join(PROJECT_FILE).exists(), "no file may be created");
    Ok(())
}

#[rstest]
fn canonicalise_reports_missing_paths(scratch: TempDir) {
    let missing = scratch.path().join("missing");
    let err = canonicalise(&missing).err();
    assert!(err.is_some_and(|e| matches!(e.as_ref(), TnError::File { .. })));
}
