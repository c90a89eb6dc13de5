//! In-process tests for command dispatch.

#![expect(clippy::expect_used, reason = "test setup failures should panic")]

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow, ensure};
use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use test_helpers::env as test_env;
use tn_config::{CONFIG_ENV_VAR, PROJECT_FILE, Registry, Resolved, TnError};

use super::{Cli, Settings, TnCliError, dispatch, run_document};

/// Values seen by `demo.record`, in call order.
#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<i64>>>);

impl Recorded {
    fn values(&self) -> Vec<i64> {
        self.0.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

fn registry(recorded: &Recorded) -> Registry {
    let mut registry = Registry::with_builtins();
    let sink = recorded.clone();
    registry
        .register_fn("demo.record", move |args| {
            let value = args.get("value").and_then(Resolved::as_i64).unwrap_or(-1);
            sink.0.lock().map_err(|_| "record poisoned")?.push(value);
            Ok(Resolved::from(value))
        })
        .expect("valid target");
    let flaky = recorded.clone();
    registry
        .register_fn("demo.flaky", move |args| {
            let value = args.get("value").and_then(Resolved::as_i64).unwrap_or(-1);
            if value == 2 {
                return Err("value 2 is rejected".into());
            }
            flaky.0.lock().map_err(|_| "record poisoned")?.push(value);
            Ok(Resolved::from(value))
        })
        .expect("valid target");
    registry
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write document");
        path
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }
}

#[fixture]
fn project() -> Project {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join(PROJECT_FILE), "").expect("project file");
    Project { dir }
}

const GRID_DOCUMENT: &str = "\
_sweep_:
  _component_: tn.sweep.grid
  value: [1, 2, 3]
_component_: demo.record
value: 0
";

fn quiet() -> Settings {
    Settings {
        export_env: false,
        ..Settings::default()
    }
}

fn text(out: Vec<u8>) -> Result<String> {
    String::from_utf8(out).map_err(|err| anyhow!(err))
}

#[rstest]
fn runs_every_variant_in_order(project: Project) -> Result<()> {
    let recorded = Recorded::default();
    let path = project.write("run.yaml", GRID_DOCUMENT);
    let mut out = Vec::new();
    let count = run_document(&path, &quiet(), &registry(&recorded), &mut out)?;
    ensure!(count == 3, "expected three variants, got {count}");
    ensure!(recorded.values() == [1, 2, 3], "recorded {:?}", recorded.values());
    let printed = text(out)?;
    ensure!(printed.contains("number of tasks: 3"), "output: {printed}");
    ensure!(printed.contains("all tasks completed"), "output: {printed}");
    Ok(())
}

#[rstest]
fn sweep_only_prints_variants_without_running(project: Project) -> Result<()> {
    let recorded = Recorded::default();
    let path = project.write("run.yaml", GRID_DOCUMENT);
    let settings = Settings {
        sweep_only: true,
        ..quiet()
    };
    let mut out = Vec::new();
    run_document(&path, &settings, &registry(&recorded), &mut out)?;
    ensure!(recorded.values().is_empty(), "nothing may run");
    let printed = text(out)?;
    let variants: Vec<&str> = printed.split("---\n").collect();
    ensure!(variants.len() == 3, "expected three variants in {printed}");
    for (variant, expected) in variants.iter().zip(["value: 1", "value: 2", "value: 3"]) {
        ensure!(variant.contains(expected), "{expected} missing from {variant}");
    }
    Ok(())
}

#[rstest]
fn identities_do_not_leak_between_variants(project: Project) -> Result<()> {
    let recorded = Recorded::default();
    let path = project.write(
        "shared.yaml",
        "\
_sweep_:
  _component_: tn.sweep.grid
  run: [a, b]
_component_: tn.util.echo
first: {_component_: demo.record, _id_: shared, value: 7}
second: {_component_: demo.record, _id_: shared, value: 7}
",
    );
    run_document(&path, &quiet(), &registry(&recorded), &mut Vec::new())?;
    ensure!(recorded.values() == [7, 7], "one build per variant: {:?}", recorded.values());
    Ok(())
}

#[rstest]
fn failing_variants_do_not_stop_later_ones(project: Project) -> Result<()> {
    let recorded = Recorded::default();
    let path = project.write("flaky.yaml", &GRID_DOCUMENT.replace("demo.record", "demo.flaky"));
    let mut out = Vec::new();
    let err = run_document(&path, &quiet(), &registry(&recorded), &mut out)
        .err()
        .ok_or_else(|| anyhow!("a failing variant must fail the run"))?;
    ensure!(recorded.values() == [1, 3], "recorded {:?}", recorded.values());
    ensure!(
        matches!(err, TnCliError::TasksFailed { failed: 1, total: 3 }),
        "unexpected error: {err}"
    );
    let printed = text(out)?;
    ensure!(!printed.contains("all tasks completed"), "output: {printed}");
    Ok(())
}

#[rstest]
fn every_failing_variant_is_counted(project: Project) -> Result<()> {
    let path = project.write("broken.yaml", "_component_: demo.missing\n");
    let err = run_document(&path, &quiet(), &registry(&Recorded::default()), &mut Vec::new())
        .err()
        .ok_or_else(|| anyhow!("missing component must fail"))?;
    ensure!(
        matches!(err, TnCliError::TasksFailed { failed: 1, total: 1 }),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
#[case::enabled(true)]
#[case::disabled(false)]
fn variant_text_is_exported_on_request(
    project: Project,
    #[case] export_env: bool,
) -> Result<()> {
    let lock = test_env::lock();
    let _restore = lock.remove_var(CONFIG_ENV_VAR);
    let path = project.write("run.yaml", "_component_: demo.record\nvalue: 5\n");
    let settings = Settings {
        export_env,
        ..Settings::default()
    };
    run_document(&path, &settings, &registry(&Recorded::default()), &mut Vec::new())?;
    let exported = std::env::var(CONFIG_ENV_VAR).ok();
    if export_env {
        let config = exported.ok_or_else(|| anyhow!("{CONFIG_ENV_VAR} not set"))?;
        ensure!(config.contains("value: 5"), "exported {config}");
    } else {
        ensure!(exported.is_none(), "{CONFIG_ENV_VAR} must stay unset");
    }
    Ok(())
}

#[rstest]
fn documents_outside_a_project_are_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("doc.yaml");
    std::fs::write(&path, "a: 1\n")?;
    let cli = Cli::parse_from([OsStr::new("tn"), path.as_os_str()]);
    let outcome = dispatch(&cli, &quiet(), dir.path(), None, &Registry::new(), &mut Vec::new());
    ensure!(
        matches!(&outcome, Err(TnCliError::Config(inner)) if matches!(**inner, TnError::NotAProject { .. })),
        "expected NotAProject, got {outcome:?}"
    );
    Ok(())
}

#[rstest]
fn documents_run_against_the_discovered_project(project: Project) -> Result<()> {
    let recorded = Recorded::default();
    let path = project.write("run.yaml", "_component_: demo.record\nvalue: 9\n");
    let file = project.root().join(PROJECT_FILE);
    let cli = Cli::parse_from([OsStr::new("tn"), path.as_os_str()]);
    let elsewhere = TempDir::new()?;
    dispatch(
        &cli,
        &quiet(),
        elsewhere.path(),
        Some(&file),
        &registry(&recorded),
        &mut Vec::new(),
    )?;
    ensure!(recorded.values() == [9], "recorded {:?}", recorded.values());
    Ok(())
}

#[rstest]
fn init_creates_the_project_file_once() -> Result<()> {
    let dir = TempDir::new()?;
    let cli = Cli::parse_from(["tn", "init"]);
    let mut out = Vec::new();
    dispatch(&cli, &quiet(), dir.path(), None, &Registry::new(), &mut out)?;
    ensure!(dir.path().join(PROJECT_FILE).is_file(), "project file missing");
    ensure!(text(out)?.starts_with("created tn file: "), "unexpected output");

    let project = dir.path().join(PROJECT_FILE);
    let again = dispatch(
        &cli,
        &quiet(),
        dir.path(),
        Some(&project),
        &Registry::new(),
        &mut Vec::new(),
    );
    ensure!(
        matches!(&again, Err(TnCliError::Config(inner)) if matches!(**inner, TnError::AlreadyInitialised { .. })),
        "expected AlreadyInitialised, got {again:?}"
    );
    Ok(())
}

#[rstest]
fn bare_invocation_prints_help(project: Project) -> Result<()> {
    let mut out = Vec::new();
    let file = project.root().join(PROJECT_FILE);
    dispatch(
        &Cli::parse_from(["tn"]),
        &quiet(),
        project.root(),
        Some(&file),
        &Registry::new(),
        &mut out,
    )?;
    let printed = text(out)?;
    ensure!(printed.contains("Usage"), "help expected, got {printed}");
    Ok(())
}
