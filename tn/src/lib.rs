//! Command-line front end for `tn` documents.
//!
//! `tn <FILE>` finds the enclosing project, expands the document's sweep
//! into variants and executes each one in order. `tn init` marks the
//! working directory as a project.
//!
//! Binaries that register their own components embed the front end with
//! [`run_with`]:
//!
//! ```no_run
//! use tn_config::{Registry, Resolved};
//!
//! fn main() -> Result<(), tn_cli::TnCliError> {
//!     let mut registry = Registry::with_builtins();
//!     registry.register_fn("app.hello", |_| Ok(Resolved::from("hello")))?;
//!     tn_cli::run_with(&registry)
//! }
//! ```

use std::io::{self, Write};
use std::path::Path;

use clap::{CommandFactory, Parser};
use std::sync::Arc;

use tn_config::{
    CONFIG_ENV_VAR, Engine, ExecuteOptions, Registry, TnError, execute, find_project_file,
    init_project, sweep_file,
};
use tracing::{error, info};

pub mod cli;
pub mod error;
pub mod logging;
pub mod settings;

pub use cli::{Cli, Command};
pub use error::{Result, TnCliError};
pub use settings::{CliOverrides, Settings};

/// Run `tn` with the builtin components.
///
/// # Errors
///
/// Returns any failure from [`run_with`].
pub fn run() -> Result<()> {
    run_with(&Registry::with_builtins())
}

/// Run `tn` with the components registered in `registry`.
///
/// # Errors
///
/// Returns a [`TnCliError`] when settings cannot be loaded, the document is
/// outside a project, or sweeping or executing a variant fails.
pub fn run_with(registry: &Registry) -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().map_err(TnCliError::CurrentDir)?;
    let project = find_project_file(&cwd)?;
    let settings = Settings::load(project.as_deref(), CliOverrides::from(&cli))?;
    logging::init(settings.verbose)?;
    let mut stdout = io::stdout().lock();
    dispatch(&cli, &settings, &cwd, project.as_deref(), registry, &mut stdout)
}

/// Carry out the parsed command, writing user-facing output to `out`.
///
/// `project` is the project file discovered from `cwd`, if any.
///
/// # Errors
///
/// See [`run_with`].
pub fn dispatch<W: Write>(
    cli: &Cli,
    settings: &Settings,
    cwd: &Path,
    project: Option<&Path>,
    registry: &Registry,
    out: &mut W,
) -> Result<()> {
    if cli.command == Some(Command::Init) {
        let path = init_project(cwd)?;
        writeln!(out, "created tn file: {}", path.display())?;
        return Ok(());
    }
    let Some(file) = cli.file.as_deref() else {
        writeln!(out, "{}", Cli::command().render_long_help())?;
        return Ok(());
    };
    let project = project.ok_or_else(|| {
        Arc::new(TnError::NotAProject {
            start: cwd.to_path_buf(),
        })
    })?;
    info!(project = %project.display(), document = %file.display(), "running document");
    run_document(file, settings, registry, out).map(|_| ())
}

/// Sweep the document at `path` and execute or print every variant.
///
/// Each variant runs with a fresh [`Engine`], so identities are shared
/// within a variant but never across variants. A failing variant is logged
/// and the remaining variants still run. With [`Settings::export_env`] the
/// variant text is written to [`CONFIG_ENV_VAR`] before it executes. Returns
/// the number of variants.
///
/// # Errors
///
/// Returns a sweep failure or an output error, or
/// [`TnCliError::TasksFailed`] once every variant has been attempted.
pub fn run_document<W: Write>(
    path: &Path,
    settings: &Settings,
    registry: &Registry,
    out: &mut W,
) -> Result<usize> {
    let variants = sweep_file(path, &Engine::new(registry))?;
    if settings.sweep_only {
        for (index, variant) in variants.iter().enumerate() {
            if index > 0 {
                writeln!(out, "---")?;
            }
            writeln!(out, "{}", variant.trim_end())?;
        }
        return Ok(variants.len());
    }

    writeln!(out, "number of tasks: {}", variants.len())?;
    let total = variants.len();
    let mut failed = 0_usize;
    for (index, variant) in variants.iter().enumerate() {
        info!(task = index + 1, total, "executing task");
        if settings.export_env {
            export_config(variant);
        }
        if let Err(err) = execute(variant, &Engine::new(registry), ExecuteOptions::default()) {
            error!(task = index + 1, total, error = %err, "task failed");
            failed += 1;
        }
    }
    if failed > 0 {
        writeln!(out, "{failed} of {total} tasks failed")?;
        return Err(TnCliError::TasksFailed { failed, total });
    }
    writeln!(out, "all tasks completed")?;
    Ok(total)
}

fn export_config(variant: &str) {
    // SAFETY: tasks run one after another on the calling thread and `tn`
    // starts no other threads that read the environment.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, variant) };
}

#[cfg(test)]
mod tests;
