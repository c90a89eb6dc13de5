//! Layered run settings.
//!
//! Values are merged from lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. the `settings` mapping in the project's `.tn.yaml`
//! 3. `TN_*` environment variables (`TN_SWEEP_ONLY`, `TN_VERBOSE`,
//!    `TN_EXPORT_ENV`)
//! 4. command-line flags that were actually given

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use tn_config::SaphyrYaml;

use crate::cli::Cli;
use crate::error::Result;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TN_";

/// Project file key holding settings.
pub const SETTINGS_SECTION: &str = "settings";

/// Settings controlling a `tn` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Print the sweep variants instead of executing them.
    pub sweep_only: bool,
    /// Log verbosity; each step raises the default level.
    pub verbose: u8,
    /// Mirror each executed variant into `CONFIG` before it runs.
    ///
    /// This writes the process environment, so it is only honoured by the
    /// sequential task loop in [`crate::run_document`].
    pub export_env: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sweep_only: false,
            verbose: 0,
            export_env: true,
        }
    }
}

/// Flags given on the command line.
///
/// Absent flags serialise to nothing, so they never mask lower layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    sweep_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbose: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_env: Option<bool>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            sweep_only: cli.sweep_only.then_some(true),
            verbose: (cli.verbose > 0).then_some(cli.verbose),
            export_env: cli.should_skip_export.then_some(false),
        }
    }
}

impl Settings {
    /// Merge every settings layer.
    ///
    /// `project` is the project file, if any. A project file without a
    /// `settings` mapping contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TnCliError::Settings`] when a layer cannot be read
    /// or a value has the wrong type.
    pub fn load(project: Option<&Path>, overrides: CliOverrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = project {
            figment = figment.merge(SaphyrYaml::file(path).section(SETTINGS_SECTION));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|err| Box::new(err).into())
    }
}
