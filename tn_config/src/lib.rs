//! Declarative component wiring and parameter sweeps driven by YAML documents.
//!
//! A document describes what to build. Any mapping carrying a
//! `_component_` (or `_target_`) key is a *marker*: it names a component
//! registered in a [`Registry`] and supplies its arguments. The [`Engine`]
//! walks the document depth first, constructs every marker's component from
//! its resolved arguments, calls it, and puts the result in the marker's
//! place. Markers with an `_id_` are built once and shared.
//!
//! A document may also name a sweep generator under `_sweep_`; [`sweep`]
//! turns it into one document variant per override set, each override set
//! being a list of [dot paths](merge_dot_path) and values.
//!
//! ```
//! use serde_json::json;
//! use tn_config::{Engine, Registry, Resolved};
//!
//! #[derive(serde::Deserialize)]
//! struct Optimiser {
//!     lr: f64,
//! }
//!
//! let mut registry = Registry::with_builtins();
//! registry.register_object::<Optimiser>("demo.optim.Sgd")?;
//!
//! let engine = Engine::new(&registry);
//! let resolved = engine.visit(&json!({
//!     "optimiser": {"_component_": "demo.optim.Sgd", "lr": 0.01},
//! }))?;
//! let sgd = resolved
//!     .get("optimiser")
//!     .and_then(Resolved::downcast::<Optimiser>)
//!     .expect("optimiser instance");
//! assert!((sgd.lr - 0.01).abs() < f64::EPSILON);
//! # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
//! ```

use std::sync::Arc;

pub mod builtins;
pub mod discovery;
mod document;
mod dot_path;
mod engine;
mod error;
mod execute;
mod registry;
mod resolved;
mod result_ext;
mod sweep;

pub use discovery::{PROJECT_FILE, find_project_file, init_project, require_project_file};
pub use document::{
    SaphyrYaml, load_document, parse_document, read_document, to_pretty_json, to_yaml,
};
pub use dot_path::merge_dot_path;
pub use engine::{ARGS_KEY, COMPONENT_KEY, Engine, ID_KEY, IdentityRegistry, TARGET_KEY};
pub use error::{ComponentError, TnError};
pub use execute::{CONFIG_ENV_VAR, ExecuteOptions, execute};
pub use registry::{Arguments, Component, Factory, Registry};
pub use resolved::{Instance, Resolved};
pub use result_ext::TnResultExt;
pub use sweep::{OverrideSet, SWEEP_KEY, apply_overrides, expand, override_sets, sweep, sweep_file};

/// Result type used throughout the crate.
pub type TnResult<T> = Result<T, Arc<TnError>>;
