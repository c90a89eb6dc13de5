//! Running a single document.

use serde_json::Value;
use tracing::{debug, info};

use crate::document::{parse_document, to_pretty_json};
use crate::engine::is_marker;
use crate::{Engine, Resolved, TnResult};

/// Environment variable the `tn` command fills with the raw text of the
/// document being run, for components that want to inspect it.
///
/// This crate only names the variable; it never writes the environment.
pub const CONFIG_ENV_VAR: &str = "CONFIG";

/// Options controlling [`execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Decode and log the document without resolving it.
    pub sweep_only: bool,
}

/// Decode `text`, log it, and resolve it when its root is a marker mapping.
///
/// Returns `None` when the root names no component or when
/// [`ExecuteOptions::sweep_only`] is set.
///
/// # Errors
///
/// Returns [`crate::TnError::Parse`] when `text` is not valid YAML, or any
/// error raised while resolving the document.
///
/// # Examples
///
/// ```
/// use tn_config::{Engine, ExecuteOptions, Registry, execute};
///
/// let registry = Registry::with_builtins();
/// let engine = Engine::new(&registry);
/// let options = ExecuteOptions::default();
///
/// let resolved = execute("_component_: tn.util.echo\nlr: 0.1\n", &engine, options)?;
/// let lr = resolved.as_ref().and_then(|r| r.get("lr")).and_then(|lr| lr.as_f64());
/// assert_eq!(lr, Some(0.1));
///
/// assert!(execute("lr: 0.1\n", &engine, options)?.is_none());
/// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
/// ```
pub fn execute(text: &str, engine: &Engine<'_>, options: ExecuteOptions) -> TnResult<Option<Resolved>> {
    let document = parse_document(text)?;
    info!("document:\n{}", to_pretty_json(&document)?);
    if options.sweep_only {
        debug!("sweep only; document not resolved");
        return Ok(None);
    }
    if !matches!(&document, Value::Object(map) if is_marker(map)) {
        debug!("document root names no component; nothing to run");
        return Ok(None);
    }
    engine.visit(&document).map(Some)
}
