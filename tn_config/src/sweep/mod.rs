//! Expansion of one document into many variants for parameter sweeps.
//!
//! A document opts in by naming a generator under the top-level
//! [`SWEEP_KEY`]. The generator is either a target path, constructed with no
//! arguments, or a marker mapping whose keyword arguments are resolved like
//! any other marker. Calling it yields a sequence of override sets; each set
//! maps dot paths to replacement values and produces one variant.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{load_document, to_yaml};
use crate::engine::{is_marker, unexpected};
use crate::{Arguments, Engine, Resolved, TnError, TnResult, merge_dot_path};

/// Top-level key naming the sweep generator.
pub const SWEEP_KEY: &str = "_sweep_";

/// Dot paths mapped to the values written at them, in generator order.
pub type OverrideSet = IndexMap<String, Value>;

/// Run the generator named by `document`, returning its override sets.
///
/// Returns `None` when the document does not request a sweep. A generator
/// whose result is not a sequence produces no override sets.
///
/// # Errors
///
/// - [`TnError::UnexpectedType`] when [`SWEEP_KEY`] holds neither a target
///   path nor a marker mapping.
/// - Any error raised while constructing or calling the generator.
/// - [`TnError::InvalidOverrideSet`] when an element of the result is not a
///   mapping.
/// - [`TnError::UnserializableObject`] when an override value is a live
///   object.
pub fn override_sets(document: &Value, engine: &Engine<'_>) -> TnResult<Option<Vec<OverrideSet>>> {
    let Some(generator) = document.get(SWEEP_KEY).filter(|value| !value.is_null()) else {
        return Ok(None);
    };
    let output = match generator {
        Value::String(target) => engine.instantiate(target, Arguments::default())?,
        Value::Object(map) if is_marker(map) => engine.visit(generator)?,
        other => {
            return Err(unexpected(
                SWEEP_KEY,
                "a target path or a marker mapping",
                other,
            ));
        }
    };
    let Resolved::Sequence(items) = output else {
        warn!(
            found = output.type_name(),
            "sweep generator did not return a sequence; no variants produced"
        );
        return Ok(Some(Vec::new()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| to_override_set(index, item))
        .collect::<TnResult<Vec<_>>>()
        .map(Some)
}

fn to_override_set(index: usize, item: Resolved) -> TnResult<OverrideSet> {
    let Resolved::Mapping(entries) = item else {
        return Err(Arc::new(TnError::InvalidOverrideSet {
            index,
            found: item.type_name(),
        }));
    };
    entries
        .into_iter()
        .map(|(path, value)| value.try_into_value().map(|plain| (path, plain)))
        .collect()
}

/// Deep copy `document` and write every override into the copy, in order.
///
/// # Errors
///
/// Fails like [`merge_dot_path`] when an override path is invalid.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tn_config::{OverrideSet, apply_overrides};
///
/// let base = json!({"model": {"lr": 0.1, "depth": 3}});
/// let overrides: OverrideSet = [("model.lr".to_owned(), json!(0.01))].into_iter().collect();
/// let variant = apply_overrides(&base, &overrides)?;
/// assert_eq!(variant, json!({"model": {"lr": 0.01, "depth": 3}}));
/// assert_eq!(base, json!({"model": {"lr": 0.1, "depth": 3}}));
/// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
/// ```
pub fn apply_overrides(document: &Value, overrides: &OverrideSet) -> TnResult<Value> {
    let mut variant = document.clone();
    for (path, value) in overrides {
        merge_dot_path(&mut variant, path, value.clone())?;
    }
    Ok(variant)
}

/// Expand `document` into its variant trees.
///
/// A document without a generator yields a single copy of itself.
///
/// # Errors
///
/// Fails like [`override_sets`] and [`apply_overrides`].
pub fn expand(document: &Value, engine: &Engine<'_>) -> TnResult<Vec<Value>> {
    let Some(sets) = override_sets(document, engine)? else {
        debug!("document requests no sweep");
        return Ok(vec![document.clone()]);
    };
    sets.iter()
        .map(|overrides| apply_overrides(document, overrides))
        .collect()
}

/// Expand `document` into variants rendered as YAML.
///
/// The generator key is kept in every variant; executing a variant only
/// looks at its root marker, so it is never swept again.
///
/// # Errors
///
/// Fails like [`expand`], or with [`TnError::Serialize`] when a variant
/// cannot be rendered.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tn_config::{Engine, Registry, Resolved, parse_document, sweep};
///
/// let mut registry = Registry::new();
/// registry.register_fn("demo.sweep.lr", |_| {
///     Ok(Resolved::Sequence(vec![
///         [("model.lr".to_owned(), Resolved::from(0.01))].into_iter().collect(),
///         [("model.lr".to_owned(), Resolved::from(0.001))].into_iter().collect(),
///     ]))
/// })?;
/// let engine = Engine::new(&registry);
///
/// let variants = sweep(&json!({"_sweep_": "demo.sweep.lr", "model": {"lr": 0.1}}), &engine)?;
/// assert_eq!(variants.len(), 2);
/// assert_eq!(
///     parse_document(&variants[1])?,
///     json!({"_sweep_": "demo.sweep.lr", "model": {"lr": 0.001}})
/// );
/// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
/// ```
pub fn sweep(document: &Value, engine: &Engine<'_>) -> TnResult<Vec<String>> {
    let variants = expand(document, engine)?
        .iter()
        .map(to_yaml)
        .collect::<TnResult<Vec<_>>>()?;
    info!(variants = variants.len(), "sweep expanded");
    Ok(variants)
}

/// Load the document at `path` and [`sweep`] it.
///
/// # Errors
///
/// Returns [`TnError::File`] when the document cannot be loaded, otherwise
/// fails like [`sweep`].
pub fn sweep_file(path: &Path, engine: &Engine<'_>) -> TnResult<Vec<String>> {
    let document = load_document(path)?;
    sweep(&document, engine)
}
