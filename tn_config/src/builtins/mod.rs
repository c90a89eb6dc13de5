//! Components available in every [`Registry::with_builtins`] registry.
//!
//! | Target          | Result                                                  |
//! |-----------------|---------------------------------------------------------|
//! | `tn.sweep.grid` | Cartesian product of its keyword arguments as override sets. |
//! | `tn.sweep.list` | The override sets listed under `variants`, unchanged.   |
//! | `tn.util.echo`  | Its keyword arguments as a mapping, logged at `info`.   |

use indexmap::IndexMap;
use tracing::info;

use crate::{Arguments, ComponentError, Registry, Resolved, TnResult};

/// Target of the grid sweep generator.
pub const GRID: &str = "tn.sweep.grid";
/// Target of the list sweep generator.
pub const LIST: &str = "tn.sweep.list";
/// Target of the echo component.
pub const ECHO: &str = "tn.util.echo";

/// Register every builtin component in `registry`.
///
/// # Errors
///
/// Returns an error only if a builtin target path is malformed.
pub fn register(registry: &mut Registry) -> TnResult<()> {
    registry
        .register_fn(GRID, grid)?
        .register_fn(LIST, list)?
        .register_fn(ECHO, echo)?;
    Ok(())
}

/// Every combination of the keyword arguments, first key varying slowest.
///
/// A keyword argument that is not a sequence counts as a single choice. With
/// no keyword arguments the grid holds one empty override set.
fn grid(args: Arguments) -> Result<Resolved, ComponentError> {
    let (_, keyword) = args.into_parts();
    let axes: Vec<(String, Vec<Resolved>)> = keyword
        .into_iter()
        .map(|(path, choices)| match choices {
            Resolved::Sequence(items) => (path, items),
            single => (path, vec![single]),
        })
        .collect();
    let mut combinations: Vec<IndexMap<String, Resolved>> = vec![IndexMap::new()];
    for (path, choices) in &axes {
        combinations = combinations
            .iter()
            .flat_map(|prefix| {
                choices.iter().map(move |choice| {
                    let mut next = prefix.clone();
                    next.insert(path.clone(), choice.clone());
                    next
                })
            })
            .collect();
    }
    Ok(Resolved::Sequence(
        combinations.into_iter().map(Resolved::Mapping).collect(),
    ))
}

fn list(args: Arguments) -> Result<Resolved, ComponentError> {
    let (_, mut keyword) = args.into_parts();
    match keyword.shift_remove("variants") {
        Some(variants @ Resolved::Sequence(_)) => Ok(variants),
        Some(other) => Err(format!("'variants' must be a sequence, found {}", other.type_name()).into()),
        None => Err("missing required argument 'variants'".into()),
    }
}

fn echo(args: Arguments) -> Result<Resolved, ComponentError> {
    let (_, keyword) = args.into_parts();
    let echoed = Resolved::Mapping(keyword);
    match echoed.try_into_value() {
        Ok(plain) => info!(arguments = %plain, "echo"),
        Err(_) => info!(arguments = ?echoed, "echo"),
    }
    Ok(echoed)
}
