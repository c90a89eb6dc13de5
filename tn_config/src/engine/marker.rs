//! Recognition of marker mappings and their reserved keys.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::resolved::value_type_name;
use crate::{TnError, TnResult};

/// Key naming the component to construct.
pub const COMPONENT_KEY: &str = "_component_";
/// Alias accepted for [`COMPONENT_KEY`].
pub const TARGET_KEY: &str = "_target_";
/// Key holding positional arguments.
pub const ARGS_KEY: &str = "_args_";
/// Key holding the identity token.
pub const ID_KEY: &str = "_id_";

const RESERVED_DELIMITER: char = '_';

/// Returns `true` for keys that are never passed as keyword arguments.
pub(crate) fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_DELIMITER) || key.ends_with(RESERVED_DELIMITER)
}

/// Returns `true` when `map` asks for a component to be constructed.
pub(crate) fn is_marker(map: &Map<String, Value>) -> bool {
    map.contains_key(COMPONENT_KEY) || map.contains_key(TARGET_KEY)
}

/// The parts of a marker mapping the engine acts on.
#[derive(Debug)]
pub(crate) struct Marker<'a> {
    pub(crate) target: &'a str,
    pub(crate) identity: Option<&'a Value>,
    pub(crate) positional: &'a [Value],
    map: &'a Map<String, Value>,
}

impl<'a> Marker<'a> {
    /// Reads the reserved keys of `map`, returning `None` for plain mappings.
    pub(crate) fn parse(map: &'a Map<String, Value>) -> TnResult<Option<Self>> {
        let Some((key, raw)) = [COMPONENT_KEY, TARGET_KEY]
            .into_iter()
            .find_map(|key| map.get(key).map(|value| (key, value)))
        else {
            return Ok(None);
        };
        let target = match raw {
            Value::String(target) => target.trim(),
            other => return Err(unexpected(key, "string", other)),
        };
        let identity = match map.get(ID_KEY) {
            None | Some(Value::Null) => None,
            Some(token @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => Some(token),
            Some(other) => return Err(unexpected(ID_KEY, "scalar", other)),
        };
        let positional = match map.get(ARGS_KEY) {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => return Err(unexpected(ARGS_KEY, "sequence", other)),
        };
        Ok(Some(Self {
            target,
            identity,
            positional,
            map,
        }))
    }

    /// Keyword arguments in document order.
    pub(crate) fn keyword(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.map.iter().filter(|(key, _)| !is_reserved(key))
    }
}

pub(crate) fn unexpected(key: &'static str, expected: &'static str, found: &Value) -> Arc<TnError> {
    Arc::new(TnError::UnexpectedType {
        key,
        expected,
        found: value_type_name(found),
    })
}
