//! Writes values into nested documents addressed by dot paths.
//!
//! A dot path is `segment(.segment)*`, where each segment is a mapping key
//! optionally followed by a `[index]` suffix selecting a sequence element.
//! Missing mappings are created on the way down and sequences are padded to
//! the requested index, so writes never fail for lack of structure.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::resolved::value_type_name;
use crate::{TnError, TnResult};

/// Separator between dot path segments.
pub const SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    raw: &'a str,
    key: &'a str,
    index: Option<usize>,
}

fn parse_segment<'a>(path: &str, raw: &'a str) -> TnResult<Segment<'a>> {
    if raw.is_empty() {
        return Err(TnError::malformed_dot_path(path, "empty segment"));
    }
    let Some((key, rest)) = raw.split_once('[') else {
        if raw.contains(']') {
            return Err(TnError::malformed_dot_path(
                path,
                format!("unbalanced ']' in segment '{raw}'"),
            ));
        }
        return Ok(Segment {
            raw,
            key: raw,
            index: None,
        });
    };
    if key.is_empty() {
        return Err(TnError::malformed_dot_path(
            path,
            format!("segment '{raw}' has no key before '['"),
        ));
    }
    let Some(inner) = rest.strip_suffix(']') else {
        return Err(TnError::malformed_dot_path(
            path,
            format!("segment '{raw}' must end with ']'"),
        ));
    };
    let index = inner.parse::<usize>().map_err(|source| {
        Arc::new(TnError::MalformedIndex {
            path: path.to_owned(),
            segment: raw.to_owned(),
            source,
        })
    })?;
    Ok(Segment {
        raw,
        key,
        index: Some(index),
    })
}

fn parse_path(path: &str) -> TnResult<Vec<Segment<'_>>> {
    path.split(SEPARATOR)
        .map(|raw| parse_segment(path, raw))
        .collect()
}

fn not_a_container(path: &str, segment: &Segment<'_>, found: &Value) -> Arc<TnError> {
    Arc::new(TnError::NotAContainer {
        path: path.to_owned(),
        segment: segment.raw.to_owned(),
        found: value_type_name(found),
    })
}

/// Returns the mapping stored in `node`, turning `null` into an empty one.
fn as_mapping<'v>(
    node: &'v mut Value,
    path: &str,
    segment: &Segment<'_>,
) -> TnResult<&'v mut Map<String, Value>> {
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => Ok(map),
        other => Err(not_a_container(path, segment, other)),
    }
}

/// Returns element `index` of the sequence stored under `segment.key`,
/// creating or padding the sequence so that the element exists.
fn padded_element<'v>(
    map: &'v mut Map<String, Value>,
    path: &str,
    segment: &Segment<'_>,
    index: usize,
    filler: fn() -> Value,
) -> TnResult<&'v mut Value> {
    let slot = map
        .entry(segment.key)
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    let items = match slot {
        Value::Array(items) => items,
        other => return Err(not_a_container(path, segment, other)),
    };
    if items.len() <= index {
        let len = index
            .checked_add(1)
            .ok_or_else(|| TnError::malformed_dot_path(path, "index too large"))?;
        items
            .try_reserve(len - items.len())
            .map_err(|_| TnError::malformed_dot_path(path, "index too large"))?;
        items.resize_with(len, filler);
    }
    items.get_mut(index).ok_or_else(|| {
        TnError::malformed_dot_path(path, format!("index {index} is out of range"))
    })
}

fn empty_mapping() -> Value {
    Value::Object(Map::new())
}

/// Write `value` into `base` at `path`, creating intermediate structure.
///
/// Intermediate segments descend into (and create, when absent) mappings;
/// `name[k]` descends into element `k` of sequence `name`, padding it with
/// empty mappings. The final segment assigns the value, padding a target
/// sequence with nulls. Existing siblings are never touched.
///
/// # Errors
///
/// - [`TnError::MalformedDotPath`] for empty segments or unbalanced
///   brackets.
/// - [`TnError::MalformedIndex`] when a bracket does not hold a
///   non-negative integer.
/// - [`TnError::NotAContainer`] when the path runs through a scalar.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tn_config::merge_dot_path;
///
/// let mut doc = json!({"model": {"lr": 0.1}});
/// merge_dot_path(&mut doc, "model.layers[1].units", json!(64))?;
/// assert_eq!(
///     doc,
///     json!({"model": {"lr": 0.1, "layers": [{}, {"units": 64}]}})
/// );
/// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
/// ```
pub fn merge_dot_path(base: &mut Value, path: &str, value: Value) -> TnResult<()> {
    let segments = parse_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(TnError::malformed_dot_path(path, "empty path"));
    };

    let mut current = base;
    for segment in parents {
        let map = as_mapping(current, path, segment)?;
        current = match segment.index {
            Some(index) => padded_element(map, path, segment, index, empty_mapping)?,
            None => map.entry(segment.key).or_insert_with(empty_mapping),
        };
    }

    let map = as_mapping(current, path, last)?;
    match last.index {
        Some(index) => {
            *padded_element(map, path, last, index, || Value::Null)? = value;
        }
        None => {
            map.insert(last.key.to_owned(), value);
        }
    }
    Ok(())
}
