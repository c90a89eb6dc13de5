//! Target path validation.

use crate::{TnError, TnResult};

/// Separator between target path segments.
pub const SEPARATOR: char = '.';

/// A validated target path split at its last separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TargetPath<'a> {
    pub(crate) full: &'a str,
    pub(crate) namespace: &'a str,
    pub(crate) attribute: &'a str,
}

/// Validate `path` and split it into namespace and attribute.
///
/// Validation happens before any lookup so that typos such as `".x"` are
/// reported as malformed paths rather than as missing components.
pub(crate) fn parse_target(path: &str) -> TnResult<TargetPath<'_>> {
    if path.is_empty() {
        return Err(TnError::malformed_target(path, "target path is empty"));
    }
    if path.starts_with(SEPARATOR) {
        return Err(TnError::malformed_target(
            path,
            "relative target paths are not supported",
        ));
    }
    if path.ends_with(SEPARATOR) {
        return Err(TnError::malformed_target(
            path,
            "target path must not end with a separator",
        ));
    }
    if path.split(SEPARATOR).any(str::is_empty) {
        return Err(TnError::malformed_target(
            path,
            "target path contains an empty segment",
        ));
    }
    let Some((namespace, attribute)) = path.rsplit_once(SEPARATOR) else {
        return Err(TnError::malformed_target(
            path,
            "target path must name a namespace and a component",
        ));
    };
    Ok(TargetPath {
        full: path,
        namespace,
        attribute,
    })
}

/// Every proper namespace prefix of a validated target path, shortest first.
pub(crate) fn namespaces_of<'a>(target: &TargetPath<'a>) -> impl Iterator<Item = &'a str> {
    let full = target.full;
    full.match_indices(SEPARATOR)
        .filter_map(move |(idx, _)| full.get(..idx))
}
