//! Reading documents from disk.

use std::path::Path;

use serde_json::Value;

use super::yaml_options;
use crate::{TnError, TnResult};

/// Read the raw text of the document at `path`.
///
/// # Errors
///
/// Returns [`TnError::File`] when the file cannot be read.
pub fn read_document(path: &Path) -> TnResult<String> {
    std::fs::read_to_string(path).map_err(|err| TnError::file(path, err))
}

/// Read and decode the document at `path`.
///
/// The format follows the file extension: `json` is decoded as JSON, `toml`
/// as TOML, and everything else, including `yaml` and `yml`, as YAML.
///
/// # Errors
///
/// Returns [`TnError::File`] when the file cannot be read or decoded.
pub fn load_document(path: &Path) -> TnResult<Value> {
    let text = read_document(path)?;
    decode_by_format(path, &text)
}

fn decode_by_format(path: &Path, text: &str) -> TnResult<Value> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => serde_json::from_str(text).map_err(|err| TnError::file(path, err)),
        Some("toml") => toml::from_str(text).map_err(|err| TnError::file(path, err)),
        _ => serde_saphyr::from_str_with_options(text, yaml_options())
            .map_err(|err| TnError::file(path, err)),
    }
}
