//! Decoding and rendering of configuration documents.
//!
//! Documents are decoded into a [`serde_json::Value`] tree whose mappings keep
//! document order. YAML goes through `serde-saphyr` with strict booleans, so
//! only `true` and `false` are booleans and `yes` stays a string.

mod loader;
mod yaml;

use serde_json::Value;
use serde_saphyr::Options;

use crate::{TnError, TnResult, TnResultExt};

pub use loader::{load_document, read_document};
pub use yaml::SaphyrYaml;

pub(crate) fn yaml_options() -> Options {
    Options {
        strict_booleans: true,
        ..Options::default()
    }
}

/// Decode YAML `text` into a document tree.
///
/// An empty document decodes to `null`.
///
/// # Errors
///
/// Returns [`TnError::Parse`] when `text` is not valid YAML or holds more
/// than one document.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tn_config::parse_document;
///
/// let doc = parse_document("model:\n  lr: 0.1\n  greeting: yes\n")?;
/// assert_eq!(doc, json!({"model": {"lr": 0.1, "greeting": "yes"}}));
/// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
/// ```
pub fn parse_document(text: &str) -> TnResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_saphyr::from_str_with_options(text, yaml_options()).into_tn()
}

/// Render `document` as YAML.
///
/// # Errors
///
/// Returns [`TnError::Serialize`] when the encoder rejects the tree.
pub fn to_yaml(document: &Value) -> TnResult<String> {
    serde_saphyr::to_string(document).into_tn()
}

/// Render `document` as indented JSON for diagnostics.
///
/// # Errors
///
/// Returns [`TnError::Serialize`] when the encoder rejects the tree.
pub fn to_pretty_json(document: &Value) -> TnResult<String> {
    serde_json::to_string_pretty(document).map_err(TnError::serialize)
}

#[cfg(test)]
mod tests;
