//! Figment provider for YAML settings, decoded like any other document.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::value::Dict;
use figment::{Metadata, Profile, Provider};
use serde_json::Value;

use super::parse_document;
use crate::resolved::value_type_name;

/// Figment provider that reads YAML through [`parse_document`].
///
/// YAML is decoded with the same strict booleans as documents. An empty
/// document provides no values. With [`SaphyrYaml::section`] only the
/// mapping under one top-level key is provided, so a project file can keep
/// settings next to other data; a missing or `null` section is empty.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    origin: PathBuf,
    inline: Option<String>,
    section: Option<String>,
}

impl SaphyrYaml {
    /// Read `path` each time the provider is queried.
    #[must_use]
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            origin: path.into(),
            inline: None,
            section: None,
        }
    }

    /// Provide `contents`, reporting errors against `path`.
    #[must_use]
    pub fn string<P, S>(path: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            origin: path.into(),
            inline: Some(contents.into()),
            section: None,
        }
    }

    /// Only provide the mapping stored under the top-level `key`.
    #[must_use]
    pub fn section<K: Into<String>>(mut self, key: K) -> Self {
        self.section = Some(key.into());
        self
    }

    fn failure(&self, detail: impl std::fmt::Display) -> figment::Error {
        figment::Error::from(format!("{}: {detail}", self.origin.display()))
    }

    fn selected(&self, document: Value) -> Value {
        match (&self.section, document) {
            (None, whole) => whole,
            (Some(key), Value::Object(mut map)) => map.remove(key).unwrap_or(Value::Null),
            (Some(_), other) => other,
        }
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("YAML file", self.origin.as_path())
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let text = match &self.inline {
            Some(contents) => Cow::Borrowed(contents.as_str()),
            None => Cow::Owned(
                std::fs::read_to_string(&self.origin).map_err(|err| self.failure(err))?,
            ),
        };
        let document = parse_document(&text).map_err(|err| self.failure(err))?;
        let dict = match self.selected(document) {
            Value::Null => Dict::new(),
            mapping @ Value::Object(_) => {
                serde_json::from_value(mapping).map_err(|err| self.failure(err))?
            }
            other => {
                return Err(self.failure(format_args!(
                    "expected a mapping, found {}",
                    value_type_name(&other)
                )));
            }
        };
        Ok(Profile::Default.collect(dict))
    }
}
