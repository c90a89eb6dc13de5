//! Component registry resolving target paths to factories.
//!
//! Components are registered explicitly at start-up under dotted target
//! paths such as `models.vision.Resnet`. Lookup splits the path at its last
//! separator: everything before it is the namespace, the final segment the
//! component. A namespace exists once any component has been registered
//! beneath it, which lets lookups tell a misspelt namespace apart from a
//! misspelt component.

mod arguments;
mod component;
mod target;

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use arguments::Arguments;
pub use component::{Component, Factory};
pub use target::SEPARATOR;

use crate::{ComponentError, Resolved, TnError, TnResult};
use component::{function_factory, object_factory};
use target::{namespaces_of, parse_target};

/// Registry mapping target paths to component factories.
#[derive(Clone, Default)]
pub struct Registry {
    factories: BTreeMap<String, Factory>,
    namespaces: BTreeSet<String>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the builtin components.
    ///
    /// See [`crate::builtins`] for the list.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        if let Err(err) = crate::builtins::register(&mut registry) {
            warn!(error = %err, "builtin components unavailable");
        }
        registry
    }

    /// Register a component factory under `target`.
    ///
    /// Registering the same path twice replaces the earlier factory.
    ///
    /// # Errors
    ///
    /// Returns [`TnError::MalformedTarget`] when `target` is not a valid
    /// target path.
    pub fn register<F>(&mut self, target: &str, factory: F) -> TnResult<&mut Self>
    where
        F: Fn(Arguments) -> Result<Box<dyn Component>, ComponentError> + Send + Sync + 'static,
    {
        self.insert(target, Arc::new(factory))
    }

    /// Register a function whose result replaces the marker mapping.
    ///
    /// # Errors
    ///
    /// Returns [`TnError::MalformedTarget`] when `target` is not a valid
    /// target path.
    ///
    /// # Examples
    ///
    /// ```
    /// use tn_config::{Registry, Resolved};
    ///
    /// let mut registry = Registry::new();
    /// registry.register_fn("math.double", |args| {
    ///     let x = args.require("x")?.as_i64().ok_or("x must be an integer")?;
    ///     Ok(Resolved::from(x * 2))
    /// })?;
    /// assert!(registry.contains("math.double"));
    /// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
    /// ```
    pub fn register_fn<F>(&mut self, target: &str, f: F) -> TnResult<&mut Self>
    where
        F: Fn(Arguments) -> Result<Resolved, ComponentError> + Send + Sync + 'static,
    {
        self.insert(target, function_factory(f))
    }

    /// Register a plain data type built by deserialising keyword arguments.
    ///
    /// The instance is returned as a [`Resolved::Object`].
    ///
    /// # Errors
    ///
    /// Returns [`TnError::MalformedTarget`] when `target` is not a valid
    /// target path.
    pub fn register_object<T>(&mut self, target: &str) -> TnResult<&mut Self>
    where
        T: DeserializeOwned + Any + Send + Sync,
    {
        self.insert(target, object_factory::<T>())
    }

    fn insert(&mut self, target: &str, factory: Factory) -> TnResult<&mut Self> {
        let path = parse_target(target.trim())?;
        self.namespaces
            .extend(namespaces_of(&path).map(str::to_owned));
        if self.factories.insert(path.full.to_owned(), factory).is_some() {
            warn!(component = path.full, "component re-registered; previous factory replaced");
        } else {
            debug!(component = path.full, "component registered");
        }
        Ok(self)
    }

    /// Resolve `target` to its factory.
    ///
    /// # Errors
    ///
    /// - [`TnError::MalformedTarget`] when the path is empty, has no
    ///   separator, or starts or ends with one. Nothing is looked up in that
    ///   case.
    /// - [`TnError::NamespaceNotFound`] when nothing is registered beneath
    ///   the namespace.
    /// - [`TnError::AttributeNotFound`] when the namespace exists but does not
    ///   contain the final segment.
    pub fn resolve(&self, target: &str) -> TnResult<&Factory> {
        let path = parse_target(target)?;
        if let Some(factory) = self.factories.get(path.full) {
            return Ok(factory);
        }
        if !self.namespaces.contains(path.namespace) {
            return Err(Arc::new(TnError::NamespaceNotFound {
                path: path.full.to_owned(),
                namespace: path.namespace.to_owned(),
            }));
        }
        Err(Arc::new(TnError::AttributeNotFound {
            path: path.full.to_owned(),
            namespace: path.namespace.to_owned(),
            attribute: path.attribute.to_owned(),
            suggestion: self.closest_sibling(path.namespace, path.attribute),
        }))
    }

    /// Returns `true` when `target` has a registered factory.
    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.factories.contains_key(target)
    }

    /// Registered target paths in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Closest registered component in the same namespace, by a simple
    /// case-insensitive prefix score.
    fn closest_sibling(&self, namespace: &str, attribute: &str) -> Option<String> {
        let prefix = format!("{namespace}{SEPARATOR}");
        let wanted = attribute.to_ascii_lowercase();
        self.factories
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(&prefix))
            .filter_map(|key| {
                let candidate = key.strip_prefix(prefix.as_str())?;
                if candidate.contains(SEPARATOR) {
                    return None;
                }
                let lowered = candidate.to_ascii_lowercase();
                let shared = lowered
                    .chars()
                    .zip(wanted.chars())
                    .take_while(|(a, b)| a == b)
                    .count();
                (shared > 0).then_some((shared, key))
            })
            .max_by_key(|(shared, _)| *shared)
            .map(|(_, key)| key.clone())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("targets", &self.factories.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
