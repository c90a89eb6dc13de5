//! Recursive resolution of configuration trees.
//!
//! [`Engine::visit`] walks a decoded document depth first. Plain mappings
//! and sequences are rebuilt with their children resolved, scalars pass
//! through unchanged, and every marker mapping is replaced by the value its
//! component returns. Arguments are resolved before the component that
//! receives them, so dependencies always exist by the time they are used.
//!
//! Components are constructed and then immediately called with no
//! arguments; the call's result is what appears in the resolved tree.

mod identity;
mod marker;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

pub use identity::IdentityRegistry;
pub use marker::{ARGS_KEY, COMPONENT_KEY, ID_KEY, TARGET_KEY};

pub(crate) use marker::{is_marker, unexpected};

use crate::{Arguments, Registry, Resolved, TnError, TnResult};
use marker::Marker;

/// Resolves configuration trees against a component [`Registry`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tn_config::{Engine, Registry, Resolved};
///
/// let mut registry = Registry::new();
/// registry.register_fn("math.add", |args| {
///     let total: i64 = args.positional().iter().filter_map(Resolved::as_i64).sum();
///     Ok(Resolved::from(total))
/// })?;
///
/// let engine = Engine::new(&registry);
/// let resolved = engine.visit(&json!({
///     "total": {"_component_": "math.add", "_args_": [1, 2, 3]},
///     "note": "plain values pass through",
/// }))?;
/// assert_eq!(resolved.get("total").and_then(Resolved::as_i64), Some(6));
/// # Ok::<_, std::sync::Arc<tn_config::TnError>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Engine<'r> {
    registry: &'r Registry,
    identities: Arc<IdentityRegistry>,
}

impl<'r> Engine<'r> {
    /// Create an engine with its own, initially empty, identity cache.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_identities(registry, Arc::new(IdentityRegistry::new()))
    }

    /// Create an engine sharing `identities` with other engines.
    #[must_use]
    pub const fn with_identities(registry: &'r Registry, identities: Arc<IdentityRegistry>) -> Self {
        Self {
            registry,
            identities,
        }
    }

    /// Registry used to look up targets.
    #[must_use]
    pub const fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Identity cache consulted for markers carrying an `_id_`.
    #[must_use]
    pub const fn identities(&self) -> &Arc<IdentityRegistry> {
        &self.identities
    }

    /// Resolve `node`, instantiating every marker mapping it contains.
    ///
    /// A marker whose `(target, _id_)` pair is already cached yields the
    /// cached value without resolving its arguments or looking up the
    /// target.
    ///
    /// # Errors
    ///
    /// - [`TnError::UnexpectedType`] when a reserved key holds the wrong
    ///   kind of node.
    /// - [`TnError::MalformedTarget`], [`TnError::NamespaceNotFound`] or
    ///   [`TnError::AttributeNotFound`] when a target cannot be resolved.
    /// - [`TnError::Invocation`] when a component fails; its message is
    ///   preserved verbatim.
    pub fn visit(&self, node: &Value) -> TnResult<Resolved> {
        match node {
            Value::Object(map) => match Marker::parse(map)? {
                Some(marker) => self.resolve_marker(&marker),
                None => map
                    .iter()
                    .map(|(key, value)| self.visit(value).map(|resolved| (key.clone(), resolved)))
                    .collect::<TnResult<IndexMap<_, _>>>()
                    .map(Resolved::Mapping),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.visit(item))
                .collect::<TnResult<Vec<_>>>()
                .map(Resolved::Sequence),
            scalar => Ok(Resolved::from(scalar.clone())),
        }
    }

    /// Construct `target` from already resolved `args` and call it.
    ///
    /// # Errors
    ///
    /// Fails like [`Engine::visit`] for lookup and invocation problems.
    pub fn instantiate(&self, target: &str, args: Arguments) -> TnResult<Resolved> {
        let path = target.trim();
        let factory = self.registry.resolve(path)?;
        debug!(component = path, arguments = args.len(), "instantiating component");
        let component = factory(args).map_err(|source| TnError::invocation(path, source))?;
        component
            .call()
            .map_err(|source| TnError::invocation(path, source))
    }

    fn resolve_marker(&self, marker: &Marker<'_>) -> TnResult<Resolved> {
        match marker.identity {
            Some(token) => self
                .identities
                .get_or_try_insert_with(marker.target, token, || self.construct(marker)),
            None => self.construct(marker),
        }
    }

    fn construct(&self, marker: &Marker<'_>) -> TnResult<Resolved> {
        let positional = marker
            .positional
            .iter()
            .map(|item| self.visit(item))
            .collect::<TnResult<Vec<_>>>()?;
        let keyword = marker
            .keyword()
            .map(|(key, value)| self.visit(value).map(|resolved| (key.clone(), resolved)))
            .collect::<TnResult<IndexMap<_, _>>>()?;
        self.instantiate(marker.target, Arguments::new(positional, keyword))
    }
}
