//! The constructible unit named by a target path.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::Arguments;
use crate::{ComponentError, Resolved};

/// A freshly constructed component.
///
/// The resolution engine constructs a component from its arguments and then
/// immediately calls it with no arguments; the value returned by
/// [`Component::call`] replaces the marker mapping in the resolved tree.
pub trait Component: Send {
    /// Invoke the component with no arguments.
    ///
    /// # Errors
    ///
    /// Implementations report failures with any error type; it reaches the
    /// caller unchanged.
    fn call(self: Box<Self>) -> Result<Resolved, ComponentError>;
}

/// Factory building a [`Component`] from resolved arguments.
pub type Factory = Arc<dyn Fn(Arguments) -> Result<Box<dyn Component>, ComponentError> + Send + Sync>;

/// Component whose zero-argument call yields a value computed at
/// construction time.
pub(crate) struct Ready(pub(crate) Resolved);

impl Component for Ready {
    fn call(self: Box<Self>) -> Result<Resolved, ComponentError> {
        Ok(self.0)
    }
}

impl fmt::Debug for Ready {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ready").field(&self.0).finish()
    }
}

/// Factory for functions that produce their result directly.
pub(crate) fn function_factory<F>(f: F) -> Factory
where
    F: Fn(Arguments) -> Result<Resolved, ComponentError> + Send + Sync + 'static,
{
    Arc::new(move |args| f(args).map(|value| Box::new(Ready(value)) as Box<dyn Component>))
}

/// Factory deserialising keyword arguments into `T` and returning it as a
/// live object.
pub(crate) fn object_factory<T>() -> Factory
where
    T: DeserializeOwned + Any + Send + Sync,
{
    function_factory(|args| {
        let value: T = args.deserialize()?;
        Ok(Resolved::object(value))
    })
}
