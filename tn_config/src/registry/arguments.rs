//! Resolved arguments handed to component factories.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ComponentError, Resolved};

/// Positional and keyword arguments of a marker mapping, already resolved.
///
/// Keyword arguments keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Resolved>,
    keyword: IndexMap<String, Resolved>,
}

impl Arguments {
    /// Build arguments from resolved positional and keyword values.
    #[must_use]
    pub const fn new(positional: Vec<Resolved>, keyword: IndexMap<String, Resolved>) -> Self {
        Self {
            positional,
            keyword,
        }
    }

    /// Positional arguments in order.
    #[must_use]
    pub fn positional(&self) -> &[Resolved] {
        &self.positional
    }

    /// Keyword arguments in document order.
    #[must_use]
    pub const fn keyword(&self) -> &IndexMap<String, Resolved> {
        &self.keyword
    }

    /// Consume the arguments, returning the positional and keyword parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Resolved>, IndexMap<String, Resolved>) {
        (self.positional, self.keyword)
    }

    /// Looks up a keyword argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resolved> {
        self.keyword.get(name)
    }

    /// Looks up a keyword argument that the component cannot do without.
    ///
    /// # Errors
    ///
    /// Returns a [`ComponentError`] naming the missing argument.
    pub fn require(&self, name: &str) -> Result<&Resolved, ComponentError> {
        self.get(name)
            .ok_or_else(|| format!("missing required argument '{name}'").into())
    }

    /// Deserialises the keyword arguments into `T`.
    ///
    /// Keyword arguments must be plain data; live objects cannot be
    /// deserialised.
    ///
    /// # Errors
    ///
    /// Returns a [`ComponentError`] when an argument holds a live object or
    /// when the values do not match `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexmap::IndexMap;
    /// use serde::Deserialize;
    /// use tn_config::{Arguments, Resolved};
    ///
    /// #[derive(Deserialize)]
    /// struct Optimiser {
    ///     lr: f64,
    /// }
    ///
    /// let mut keyword = IndexMap::new();
    /// keyword.insert("lr".to_owned(), Resolved::from(0.01));
    /// let args = Arguments::new(Vec::new(), keyword);
    /// let opt: Optimiser = args.deserialize().expect("plain data deserialises");
    /// assert!((opt.lr - 0.01).abs() < f64::EPSILON);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ComponentError> {
        let mut map = serde_json::Map::with_capacity(self.keyword.len());
        for (key, value) in &self.keyword {
            let plain = value.try_into_value().map_err(|err| err.to_string())?;
            map.insert(key.clone(), plain);
        }
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Total number of positional and keyword arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Returns `true` when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}
