//! Values produced by resolving a configuration tree.
//!
//! A [`Resolved`] mirrors the shape of the decoded document with one extra
//! case: [`Resolved::Object`] holds a live instance created by a component.
//! Objects compare by reference identity, so two occurrences of the same
//! cached instance are equal while two separately constructed instances are
//! not.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::{TnError, TnResult};

/// Shared handle to a live object created by a component.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A resolved configuration node.
#[derive(Clone, Default)]
pub enum Resolved {
    /// Null scalar.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Ordered sequence of resolved nodes.
    Sequence(Vec<Resolved>),
    /// Ordered mapping of resolved nodes.
    Mapping(IndexMap<String, Resolved>),
    /// Live object created by a component.
    Object(Instance),
}

impl Resolved {
    /// Wrap `value` as a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use tn_config::Resolved;
    ///
    /// let wrapped = Resolved::object(vec![1_u8, 2, 3]);
    /// let inner = wrapped.downcast::<Vec<u8>>().expect("object holds a Vec<u8>");
    /// assert_eq!(inner.len(), 3);
    /// ```
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// Returns the live object as `T` when this node holds one of that type.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(instance) => Arc::clone(instance).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Returns `true` when both nodes hold the very same live object.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }

    /// Returns the string slice when this node is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value when this node is an integer that fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the value as `f64` when this node is numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the value when this node is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` for the null scalar.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the elements when this node is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries when this node is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when this node is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Human-readable name of the node type, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Object(_) => "object",
        }
    }

    /// Converts the tree back into plain data.
    ///
    /// # Errors
    ///
    /// Returns [`TnError::UnserializableObject`] naming the first location
    /// that holds a live object.
    pub fn try_into_value(&self) -> TnResult<Value> {
        self.to_value_at("$")
    }

    fn to_value_at(&self, location: &str) -> TnResult<Value> {
        Ok(match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Sequence(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| item.to_value_at(&format!("{location}[{idx}]")))
                    .collect::<TnResult<Vec<_>>>()?,
            ),
            Self::Mapping(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, item) in map {
                    out.insert(key.clone(), item.to_value_at(&format!("{location}.{key}"))?);
                }
                Value::Object(out)
            }
            Self::Object(_) => {
                return Err(Arc::new(TnError::UnserializableObject {
                    location: location.to_owned(),
                }));
            }
        })
    }
}

/// Human-readable name of a document node type, used in diagnostics.
pub(crate) const fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Self::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            Self::Object(instance) => write!(f, "Object({:p})", Arc::as_ptr(instance)),
        }
    }
}

impl PartialEq for Resolved {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            (Self::Object(_), Self::Object(_)) => self.same_instance(other),
            _ => false,
        }
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Resolved {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Resolved {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Resolved {
    /// Non-finite floats have no document representation and become null.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Resolved {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Resolved {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Resolved {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl FromIterator<(String, Self)> for Resolved {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().collect())
    }
}
