//! Error types produced while loading, resolving and sweeping documents.

mod constructors;
mod types;

pub use types::{ComponentError, TnError};
