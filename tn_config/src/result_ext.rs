//! Extensions for mapping errors to `TnResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(TnError::from(e)))`
//! patterns when converting external error types into the crate's
//! `TnResult<T>` alias (`Result<T, Arc<TnError>>`).
//!
//! # Examples
//!
//! ```
//! use tn_config::{TnResult, TnResultExt};
//!
//! fn encode() -> TnResult<String> {
//!     // serde_json::Error implements Into<TnError>
//!     serde_json::to_string(&42).into_tn()
//! }
//! # assert_eq!(encode().ok().as_deref(), Some("42"));
//! ```

use std::sync::Arc;

use crate::{TnError, TnResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<TnError>`
/// into a `TnResult<T>`.
pub trait TnResultExt<T, E> {
    /// Convert `Result<T, E>` into `TnResult<T>` using `Into<TnError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<TnError>`.
    fn into_tn(self) -> TnResult<T>;
}

impl<T, E> TnResultExt<T, E> for Result<T, E>
where
    E: Into<TnError>,
{
    fn into_tn(self) -> TnResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
