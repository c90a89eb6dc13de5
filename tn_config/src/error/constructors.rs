//! Constructors for `TnError` shared across the crate.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::{ComponentError, TnError};

impl TnError {
    /// Construct a [`TnError::File`] for `path`, wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tn_config::TnError;
    ///
    /// let err = TnError::file(Path::new("run.yaml"), std::io::Error::other("boom"));
    /// assert!(matches!(&*err, TnError::File { .. }));
    /// ```
    #[must_use]
    pub fn file(path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a [`TnError::MalformedTarget`] for `path`.
    #[must_use]
    pub fn malformed_target(path: &str, reason: &'static str) -> Arc<Self> {
        Arc::new(Self::MalformedTarget {
            path: path.to_owned(),
            reason,
        })
    }

    /// Construct a [`TnError::MalformedDotPath`] for `path`.
    #[must_use]
    pub fn malformed_dot_path(path: &str, reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::MalformedDotPath {
            path: path.to_owned(),
            reason: reason.into(),
        })
    }

    /// Wrap a component failure raised while constructing or calling `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tn_config::TnError;
    ///
    /// let err = TnError::invocation("demo.fail", "learning rate must be positive".into());
    /// assert_eq!(err.to_string(), "learning rate must be positive");
    /// ```
    #[must_use]
    pub fn invocation(target: &str, cause: ComponentError) -> Arc<Self> {
        Arc::new(Self::Invocation {
            target: target.to_owned(),
            cause,
        })
    }

    /// Construct a [`TnError::Serialize`] from any displayable encoder error.
    #[must_use]
    pub fn serialize(err: impl std::fmt::Display) -> Arc<Self> {
        Arc::new(Self::Serialize {
            message: err.to_string(),
        })
    }

    /// Returns the target path when this error came from a component.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Invocation { target, .. } => Some(target),
            Self::NamespaceNotFound { path, .. }
            | Self::AttributeNotFound { path, .. }
            | Self::MalformedTarget { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_saphyr::Error> for TnError {
    fn from(err: serde_saphyr::Error) -> Self {
        Self::Parse(Box::new(err))
    }
}

impl From<serde_saphyr::ser::Error> for TnError {
    fn from(err: serde_saphyr::ser::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }
}
