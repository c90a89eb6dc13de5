//! Error types for the `tn` front end.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tn_config::TnError;

/// Errors surfaced by the `tn` command.
#[derive(Debug, Error)]
pub enum TnCliError {
    /// Loading, sweeping or executing a document failed.
    #[error(transparent)]
    Config(#[from] Arc<TnError>),

    /// Project settings could not be layered or extracted.
    #[error("failed to load settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// The working directory could not be determined.
    #[error("failed to read the working directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// One or more variants failed; each failure was logged as it happened.
    #[error("{failed} of {total} tasks failed")]
    TasksFailed {
        /// Variants whose execution returned an error.
        failed: usize,
        /// Variants in the sweep.
        total: usize,
    },

    /// A global log subscriber was already installed.
    #[error("failed to install logging: {0}")]
    Logging(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result alias for the `tn` front end.
pub type Result<T> = std::result::Result<T, TnCliError>;
