//! Primary error enum for document resolution flows.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Error type returned by component factories and component calls.
///
/// Components are free to fail with any error type; the resolution engine
/// carries it through unchanged so its message reaches the caller verbatim.
pub type ComponentError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading, resolving or sweeping a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TnError {
    /// Error reading or decoding a document file.
    #[error("document error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported by the reader or decoder.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// In-memory document text could not be decoded.
    #[error("failed to parse document: {0}")]
    Parse(#[source] Box<serde_saphyr::Error>),

    /// A document could not be rendered back to text.
    #[error("failed to serialise document: {message}")]
    Serialize {
        /// Description supplied by the encoder.
        message: String,
    },

    /// Target path is syntactically invalid.
    #[error("invalid target path '{path}': {reason}")]
    MalformedTarget {
        /// Offending target path.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// No registered component lives under the namespace of a target path.
    #[error(
        "error loading '{path}': namespace '{namespace}' is not registered\n\
         Are you sure that components under '{namespace}' are registered?"
    )]
    NamespaceNotFound {
        /// Target path being resolved.
        path: String,
        /// Namespace portion of the path.
        namespace: String,
    },

    /// The namespace exists but does not expose the requested component.
    #[error(
        "error loading '{path}': '{attribute}' is not registered in namespace '{namespace}'{}",
        suggestion_hint(.suggestion.as_ref())
    )]
    AttributeNotFound {
        /// Target path being resolved.
        path: String,
        /// Namespace portion of the path.
        namespace: String,
        /// Final segment that could not be found.
        attribute: String,
        /// Closest registered sibling, if any.
        suggestion: Option<String>,
    },

    /// A component factory or its zero-argument call failed.
    ///
    /// The message is the component's own, unchanged.
    #[error("{cause}")]
    Invocation {
        /// Target path of the failing component.
        target: String,
        /// Error raised by the component, rendered as this error's message.
        cause: ComponentError,
    },

    /// A reserved key holds a node of the wrong type.
    #[error("'{key}' must be {expected}, found {found}")]
    UnexpectedType {
        /// Reserved key being inspected.
        key: &'static str,
        /// Description of the accepted node types.
        expected: &'static str,
        /// Runtime type that was found instead.
        found: &'static str,
    },

    /// A dot path is syntactically invalid.
    #[error("invalid dot path '{path}': {reason}")]
    MalformedDotPath {
        /// Offending dot path.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// A bracketed index is not a non-negative integer.
    #[error("invalid index in segment '{segment}' of dot path '{path}': {source}")]
    MalformedIndex {
        /// Offending dot path.
        path: String,
        /// Segment carrying the bad index.
        segment: String,
        /// Integer parsing failure.
        #[source]
        source: ParseIntError,
    },

    /// A dot path tried to descend through a value that cannot hold children.
    #[error("cannot descend into segment '{segment}' of dot path '{path}': found {found}")]
    NotAContainer {
        /// Offending dot path.
        path: String,
        /// Segment that addressed the scalar.
        segment: String,
        /// Runtime type found at that position.
        found: &'static str,
    },

    /// A resolved tree containing live objects was used where plain data is
    /// required.
    #[error("resolved value at '{location}' holds a live object and cannot be serialised")]
    UnserializableObject {
        /// Location of the object within the tree.
        location: String,
    },

    /// A sweep generator produced an element that is not a mapping of dot
    /// paths to values.
    #[error("sweep generator returned an invalid override set at index {index}: found {found}")]
    InvalidOverrideSet {
        /// Position of the element in the generator output.
        index: usize,
        /// Runtime type found instead of a mapping.
        found: &'static str,
    },

    /// No project file exists in the start directory or its ancestors.
    #[error("not a tn repository (or any of the parent directories): .tn.yaml (searched from '{}')", .start.display())]
    NotAProject {
        /// Directory the search started from.
        start: PathBuf,
    },

    /// A project file already exists.
    #[error("already initialised: {}", .path.display())]
    AlreadyInitialised {
        /// Existing project file.
        path: PathBuf,
    },
}

fn suggestion_hint(suggestion: Option<&String>) -> String {
    suggestion
        .map(|name| format!("\nDid you mean '{name}'?"))
        .unwrap_or_default()
}
