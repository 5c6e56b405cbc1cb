//! Error types for object model operations.

use bit_store::{ObjectKind, StoreError};
use bit_types::ObjectId;
use thiserror::Error;

/// Errors raised while building, parsing, or resolving objects.
///
/// Nothing in this crate retries; every error is reported to the caller.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Stored bytes do not decode to a well-formed object of the given kind.
    #[error("malformed {kind} object: {reason}")]
    Malformed { kind: ObjectKind, reason: String },

    /// A reference names an object the store does not hold.
    #[error("missing reference: no object {0} in store")]
    MissingReference(ObjectId),

    /// Content required to snapshot a component was not supplied.
    #[error("incomplete component: {0}")]
    IncompleteComponent(String),

    /// A component manifest could not be read.
    #[error("invalid component manifest: {0}")]
    InvalidManifest(String),

    /// The dependency resolver could not produce dependencies.
    #[error("dependency resolution failed: {0}")]
    Resolver(String),

    /// Failure in the storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ObjectError {
    pub(crate) fn malformed(kind: ObjectKind, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for object operations.
pub type Result<T> = std::result::Result<T, ObjectError>;
