//! Error types shared by the document store and its indices.

use thiserror::Error;

use crate::models::VersionId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-visible failures. None of these leave partial state behind:
/// every operation validates before it mutates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Document '{0}' not found")]
    DocumentNotFound(String),

    #[error("Version {0} not found")]
    VersionNotFound(VersionId),

    #[error("Document '{0}' already exists")]
    AlreadyExists(String),

    /// The target exists but is not on the root-to-active path.
    #[error("Version {target} is not an ancestor of active version {active}")]
    InvalidRollbackTarget { target: VersionId, active: VersionId },

    #[error("Version {0} is the root and has no parent")]
    NoParent(VersionId),
}

impl Error {
    /// True for either flavour of lookup failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound(_) | Self::VersionNotFound(_))
    }
}
