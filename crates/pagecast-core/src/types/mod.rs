//! # Core Type Definitions
//!
//! Shared identifiers and the error taxonomy for the pagecast engine:
//! - Observer handles (`ObserverId`)
//! - Error types (`PagecastError`, `ErrorKind`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Handle for a registered observer.
///
/// Allocated by the `ObserverHub` from a monotonic counter; never reused
/// within the lifetime of a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Coarse classification of a `PagecastError`.
///
/// Transport adapters map these onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was missing fields or carried malformed values.
    BadRequest,
    /// A page or component ID did not resolve.
    NotFound,
    /// The request was well-formed but disallowed by policy.
    Refused,
    /// An observer channel was unusable.
    TransportFault,
    /// Serialization or I/O failure inside the process.
    Internal,
}

/// Errors that can occur in the pagecast system.
///
/// - No silent failures, except transport faults during broadcast
/// - Use `Result<T, PagecastError>` for fallible operations
/// - A failed operation leaves the store unchanged
#[derive(Debug, Error)]
pub enum PagecastError {
    /// Required fields were missing or malformed in an operation request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No component with this ID exists in the active page.
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// The parent named in an add request does not exist in the active page.
    #[error("Parent component not found: {0}")]
    ParentNotFound(String),

    /// No page with this ID exists.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// The operation is structurally valid but not permitted.
    #[error("Refused: {0}")]
    Refused(String),

    /// An observer's channel could not accept a message.
    #[error("Transport fault: {0}")]
    TransportFault(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl PagecastError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::ComponentNotFound(_) | Self::ParentNotFound(_) | Self::PageNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Refused(_) => ErrorKind::Refused,
            Self::TransportFault(_) => ErrorKind::TransportFault,
            Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Internal,
        }
    }

    /// True for any of the not-found variants.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<serde_json::Error> for PagecastError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_share_a_kind() {
        assert!(PagecastError::ComponentNotFound("a".into()).is_not_found());
        assert!(PagecastError::ParentNotFound("a".into()).is_not_found());
        assert!(PagecastError::PageNotFound("a".into()).is_not_found());
        assert!(!PagecastError::Refused("a".into()).is_not_found());
    }

    #[test]
    fn error_messages_name_the_target() {
        let err = PagecastError::ComponentNotFound("hero".into());
        assert_eq!(err.to_string(), "Component not found: hero");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn observer_id_display() {
        assert_eq!(ObserverId(7).to_string(), "observer-7");
    }
}
