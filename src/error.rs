//! Error types for frame messaging.
//!
//! Most protocol operations never fail: an unsupported environment or a
//! malformed inbound message degrades to "feature inactive" and returns
//! `Ok(())`. The errors below cover the cases that must be reported to the
//! caller, such as measuring a document that has no body yet.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Document | [`Error::DocumentNotReady`], [`Error::AccessDenied`] |
//! | Transport | [`Error::PostMessage`] |
//! | Configuration | [`Error::Config`], [`Error::InvalidOrigin`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Document context is missing.
    ///
    /// Returned when the document has no body element to measure, or the
    /// host has no document at all.
    #[error("Document not ready: {message}")]
    DocumentNotReady {
        /// What was missing.
        message: String,
    },

    /// The host refused access to another browsing context.
    ///
    /// Reading the top-level location of a cross-origin parent fails this
    /// way; capability detection treats it as proof of embedding.
    #[error("Access denied: {message}")]
    AccessDenied {
        /// Description reported by the host.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// The host rejected a cross-document message.
    #[error("postMessage failed: {message}")]
    PostMessage {
        /// Description reported by the host.
        message: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// A trusted origin could not be parsed into a tuple origin.
    #[error("Invalid origin: {origin}")]
    InvalidOrigin {
        /// The rejected origin string.
        origin: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON configuration error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a document-not-ready error.
    #[inline]
    pub fn document_not_ready(message: impl Into<String>) -> Self {
        Self::DocumentNotReady {
            message: message.into(),
        }
    }

    /// Creates an access denied error.
    #[inline]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    /// Creates a post-message error.
    #[inline]
    pub fn post_message(message: impl Into<String>) -> Self {
        Self::PostMessage {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid origin error.
    #[inline]
    pub fn invalid_origin(origin: impl Into<String>) -> Self {
        Self::InvalidOrigin {
            origin: origin.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the document was not ready to be measured.
    #[inline]
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::DocumentNotReady { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidOrigin { .. } | Self::Json(_)
        )
    }

    /// Returns `true` if this error may go away on a later attempt.
    ///
    /// A document that is not ready yet usually is after its load event.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DocumentNotReady { .. } | Self::PostMessage { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
