//! Embedding and messaging capability detection.
//!
//! Every send and request is gated on [`can_communicate`]: the document must
//! sit inside a frame whose top-level location differs from its own, and the
//! host must offer both halves of the cross-document channel.

use tracing::trace;
use url::Url;

use super::Host;

// ============================================================================
// Capabilities
// ============================================================================

/// Snapshot of what the environment supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Document is embedded in a frame with a different top-level location.
    pub embedded: bool,
    /// Cross-document send and receive are both available.
    pub messaging: bool,
}

impl Capabilities {
    /// Probes the host.
    #[must_use]
    pub fn detect<H: Host + ?Sized>(host: &H) -> Self {
        Self {
            embedded: is_embedded_frame(host),
            messaging: is_messaging_supported(host),
        }
    }

    /// Returns `true` if messages can be exchanged with the parent.
    #[inline]
    #[must_use]
    pub const fn can_communicate(&self) -> bool {
        self.embedded && self.messaging
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Returns `true` if the document is framed.
///
/// A host that refuses to reveal the top-level location is cross-origin,
/// which means the document is framed.
pub fn is_embedded_frame<H: Host + ?Sized>(host: &H) -> bool {
    match host.top_location() {
        Ok(top) => !same_location(&top, &host.location()),
        Err(e) => {
            trace!(error = %e, "Top location unreadable, treating as embedded");
            true
        }
    }
}

/// Returns `true` if both halves of the cross-document channel exist.
pub fn is_messaging_supported<H: Host + ?Sized>(host: &H) -> bool {
    host.has_post_message() && host.has_message_events()
}

/// Returns `true` if the document is framed and can message its parent.
pub fn can_communicate<H: Host + ?Sized>(host: &H) -> bool {
    is_embedded_frame(host) && is_messaging_supported(host)
}

/// Compares two hrefs after URL normalization.
fn same_location(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ============================================================================
// Tests
// ============================================================================
