//! Host environment seam.
//!
//! Everything the protocol needs from the browser goes through [`Host`]:
//! location queries, document measurement, the cross-document send
//! primitive and event listener registration. Measurement and visual effects
//! stay on the host side; the protocol only reads the numbers.
//!
//! # Implementations
//!
//! | Module | Host | Use |
//! |--------|------|-----|
//! | `memory` | [`MemoryHost`] | in-process frame backed by tokio channels |
//! | `web` | `WebHost` | browser window over `web-sys` (feature `web`, wasm32) |

// ============================================================================
// Submodules
// ============================================================================

/// Embedding and messaging capability detection.
pub mod capabilities;

/// In-memory host for tests and demos.
pub mod memory;

/// Browser host over web-sys.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

// ============================================================================
// Imports
// ============================================================================

use crate::error::Result;
use crate::protocol::DocumentSize;

// ============================================================================
// Re-exports
// ============================================================================

pub use capabilities::Capabilities;
pub use memory::{FrameSender, MemoryHost, MemoryHostBuilder, ParentPort, PostedMessage};

// ============================================================================
// Types
// ============================================================================

/// Event listener callback registered with a host.
pub type Listener = Box<dyn Fn(&HostEvent)>;

/// Document readiness, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Document is still loading.
    #[default]
    Loading,
    /// DOM parsed, sub-resources still loading.
    Interactive,
    /// Document and sub-resources fully loaded.
    Complete,
}

/// Event types a [`Listener`] can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Window `load`.
    Load,
    /// Window `resize`.
    Resize,
    /// Window `message`.
    Message,
}

impl ListenerKind {
    /// Returns the DOM event name.
    #[inline]
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resize => "resize",
            Self::Message => "message",
        }
    }
}

/// An inbound cross-document message.
///
/// Some event plumbing hands over a wrapper whose real event sits in
/// `original`; [`MessageEvent::unwrap_original`] reaches the innermost one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Origin of the sending document (`https://host.example`).
    pub origin: String,
    /// String payload.
    pub data: String,
    /// Wrapped original event, if this is a wrapper.
    pub original: Option<Box<MessageEvent>>,
}

impl MessageEvent {
    /// Creates a plain message event.
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
            original: None,
        }
    }

    /// Wraps an event the way older event layers deliver it.
    #[inline]
    #[must_use]
    pub fn wrapped(original: MessageEvent) -> Self {
        Self {
            origin: String::new(),
            data: String::new(),
            original: Some(Box::new(original)),
        }
    }

    /// Returns the innermost event.
    #[must_use]
    pub fn unwrap_original(&self) -> &MessageEvent {
        let mut event = self;
        while let Some(inner) = event.original.as_deref() {
            event = inner;
        }
        event
    }
}

/// An event delivered to host listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The document finished loading.
    Load,
    /// The viewport was resized.
    Resize,
    /// A message arrived from another browsing context.
    Message(MessageEvent),
}

impl HostEvent {
    /// Returns the listener kind that receives this event.
    #[inline]
    #[must_use]
    pub fn listener_kind(&self) -> ListenerKind {
        match self {
            Self::Load => ListenerKind::Load,
            Self::Resize => ListenerKind::Resize,
            Self::Message(_) => ListenerKind::Message,
        }
    }
}

// ============================================================================
// Host
// ============================================================================

/// Browser environment of one document.
pub trait Host {
    /// Returns the document's own location href.
    fn location(&self) -> String;

    /// Returns the top-level browsing context's location href.
    ///
    /// # Errors
    ///
    /// [`Error::AccessDenied`](crate::Error::AccessDenied) when the top-level
    /// context is cross-origin.
    fn top_location(&self) -> Result<String>;

    /// Returns `true` if the cross-document send primitive exists.
    fn has_post_message(&self) -> bool;

    /// Returns `true` if inbound message events are delivered.
    fn has_message_events(&self) -> bool;

    /// Returns `true` if history-based navigation (`pushState`) is available.
    fn supports_history(&self) -> bool;

    /// Returns the document readiness.
    fn ready_state(&self) -> ReadyState;

    /// Measures the document.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentNotReady`](crate::Error::DocumentNotReady) when there
    /// is no body to measure.
    fn document_size(&self) -> Result<DocumentSize>;

    /// Returns the document's path plus query string.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentNotReady`](crate::Error::DocumentNotReady) when the
    /// location cannot be read.
    fn current_path(&self) -> Result<String>;

    /// Posts a string to the parent browsing context.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) when the host
    /// rejects the message.
    fn post_to_parent(&self, message: &str, target_origin: &str) -> Result<()>;

    /// Registers a listener for one event type.
    fn add_listener(&self, kind: ListenerKind, listener: Listener);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_original_reaches_innermost() {
        let inner = MessageEvent::new("https://parent.example", "size=1,2");
        let event = MessageEvent::wrapped(MessageEvent::wrapped(inner.clone()));
        assert_eq!(event.unwrap_original(), &inner);
    }

    #[test]
    fn test_unwrap_plain_event_is_identity() {
        let event = MessageEvent::new("https://parent.example", "hideLoader");
        assert_eq!(event.unwrap_original(), &event);
    }

    #[test]
    fn test_listener_kind() {
        assert_eq!(HostEvent::Load.listener_kind(), ListenerKind::Load);
        assert_eq!(
            HostEvent::Message(MessageEvent::new("", "")).listener_kind(),
            ListenerKind::Message
        );
        assert_eq!(ListenerKind::Resize.event_name(), "resize");
    }
}
