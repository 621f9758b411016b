//! Cross-document transport.
//!
//! One fire-and-forget send direction (frame → parent) and one multiplexed
//! receive listener (parent → frame), both over the host's messaging
//! primitive.
//!
//! # Gating
//!
//! Every send is checked against the host capabilities first. When the
//! document is not framed, or the host has no messaging, sends return
//! `Ok(())` without posting anything.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `origin` | Trusted origin policy |

// ============================================================================
// Submodules
// ============================================================================

/// Trusted origin policy.
pub mod origin;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::host::capabilities::{self, Capabilities};
use crate::host::{Host, HostEvent, ListenerKind};
use crate::protocol::{OutboundMessage, encode};

// ============================================================================
// Re-exports
// ============================================================================

pub use origin::{ANY_ORIGIN, OriginPolicy};

// ============================================================================
// Transport
// ============================================================================

/// Send and receive halves of the frame ↔ parent channel.
///
/// Messaging support is probed once at construction; embedding is
/// re-checked on every send because it is only settled once the document
/// has loaded.
#[derive(Debug)]
pub struct Transport<H> {
    host: Arc<H>,
    messaging: bool,
    origins: OriginPolicy,
}

impl<H: Host> Transport<H> {
    /// Creates a transport over `host`.
    #[must_use]
    pub fn new(host: Arc<H>, origins: OriginPolicy) -> Self {
        let messaging = capabilities::is_messaging_supported(&*host);
        debug!(messaging, open = origins.is_open(), "Transport created");
        Self {
            host,
            messaging,
            origins,
        }
    }

    /// Returns the host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the origin policy.
    #[inline]
    #[must_use]
    pub fn origins(&self) -> &OriginPolicy {
        &self.origins
    }

    /// Returns `true` if the document is framed.
    #[inline]
    #[must_use]
    pub fn is_embedded_frame(&self) -> bool {
        capabilities::is_embedded_frame(&*self.host)
    }

    /// Returns `true` if cross-document messaging is available.
    #[inline]
    #[must_use]
    pub fn is_messaging_supported(&self) -> bool {
        self.messaging
    }

    /// Returns `true` if messages can reach the parent.
    #[inline]
    #[must_use]
    pub fn can_communicate(&self) -> bool {
        self.messaging && self.is_embedded_frame()
    }

    /// Returns the current capabilities.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            embedded: self.is_embedded_frame(),
            messaging: self.messaging,
        }
    }

    /// Encodes and posts one message to the parent.
    ///
    /// Returns `Ok(())` without posting when the parent is unreachable.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the message.
    pub fn send(&self, message: &OutboundMessage) -> Result<()> {
        if !self.can_communicate() {
            trace!(kind = %message.kind, "Parent unreachable, message skipped");
            return Ok(());
        }

        let data = encode(message);
        trace!(data = %data, "Sending to parent");
        self.host.post_to_parent(&data, &self.origins.target_origin())
    }

    /// Registers the inbound message listener.
    ///
    /// The handler receives the raw string of every message from a trusted
    /// origin. Call once per document; each call adds another listener.
    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(&str) + 'static,
    {
        let origins = self.origins.clone();
        self.host.add_listener(
            ListenerKind::Message,
            Box::new(move |event| {
                let HostEvent::Message(message) = event else {
                    return;
                };
                let message = message.unwrap_original();
                if !origins.accepts(&message.origin) {
                    debug!(origin = %message.origin, "Dropped message from untrusted origin");
                    return;
                }
                handler(&message.data);
            }),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::host::{MemoryHost, MessageEvent};
    use crate::protocol::{DocumentSize, MessageKind};

    fn transport(host: MemoryHost, origins: OriginPolicy) -> Transport<MemoryHost> {
        Transport::new(Arc::new(host), origins)
    }

    #[test]
    fn test_send_posts_encoded_message() {
        let (host, mut port) = MemoryHost::builder().build();
        let transport = transport(host, OriginPolicy::any());

        transport
            .send(&OutboundMessage::size(DocumentSize::new(320, 240)))
            .expect("send");

        let posted = port.try_recv().expect("posted");
        assert_eq!(posted.data, "size=320,240");
        assert_eq!(posted.target_origin, "*");
    }

    #[test]
    fn test_send_targets_trusted_origin() {
        let (host, mut port) = MemoryHost::builder().build();
        let origins = OriginPolicy::trusted(["https://shop.example"]).expect("origins");
        let transport = transport(host, origins);

        transport
            .send(&OutboundMessage::control(MessageKind::ShowLoader))
            .expect("send");
        assert_eq!(
            port.try_recv().map(|m| m.target_origin),
            Some("https://shop.example".to_string())
        );
    }

    #[test]
    fn test_send_is_noop_when_unframed() {
        let (host, mut port) = MemoryHost::builder().unframed().build();
        let transport = transport(host, OriginPolicy::any());

        assert!(!transport.can_communicate());
        transport
            .send(&OutboundMessage::control(MessageKind::HideLoader))
            .expect("no-op send");
        assert!(port.try_recv().is_none());
    }

    #[test]
    fn test_send_is_noop_without_messaging() {
        let (host, mut port) = MemoryHost::builder().messaging(false).build();
        let transport = transport(host, OriginPolicy::any());

        transport
            .send(&OutboundMessage::scroll_to_offset(10.0))
            .expect("no-op send");
        assert!(port.try_recv().is_none());
        assert_eq!(
            transport.capabilities(),
            Capabilities {
                embedded: true,
                messaging: false
            }
        );
    }

    #[test]
    fn test_on_message_unwraps_and_filters() {
        let (host, port) = MemoryHost::builder().build();
        let origins = OriginPolicy::trusted([port.origin()]).expect("origins");
        let transport = transport(host, origins);

        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        transport.on_message(move |raw| sink.borrow_mut().push(raw.to_string()));

        port.send("hideLoader").expect("send");
        port.send_event(MessageEvent::wrapped(MessageEvent::new(
            port.origin(),
            "size=1,2",
        )))
        .expect("send");
        port.send_event(MessageEvent::new("https://evil.example", "size=9,9"))
            .expect("send");

        assert_eq!(transport.host().deliver_pending(), 3);
        assert_eq!(*received.borrow(), vec!["hideLoader", "size=1,2"]);
    }
}
