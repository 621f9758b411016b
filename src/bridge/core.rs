//! Core bridge struct and accessors.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;
use crate::host::{Capabilities, Host};
use crate::protocol::{MessageKind, decode};
use crate::transport::{OriginPolicy, Transport};

use super::builder::FrameBridgeBuilder;
use super::lifecycle::FrameState;
use super::options::FrameOptions;
use super::registry::CallbackRegistry;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a bridge.
pub(crate) struct BridgeInner<H> {
    /// Send and receive halves.
    pub transport: Transport<H>,
    /// Pending reply callbacks.
    pub registry: CallbackRegistry,
    /// Lifecycle flags and load options.
    pub state: Mutex<FrameState>,
}

// ============================================================================
// FrameBridge
// ============================================================================

/// Messaging handle of one framed document.
///
/// Create one per document and clone it where needed; clones share state.
pub struct FrameBridge<H> {
    pub(crate) inner: Arc<BridgeInner<H>>,
}

impl<H> Clone for FrameBridge<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> fmt::Debug for FrameBridge<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBridge")
            .field("state", &*self.inner.state.lock())
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

impl<H: Host> FrameBridge<H> {
    /// Creates a bridge over `host`.
    ///
    /// Listeners are not registered until [`FrameBridge::bind`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOrigin`](crate::Error::InvalidOrigin) if a trusted
    /// origin in `options` does not parse.
    pub fn new(host: H, options: FrameOptions) -> Result<Self> {
        let origins = options.origin_policy()?;
        Ok(Self::from_parts(host, &options, origins))
    }

    /// Returns a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> FrameBridgeBuilder<H> {
        FrameBridgeBuilder::new()
    }

    pub(crate) fn from_parts(host: H, options: &FrameOptions, origins: OriginPolicy) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                transport: Transport::new(Arc::new(host), origins),
                registry: CallbackRegistry::new(),
                state: Mutex::new(FrameState::from_options(options)),
            }),
        }
    }

    /// Recovers a handle from a listener's weak reference.
    pub(crate) fn upgrade(weak: &Weak<BridgeInner<H>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Returns a weak reference for listeners.
    pub(crate) fn downgrade(&self) -> Weak<BridgeInner<H>> {
        Arc::downgrade(&self.inner)
    }
}

// ============================================================================
// FrameBridge - Accessors
// ============================================================================

impl<H: Host> FrameBridge<H> {
    /// Returns the host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        self.inner.transport.host()
    }

    /// Returns the origin policy.
    #[inline]
    #[must_use]
    pub fn origins(&self) -> &OriginPolicy {
        self.inner.transport.origins()
    }

    /// Returns the current capabilities.
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.inner.transport.capabilities()
    }

    /// Returns `true` if the document is framed.
    #[inline]
    #[must_use]
    pub fn is_embedded_frame(&self) -> bool {
        self.inner.transport.is_embedded_frame()
    }

    /// Returns `true` if messages can reach the parent.
    #[inline]
    #[must_use]
    pub fn can_communicate(&self) -> bool {
        self.inner.transport.can_communicate()
    }

    /// Returns the number of callbacks waiting for a reply.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Returns `true` if a callback is waiting for a reply of `kind`.
    #[inline]
    #[must_use]
    pub fn is_pending(&self, kind: MessageKind) -> bool {
        self.inner.registry.is_pending(kind)
    }

    /// Returns `true` once the load announcement went out.
    #[inline]
    #[must_use]
    pub fn is_announced(&self) -> bool {
        self.inner.state.lock().load_announced
    }
}

// ============================================================================
// FrameBridge - Settings
// ============================================================================

impl<H: Host> FrameBridge<H> {
    /// Sets whether the parent scrolls to the frame on load.
    pub fn set_scroll_to_frame(&self, enabled: bool) {
        self.inner.state.lock().scroll_to_frame_on_load = enabled;
    }

    /// Sets whether the path is announced on load.
    pub fn set_track_path(&self, enabled: bool) {
        self.inner.state.lock().track_path_on_load = enabled;
    }
}

// ============================================================================
// FrameBridge - Inbound
// ============================================================================

impl<H: Host> FrameBridge<H> {
    /// Decodes one inbound string and runs the callbacks it answers.
    ///
    /// Returns the number of callbacks invoked. Malformed strings and
    /// messages that answer nothing are dropped.
    pub fn dispatch(&self, raw: &str) -> usize {
        match decode(raw) {
            Some(decoded) => self.inner.registry.dispatch(&decoded),
            None => {
                trace!(raw, "Dropped malformed message");
                0
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::host::MemoryHost;

    #[test]
    fn test_clones_share_state() {
        let (host, _port) = MemoryHost::builder().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        let clone = bridge.clone();

        clone.set_scroll_to_frame(true);
        assert!(bridge.inner.state.lock().scroll_to_frame_on_load);
        assert!(Arc::ptr_eq(&bridge.inner, &clone.inner));
    }

    #[test]
    fn test_new_rejects_bad_origin() {
        let (host, _port) = MemoryHost::builder().build();
        let options = FrameOptions::new().with_trusted_origin("garbage");
        assert!(FrameBridge::new(host, options).is_err());
    }

    #[test]
    fn test_capabilities_follow_host() {
        let (host, _port) = MemoryHost::builder().unframed().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        assert!(!bridge.is_embedded_frame());
        assert!(!bridge.can_communicate());
        assert!(bridge.capabilities().messaging);

        bridge.host().set_top_location("https://parent.example/page");
        assert!(bridge.can_communicate());
    }

    #[test]
    fn test_dispatch_drops_malformed() {
        let (host, _port) = MemoryHost::builder().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        assert_eq!(bridge.dispatch("size=abc"), 0);
        assert_eq!(bridge.dispatch("size=1,2,3"), 0);
        assert_eq!(bridge.dispatch("hello"), 0);
    }

    #[test]
    fn test_upgrade_fails_after_drop() {
        let (host, _port) = MemoryHost::builder().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        let weak = bridge.downgrade();
        assert!(FrameBridge::upgrade(&weak).is_some());
        drop(bridge);
        assert!(FrameBridge::<MemoryHost>::upgrade(&weak).is_none());
    }
}
