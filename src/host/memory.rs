//! In-memory host.
//!
//! [`MemoryHost`] plays the framed document; the paired [`ParentPort`] plays
//! the parent page. Frame → parent messages land in an unbounded tokio
//! channel the port reads from; parent → frame messages go through a second
//! channel and are fed to the host's `message` listeners either
//! synchronously ([`MemoryHost::deliver_pending`]) or by an async loop
//! ([`MemoryHost::run`]).
//!
//! # Example
//!
//! ```ignore
//! let (host, mut port) = MemoryHost::builder().build();
//! let bridge = FrameBridge::builder().host(host).build()?;
//! bridge.bind();
//!
//! assert_eq!(port.try_recv().map(|m| m.data), Some("size=600,800".into()));
//! port.send("size=0,450")?;
//! bridge.host().deliver_pending();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::rc::Rc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::DocumentSize;

use super::{Host, HostEvent, Listener, ListenerKind, MessageEvent, ReadyState};

// ============================================================================
// Constants
// ============================================================================

/// Default location of the framed document.
pub const DEFAULT_FRAME_LOCATION: &str = "https://frame.example/";

/// Default origin of the parent page.
pub const DEFAULT_PARENT_ORIGIN: &str = "https://parent.example";

// ============================================================================
// Types
// ============================================================================

/// A message the frame posted to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    /// Encoded protocol string.
    pub data: String,
    /// Target origin passed to the send primitive.
    pub target_origin: String,
}

/// What reading the top-level location yields.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TopLocation {
    /// Same as the document's own location (not framed).
    Same,
    /// Readable and different (same-origin frame).
    Other(String),
    /// Cross-origin parent.
    Denied,
}

type SharedListener = Rc<dyn Fn(&HostEvent)>;

// ============================================================================
// MemoryHostBuilder
// ============================================================================

/// Builder for a [`MemoryHost`] and its [`ParentPort`].
#[derive(Debug, Clone)]
pub struct MemoryHostBuilder {
    location: String,
    top: TopLocation,
    parent_origin: String,
    messaging: bool,
    history: bool,
    ready_state: ReadyState,
    document_size: Option<DocumentSize>,
    path: String,
}

impl Default for MemoryHostBuilder {
    fn default() -> Self {
        Self {
            location: DEFAULT_FRAME_LOCATION.to_string(),
            top: TopLocation::Denied,
            parent_origin: DEFAULT_PARENT_ORIGIN.to_string(),
            messaging: true,
            history: true,
            ready_state: ReadyState::Complete,
            document_size: Some(DocumentSize::new(600, 800)),
            path: "/".to_string(),
        }
    }
}

impl MemoryHostBuilder {
    /// Sets the document's own location.
    #[must_use]
    pub fn location(mut self, href: impl Into<String>) -> Self {
        self.location = href.into();
        self
    }

    /// Makes the top-level location readable and set to `href`.
    #[must_use]
    pub fn top_location(mut self, href: impl Into<String>) -> Self {
        self.top = TopLocation::Other(href.into());
        self
    }

    /// Makes reading the top-level location fail (cross-origin parent).
    #[must_use]
    pub fn top_denied(mut self) -> Self {
        self.top = TopLocation::Denied;
        self
    }

    /// Makes the document its own top-level context.
    #[must_use]
    pub fn unframed(mut self) -> Self {
        self.top = TopLocation::Same;
        self
    }

    /// Sets the origin stamped on parent → frame messages.
    #[must_use]
    pub fn parent_origin(mut self, origin: impl Into<String>) -> Self {
        self.parent_origin = origin.into();
        self
    }

    /// Toggles cross-document messaging support.
    #[must_use]
    pub fn messaging(mut self, supported: bool) -> Self {
        self.messaging = supported;
        self
    }

    /// Toggles history navigation support.
    #[must_use]
    pub fn history(mut self, supported: bool) -> Self {
        self.history = supported;
        self
    }

    /// Sets the initial ready state.
    #[must_use]
    pub fn ready_state(mut self, state: ReadyState) -> Self {
        self.ready_state = state;
        self
    }

    /// Sets the measured document size.
    #[must_use]
    pub fn document_size(mut self, height: u32, width: u32) -> Self {
        self.document_size = Some(DocumentSize::new(height, width));
        self
    }

    /// Removes the body, so measuring fails.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.document_size = None;
        self
    }

    /// Sets the document path plus query.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Builds the host and the parent side of its channel.
    #[must_use]
    pub fn build(self) -> (MemoryHost, ParentPort) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let host = MemoryHost {
            location: self.location,
            top: Mutex::new(self.top),
            messaging: self.messaging,
            history: self.history,
            ready_state: Mutex::new(self.ready_state),
            document_size: Mutex::new(self.document_size),
            path: Mutex::new(self.path),
            outbound: outbound_tx,
            inbound: Mutex::new(Some(inbound_rx)),
            listeners: Mutex::new(Vec::new()),
        };

        let port = ParentPort {
            origin: self.parent_origin,
            inbound: inbound_tx,
            outbound: outbound_rx,
        };

        (host, port)
    }
}

// ============================================================================
// MemoryHost
// ============================================================================

/// Framed document living in memory.
pub struct MemoryHost {
    location: String,
    top: Mutex<TopLocation>,
    messaging: bool,
    history: bool,
    ready_state: Mutex<ReadyState>,
    document_size: Mutex<Option<DocumentSize>>,
    path: Mutex<String>,
    outbound: UnboundedSender<PostedMessage>,
    inbound: Mutex<Option<UnboundedReceiver<MessageEvent>>>,
    listeners: Mutex<Vec<(ListenerKind, SharedListener)>>,
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("location", &self.location)
            .field("ready_state", &*self.ready_state.lock())
            .field("listeners", &self.listeners.lock().len())
            .finish_non_exhaustive()
    }
}

impl MemoryHost {
    /// Returns a builder with a cross-origin framed, complete document.
    #[inline]
    #[must_use]
    pub fn builder() -> MemoryHostBuilder {
        MemoryHostBuilder::default()
    }

    /// Fires an event at every listener of its kind.
    ///
    /// Returns the number of listeners invoked.
    pub fn fire(&self, event: &HostEvent) -> usize {
        let kind = event.listener_kind();
        let matching: Vec<SharedListener> = self
            .listeners
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    /// Marks the document complete and fires `load`.
    pub fn finish_loading(&self) -> usize {
        *self.ready_state.lock() = ReadyState::Complete;
        self.fire(&HostEvent::Load)
    }

    /// Changes the measured size and fires `resize`.
    pub fn resize(&self, height: u32, width: u32) -> usize {
        *self.document_size.lock() = Some(DocumentSize::new(height, width));
        self.fire(&HostEvent::Resize)
    }

    /// Changes the document path.
    pub fn navigate(&self, path: impl Into<String>) {
        *self.path.lock() = path.into();
    }

    /// Makes the top-level location readable and set to `href`.
    pub fn set_top_location(&self, href: impl Into<String>) {
        *self.top.lock() = TopLocation::Other(href.into());
    }

    /// Returns the number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Delivers every queued parent → frame message.
    ///
    /// Returns the number of messages delivered.
    pub fn deliver_pending(&self) -> usize {
        let mut events = Vec::new();
        if let Some(rx) = self.inbound.lock().as_mut() {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }

        let count = events.len();
        for event in events {
            self.fire(&HostEvent::Message(event));
        }
        count
    }

    /// Delivers parent → frame messages until the port is dropped.
    ///
    /// Returns the number of messages delivered. Returns immediately with 0
    /// if another loop already owns the inbound channel.
    pub async fn run(&self) -> usize {
        let Some(mut rx) = self.inbound.lock().take() else {
            debug!("Inbound channel already taken");
            return 0;
        };

        let mut count = 0;
        while let Some(event) = rx.recv().await {
            self.fire(&HostEvent::Message(event));
            count += 1;
        }

        debug!(count, "Parent port closed");
        count
    }
}

impl Host for MemoryHost {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn top_location(&self) -> Result<String> {
        match &*self.top.lock() {
            TopLocation::Same => Ok(self.location.clone()),
            TopLocation::Other(href) => Ok(href.clone()),
            TopLocation::Denied => Err(Error::access_denied(
                "top-level browsing context is cross-origin",
            )),
        }
    }

    fn has_post_message(&self) -> bool {
        self.messaging
    }

    fn has_message_events(&self) -> bool {
        self.messaging
    }

    fn supports_history(&self) -> bool {
        self.history
    }

    fn ready_state(&self) -> ReadyState {
        *self.ready_state.lock()
    }

    fn document_size(&self) -> Result<DocumentSize> {
        self.document_size
            .lock()
            .ok_or_else(|| Error::document_not_ready("document has no body element"))
    }

    fn current_path(&self) -> Result<String> {
        Ok(self.path.lock().clone())
    }

    fn post_to_parent(&self, message: &str, target_origin: &str) -> Result<()> {
        trace!(message, target_origin, "Posting to parent");
        self.outbound
            .send(PostedMessage {
                data: message.to_string(),
                target_origin: target_origin.to_string(),
            })
            .map_err(|_| Error::post_message("parent port closed"))
    }

    fn add_listener(&self, kind: ListenerKind, listener: Listener) {
        self.listeners.lock().push((kind, Rc::from(listener)));
    }
}

// ============================================================================
// ParentPort
// ============================================================================

/// Parent side of a [`MemoryHost`] channel.
#[derive(Debug)]
pub struct ParentPort {
    origin: String,
    inbound: UnboundedSender<MessageEvent>,
    outbound: UnboundedReceiver<PostedMessage>,
}

impl ParentPort {
    /// Returns the origin stamped on messages sent to the frame.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Sends a protocol string to the frame.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`] if the host was dropped.
    pub fn send(&self, data: impl Into<String>) -> Result<()> {
        self.send_event(MessageEvent::new(self.origin.clone(), data))
    }

    /// Sends a fully specified event to the frame.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`] if the host was dropped.
    pub fn send_event(&self, event: MessageEvent) -> Result<()> {
        self.inbound
            .send(event)
            .map_err(|_| Error::post_message("frame host closed"))
    }

    /// Returns a cloneable sender stamping this port's origin.
    #[must_use]
    pub fn sender(&self) -> FrameSender {
        FrameSender {
            origin: self.origin.clone(),
            inbound: self.inbound.clone(),
        }
    }

    /// Takes the next message the frame posted, if any.
    pub fn try_recv(&mut self) -> Option<PostedMessage> {
        self.outbound.try_recv().ok()
    }

    /// Takes every message the frame posted so far.
    pub fn drain(&mut self) -> Vec<PostedMessage> {
        let mut messages = Vec::new();
        while let Some(message) = self.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Takes every posted payload so far, dropping the target origins.
    pub fn drain_data(&mut self) -> Vec<String> {
        self.drain().into_iter().map(|m| m.data).collect()
    }

    /// Waits for the next message the frame posts.
    ///
    /// Returns `None` once the host is dropped.
    pub async fn recv(&mut self) -> Option<PostedMessage> {
        self.outbound.recv().await
    }
}

/// Cloneable parent → frame sender.
#[derive(Debug, Clone)]
pub struct FrameSender {
    origin: String,
    inbound: UnboundedSender<MessageEvent>,
}

impl FrameSender {
    /// Sends a protocol string to the frame.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`] if the host was dropped.
    pub fn send(&self, data: &str) -> Result<()> {
        self.inbound
            .send(MessageEvent::new(self.origin.clone(), data))
            .map_err(|_| Error::post_message("frame host closed"))
    }
}

// ============================================================================
// Tests
// ============================================================================
