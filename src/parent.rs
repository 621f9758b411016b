//! Parent-page side of the protocol.
//!
//! [`ParentEndpoint`] decodes what a framed document posts and sends the
//! replies it asks for. Measuring the parent window and acting on the
//! events (resizing the frame, scrolling, showing a loader) is left to the
//! caller.
//!
//! # Example
//!
//! ```ignore
//! let endpoint = ParentEndpoint::new(move |data| frame.post(data));
//!
//! match endpoint.handle(&raw) {
//!     Some(FrameEvent::DocumentResized(size)) => set_frame_height(size.height),
//!     Some(FrameEvent::FrameVisibleSizeRequested) => {
//!         endpoint.reply_visible_size(metrics().visible_area())?;
//!     }
//!     _ => {}
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::Result;
use crate::protocol::{
    Decoded, Dimensions2D, DocumentPath, DocumentSize, MessageKind, NamedFields,
    OutboundMessage, Payload, decode, encode,
};

// ============================================================================
// Types
// ============================================================================

/// Delivers an encoded string into the frame.
pub type PostFn = Box<dyn Fn(&str) -> Result<()>>;

/// Something the framed document asked the parent to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// The frame document was measured (load or resize).
    DocumentResized(DocumentSize),
    /// The frame document's path changed.
    Navigated(DocumentPath),
    /// Scroll the page so the frame is in view.
    ScrollToFrame,
    /// Scroll the page to this offset below the frame top.
    ScrollToOffset(f64),
    /// Answer with [`ParentEndpoint::reply_visible_size`].
    FrameVisibleSizeRequested,
    /// Answer with [`ParentEndpoint::reply_window_size`].
    WindowSizeRequested,
    /// The frame wants [`ParentEndpoint::notify_resize`] on every resize.
    ResizeSubscribed,
    /// The frame wants the next [`ParentEndpoint::notify_scroll`].
    ScrollSubscribed,
    /// Show the loading indicator.
    ShowLoader,
    /// Hide the loading indicator.
    HideLoader,
}

#[derive(Debug, Default, Clone, Copy)]
struct Subscriptions {
    resize: bool,
    scroll: bool,
}

// ============================================================================
// ParentEndpoint
// ============================================================================

/// Parent-page peer of one frame.
pub struct ParentEndpoint {
    post: PostFn,
    subscriptions: Mutex<Subscriptions>,
}

impl fmt::Debug for ParentEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentEndpoint")
            .field("subscriptions", &*self.subscriptions.lock())
            .finish_non_exhaustive()
    }
}

impl ParentEndpoint {
    /// Creates an endpoint that sends through `post`.
    pub fn new<F>(post: F) -> Self
    where
        F: Fn(&str) -> Result<()> + 'static,
    {
        Self {
            post: Box::new(post),
            subscriptions: Mutex::new(Subscriptions::default()),
        }
    }

    /// Returns `true` while the frame is subscribed to resizes.
    #[inline]
    #[must_use]
    pub fn is_resize_subscribed(&self) -> bool {
        self.subscriptions.lock().resize
    }

    /// Returns `true` while a scroll-state reply is owed.
    #[inline]
    #[must_use]
    pub fn is_scroll_subscribed(&self) -> bool {
        self.subscriptions.lock().scroll
    }

    /// Decodes one message from the frame.
    ///
    /// Subscription requests update the endpoint state before they are
    /// returned. Malformed messages and parent → frame shapes yield `None`.
    pub fn handle(&self, raw: &str) -> Option<FrameEvent> {
        let event = match decode(raw) {
            Some(Decoded::Dimensions(dims)) => FrameEvent::DocumentResized(dims.into()),
            Some(Decoded::Path(path)) => FrameEvent::Navigated(path),
            Some(Decoded::ScrollToFrame) => FrameEvent::ScrollToFrame,
            Some(Decoded::Offset(offset)) => FrameEvent::ScrollToOffset(offset),
            Some(Decoded::Control(kind)) => self.control_event(kind)?,
            Some(other) => {
                trace!(kind = %other.kind(), "Ignored reply-shaped message");
                return None;
            }
            None => {
                trace!(raw, "Dropped malformed message");
                return None;
            }
        };
        Some(event)
    }

    fn control_event(&self, kind: MessageKind) -> Option<FrameEvent> {
        let event = match kind {
            MessageKind::FrameVisibleSizeRequest => FrameEvent::FrameVisibleSizeRequested,
            MessageKind::WindowSizeRequest => FrameEvent::WindowSizeRequested,
            MessageKind::ResizeCallbackRequest => {
                self.subscriptions.lock().resize = true;
                debug!("Frame subscribed to resizes");
                FrameEvent::ResizeSubscribed
            }
            MessageKind::ScrollCallbackRequest => {
                self.subscriptions.lock().scroll = true;
                debug!("Frame asked for scroll state");
                FrameEvent::ScrollSubscribed
            }
            MessageKind::ShowLoader => FrameEvent::ShowLoader,
            MessageKind::HideLoader => FrameEvent::HideLoader,
            MessageKind::Size
            | MessageKind::Path
            | MessageKind::Scroll
            | MessageKind::ScrollToOffset => return None,
        };
        Some(event)
    }

    /// Answers a visible-size request.
    ///
    /// # Errors
    ///
    /// Whatever the post function returns.
    pub fn reply_visible_size(&self, area: Dimensions2D) -> Result<()> {
        self.send(&OutboundMessage::new(
            MessageKind::Size,
            Payload::Dimensions(area),
        ))
    }

    /// Answers a window-size request.
    ///
    /// # Errors
    ///
    /// Whatever the post function returns.
    pub fn reply_window_size(&self, metrics: &NamedFields) -> Result<()> {
        self.send(&OutboundMessage::new(
            MessageKind::Size,
            Payload::Fields(*metrics),
        ))
    }

    /// Sends window metrics if the frame is subscribed to resizes.
    ///
    /// Returns `true` if a message was sent.
    ///
    /// # Errors
    ///
    /// Whatever the post function returns.
    pub fn notify_resize(&self, metrics: &NamedFields) -> Result<bool> {
        if !self.is_resize_subscribed() {
            return Ok(false);
        }
        self.reply_window_size(metrics)?;
        Ok(true)
    }

    /// Sends the scroll state if a reply is owed, then clears the request.
    ///
    /// Returns `true` if a message was sent.
    ///
    /// # Errors
    ///
    /// Whatever the post function returns. The request stays owed on error.
    pub fn notify_scroll(&self, metrics: &NamedFields) -> Result<bool> {
        if !self.is_scroll_subscribed() {
            return Ok(false);
        }
        self.send(&OutboundMessage::new(
            MessageKind::Scroll,
            Payload::Fields(*metrics),
        ))?;
        self.subscriptions.lock().scroll = false;
        Ok(true)
    }

    fn send(&self, message: &OutboundMessage) -> Result<()> {
        let data = encode(message);
        trace!(data = %data, "Sending to frame");
        (self.post)(&data)
    }
}

// ============================================================================
// Tests
// ============================================================================
