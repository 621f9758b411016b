//! Requests to the parent and fire-and-forget notifications.
//!
//! Requests store their callback first and then send, so a reply that
//! arrives synchronously still finds it. A second request of the same kind
//! before the reply replaces the first callback.

use tracing::{debug, trace};

use crate::error::Result;
use crate::host::Host;
use crate::protocol::{Dimensions2D, MessageKind, NamedFields, OutboundMessage};

use super::core::FrameBridge;
use super::registry::{PendingCallback, Reply};

// ============================================================================
// FrameBridge - Requests
// ============================================================================

impl<H: Host> FrameBridge<H> {
    /// Asks for the part of the frame visible in the parent viewport.
    ///
    /// `callback` runs once with the reply.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the request.
    pub fn request_frame_visible_size<F>(&self, callback: F) -> Result<()>
    where
        F: FnOnce(Dimensions2D) + 'static,
    {
        let mut callback = Some(callback);
        self.request(
            MessageKind::FrameVisibleSizeRequest,
            Box::new(move |reply| {
                if let Reply::VisibleArea(area) = reply
                    && let Some(callback) = callback.take()
                {
                    callback(area);
                }
            }),
        )
    }

    /// Asks for the parent window metrics.
    ///
    /// `callback` runs once with the reply.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the request.
    pub fn request_window_size<F>(&self, callback: F) -> Result<()>
    where
        F: FnOnce(NamedFields) + 'static,
    {
        self.request(MessageKind::WindowSizeRequest, once_metrics(callback))
    }

    /// Subscribes to parent window metrics.
    ///
    /// `callback` runs on every window-size message until another resize
    /// callback replaces it.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the request.
    pub fn request_resize_callback<F>(&self, mut callback: F) -> Result<()>
    where
        F: FnMut(NamedFields) + 'static,
    {
        self.request(
            MessageKind::ResizeCallbackRequest,
            Box::new(move |reply| {
                if let Reply::Metrics(fields) = reply {
                    callback(fields);
                }
            }),
        )
    }

    /// Asks for the parent scroll state.
    ///
    /// `callback` runs once, on the next scroll-state message.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the request.
    pub fn request_scroll_callback<F>(&self, callback: F) -> Result<()>
    where
        F: FnOnce(NamedFields) + 'static,
    {
        self.request(MessageKind::ScrollCallbackRequest, once_metrics(callback))
    }

    fn request(&self, kind: MessageKind, callback: PendingCallback) -> Result<()> {
        if !self.is_embedded_frame() {
            trace!(%kind, "Not framed, request skipped");
            return Ok(());
        }

        if self.inner.registry.store(kind, callback) {
            debug!(%kind, "Replaced pending callback");
        }
        self.inner.transport.send(&OutboundMessage::control(kind))
    }
}

// ============================================================================
// FrameBridge - Notifications
// ============================================================================

impl<H: Host> FrameBridge<H> {
    /// Shows the parent's loading indicator.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the message.
    pub fn show_loader(&self) -> Result<()> {
        self.inner
            .transport
            .send(&OutboundMessage::control(MessageKind::ShowLoader))
    }

    /// Hides the parent's loading indicator.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the message.
    pub fn hide_loader(&self) -> Result<()> {
        self.inner
            .transport
            .send(&OutboundMessage::control(MessageKind::HideLoader))
    }

    /// Scrolls the parent to `offset` pixels below the top of the frame.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the message.
    pub fn scroll_to_offset(&self, offset: f64) -> Result<()> {
        self.inner
            .transport
            .send(&OutboundMessage::scroll_to_offset(offset))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn once_metrics<F>(callback: F) -> PendingCallback
where
    F: FnOnce(NamedFields) + 'static,
{
    let mut callback = Some(callback);
    Box::new(move |reply| {
        if let Reply::Metrics(fields) = reply
            && let Some(callback) = callback.take()
        {
            callback(fields);
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::bridge::FrameOptions;
    use crate::host::{MemoryHost, ParentPort, ReadyState};

    const WINDOW: &str = "size=windowWidth=1280,windowHeight=720,scrollTop=0,scrollLeft=0,\
                          frameTop=100,frameLeft=0,frameWidth=800,frameHeight=1500";

    fn bound_bridge() -> (FrameBridge<MemoryHost>, ParentPort) {
        let (host, mut port) = MemoryHost::builder()
            .ready_state(ReadyState::Loading)
            .build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        bridge.bind();
        assert!(port.drain().is_empty());
        (bridge, port)
    }

    fn deliver(bridge: &FrameBridge<MemoryHost>, port: &ParentPort, raw: &str) -> usize {
        port.send(raw).expect("send");
        bridge.host().deliver_pending()
    }

    #[test]
    fn test_visible_size_round_trip() {
        let (bridge, mut port) = bound_bridge();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        bridge
            .request_frame_visible_size(move |area| sink.borrow_mut().push(area))
            .expect("request");
        assert_eq!(port.drain_data(), vec!["getFrameVisibleSize"]);
        assert_eq!(bridge.pending_count(), 1);

        deliver(&bridge, &port, "size=0,450");
        deliver(&bridge, &port, "size=0,999");
        assert_eq!(*seen.borrow(), vec![Dimensions2D::new(0, 450)]);
        assert_eq!(bridge.pending_count(), 0);
    }

    #[test]
    fn test_second_request_replaces_first() {
        let (bridge, port) = bound_bridge();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        bridge
            .request_frame_visible_size(move |_| first.borrow_mut().push("first"))
            .expect("request");
        let second = Rc::clone(&seen);
        bridge
            .request_frame_visible_size(move |_| second.borrow_mut().push("second"))
            .expect("request");

        deliver(&bridge, &port, "size=10,20");
        assert_eq!(*seen.borrow(), vec!["second"]);
    }

    #[test]
    fn test_resize_callback_fires_repeatedly() {
        let (bridge, mut port) = bound_bridge();
        let widths = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&widths);

        bridge
            .request_resize_callback(move |fields| sink.borrow_mut().push(fields.window_width))
            .expect("request");
        assert_eq!(port.drain_data(), vec!["setResizeCallback"]);

        deliver(&bridge, &port, WINDOW);
        deliver(&bridge, &port, &WINDOW.replace("1280", "1024"));
        assert_eq!(*widths.borrow(), vec![1280.0, 1024.0]);
        assert!(bridge.is_pending(MessageKind::ResizeCallbackRequest));
    }

    #[test]
    fn test_window_size_is_one_shot() {
        let (bridge, port) = bound_bridge();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);

        bridge
            .request_window_size(move |fields| {
                assert_eq!(fields.frame_height, 1500.0);
                *counter.borrow_mut() += 1;
            })
            .expect("request");

        deliver(&bridge, &port, WINDOW);
        deliver(&bridge, &port, WINDOW);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_scroll_callback_is_one_shot() {
        let (bridge, port) = bound_bridge();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        bridge
            .request_scroll_callback(move |fields| sink.borrow_mut().push(fields.scroll_top))
            .expect("request");

        let scroll = WINDOW
            .replacen("size=", "scroll=", 1)
            .replace("scrollTop=0", "scrollTop=250");
        deliver(&bridge, &port, &scroll);
        deliver(&bridge, &port, &scroll);
        assert_eq!(*seen.borrow(), vec![250.0]);
    }

    #[test]
    fn test_callback_can_issue_new_request() {
        let (bridge, mut port) = bound_bridge();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let again = bridge.clone();
        let sink = Rc::clone(&seen);
        bridge
            .request_frame_visible_size(move |area| {
                sink.borrow_mut().push(area.bottom);
                let sink = Rc::clone(&sink);
                again
                    .request_frame_visible_size(move |area| sink.borrow_mut().push(area.bottom))
                    .expect("nested request");
            })
            .expect("request");

        deliver(&bridge, &port, "size=0,100");
        deliver(&bridge, &port, "size=0,200");
        assert_eq!(*seen.borrow(), vec![100, 200]);
        assert_eq!(
            port.drain_data(),
            vec!["getFrameVisibleSize", "getFrameVisibleSize"]
        );
    }

    #[test]
    fn test_requests_skipped_when_unframed() {
        let (host, mut port) = MemoryHost::builder().unframed().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");

        bridge.request_frame_visible_size(|_| {}).expect("request");
        bridge.request_window_size(|_| {}).expect("request");
        bridge.request_resize_callback(|_| {}).expect("request");
        bridge.request_scroll_callback(|_| {}).expect("request");
        bridge.show_loader().expect("show");
        bridge.hide_loader().expect("hide");
        bridge.scroll_to_offset(42.0).expect("scroll");

        assert_eq!(bridge.pending_count(), 0);
        assert!(port.drain().is_empty());
    }

    #[test]
    fn test_notifications() {
        let (bridge, mut port) = bound_bridge();
        bridge.show_loader().expect("show");
        bridge.scroll_to_offset(120.5).expect("scroll");
        bridge.hide_loader().expect("hide");

        assert_eq!(
            port.drain_data(),
            vec!["showLoader", "scroll=120.5", "hideLoader"]
        );
        assert_eq!(bridge.pending_count(), 0);
    }

    #[test]
    fn test_untrusted_reply_is_ignored() {
        let (host, port) = MemoryHost::builder()
            .parent_origin("https://evil.example")
            .build();
        let bridge = FrameBridge::new(
            host,
            FrameOptions::new().with_trusted_origin("https://shop.example"),
        )
        .expect("bridge");
        bridge.bind();

        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        bridge
            .request_frame_visible_size(move |_| *counter.borrow_mut() += 1)
            .expect("request");

        deliver(&bridge, &port, "size=0,10");
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(bridge.pending_count(), 1);
    }
}
