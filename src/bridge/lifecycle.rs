//! Listener binding and the load announcement.
//!
//! The load announcement goes out exactly once per bridge, on whichever
//! comes first: the document already being complete at [`FrameBridge::bind`],
//! or the later `load` event. It carries the document size, then the path
//! (when history navigation is available and path tracking is on), then the
//! scroll-to-frame request (when enabled).

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::host::{Host, ListenerKind, ReadyState};
use crate::protocol::{DocumentPath, OutboundMessage};

use super::core::FrameBridge;
use super::options::FrameOptions;

// ============================================================================
// FrameState
// ============================================================================

/// Per-document lifecycle flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FrameState {
    /// Send `scroll=frame` with the load announcement.
    pub scroll_to_frame_on_load: bool,
    /// Send the path with the load announcement.
    pub track_path_on_load: bool,
    /// The load announcement went out.
    pub load_announced: bool,
    /// Host listeners are registered.
    pub listeners_bound: bool,
}

impl FrameState {
    pub(crate) fn from_options(options: &FrameOptions) -> Self {
        Self {
            scroll_to_frame_on_load: options.scroll_to_frame_on_load,
            track_path_on_load: options.track_path_on_load,
            ..Self::default()
        }
    }
}

// ============================================================================
// FrameBridge - Lifecycle
// ============================================================================

impl<H: Host + 'static> FrameBridge<H> {
    /// Registers the resize, message and load listeners.
    ///
    /// Announces immediately if the document is already complete. Repeat
    /// calls do nothing.
    pub fn bind(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.listeners_bound {
                trace!("Listeners already bound");
                return;
            }
            state.listeners_bound = true;
        }

        let host = self.host();

        let weak = self.downgrade();
        host.add_listener(
            ListenerKind::Resize,
            Box::new(move |_| {
                if let Some(bridge) = FrameBridge::upgrade(&weak)
                    && let Err(e) = bridge.resize_parent()
                {
                    warn!(error = %e, "Resize announcement failed");
                }
            }),
        );

        let weak = self.downgrade();
        self.inner.transport.on_message(move |raw| {
            if let Some(bridge) = FrameBridge::upgrade(&weak) {
                bridge.dispatch(raw);
            }
        });

        let weak = self.downgrade();
        host.add_listener(
            ListenerKind::Load,
            Box::new(move |_| {
                if let Some(bridge) = FrameBridge::upgrade(&weak) {
                    bridge.announce_logged();
                }
            }),
        );

        let ready_state = host.ready_state();
        debug!(?ready_state, "Listeners bound");

        if ready_state == ReadyState::Complete {
            self.announce_logged();
        }
    }
}

impl<H: Host> FrameBridge<H> {
    /// Sends the load announcement if it has not gone out yet.
    ///
    /// Does nothing while the parent is unreachable; the announcement stays
    /// armed for a later attempt.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentNotReady`](crate::Error::DocumentNotReady) if the
    /// document cannot be measured, in which case the announcement stays
    /// armed. [`Error::PostMessage`](crate::Error::PostMessage) if the host
    /// rejects a message.
    pub fn announce(&self) -> Result<()> {
        if !self.can_communicate() {
            trace!("Parent unreachable, announcement deferred");
            return Ok(());
        }

        let state = {
            let mut state = self.inner.state.lock();
            if state.load_announced {
                trace!("Load already announced");
                return Ok(());
            }
            state.load_announced = true;
            *state
        };

        if let Err(e) = self.resize_parent() {
            self.inner.state.lock().load_announced = false;
            return Err(e);
        }

        if state.track_path_on_load && self.host().supports_history() {
            self.send_path()?;
        }

        if state.scroll_to_frame_on_load {
            self.scroll_parent_to_frame()?;
        }

        debug!(
            track_path = state.track_path_on_load,
            scroll_to_frame = state.scroll_to_frame_on_load,
            "Load announced"
        );
        Ok(())
    }

    /// Sends the current document size.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentNotReady`](crate::Error::DocumentNotReady) if the
    /// document has no body to measure.
    pub fn resize_parent(&self) -> Result<()> {
        if !self.can_communicate() {
            return Ok(());
        }
        let size = self.host().document_size()?;
        self.inner.transport.send(&OutboundMessage::size(size))
    }

    /// Sends the current document path and query.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentNotReady`](crate::Error::DocumentNotReady) if the
    /// location cannot be read.
    pub fn send_path(&self) -> Result<()> {
        if !self.can_communicate() {
            return Ok(());
        }
        let path = self.host().current_path()?;
        self.inner
            .transport
            .send(&OutboundMessage::path(DocumentPath::new(path)))
    }

    /// Asks the parent to scroll the frame into view.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the message.
    pub fn scroll_parent_to_frame(&self) -> Result<()> {
        self.inner
            .transport
            .send(&OutboundMessage::scroll_to_frame())
    }

    fn announce_logged(&self) {
        if let Err(e) = self.announce() {
            warn!(error = %e, "Load announcement failed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::host::{MemoryHost, MemoryHostBuilder, ParentPort};

    fn bridge_over(
        builder: MemoryHostBuilder,
        options: FrameOptions,
    ) -> (FrameBridge<MemoryHost>, ParentPort) {
        let (host, port) = builder.build();
        let bridge = FrameBridge::new(host, options).expect("bridge");
        (bridge, port)
    }

    #[test]
    fn test_bind_on_complete_announces_synchronously() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder().path("/checkout?step=2"),
            FrameOptions::new(),
        );

        bridge.bind();
        assert_eq!(
            port.drain_data(),
            vec!["size=600,800", "path=%2Fcheckout%3Fstep%3D2"]
        );
        assert!(bridge.is_announced());

        // A later load event does not announce again.
        bridge.host().finish_loading();
        assert!(port.drain_data().is_empty());
    }

    #[test]
    fn test_bind_while_loading_announces_on_load() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder().ready_state(ReadyState::Loading),
            FrameOptions::new().with_track_path(false),
        );

        bridge.bind();
        assert!(port.drain_data().is_empty());

        assert_eq!(bridge.host().finish_loading(), 1);
        assert_eq!(port.drain_data(), vec!["size=600,800"]);

        bridge.announce().expect("announce");
        bridge.host().finish_loading();
        assert!(port.drain_data().is_empty());
    }

    #[test]
    fn test_manual_announce_before_load_wins() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder().ready_state(ReadyState::Interactive),
            FrameOptions::new().with_track_path(false),
        );

        bridge.bind();
        bridge.announce().expect("announce");
        bridge.host().finish_loading();
        assert_eq!(port.drain_data(), vec!["size=600,800"]);
    }

    #[test]
    fn test_announce_order_with_scroll() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder(),
            FrameOptions::new().with_scroll_to_frame(true),
        );

        bridge.bind();
        assert_eq!(
            port.drain_data(),
            vec!["size=600,800", "path=%2F", "scroll=frame"]
        );
    }

    #[test]
    fn test_path_skipped_without_history() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder().history(false),
            FrameOptions::new().with_scroll_to_frame(true),
        );

        bridge.bind();
        assert_eq!(port.drain_data(), vec!["size=600,800", "scroll=frame"]);
    }

    #[test]
    fn test_settings_apply_before_load() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder().ready_state(ReadyState::Loading),
            FrameOptions::new(),
        );

        bridge.bind();
        bridge.set_track_path(false);
        bridge.set_scroll_to_frame(true);
        bridge.host().finish_loading();
        assert_eq!(port.drain_data(), vec!["size=600,800", "scroll=frame"]);
    }

    #[test]
    fn test_bind_is_idempotent() {
        let (bridge, mut port) = bridge_over(MemoryHost::builder(), FrameOptions::new());

        bridge.bind();
        bridge.bind();
        assert_eq!(bridge.host().listener_count(ListenerKind::Resize), 1);
        assert_eq!(bridge.host().listener_count(ListenerKind::Message), 1);
        assert_eq!(bridge.host().listener_count(ListenerKind::Load), 1);
        assert_eq!(port.drain_data().len(), 2);
    }

    #[test]
    fn test_resize_resends_size_every_time() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder(),
            FrameOptions::new().with_track_path(false),
        );
        bridge.bind();
        port.drain();

        bridge.host().resize(700, 800);
        bridge.host().resize(720, 640);
        assert_eq!(port.drain_data(), vec!["size=700,800", "size=720,640"]);
    }

    #[test]
    fn test_unreachable_parent_sends_nothing() {
        let (bridge, mut port) = bridge_over(
            MemoryHost::builder().unframed(),
            FrameOptions::new().with_scroll_to_frame(true),
        );

        bridge.bind();
        bridge.announce().expect("announce");
        bridge.resize_parent().expect("resize");
        bridge.send_path().expect("path");
        bridge.scroll_parent_to_frame().expect("scroll");
        bridge.host().resize(1, 1);

        assert!(port.drain().is_empty());
        assert!(!bridge.is_announced());
    }

    #[test]
    fn test_missing_body_keeps_announcement_armed() {
        let (host, mut port) = MemoryHost::builder()
            .without_body()
            .ready_state(ReadyState::Loading)
            .build();
        let bridge = FrameBridge::new(host, FrameOptions::new().with_track_path(false))
            .expect("bridge");

        let err = bridge.announce().unwrap_err();
        assert!(err.is_not_ready());
        assert!(!bridge.is_announced());

        bridge.bind();
        bridge.host().resize(300, 400);
        bridge.host().finish_loading();
        assert_eq!(port.drain_data(), vec!["size=300,400", "size=300,400"]);
        assert!(bridge.is_announced());
    }

    #[test]
    fn test_clone_keeps_listeners_alive() {
        let (host, mut port) = MemoryHost::builder().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        bridge.bind();
        port.drain();

        let clone = bridge.clone();
        drop(bridge);
        clone.host().resize(10, 10);
        assert_eq!(port.drain_data(), vec!["size=10,10"]);
    }
}
