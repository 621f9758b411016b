//! Centering an element inside the visible part of the frame.
//!
//! The bridge only computes the placement; applying it (absolute
//! positioning, CSS) is left to the caller.

use crate::error::Result;
use crate::host::Host;
use crate::protocol::Dimensions2D;

use super::core::FrameBridge;

// ============================================================================
// Types
// ============================================================================

/// Rendered size of an element, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementSize {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl ElementSize {
    /// Creates an element size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Absolute position of an element within the frame document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    /// Offset from the document top.
    pub top: f64,
    /// Offset from the document left.
    pub left: f64,
}

impl Placement {
    /// Centers `element` horizontally in the window and vertically in the
    /// visible span.
    #[must_use]
    pub fn center(element: ElementSize, window_width: f64, visible: Dimensions2D) -> Self {
        let top = f64::from(visible.top);
        let bottom = f64::from(visible.bottom);
        Self {
            top: top + (bottom - top - element.height) / 2.0,
            left: (window_width - element.width) / 2.0,
        }
    }
}

// ============================================================================
// FrameBridge - Layout
// ============================================================================

impl<H: Host> FrameBridge<H> {
    /// Asks for the visible span and reports where `element` should go.
    ///
    /// `on_placed` runs once when the parent answers.
    ///
    /// # Errors
    ///
    /// [`Error::PostMessage`](crate::Error::PostMessage) if the host rejects
    /// the request.
    pub fn center_element<F>(
        &self,
        element: ElementSize,
        window_width: f64,
        on_placed: F,
    ) -> Result<()>
    where
        F: FnOnce(Placement) + 'static,
    {
        self.request_frame_visible_size(move |visible| {
            on_placed(Placement::center(element, window_width, visible));
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use crate::bridge::FrameOptions;
    use crate::host::MemoryHost;

    #[test]
    fn test_center_math() {
        let placement = Placement::center(
            ElementSize::new(200.0, 100.0),
            1000.0,
            Dimensions2D::new(300, 700),
        );
        assert_eq!(placement, Placement { top: 450.0, left: 400.0 });
    }

    #[test]
    fn test_oversized_element_goes_negative() {
        let placement = Placement::center(
            ElementSize::new(1200.0, 500.0),
            1000.0,
            Dimensions2D::new(0, 300),
        );
        assert_eq!(placement.left, -100.0);
        assert_eq!(placement.top, -100.0);
    }

    #[test]
    fn test_center_element_waits_for_reply() {
        let (host, mut port) = MemoryHost::builder().build();
        let bridge = FrameBridge::new(host, FrameOptions::new()).expect("bridge");
        bridge.bind();
        port.drain();

        let placed = Rc::new(Cell::new(None));
        let sink = Rc::clone(&placed);
        bridge
            .center_element(ElementSize::new(100.0, 50.0), 800.0, move |p| {
                sink.set(Some(p));
            })
            .expect("request");
        assert_eq!(port.drain_data(), vec!["getFrameVisibleSize"]);
        assert_eq!(placed.get(), None);

        port.send("size=100,300").expect("send");
        bridge.host().deliver_pending();
        assert_eq!(placed.get(), Some(Placement { top: 175.0, left: 350.0 }));
    }
}
