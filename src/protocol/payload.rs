//! Payload types carried by protocol messages.

use serde::{Deserialize, Serialize};

use super::MessageKind;

// ============================================================================
// Dimensions2D
// ============================================================================

/// Visible-area bounds of the frame, in frame coordinates.
///
/// Sent by the parent as `size=TOP,BOTTOM` in reply to `getFrameVisibleSize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions2D {
    /// First visible row.
    pub top: u32,
    /// Last visible row.
    pub bottom: u32,
}

impl Dimensions2D {
    /// Creates visible-area bounds.
    #[inline]
    #[must_use]
    pub const fn new(top: u32, bottom: u32) -> Self {
        Self { top, bottom }
    }

    /// Returns the visible height, zero when the bounds are inverted.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

// ============================================================================
// DocumentSize
// ============================================================================

/// Size of the framed document, announced as `size=HEIGHT,WIDTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSize {
    /// Document height in pixels.
    pub height: u32,
    /// Document width in pixels.
    pub width: u32,
}

impl DocumentSize {
    /// Creates a document size.
    #[inline]
    #[must_use]
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

/// The parent reads the same two-number shape as a document size.
impl From<Dimensions2D> for DocumentSize {
    fn from(dims: Dimensions2D) -> Self {
        Self::new(dims.top, dims.bottom)
    }
}

impl From<DocumentSize> for Dimensions2D {
    fn from(size: DocumentSize) -> Self {
        Self::new(size.height, size.width)
    }
}

// ============================================================================
// DocumentPath
// ============================================================================

/// Path and query of the framed document, e.g. `/offers?page=2`.
///
/// Stored decoded; percent-encoded only on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentPath {
    /// Path plus query string.
    pub path: String,
}

impl DocumentPath {
    /// Creates a document path.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

// ============================================================================
// NamedFields
// ============================================================================

/// Parent window metrics, the 8-field record used for window-size,
/// resize and scroll-state replies.
///
/// The wire order is [`NamedFields::KEYS`] and is part of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedFields {
    /// Parent viewport width.
    pub window_width: f64,
    /// Parent viewport height.
    pub window_height: f64,
    /// Parent vertical scroll offset.
    pub scroll_top: f64,
    /// Parent horizontal scroll offset.
    pub scroll_left: f64,
    /// Frame top edge in parent document coordinates.
    pub frame_top: f64,
    /// Frame left edge in parent document coordinates.
    pub frame_left: f64,
    /// Frame element width.
    pub frame_width: f64,
    /// Frame element height.
    pub frame_height: f64,
}

impl NamedFields {
    /// Field names in wire order.
    pub const KEYS: [&'static str; 8] = [
        "windowWidth",
        "windowHeight",
        "scrollTop",
        "scrollLeft",
        "frameTop",
        "frameLeft",
        "frameWidth",
        "frameHeight",
    ];

    /// Returns the value of a field by wire name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            "windowWidth" => self.window_width,
            "windowHeight" => self.window_height,
            "scrollTop" => self.scroll_top,
            "scrollLeft" => self.scroll_left,
            "frameTop" => self.frame_top,
            "frameLeft" => self.frame_left,
            "frameWidth" => self.frame_width,
            "frameHeight" => self.frame_height,
            _ => return None,
        };
        Some(value)
    }

    /// Returns a mutable slot for a field by wire name.
    pub(crate) fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
        let slot = match key {
            "windowWidth" => &mut self.window_width,
            "windowHeight" => &mut self.window_height,
            "scrollTop" => &mut self.scroll_top,
            "scrollLeft" => &mut self.scroll_left,
            "frameTop" => &mut self.frame_top,
            "frameLeft" => &mut self.frame_left,
            "frameWidth" => &mut self.frame_width,
            "frameHeight" => &mut self.frame_height,
            _ => return None,
        };
        Some(slot)
    }

    /// Iterates `(name, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::KEYS
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    /// Returns the frame's visible vertical span in frame coordinates.
    ///
    /// Useful when a window-size reply should drive the same layout logic
    /// as a visible-size reply.
    #[must_use]
    pub fn visible_area(&self) -> Dimensions2D {
        let top = (self.scroll_top - self.frame_top).max(0.0);
        let bottom = (self.scroll_top + self.window_height - self.frame_top)
            .min(self.frame_height)
            .max(top);
        Dimensions2D::new(top as u32, bottom as u32)
    }
}

// ============================================================================
// Payload / OutboundMessage
// ============================================================================

/// Payload attached to an outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload (control messages).
    Unit,
    /// Two-number visible-area bounds.
    Dimensions(Dimensions2D),
    /// Two-number document size.
    DocumentSize(DocumentSize),
    /// Document path.
    Path(DocumentPath),
    /// 8-field window metrics record.
    Fields(NamedFields),
    /// Single numeric offset.
    Offset(f64),
    /// Scroll the parent to the frame itself.
    Frame,
}

/// A `(kind, payload)` pair ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Message kind.
    pub kind: MessageKind,
    /// Message payload.
    pub payload: Payload,
}

impl OutboundMessage {
    /// Creates a message from its parts.
    #[inline]
    #[must_use]
    pub fn new(kind: MessageKind, payload: Payload) -> Self {
        Self { kind, payload }
    }

    /// Creates a bare control message.
    #[inline]
    #[must_use]
    pub fn control(kind: MessageKind) -> Self {
        Self::new(kind, Payload::Unit)
    }

    /// Document size announcement.
    #[inline]
    #[must_use]
    pub fn size(size: DocumentSize) -> Self {
        Self::new(MessageKind::Size, Payload::DocumentSize(size))
    }

    /// Document path announcement.
    #[inline]
    #[must_use]
    pub fn path(path: DocumentPath) -> Self {
        Self::new(MessageKind::Path, Payload::Path(path))
    }

    /// Scroll-into-view request.
    #[inline]
    #[must_use]
    pub fn scroll_to_frame() -> Self {
        Self::new(MessageKind::Scroll, Payload::Frame)
    }

    /// Scroll-to-offset request.
    #[inline]
    #[must_use]
    pub fn scroll_to_offset(offset: f64) -> Self {
        Self::new(MessageKind::ScrollToOffset, Payload::Offset(offset))
    }
}

// ============================================================================
// Tests
// ============================================================================
