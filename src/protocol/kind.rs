//! Message kinds and their wire metadata.
//!
//! Every protocol message belongs to exactly one [`MessageKind`]. The kind
//! decides the wire prefix, whether the peer answers, and whether the stored
//! answer callback survives its first invocation.
//!
//! | Kind | Prefix | Reply | Persistent |
//! |------|--------|-------|------------|
//! | `Size` | `size=` | - | - |
//! | `Path` | `path=` | - | - |
//! | `Scroll` | `scroll=` | - | - |
//! | `FrameVisibleSizeRequest` | `getFrameVisibleSize` | `size=T,B` | no |
//! | `WindowSizeRequest` | `getWindowSize` | `size=<record>` | no |
//! | `ResizeCallbackRequest` | `setResizeCallback` | `size=<record>` | yes |
//! | `ScrollCallbackRequest` | `setScrollCallback` | `scroll=<record>` | no |
//! | `ShowLoader` | `showLoader` | - | - |
//! | `HideLoader` | `hideLoader` | - | - |
//! | `ScrollToOffset` | `scroll=` | - | - |

use std::fmt;

// ============================================================================
// MessageKind
// ============================================================================

/// Logical type of a protocol message, independent of its encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Document size announcement (frame → parent).
    Size,
    /// Document path announcement (frame → parent).
    Path,
    /// Scroll the parent so the frame is in view (frame → parent).
    Scroll,
    /// Ask for the visible part of the frame.
    FrameVisibleSizeRequest,
    /// Ask for the parent window metrics once.
    WindowSizeRequest,
    /// Subscribe to parent window metrics on every parent resize.
    ResizeCallbackRequest,
    /// Ask for the parent scroll state.
    ScrollCallbackRequest,
    /// Show the parent's loading indicator.
    ShowLoader,
    /// Hide the parent's loading indicator.
    HideLoader,
    /// Scroll the parent to an offset within the frame.
    ScrollToOffset,
}

/// Static metadata attached to a [`MessageKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Wire prefix.
    pub prefix: &'static str,
    /// Whether the peer answers this message.
    pub expects_reply: bool,
    /// Whether the answer callback stays registered after it fires.
    pub persistent: bool,
}

impl KindInfo {
    const fn notify(prefix: &'static str) -> Self {
        Self {
            prefix,
            expects_reply: false,
            persistent: false,
        }
    }

    const fn request(prefix: &'static str, persistent: bool) -> Self {
        Self {
            prefix,
            expects_reply: true,
            persistent,
        }
    }
}

impl MessageKind {
    /// All kinds, in declaration order.
    pub const ALL: [MessageKind; 10] = [
        Self::Size,
        Self::Path,
        Self::Scroll,
        Self::FrameVisibleSizeRequest,
        Self::WindowSizeRequest,
        Self::ResizeCallbackRequest,
        Self::ScrollCallbackRequest,
        Self::ShowLoader,
        Self::HideLoader,
        Self::ScrollToOffset,
    ];

    /// Returns the metadata row for this kind.
    #[must_use]
    pub const fn info(self) -> KindInfo {
        match self {
            Self::Size => KindInfo::notify("size="),
            Self::Path => KindInfo::notify("path="),
            Self::Scroll => KindInfo::notify("scroll="),
            Self::FrameVisibleSizeRequest => KindInfo::request("getFrameVisibleSize", false),
            Self::WindowSizeRequest => KindInfo::request("getWindowSize", false),
            Self::ResizeCallbackRequest => KindInfo::request("setResizeCallback", true),
            Self::ScrollCallbackRequest => KindInfo::request("setScrollCallback", false),
            Self::ShowLoader => KindInfo::notify("showLoader"),
            Self::HideLoader => KindInfo::notify("hideLoader"),
            Self::ScrollToOffset => KindInfo::notify("scroll="),
        }
    }

    /// Returns the wire prefix.
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        self.info().prefix
    }

    /// Returns `true` if the peer answers this kind.
    #[inline]
    #[must_use]
    pub const fn expects_reply(self) -> bool {
        self.info().expects_reply
    }

    /// Returns `true` if the answer callback is kept after firing.
    #[inline]
    #[must_use]
    pub const fn is_persistent(self) -> bool {
        self.info().persistent
    }

    /// Returns `true` for bare control messages that carry no payload.
    #[inline]
    #[must_use]
    pub const fn is_bare(self) -> bool {
        !matches!(
            self,
            Self::Size | Self::Path | Self::Scroll | Self::ScrollToOffset
        )
    }

    /// Looks up a bare control message by its exact wire text.
    #[must_use]
    pub fn from_bare(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.is_bare() && kind.prefix() == raw)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches('='))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_resize_is_persistent() {
        let persistent: Vec<_> = MessageKind::ALL
            .into_iter()
            .filter(|k| k.is_persistent())
            .collect();
        assert_eq!(persistent, vec![MessageKind::ResizeCallbackRequest]);
    }

    #[test]
    fn test_reply_kinds() {
        assert!(MessageKind::FrameVisibleSizeRequest.expects_reply());
        assert!(MessageKind::WindowSizeRequest.expects_reply());
        assert!(MessageKind::ScrollCallbackRequest.expects_reply());
        assert!(!MessageKind::ShowLoader.expects_reply());
        assert!(!MessageKind::ScrollToOffset.expects_reply());
    }

    #[test]
    fn test_from_bare() {
        assert_eq!(
            MessageKind::from_bare("getWindowSize"),
            Some(MessageKind::WindowSizeRequest)
        );
        assert_eq!(
            MessageKind::from_bare("hideLoader"),
            Some(MessageKind::HideLoader)
        );
        assert_eq!(MessageKind::from_bare("size="), None);
        assert_eq!(MessageKind::from_bare("getWindowSize "), None);
    }

    #[test]
    fn test_display_strips_separator() {
        assert_eq!(MessageKind::Size.to_string(), "size");
        assert_eq!(MessageKind::ShowLoader.to_string(), "showLoader");
    }
}
