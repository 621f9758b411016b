//! String codec for protocol messages.
//!
//! Every message is one plain-text string: a kind prefix followed by an
//! optional payload. Several kinds share the `size=` and `scroll=` prefixes
//! and are told apart by payload shape only, so decoding tries the patterns
//! in a fixed priority order:
//!
//! 1. `size=A,B` (two integers)
//! 2. `size=<record>` / `scroll=<record>` (exactly 8 `key=value` pairs)
//! 3. `scroll=frame`, `scroll=<number>`, `path=<encoded>`
//! 4. bare control messages (`getWindowSize`, `showLoader`, ...)
//!
//! Decoding is total: anything else is "no match" and is dropped by the
//! caller.

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use super::{
    Dimensions2D, DocumentPath, DocumentSize, MessageKind, NamedFields, OutboundMessage, Payload,
};

// ============================================================================
// Patterns
// ============================================================================

/// Payload of `scroll=` asking the parent to bring the frame into view.
pub const SCROLL_TO_FRAME: &str = "frame";

static DIMENSIONS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^size=([0-9]+),([0-9]+)$").expect("dimensions pattern is valid")
});

static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(size|scroll)=((?:[A-Za-z]+=-?[0-9]+(?:\.[0-9]+)?,){7}[A-Za-z]+=-?[0-9]+(?:\.[0-9]+)?)$",
    )
    .expect("record pattern is valid")
});

static OFFSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^scroll=(-?[0-9]+(?:\.[0-9]+)?)$").expect("offset pattern is valid")
});

// ============================================================================
// Decoded
// ============================================================================

/// A successfully decoded inbound string.
///
/// Variants are payload shapes; the same shape can mean different things
/// depending on which peer receives it (a frame reads `size=A,B` as its
/// visible area, a parent reads it as the frame's document size).
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// `size=A,B`.
    Dimensions(Dimensions2D),
    /// `size=<record>`: window-size and resize replies.
    WindowSize(NamedFields),
    /// `scroll=<record>`: scroll-state replies.
    ScrollState(NamedFields),
    /// `scroll=frame`.
    ScrollToFrame,
    /// `scroll=<number>`.
    Offset(f64),
    /// `path=<encoded>`.
    Path(DocumentPath),
    /// A bare control message.
    Control(MessageKind),
}

impl Decoded {
    /// Returns the wire kind the string was encoded as.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Dimensions(_) | Self::WindowSize(_) => MessageKind::Size,
            Self::ScrollState(_) | Self::ScrollToFrame => MessageKind::Scroll,
            Self::Offset(_) => MessageKind::ScrollToOffset,
            Self::Path(_) => MessageKind::Path,
            Self::Control(kind) => *kind,
        }
    }

    /// Reads a two-number message as a document size.
    #[must_use]
    pub fn as_document_size(&self) -> Option<DocumentSize> {
        match self {
            Self::Dimensions(dims) => Some(DocumentSize::from(*dims)),
            _ => None,
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes a message into its wire string.
///
/// Bare control kinds ignore any payload.
#[must_use]
pub fn encode(message: &OutboundMessage) -> String {
    let mut out = String::from(message.kind.prefix());
    if message.kind.is_bare() {
        return out;
    }

    match &message.payload {
        Payload::Unit => {}
        Payload::Dimensions(dims) => {
            let _ = write!(out, "{},{}", dims.top, dims.bottom);
        }
        Payload::DocumentSize(size) => {
            let _ = write!(out, "{},{}", size.height, size.width);
        }
        Payload::Path(path) => out.push_str(&urlencoding::encode(path.as_str())),
        Payload::Fields(fields) => write_fields(&mut out, fields),
        Payload::Offset(offset) => out.push_str(&format_number(*offset)),
        Payload::Frame => out.push_str(SCROLL_TO_FRAME),
    }
    out
}

/// Formats a number as plain decimal text.
///
/// Non-finite values have no wire form and are written as `0`.
fn format_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    }
}

fn write_fields(out: &mut String, fields: &NamedFields) {
    for (index, (key, value)) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(&format_number(value));
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a raw inbound string.
///
/// Returns `None` for anything that is not a well-formed protocol message.
#[must_use]
pub fn decode(raw: &str) -> Option<Decoded> {
    if let Some(caps) = DIMENSIONS_PATTERN.captures(raw) {
        let top = caps[1].parse().ok()?;
        let bottom = caps[2].parse().ok()?;
        return Some(Decoded::Dimensions(Dimensions2D::new(top, bottom)));
    }

    if let Some(caps) = RECORD_PATTERN.captures(raw) {
        let fields = parse_fields(&caps[2])?;
        return Some(match &caps[1] {
            "size" => Decoded::WindowSize(fields),
            _ => Decoded::ScrollState(fields),
        });
    }

    if let Some(rest) = raw.strip_prefix(MessageKind::Scroll.prefix()) {
        if rest == SCROLL_TO_FRAME {
            return Some(Decoded::ScrollToFrame);
        }
        if let Some(caps) = OFFSET_PATTERN.captures(raw) {
            return caps[1].parse().ok().map(Decoded::Offset);
        }
        return None;
    }

    if let Some(rest) = raw.strip_prefix(MessageKind::Path.prefix()) {
        let path = urlencoding::decode(rest).ok()?;
        return Some(Decoded::Path(DocumentPath::new(path.into_owned())));
    }

    MessageKind::from_bare(raw).map(Decoded::Control)
}

/// Parses the body of a record message.
///
/// Every known key must appear exactly once; order is free.
fn parse_fields(body: &str) -> Option<NamedFields> {
    let mut fields = NamedFields::default();
    let mut seen = 0u8;

    for pair in body.split(',') {
        let (key, value) = pair.split_once('=')?;
        let index = NamedFields::KEYS.iter().position(|k| *k == key)?;
        let bit = 1u8 << index;
        if seen & bit != 0 {
            return None;
        }
        seen |= bit;
        *fields.slot_mut(key)? = value.parse().ok()?;
    }

    (seen == u8::MAX).then_some(fields)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RECORD: &str = "windowWidth=1280,windowHeight=800,scrollTop=640.5,scrollLeft=0,\
                          frameTop=-12,frameLeft=24,frameWidth=960,frameHeight=2400";

    fn sample_fields() -> NamedFields {
        NamedFields {
            window_width: 1280.0,
            window_height: 800.0,
            scroll_top: 640.5,
            scroll_left: 0.0,
            frame_top: -12.0,
            frame_left: 24.0,
            frame_width: 960.0,
            frame_height: 2400.0,
        }
    }

    #[test]
    fn test_two_numbers_decode_as_dimensions() {
        assert_eq!(
            decode("size=120,340"),
            Some(Decoded::Dimensions(Dimensions2D::new(120, 340)))
        );
    }

    #[test]
    fn test_record_decodes_as_window_size() {
        let raw = format!("size={RECORD}");
        assert_eq!(decode(&raw), Some(Decoded::WindowSize(sample_fields())));
    }

    #[test]
    fn test_scroll_record_decodes_as_scroll_state() {
        let raw = format!("scroll={RECORD}");
        assert_eq!(decode(&raw), Some(Decoded::ScrollState(sample_fields())));
    }

    #[test]
    fn test_record_keys_in_any_order() {
        let raw = "size=frameHeight=2400,windowWidth=1280,windowHeight=800,scrollTop=640.5,\
                   scrollLeft=0,frameTop=-12,frameLeft=24,frameWidth=960";
        assert_eq!(decode(raw), Some(Decoded::WindowSize(sample_fields())));
    }

    #[test]
    fn test_malformed_size_is_no_match() {
        assert_eq!(decode("size=abc"), None);
        assert_eq!(decode("size=1,2,3"), None);
        assert_eq!(decode("size="), None);
        assert_eq!(decode("size=-1,2"), None);
        assert_eq!(decode("size=99999999999,2"), None);
    }

    #[test]
    fn test_record_arity_is_exact() {
        let seven = "size=windowWidth=1,windowHeight=2,scrollTop=3,scrollLeft=4,\
                     frameTop=5,frameLeft=6,frameWidth=7";
        let nine = format!("size={RECORD},extra=9");
        assert_eq!(decode(seven), None);
        assert_eq!(decode(&nine), None);
    }

    #[test]
    fn test_record_rejects_unknown_and_duplicate_keys() {
        let unknown = RECORD.replace("frameHeight", "frameDepth");
        let duplicate = RECORD.replace("frameHeight", "frameWidth");
        assert_eq!(decode(&format!("size={unknown}")), None);
        assert_eq!(decode(&format!("size={duplicate}")), None);
    }

    #[test]
    fn test_scroll_variants() {
        assert_eq!(decode("scroll=frame"), Some(Decoded::ScrollToFrame));
        assert_eq!(decode("scroll=250"), Some(Decoded::Offset(250.0)));
        assert_eq!(decode("scroll=-4.5"), Some(Decoded::Offset(-4.5)));
        assert_eq!(decode("scroll=1,2"), None);
        assert_eq!(decode("scroll=top"), None);
    }

    #[test]
    fn test_path_is_percent_decoded() {
        assert_eq!(
            decode("path=%2Foffers%3Fpage%3D2"),
            Some(Decoded::Path(DocumentPath::new("/offers?page=2")))
        );
        assert_eq!(decode("path=%FF"), None);
    }

    #[test]
    fn test_control_messages() {
        assert_eq!(
            decode("getFrameVisibleSize"),
            Some(Decoded::Control(MessageKind::FrameVisibleSizeRequest))
        );
        assert_eq!(
            decode("setScrollCallback"),
            Some(Decoded::Control(MessageKind::ScrollCallbackRequest))
        );
        assert_eq!(decode("showLoader!"), None);
        assert_eq!(decode(""), None);
    }

    #[test]
    fn test_encode_shapes() {
        assert_eq!(
            encode(&OutboundMessage::size(DocumentSize::new(480, 640))),
            "size=480,640"
        );
        assert_eq!(encode(&OutboundMessage::scroll_to_frame()), "scroll=frame");
        assert_eq!(encode(&OutboundMessage::scroll_to_offset(120.0)), "scroll=120");
        assert_eq!(
            encode(&OutboundMessage::control(MessageKind::ShowLoader)),
            "showLoader"
        );
        assert_eq!(
            encode(&OutboundMessage::path(DocumentPath::new("/a b?x=1"))),
            "path=%2Fa%20b%3Fx%3D1"
        );
    }

    #[test]
    fn test_encode_record_in_wire_order() {
        let msg = OutboundMessage::new(MessageKind::Size, Payload::Fields(sample_fields()));
        assert_eq!(encode(&msg), format!("size={RECORD}"));
    }

    #[test]
    fn test_encode_non_finite_as_zero() {
        assert_eq!(
            encode(&OutboundMessage::scroll_to_offset(f64::NAN)),
            "scroll=0"
        );
    }

    #[test]
    fn test_bare_kind_ignores_payload() {
        let msg = OutboundMessage::new(MessageKind::HideLoader, Payload::Offset(3.0));
        assert_eq!(encode(&msg), "hideLoader");
    }

    #[test]
    fn test_decoded_kind() {
        assert_eq!(decode("size=1,2").map(|d| d.kind()), Some(MessageKind::Size));
        assert_eq!(
            decode("scroll=7").map(|d| d.kind()),
            Some(MessageKind::ScrollToOffset)
        );
    }

    proptest! {
        #[test]
        fn prop_size_round_trip(height in any::<u32>(), width in any::<u32>()) {
            let size = DocumentSize::new(height, width);
            let decoded = decode(&encode(&OutboundMessage::size(size)));
            prop_assert_eq!(decoded.and_then(|d| d.as_document_size()), Some(size));
        }

        #[test]
        fn prop_decode_never_panics(raw in ".*") {
            let _ = decode(&raw);
        }
    }
}
