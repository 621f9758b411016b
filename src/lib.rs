//! Frame Messenger - string protocol between an embedded frame and its parent.
//!
//! A document running inside a frame uses this library to tell the hosting
//! page how big it is, where it navigated, and where to scroll, and to ask
//! the page about its window and scroll state.
//!
//! # Architecture
//!
//! Two peers talk over the browser's cross-document messaging channel:
//!
//! - **Frame (this crate's [`FrameBridge`])**: announces size and path,
//!   sends requests and runs reply callbacks
//! - **Parent ([`ParentEndpoint`])**: decodes frame messages and answers
//!
//! Key design principles:
//!
//! - Every message is one plain string; replies are matched by shape
//! - At most one pending callback per request kind, the newest wins
//! - Unsupported environments degrade to silent no-ops, never errors
//! - All browser access goes through the [`Host`] trait
//!
//! # Quick Start
//!
//! ```no_run
//! use frame_messenger::{FrameBridge, MemoryHost, Result};
//!
//! fn main() -> Result<()> {
//!     let (host, port) = MemoryHost::builder().build();
//!     let bridge = FrameBridge::builder()
//!         .host(host)
//!         .scroll_to_frame(true)
//!         .build()?;
//!
//!     // Announces size, path and scroll-to-frame
//!     bridge.bind();
//!
//!     bridge.request_frame_visible_size(|area| {
//!         println!("visible rows {}..{}", area.top, area.bottom);
//!     })?;
//!
//!     port.send("size=0,450")?;
//!     bridge.host().deliver_pending();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Frame-side handle: [`FrameBridge`], options, builder |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | Browser environment seam and the in-memory host |
//! | [`parent`] | Parent-page peer: [`ParentEndpoint`] |
//! | [`protocol`] | Message kinds, payloads, string codec |
//! | [`transport`] | Gated send and origin-filtered receive |
//!
//! # Features
//!
//! - **`web`**: a `web-sys` backed host for `wasm32` targets
//!   (`host::web::install`)

// ============================================================================
// Modules
// ============================================================================

/// Frame-side messaging handle.
///
/// Use [`FrameBridge::builder()`] or [`FrameBridge::new`] to create one.
pub mod bridge;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Browser environment seam.
///
/// - [`Host`] - everything the protocol needs from the browser
/// - [`MemoryHost`] - in-process host for tests and demos
pub mod host;

/// Parent-page side of the protocol.
pub mod parent;

/// Wire protocol: kinds, payloads, codec.
pub mod protocol;

/// Cross-document transport.
///
/// Internal layer gating sends on capabilities and filtering inbound origins.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{ElementSize, FrameBridge, FrameBridgeBuilder, FrameOptions, Placement, Reply};

// Error types
pub use error::{Error, Result};

// Host types
pub use host::{Capabilities, Host, MemoryHost, ParentPort, ReadyState};

// Parent types
pub use parent::{FrameEvent, ParentEndpoint};

// Protocol types
pub use protocol::{
    Decoded, Dimensions2D, DocumentPath, DocumentSize, MessageKind, NamedFields, OutboundMessage,
};

// Transport types
pub use transport::OriginPolicy;
