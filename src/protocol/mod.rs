//! Wire protocol between a framed document and its parent page.
//!
//! Messages are single plain-text strings sent through the browser's
//! cross-document channel. There are no request IDs: replies are matched to
//! requests by their shape.
//!
//! # Wire Format
//!
//! | Message | Direction | Payload |
//! |---------|-----------|---------|
//! | `size=H,W` | frame → parent | document size |
//! | `size=T,B` | parent → frame | visible area of the frame |
//! | `size=k1=v1,...,k8=v8` | parent → frame | window metrics |
//! | `scroll=k1=v1,...,k8=v8` | parent → frame | scroll state |
//! | `path=<encoded>` | frame → parent | path + query |
//! | `scroll=frame` | frame → parent | scroll frame into view |
//! | `scroll=<n>` | frame → parent | scroll to offset |
//! | `getFrameVisibleSize`, `getWindowSize`, `setResizeCallback`, `setScrollCallback`, `showLoader`, `hideLoader` | frame → parent | none |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `kind` | Message kinds and per-kind metadata |
//! | `payload` | Payload structures |
//! | `codec` | String encoding and shape-based decoding |

// ============================================================================
// Submodules
// ============================================================================

/// String encoding and decoding.
pub mod codec;

/// Message kinds.
pub mod kind;

/// Payload types.
pub mod payload;

// ============================================================================
// Re-exports
// ============================================================================

pub use codec::{Decoded, SCROLL_TO_FRAME, decode, encode};
pub use kind::{KindInfo, MessageKind};
pub use payload::{Dimensions2D, DocumentPath, DocumentSize, NamedFields, OutboundMessage, Payload};
