//! Frame-side messaging handle.
//!
//! A [`FrameBridge`] ties a host, the transport and the callback registry
//! together for one framed document.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Bridge struct, accessors, inbound dispatch |
//! | `lifecycle` | Listener binding, load announcement, size and path |
//! | `requests` | Requests with reply callbacks, loader and scroll notifications |
//! | `registry` | Pending callback table |
//! | `layout` | Element centering |
//! | `options` | Serializable options |
//! | `builder` | Validating builder |
//!
//! # Example
//!
//! ```ignore
//! let (host, mut port) = MemoryHost::builder().build();
//! let bridge = FrameBridge::new(host, FrameOptions::new())?;
//! bridge.bind();
//!
//! bridge.request_frame_visible_size(|area| println!("visible: {area:?}"))?;
//! port.send("size=0,450")?;
//! bridge.host().deliver_pending();
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod builder;
mod core;
mod layout;
mod lifecycle;
mod options;
mod registry;
mod requests;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::FrameBridgeBuilder;
pub use core::FrameBridge;
pub use layout::{ElementSize, Placement};
pub use options::FrameOptions;
pub use registry::{CallbackRegistry, PendingCallback, Reply};
