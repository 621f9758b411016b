//! Builder pattern for bridge configuration.
//!
//! # Example
//!
//! ```ignore
//! use frame_messenger::{FrameBridge, MemoryHost};
//!
//! let (host, port) = MemoryHost::builder().build();
//! let bridge = FrameBridge::builder()
//!     .host(host)
//!     .scroll_to_frame(true)
//!     .trusted_origin(port.origin())
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::error::{Error, Result};
use crate::host::Host;

use super::core::FrameBridge;
use super::options::FrameOptions;

// ============================================================================
// FrameBridgeBuilder
// ============================================================================

/// Builder for a [`FrameBridge`].
///
/// Use [`FrameBridge::builder()`] to create one.
pub struct FrameBridgeBuilder<H> {
    /// Host environment.
    host: Option<H>,
    /// Accumulated options.
    options: FrameOptions,
}

impl<H> Default for FrameBridgeBuilder<H> {
    fn default() -> Self {
        Self {
            host: None,
            options: FrameOptions::new(),
        }
    }
}

impl<H> fmt::Debug for FrameBridgeBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBridgeBuilder")
            .field("host", &self.host.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// FrameBridgeBuilder Implementation
// ============================================================================

impl<H: Host> FrameBridgeBuilder<H> {
    /// Creates a builder with default options and no host.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host environment.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: FrameOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets whether the parent scrolls to the frame on load.
    #[inline]
    #[must_use]
    pub fn scroll_to_frame(mut self, enabled: bool) -> Self {
        self.options.scroll_to_frame_on_load = enabled;
        self
    }

    /// Sets whether the path is announced on load.
    #[inline]
    #[must_use]
    pub fn track_path(mut self, enabled: bool) -> Self {
        self.options.track_path_on_load = enabled;
        self
    }

    /// Adds a trusted parent origin.
    #[inline]
    #[must_use]
    pub fn trusted_origin(mut self, origin: impl Into<String>) -> Self {
        self.options.trusted_origins.push(origin.into());
        self
    }

    /// Builds the bridge with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no host was set
    /// - [`Error::InvalidOrigin`] if a trusted origin does not parse
    pub fn build(self) -> Result<FrameBridge<H>> {
        let host = self.host.ok_or_else(|| {
            Error::config(
                "A host is required. Use .host() to set it.\n\
                 Example: FrameBridge::builder().host(MemoryHost::builder().build().0)",
            )
        })?;
        let origins = self.options.origin_policy()?;
        Ok(FrameBridge::from_parts(host, &self.options, origins))
    }
}

// ============================================================================
// Tests
// ============================================================================
