//! Bridge configuration options.
//!
//! Options can be built in code or loaded from JSON (camelCase keys, every
//! key optional).
//!
//! # Example
//!
//! ```ignore
//! use frame_messenger::FrameOptions;
//!
//! let options = FrameOptions::new()
//!     .with_scroll_to_frame(true)
//!     .with_trusted_origin("https://shop.example");
//!
//! let same = FrameOptions::from_json(
//!     r#"{"scrollToFrameOnLoad": true, "trustedOrigins": ["https://shop.example"]}"#,
//! )?;
//! assert_eq!(options, same);
//! ```

use serde::Deserialize;

use crate::error::Result;
use crate::transport::OriginPolicy;

// ============================================================================
// FrameOptions
// ============================================================================

/// Behavior switches for one framed document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameOptions {
    /// Ask the parent to scroll to the frame once the document has loaded.
    pub scroll_to_frame_on_load: bool,

    /// Announce the document path once the document has loaded.
    pub track_path_on_load: bool,

    /// Parent origins to talk to. Empty means any origin.
    pub trusted_origins: Vec<String>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl FrameOptions {
    /// Creates options with path tracking on and everything else off.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scroll_to_frame_on_load: false,
            track_path_on_load: true,
            trusted_origins: Vec::new(),
        }
    }

    /// Parses options from a JSON object.
    ///
    /// # Errors
    ///
    /// [`Error::Json`](crate::Error::Json) if the text is not a valid
    /// options object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl FrameOptions {
    /// Sets whether the parent scrolls to the frame on load.
    #[inline]
    #[must_use]
    pub fn with_scroll_to_frame(mut self, enabled: bool) -> Self {
        self.scroll_to_frame_on_load = enabled;
        self
    }

    /// Sets whether the path is announced on load.
    #[inline]
    #[must_use]
    pub fn with_track_path(mut self, enabled: bool) -> Self {
        self.track_path_on_load = enabled;
        self
    }

    /// Adds a trusted parent origin.
    #[inline]
    #[must_use]
    pub fn with_trusted_origin(mut self, origin: impl Into<String>) -> Self {
        self.trusted_origins.push(origin.into());
        self
    }

    /// Adds several trusted parent origins.
    #[inline]
    #[must_use]
    pub fn with_trusted_origins(
        mut self,
        origins: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.trusted_origins
            .extend(origins.into_iter().map(Into::into));
        self
    }
}

// ============================================================================
// Conversion Methods
// ============================================================================

impl FrameOptions {
    /// Builds the origin policy for these options.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOrigin`](crate::Error::InvalidOrigin) for an origin
    /// that does not parse.
    pub fn origin_policy(&self) -> Result<OriginPolicy> {
        if self.trusted_origins.is_empty() {
            Ok(OriginPolicy::any())
        } else {
            OriginPolicy::trusted(&self.trusted_origins)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
