//! Trusted origin policy.
//!
//! With no trusted origins configured, outbound messages target `*` and
//! every inbound origin is accepted. Once origins are configured, the first
//! one becomes the outbound target and inbound messages from any other
//! origin are dropped.

use url::{Origin, Url};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Target origin meaning "any".
pub const ANY_ORIGIN: &str = "*";

// ============================================================================
// OriginPolicy
// ============================================================================

/// Which peer origins the transport talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    trusted: Vec<Origin>,
}

impl OriginPolicy {
    /// Accepts every origin and targets `*`.
    #[inline]
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts the transport to the given origins.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOrigin`] for strings that are not URLs or that have
    /// an opaque origin (`data:`, `file:` and friends).
    pub fn trusted<I, S>(origins: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trusted = origins
            .into_iter()
            .map(|origin| parse_origin(origin.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { trusted })
    }

    /// Returns `true` if no origin restriction is configured.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.trusted.is_empty()
    }

    /// Returns the target origin for outbound messages.
    #[must_use]
    pub fn target_origin(&self) -> String {
        self.trusted
            .first()
            .map_or_else(|| ANY_ORIGIN.to_string(), Origin::ascii_serialization)
    }

    /// Returns `true` if a message from `origin` may be processed.
    #[must_use]
    pub fn accepts(&self, origin: &str) -> bool {
        if self.is_open() {
            return true;
        }
        Url::parse(origin)
            .map(|url| url.origin())
            .is_ok_and(|origin| origin.is_tuple() && self.trusted.contains(&origin))
    }
}

fn parse_origin(raw: &str) -> Result<Origin> {
    let origin = Url::parse(raw)
        .map_err(|_| Error::invalid_origin(raw))?
        .origin();
    if origin.is_tuple() {
        Ok(origin)
    } else {
        Err(Error::invalid_origin(raw))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_policy() {
        let policy = OriginPolicy::any();
        assert!(policy.is_open());
        assert_eq!(policy.target_origin(), "*");
        assert!(policy.accepts("https://anyone.example"));
        assert!(policy.accepts("null"));
    }

    #[test]
    fn test_trusted_policy_targets_first_origin() {
        let policy = OriginPolicy::trusted(["https://shop.example/landing", "https://cdn.example"])
            .expect("valid origins");
        assert_eq!(policy.target_origin(), "https://shop.example");
    }

    #[test]
    fn test_trusted_policy_filters_inbound() {
        let policy = OriginPolicy::trusted(["https://shop.example"]).expect("valid origins");
        assert!(policy.accepts("https://shop.example"));
        assert!(policy.accepts("https://shop.example:443"));
        assert!(!policy.accepts("http://shop.example"));
        assert!(!policy.accepts("https://evil.example"));
        assert!(!policy.accepts("null"));
        assert!(!policy.accepts(""));
    }

    #[test]
    fn test_rejects_opaque_and_garbage_origins() {
        assert!(matches!(
            OriginPolicy::trusted(["data:text/html,hi"]),
            Err(Error::InvalidOrigin { .. })
        ));
        assert!(matches!(
            OriginPolicy::trusted(["not an origin"]),
            Err(Error::InvalidOrigin { .. })
        ));
    }
}
