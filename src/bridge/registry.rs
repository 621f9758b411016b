//! Pending callback table.
//!
//! Holds at most one callback per request kind. A new request of the same
//! kind overwrites the pending callback. One-shot callbacks are removed when
//! they fire; the resize callback stays until replaced.
//!
//! Callbacks run with the table unlocked, so a callback may issue a new
//! request (even of its own kind) without deadlocking.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::protocol::{Decoded, Dimensions2D, MessageKind, NamedFields};

// ============================================================================
// Types
// ============================================================================

/// A reply routed to a pending callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    /// Visible part of the frame.
    VisibleArea(Dimensions2D),
    /// Parent window metrics or scroll state.
    Metrics(NamedFields),
}

/// Stored callback. One-shot callbacks are wrapped to run at most once.
pub type PendingCallback = Box<dyn FnMut(Reply)>;

/// Request kinds a decoded reply is delivered to, in invocation order.
fn reply_routes(decoded: &Decoded) -> Option<(&'static [MessageKind], Reply)> {
    match decoded {
        Decoded::Dimensions(dims) => Some((
            &[MessageKind::FrameVisibleSizeRequest],
            Reply::VisibleArea(*dims),
        )),
        Decoded::WindowSize(fields) => Some((
            &[
                MessageKind::WindowSizeRequest,
                MessageKind::ResizeCallbackRequest,
            ],
            Reply::Metrics(*fields),
        )),
        Decoded::ScrollState(fields) => Some((
            &[MessageKind::ScrollCallbackRequest],
            Reply::Metrics(*fields),
        )),
        _ => None,
    }
}

// ============================================================================
// CallbackRegistry
// ============================================================================

/// Map of request kinds to their pending callback.
#[derive(Default)]
pub struct CallbackRegistry {
    table: Mutex<FxHashMap<MessageKind, PendingCallback>>,
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.lock();
        f.debug_struct("CallbackRegistry")
            .field("pending", &table.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `callback` under `kind`.
    ///
    /// Returns `true` if a pending callback was replaced.
    pub fn store(&self, kind: MessageKind, callback: PendingCallback) -> bool {
        self.table.lock().insert(kind, callback).is_some()
    }

    /// Returns `true` if a callback is pending for `kind`.
    #[must_use]
    pub fn is_pending(&self, kind: MessageKind) -> bool {
        self.table.lock().contains_key(&kind)
    }

    /// Returns the number of pending callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Routes a decoded message to the pending callbacks it answers.
    ///
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&self, decoded: &Decoded) -> usize {
        let Some((kinds, reply)) = reply_routes(decoded) else {
            trace!(kind = %decoded.kind(), "Message answers no request");
            return 0;
        };

        kinds
            .iter()
            .filter(|kind| self.fire(**kind, reply))
            .count()
    }

    /// Invokes the callback stored under `kind`, if any.
    fn fire(&self, kind: MessageKind, reply: Reply) -> bool {
        let Some(mut callback) = self.table.lock().remove(&kind) else {
            return false;
        };

        trace!(%kind, "Invoking pending callback");
        callback(reply);

        // A persistent callback goes back unless it was replaced meanwhile.
        if kind.is_persistent() {
            self.table.lock().entry(kind).or_insert(callback);
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
