//! Browser host over `web-sys`.
//!
//! Compiled only with the `web` feature on `wasm32` targets.
//!
//! # Example
//!
//! ```ignore
//! use frame_messenger::{FrameOptions, host::web};
//!
//! let bridge = web::install(FrameOptions::new().with_scroll_to_frame(true))?;
//! bridge.request_frame_visible_size(|area| { /* ... */ })?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use js_sys::Reflect;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use crate::bridge::{FrameBridge, FrameOptions};
use crate::error::{Error, Result};
use crate::protocol::DocumentSize;

use super::{Host, HostEvent, Listener, ListenerKind, MessageEvent, ReadyState};

// ============================================================================
// WebHost
// ============================================================================

/// The current browser window.
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
}

impl WebHost {
    /// Wraps the global window.
    ///
    /// # Errors
    ///
    /// [`Error::DocumentNotReady`] outside a window context (e.g. a worker).
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| Error::document_not_ready("no global window"))?;
        Ok(Self { window })
    }

    fn document(&self) -> Result<Document> {
        self.window
            .document()
            .ok_or_else(|| Error::document_not_ready("window has no document"))
    }

    fn has_property(&self, name: &str) -> bool {
        Reflect::has(&self.window, &JsValue::from_str(name)).unwrap_or(false)
    }
}

/// Builds a bridge over the current window and binds its listeners.
///
/// # Errors
///
/// Configuration errors from [`FrameOptions`], or
/// [`Error::DocumentNotReady`] outside a window context.
pub fn install(options: FrameOptions) -> Result<FrameBridge<WebHost>> {
    let bridge = FrameBridge::new(WebHost::new()?, options)?;
    bridge.bind();
    Ok(bridge)
}

impl Host for WebHost {
    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn top_location(&self) -> Result<String> {
        let top = self
            .window
            .top()
            .map_err(|e| Error::access_denied(describe(&e)))?
            .ok_or_else(|| Error::access_denied("no top-level window"))?;
        top.location()
            .href()
            .map_err(|e| Error::access_denied(describe(&e)))
    }

    fn has_post_message(&self) -> bool {
        self.has_property("postMessage")
    }

    fn has_message_events(&self) -> bool {
        self.has_property("onmessage")
    }

    fn supports_history(&self) -> bool {
        self.window
            .history()
            .ok()
            .and_then(|history| Reflect::get(&history, &JsValue::from_str("pushState")).ok())
            .is_some_and(|push_state| push_state.is_function())
    }

    fn ready_state(&self) -> ReadyState {
        match self.document().map(|doc| doc.ready_state()).as_deref() {
            Ok("complete") => ReadyState::Complete,
            Ok("interactive") => ReadyState::Interactive,
            _ => ReadyState::Loading,
        }
    }

    fn document_size(&self) -> Result<DocumentSize> {
        let body = self
            .document()?
            .body()
            .ok_or_else(|| Error::document_not_ready("document has no body element"))?;

        let width = body.client_width().max(body.offset_width()).max(0);
        let height = body.client_height().max(body.offset_height()).max(0);
        Ok(DocumentSize::new(height as u32, width as u32))
    }

    fn current_path(&self) -> Result<String> {
        let location = self.window.location();
        let path = location
            .pathname()
            .map_err(|e| Error::document_not_ready(describe(&e)))?;
        let query = location.search().unwrap_or_default();
        Ok(path + &query)
    }

    fn post_to_parent(&self, message: &str, target_origin: &str) -> Result<()> {
        let parent = self
            .window
            .parent()
            .map_err(|e| Error::post_message(describe(&e)))?
            .ok_or_else(|| Error::post_message("no parent window"))?;
        parent
            .post_message(&JsValue::from_str(message), target_origin)
            .map_err(|e| Error::post_message(describe(&e)))
    }

    fn add_listener(&self, kind: ListenerKind, listener: Listener) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let host_event = match kind {
                ListenerKind::Load => HostEvent::Load,
                ListenerKind::Resize => HostEvent::Resize,
                ListenerKind::Message => match to_message_event(event.as_ref()) {
                    Some(message) => HostEvent::Message(message),
                    None => return,
                },
            };
            listener(&host_event);
        });

        if let Err(e) = self
            .window
            .add_event_listener_with_callback(kind.event_name(), closure.as_ref().unchecked_ref())
        {
            warn!(event = kind.event_name(), error = %describe(&e), "Failed to add listener");
        }

        // Listeners live as long as the document.
        closure.forget();
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a DOM event into a [`MessageEvent`], following `originalEvent`.
fn to_message_event(value: &JsValue) -> Option<MessageEvent> {
    if let Ok(original) = Reflect::get(value, &JsValue::from_str("originalEvent"))
        && original.is_object()
        && let Some(inner) = to_message_event(&original)
    {
        return Some(MessageEvent::wrapped(inner));
    }

    let event = value.dyn_ref::<web_sys::MessageEvent>()?;
    let data = event.data().as_string()?;
    Some(MessageEvent::new(event.origin(), data))
}

/// Renders a thrown JS value for error messages.
fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
