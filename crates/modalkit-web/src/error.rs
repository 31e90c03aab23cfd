#![forbid(unsafe_code)]

//! Errors raised while binding the engine to a browser document.

use modalkit_core::ConfigError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure to attach a [`crate::ModalBinding`].
///
/// Once attached, nothing the binding does can fail; these only surface
/// from [`crate::ModalBinding::attach`] and
/// [`crate::ModalBinding::attach_to`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No global `window` (not running in a browser main thread).
    #[error("no global window is available")]
    NoWindow,
    /// The window has no document.
    #[error("window has no document")]
    NoDocument,
    /// The document rejected an `addEventListener` call.
    #[error("failed to register `{event}` listener: {message}")]
    Listener {
        event: &'static str,
        message: String,
    },
    /// The supplied configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BindError {
    pub(crate) fn listener(event: &'static str, err: &JsValue) -> Self {
        Self::Listener {
            event,
            message: describe(err),
        }
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}
