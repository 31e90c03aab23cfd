#![forbid(unsafe_code)]

//! Browser adapter for [`modalkit_core`].
//!
//! [`DomHost`] implements the engine's host capabilities over `web-sys`, and
//! [`ModalBinding`] attaches an engine to a document by installing
//! `mousedown` (capture), `click` and `keydown` listeners.
//!
//! ```ignore
//! use modalkit_core::ModalConfig;
//! use modalkit_web::ModalBinding;
//!
//! let modals = ModalBinding::attach(ModalConfig::default())?;
//! modals.open("signup");
//! // ...
//! modals.detach();
//! ```
//!
//! Markup is driven declaratively: any element with `data-modal="id"` opens
//! the surface `#id`; any `.modal-close` inside a `.modal-wrapper` closes the
//! surface that encloses it. Opening and closing dispatch bubbling
//! `modal:open` / `modal:close` events with `detail.modalId`.

mod binding;
mod dom;
mod error;
mod input;

pub use binding::ModalBinding;
pub use dom::{DomHost, Effect};
pub use error::BindError;
