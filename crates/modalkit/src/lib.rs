#![forbid(unsafe_code)]

//! Stacked modal dialogs with focus trapping.
//!
//! This crate bundles the host-agnostic engine ([`engine`]) and, with the
//! `web` feature, the browser binding ([`web`]).
//!
//! | Feature        | Enables                                        |
//! |----------------|------------------------------------------------|
//! | `web`          | `modalkit::web`: `ModalBinding`, `DomHost`     |
//! | `serde`        | `Deserialize`/`Serialize` for `ModalConfig`    |
//! | `test-helpers` | `modalkit::engine::testing::MemoryDocument`    |
//!
//! Most applications only need the prelude:
//!
//! ```ignore
//! use modalkit::prelude::*;
//!
//! let modals = ModalBinding::attach(ModalConfig::default())?;
//! modals.open("settings");
//! ```

pub use modalkit_core as engine;

#[cfg(feature = "web")]
pub use modalkit_web as web;

pub use modalkit_core::{
    CloseCause, ConfigError, DeferredFocus, Disposition, FocusTraits, InputEvent, Key, ModalConfig,
    ModalConfigBuilder, ModalHost, ModalId, ModalManager, ModalNotification, Route, Selector,
    SurfaceState, TrapState,
};

/// Common imports.
pub mod prelude {
    pub use modalkit_core::{
        Disposition, InputEvent, Key, ModalConfig, ModalHost, ModalId, ModalManager,
        ModalNotification, TrapState,
    };

    #[cfg(feature = "web")]
    pub use modalkit_web::{BindError, ModalBinding};
}
