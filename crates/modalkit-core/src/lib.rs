#![forbid(unsafe_code)]

//! Modal stack and focus-trap engine.
//!
//! `modalkit-core` tracks which overlay dialogs are open and in what order,
//! decides which modal an input gesture targets, keeps visibility and
//! accessibility state in step with the stack, and traps keyboard focus in
//! the topmost modal. It knows nothing about any concrete UI tree: every
//! query and mutation goes through the [`ModalHost`] capability trait.
//!
//! # Control flow
//!
//! ```text
//! host input ──▶ ModalManager::handle_input ──▶ router::route ──▶ Route
//!                         │                                         │
//!                         ◀────────── open / close / wrap ◀─────────┘
//!                         │
//!                         ├─▶ ModalStack (order, z-index, epochs)
//!                         ├─▶ visibility (surface state, document marker)
//!                         └─▶ FocusTrap (re-anchor to new topmost)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use modalkit_core::testing::{ElementSpec, MemoryDocument};
//! use modalkit_core::ModalManager;
//!
//! let mut doc = MemoryDocument::new();
//! let surface = doc.modal_surface("signup");
//! doc.append(surface, ElementSpec::new("input"));
//!
//! let mut modals = ModalManager::with_defaults(doc);
//! assert!(modals.open("signup"));
//! assert_eq!(modals.z_index("signup"), Some(1001));
//! assert!(modals.close("signup"));
//! assert!(modals.list_open().is_empty());
//! ```

pub mod config;
pub mod event;
pub mod focusable;
pub mod geometry;
pub mod host;
pub mod manager;
pub mod router;
pub mod schedule;
pub mod stack;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod trap;
pub mod visibility;

pub use config::{ConfigError, ModalConfig, ModalConfigBuilder, Selector};
pub use event::{Disposition, InputEvent, InputKind, Key, ModalNotification, Modifiers, Phase};
pub use geometry::{Point, Rect};
pub use host::{ElementKind, FocusTraits, ModalHost};
pub use manager::ModalManager;
pub use router::{CloseCause, Route};
pub use schedule::DeferredFocus;
pub use stack::{ModalId, ModalStack, StackEntry};
pub use trap::TrapState;
pub use visibility::SurfaceState;
