#![forbid(unsafe_code)]

//! Visibility and accessibility transitions applied on every stack change.
//!
//! Not invoked on its own: [`ModalManager`](crate::ModalManager) calls these
//! after mutating the stack so that, in every reachable state,
//!
//! - a surface is visible iff its id is on the stack,
//! - its accessibility-hidden flag is the negation of visible,
//! - the document marker is present iff the stack is non-empty.

use crate::host::ModalHost;

/// Presentation state of one modal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Shown { z_index: i32 },
    Hidden,
}

impl SurfaceState {
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }

    /// Value for the accessibility-hidden flag.
    #[inline]
    pub fn aria_hidden(&self) -> bool {
        !self.is_visible()
    }

    pub fn z_index(&self) -> Option<i32> {
        match *self {
            Self::Shown { z_index } => Some(z_index),
            Self::Hidden => None,
        }
    }
}

pub(crate) fn reveal<H: ModalHost>(host: &mut H, surface: &H::Node, z_index: i32) {
    host.set_surface_state(surface, SurfaceState::Shown { z_index });
}

pub(crate) fn conceal<H: ModalHost>(host: &mut H, surface: &H::Node) {
    host.set_surface_state(surface, SurfaceState::Hidden);
}

pub(crate) fn sync_marker<H: ModalHost>(host: &mut H, marker: &str, any_open: bool) {
    host.set_open_marker(marker, any_open);
}
