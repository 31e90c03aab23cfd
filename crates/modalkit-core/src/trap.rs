#![forbid(unsafe_code)]

//! Focus-trap state machine.
//!
//! ```text
//!   Inactive ──open──▶ Trapped(top) ──top changes──▶ Trapped(top')
//!      ▲                    │
//!      └──── stack empty ───┘
//! ```
//!
//! While trapped, Tab on the last focusable element of the topmost modal
//! wraps to the first and Shift+Tab on the first wraps to the last. Any
//! other Tab proceeds natively. A topmost modal with nothing focusable
//! leaves Tab alone (Escape still works; see the router).

use crate::focusable;
use crate::host::ModalHost;
use crate::stack::ModalId;

/// Trap scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrapState {
    /// No modal open.
    #[default]
    Inactive,
    /// Focus is contained in this (topmost) modal.
    Trapped(ModalId),
}

impl TrapState {
    #[inline]
    pub fn is_trapped(&self) -> bool {
        matches!(self, Self::Trapped(_))
    }

    pub fn scope(&self) -> Option<&ModalId> {
        match self {
            Self::Trapped(id) => Some(id),
            Self::Inactive => None,
        }
    }

    /// State implied by the current topmost modal.
    pub fn for_top(top: Option<&ModalId>) -> Self {
        match top {
            Some(id) => Self::Trapped(id.clone()),
            None => Self::Inactive,
        }
    }
}

/// Holds the current [`TrapState`] and logs transitions.
#[derive(Debug, Default)]
pub(crate) struct FocusTrap {
    state: TrapState,
}

impl FocusTrap {
    pub(crate) fn state(&self) -> &TrapState {
        &self.state
    }

    /// Re-anchor to `top`. Returns true if the state changed.
    pub(crate) fn sync(&mut self, top: Option<&ModalId>) -> bool {
        let next = TrapState::for_top(top);
        if next == self.state {
            return false;
        }
        tracing::debug!(from = ?self.state, to = ?next, "focus trap re-anchored");
        self.state = next;
        true
    }
}

/// Where a Tab press on `surface` must be redirected, if anywhere.
///
/// Returns `Some(node)` only when `focused` sits on the boundary element
/// in the direction of travel.
pub fn wrap_target<H: ModalHost + ?Sized>(
    host: &H,
    surface: &H::Node,
    focused: Option<&H::Node>,
    backward: bool,
) -> Option<H::Node> {
    let focused = focused?;
    let candidates = focusable::locate(host, surface);
    let first = candidates.first()?;
    let last = candidates.last()?;
    if backward && focused == first {
        Some(last.clone())
    } else if !backward && focused == last {
        Some(first.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ElementSpec, MemoryDocument};

    #[test]
    fn state_follows_top() {
        let mut trap = FocusTrap::default();
        assert_eq!(trap.state(), &TrapState::Inactive);

        let a = ModalId::from("a");
        let b = ModalId::from("b");
        assert!(trap.sync(Some(&a)));
        assert_eq!(trap.state().scope(), Some(&a));
        assert!(!trap.sync(Some(&a)));
        assert!(trap.sync(Some(&b)));
        assert_eq!(trap.state(), &TrapState::Trapped(b));
        assert!(trap.sync(None));
        assert!(!trap.state().is_trapped());
    }

    fn three_buttons() -> (MemoryDocument, crate::testing::NodeRef, Vec<crate::testing::NodeRef>) {
        let mut doc = MemoryDocument::new();
        let surface = doc.modal_surface("m");
        let buttons = (0..3)
            .map(|_| doc.append(surface, ElementSpec::new("button")))
            .collect();
        (doc, surface, buttons)
    }

    #[test]
    fn tab_on_last_wraps_to_first() {
        let (doc, surface, b) = three_buttons();
        assert_eq!(wrap_target(&doc, &surface, Some(&b[2]), false), Some(b[0]));
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        let (doc, surface, b) = three_buttons();
        assert_eq!(wrap_target(&doc, &surface, Some(&b[0]), true), Some(b[2]));
    }

    #[test]
    fn interior_tab_is_native() {
        let (doc, surface, b) = three_buttons();
        assert_eq!(wrap_target(&doc, &surface, Some(&b[1]), false), None);
        assert_eq!(wrap_target(&doc, &surface, Some(&b[1]), true), None);
        assert_eq!(wrap_target(&doc, &surface, Some(&b[0]), false), None);
        assert_eq!(wrap_target(&doc, &surface, Some(&b[2]), true), None);
    }

    #[test]
    fn single_element_wraps_onto_itself() {
        let mut doc = MemoryDocument::new();
        let surface = doc.modal_surface("m");
        let only = doc.append(surface, ElementSpec::new("input"));
        assert_eq!(wrap_target(&doc, &surface, Some(&only), false), Some(only));
        assert_eq!(wrap_target(&doc, &surface, Some(&only), true), Some(only));
    }

    #[test]
    fn nothing_focusable_is_inert() {
        let mut doc = MemoryDocument::new();
        let surface = doc.modal_surface("m");
        let text = doc.append(surface, ElementSpec::new("p"));
        assert_eq!(wrap_target(&doc, &surface, Some(&text), false), None);
        assert_eq!(wrap_target(&doc, &surface, None, true), None);
    }
}
