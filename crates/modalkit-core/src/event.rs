#![forbid(unsafe_code)]

//! Input descriptors handed to the gesture router, and what comes back out.
//!
//! The engine does not subscribe to anything. The host's dispatch layer
//! translates each native input into an [`InputEvent`], calls
//! [`ModalManager::handle_input`](crate::ModalManager::handle_input), and
//! applies the returned [`Disposition`] to the native event.

use bitflags::bitflags;

use crate::geometry::Point;
use crate::stack::ModalId;

bitflags! {
    /// Keyboard modifiers held during an input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

bitflags! {
    /// What the host must do with the native event after routing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Disposition: u8 {
        /// Suppress the default action (navigation, form submit, tab traversal).
        const PREVENT_DEFAULT  = 0b01;
        /// Stop the event from reaching any other handler.
        const STOP_PROPAGATION = 0b10;
    }
}

impl Disposition {
    /// Suppress default and propagation.
    pub const CONSUME: Self = Self::PREVENT_DEFAULT.union(Self::STOP_PROPAGATION);
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            _ => Self::Other,
        }
    }
}

/// Input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    PointerDown,
    Click,
    KeyDown(Key),
}

/// Dispatch phase the host delivered the input in.
///
/// Close controls and backdrop hits are only honoured in `Capture`, so they
/// win over handlers further down the tree (form validation, third-party
/// submit hooks). Triggers and keys are handled in `Bubble`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    Capture,
    #[default]
    Bubble,
}

/// One inbound gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent<N> {
    pub kind: InputKind,
    pub phase: Phase,
    /// Innermost node the input originated from.
    pub target: N,
    /// Pointer position in viewport coordinates (zero for keys).
    pub position: Point,
    pub modifiers: Modifiers,
}

impl<N> InputEvent<N> {
    /// A pointer-down delivered in the capture phase.
    pub fn pointer_down(target: N, position: Point) -> Self {
        Self {
            kind: InputKind::PointerDown,
            phase: Phase::Capture,
            target,
            position,
            modifiers: Modifiers::empty(),
        }
    }

    /// A click delivered in the bubble phase.
    pub fn click(target: N) -> Self {
        Self {
            kind: InputKind::Click,
            phase: Phase::Bubble,
            target,
            position: Point::default(),
            modifiers: Modifiers::empty(),
        }
    }

    /// A key-down delivered in the bubble phase.
    pub fn key_down(target: N, key: Key, modifiers: Modifiers) -> Self {
        Self {
            kind: InputKind::KeyDown(key),
            phase: Phase::Bubble,
            target,
            position: Point::default(),
            modifiers,
        }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Notification emitted from a modal surface after a stack transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalNotification {
    Opened(ModalId),
    Closed(ModalId),
}

impl ModalNotification {
    /// Event name a DOM host dispatches.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opened(_) => "modal:open",
            Self::Closed(_) => "modal:close",
        }
    }

    pub fn modal_id(&self) -> &ModalId {
        match self {
            Self::Opened(id) | Self::Closed(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_key_mapping() {
        assert_eq!(Key::from_dom_key("Escape"), Key::Escape);
        assert_eq!(Key::from_dom_key("Esc"), Key::Escape);
        assert_eq!(Key::from_dom_key("Tab"), Key::Tab);
        assert_eq!(Key::from_dom_key("Enter"), Key::Other);
        assert_eq!(Key::from_dom_key("tab"), Key::Other);
    }

    #[test]
    fn constructors_pick_phase() {
        assert_eq!(InputEvent::pointer_down(1u8, Point::default()).phase, Phase::Capture);
        assert_eq!(InputEvent::click(1u8).phase, Phase::Bubble);
        let key = InputEvent::key_down(1u8, Key::Tab, Modifiers::SHIFT);
        assert_eq!(key.phase, Phase::Bubble);
        assert!(key.shift());
        assert!(!InputEvent::click(1u8).shift());
    }

    #[test]
    fn consume_is_both_flags() {
        assert!(Disposition::CONSUME.contains(Disposition::PREVENT_DEFAULT));
        assert!(Disposition::CONSUME.contains(Disposition::STOP_PROPAGATION));
        assert!(Disposition::default().is_empty());
    }

    #[test]
    fn notification_names() {
        let id = ModalId::from("signup");
        assert_eq!(ModalNotification::Opened(id.clone()).name(), "modal:open");
        assert_eq!(ModalNotification::Closed(id.clone()).name(), "modal:close");
        assert_eq!(ModalNotification::Closed(id.clone()).modal_id(), &id);
    }
}
