#![forbid(unsafe_code)]

//! Gesture router: classifies one input against the stack and configuration.
//!
//! [`route`] only reads; the caller applies the resulting [`Route`]. Channels,
//! in the order they are tried:
//!
//! 1. **Close control** (pointer-down, capture): the input is inside an
//!    element matching `close_button_selector`. The modal closed is the
//!    nearest enclosing surface of the control, not the topmost one.
//! 2. **Backdrop** (pointer-down, capture): the input hit the surface node
//!    itself and the pointer is outside every child's bounding box.
//! 3. **Trigger** (click, bubble): the input is inside an element carrying
//!    `modal_trigger_attribute`; its value names the modal to open.
//! 4. **Keyboard** (key-down, bubble): Escape closes the topmost modal, Tab
//!    and Shift+Tab wrap at the edges of its focusable set.
//!
//! Anything else is [`Route::Pass`].
//!
//! # Backdrop geometry
//!
//! A point counts as inside a child when it lies within the child's
//! bounding box, edges included. Only immediate children are tested, with
//! boxes exactly as the host reports them. Overlapping or scrolled content
//! is not corrected for: a descendant that overflows its parent's box is
//! outside unless an immediate child covers the point.

use crate::config::ModalConfig;
use crate::event::{Disposition, InputEvent, InputKind, Key, Phase};
use crate::host::ModalHost;
use crate::stack::{ModalId, ModalStack};
use crate::trap;

/// Why a modal is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCause {
    CloseControl,
    Backdrop,
    Escape,
}

/// Routing decision for one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Route<N> {
    Open(ModalId),
    Close { modal: ModalId, cause: CloseCause },
    /// Move focus here instead of the native tab traversal.
    Wrap(N),
    Pass,
}

impl<N> Route<N> {
    /// Effect on the native event.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Open(_) => Disposition::PREVENT_DEFAULT,
            Self::Close {
                cause: CloseCause::CloseControl | CloseCause::Backdrop,
                ..
            } => Disposition::CONSUME,
            Self::Close {
                cause: CloseCause::Escape,
                ..
            } => Disposition::PREVENT_DEFAULT,
            Self::Wrap(_) => Disposition::PREVENT_DEFAULT,
            Self::Pass => Disposition::empty(),
        }
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Classify `input`.
pub fn route<H: ModalHost + ?Sized>(
    host: &H,
    stack: &ModalStack,
    config: &ModalConfig,
    input: &InputEvent<H::Node>,
) -> Route<H::Node> {
    let decided = match (input.kind, input.phase) {
        (InputKind::PointerDown, Phase::Capture) => close_control(host, stack, config, input)
            .or_else(|| backdrop(host, stack, config, input)),
        (InputKind::Click, Phase::Bubble) => trigger(host, config, input),
        (InputKind::KeyDown(key), Phase::Bubble) => keyboard(host, stack, config, input, key),
        _ => None,
    };
    decided.unwrap_or(Route::Pass)
}

fn close_control<H: ModalHost + ?Sized>(
    host: &H,
    stack: &ModalStack,
    config: &ModalConfig,
    input: &InputEvent<H::Node>,
) -> Option<Route<H::Node>> {
    host.nearest_ancestor_matching(&input.target, config.close_button_selector())?;
    let surface = host.nearest_ancestor_matching(&input.target, config.modal_selector())?;
    let modal = host.element_id(&surface)?;
    stack.contains(modal.as_str()).then_some(Route::Close {
        modal,
        cause: CloseCause::CloseControl,
    })
}

fn backdrop<H: ModalHost + ?Sized>(
    host: &H,
    stack: &ModalStack,
    config: &ModalConfig,
    input: &InputEvent<H::Node>,
) -> Option<Route<H::Node>> {
    if !config.close_on_outside_click() {
        return None;
    }
    let surface = &input.target;
    if !host.matches(surface, config.modal_selector()) {
        return None;
    }
    let modal = host.element_id(surface)?;
    if !stack.contains(modal.as_str()) {
        return None;
    }
    let on_content = host
        .children(surface)
        .iter()
        .any(|child| host.bounding_box(child).contains(input.position));
    (!on_content).then_some(Route::Close {
        modal,
        cause: CloseCause::Backdrop,
    })
}

fn trigger<H: ModalHost + ?Sized>(
    host: &H,
    config: &ModalConfig,
    input: &InputEvent<H::Node>,
) -> Option<Route<H::Node>> {
    let (_, value) =
        host.nearest_ancestor_with_attribute(&input.target, config.modal_trigger_attribute())?;
    Some(Route::Open(ModalId::from(value)))
}

fn keyboard<H: ModalHost + ?Sized>(
    host: &H,
    stack: &ModalStack,
    config: &ModalConfig,
    input: &InputEvent<H::Node>,
    key: Key,
) -> Option<Route<H::Node>> {
    let top = stack.active_id()?;
    match key {
        Key::Escape if config.close_on_escape() => Some(Route::Close {
            modal: top.clone(),
            cause: CloseCause::Escape,
        }),
        Key::Tab => {
            let surface = host.resolve(top)?;
            let focused = host.focused();
            trap::wrap_target(host, &surface, focused.as_ref(), input.shift()).map(Route::Wrap)
        }
        _ => None,
    }
}
