#![forbid(unsafe_code)]

//! Browser events to engine inputs, and dispositions back onto the event.

use modalkit_core::{Disposition, InputEvent, Key, Modifiers, Phase, Point};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent, MouseEvent};

/// A document listener the binding installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Listener {
    PointerDown,
    Click,
    KeyDown,
}

impl Listener {
    pub(crate) const ALL: [Self; 3] = [Self::PointerDown, Self::Click, Self::KeyDown];

    pub(crate) fn event_type(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }

    /// `useCapture` for `addEventListener`.
    pub(crate) fn capture(self) -> bool {
        matches!(self.phase(), Phase::Capture)
    }

    fn phase(self) -> Phase {
        match self {
            Self::PointerDown => Phase::Capture,
            Self::Click | Self::KeyDown => Phase::Bubble,
        }
    }

    /// Translate `event` as received by this listener.
    ///
    /// `None` when the target is not an element (e.g. the document itself).
    pub(crate) fn translate(self, event: &Event) -> Option<InputEvent<Element>> {
        let target = event.target()?.dyn_into::<Element>().ok()?;
        let input = match self {
            Self::PointerDown => {
                let mouse = event.dyn_ref::<MouseEvent>()?;
                InputEvent::pointer_down(target, client_point(mouse))
                    .with_modifiers(mouse_modifiers(mouse))
            }
            Self::Click => {
                let input = InputEvent::click(target);
                match event.dyn_ref::<MouseEvent>() {
                    Some(mouse) => input
                        .with_position(client_point(mouse))
                        .with_modifiers(mouse_modifiers(mouse)),
                    None => input,
                }
            }
            Self::KeyDown => {
                let key = event.dyn_ref::<KeyboardEvent>()?;
                InputEvent::key_down(target, Key::from_dom_key(&key.key()), key_modifiers(key))
            }
        };
        Some(input.with_phase(self.phase()))
    }
}

fn client_point(mouse: &MouseEvent) -> Point {
    Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
}

fn pack(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    let mut m = Modifiers::empty();
    m.set(Modifiers::SHIFT, shift);
    m.set(Modifiers::CTRL, ctrl);
    m.set(Modifiers::ALT, alt);
    m.set(Modifiers::META, meta);
    m
}

fn mouse_modifiers(e: &MouseEvent) -> Modifiers {
    pack(e.shift_key(), e.ctrl_key(), e.alt_key(), e.meta_key())
}

fn key_modifiers(e: &KeyboardEvent) -> Modifiers {
    pack(e.shift_key(), e.ctrl_key(), e.alt_key(), e.meta_key())
}

/// Apply the engine's verdict to the live event.
pub(crate) fn apply(event: &Event, disposition: Disposition) {
    if disposition.contains(Disposition::PREVENT_DEFAULT) {
        event.prevent_default();
    }
    if disposition.contains(Disposition::STOP_PROPAGATION) {
        event.stop_propagation();
    }
}
