#![forbid(unsafe_code)]

//! [`ModalHost`] over the live browser DOM.
//!
//! Nodes are `web_sys::Element`s; equality is JS identity. Selector queries
//! go through the browser's own `matches` / `closest`, so any CSS selector
//! the browser accepts works in [`ModalConfig`](modalkit_core::ModalConfig).
//!
//! Focus moves and `modal:open` / `modal:close` dispatches run page code
//! synchronously (focus handlers, notification listeners). They are queued
//! as [`Effect`]s instead of performed inline, so that page code never runs
//! while the engine is mid-transition. [`ModalBinding`](crate::ModalBinding)
//! applies them once its engine call has returned; a host driven directly
//! calls [`DomHost::apply_effects`].
//!
//! # Failure Modes
//!
//! DOM calls that throw (an invalid selector, `focus` on a detached node)
//! are logged at `warn` and treated as "no match" / "no effect". The engine
//! never sees a JS exception.

use std::time::Duration;

use modalkit_core::{
    DeferredFocus, ElementKind, FocusTraits, ModalHost, ModalId, ModalNotification, Rect, Selector,
    SurfaceState,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlElement};

use crate::error::{BindError, describe};

/// A DOM side effect that runs page code, held until the engine is idle.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Focus(Element),
    Notify(Element, ModalNotification),
}

impl Effect {
    /// Perform the effect against the live document.
    pub fn apply(&self) {
        match self {
            Self::Focus(node) => {
                if let Some(el) = node.dyn_ref::<HtmlElement>()
                    && let Err(err) = el.focus()
                {
                    warn_js("focus", &err);
                }
            }
            Self::Notify(node, notification) => dispatch_notification(node, notification),
        }
    }
}

/// Browser document host.
///
/// Deferred focus requests are queued rather than timed here; the owning
/// [`ModalBinding`](crate::ModalBinding) drains them into browser timers once
/// the engine call that produced them has returned.
#[derive(Debug, Clone)]
pub struct DomHost {
    document: Document,
    scheduled: Vec<(Duration, DeferredFocus)>,
    effects: Vec<Effect>,
}

impl DomHost {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            scheduled: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Host for `window.document`.
    pub fn from_window() -> Result<Self, BindError> {
        let window = web_sys::window().ok_or(BindError::NoWindow)?;
        let document = window.document().ok_or(BindError::NoDocument)?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Focus requests not yet handed to a timer.
    pub fn pending_focus(&self) -> &[(Duration, DeferredFocus)] {
        &self.scheduled
    }

    pub(crate) fn take_scheduled(&mut self) -> Vec<(Duration, DeferredFocus)> {
        std::mem::take(&mut self.scheduled)
    }

    /// Focus moves and notifications not yet performed, oldest first.
    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    pub(crate) fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Perform every queued effect in order. Returns how many ran.
    pub fn apply_effects(&mut self) -> usize {
        let effects = self.take_effects();
        effects.iter().for_each(Effect::apply);
        effects.len()
    }

    /// Whether the computed style or an `inert` ancestor keeps `node` from
    /// taking focus even though it has a layout box.
    fn suppressed(&self, node: &Element) -> bool {
        if node.closest("[inert]").ok().flatten().is_some() {
            return true;
        }
        let Some(window) = self.document.default_view() else {
            return false;
        };
        match window.get_computed_style(node) {
            Ok(Some(style)) => style
                .get_property_value("visibility")
                .is_ok_and(|v| v == "hidden" || v == "collapse"),
            Ok(None) => false,
            Err(err) => {
                warn_js("getComputedStyle", &err);
                false
            }
        }
    }

    fn style_of(node: &Element) -> Option<web_sys::CssStyleDeclaration> {
        node.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }
}

fn warn_js(what: &str, err: &JsValue) {
    tracing::warn!(error = %describe(err), "{what} failed");
}

/// Dispatch a bubbling `modal:open` / `modal:close` with `detail.modalId`.
fn dispatch_notification(node: &Element, notification: &ModalNotification) {
    let detail = js_sys::Object::new();
    if let Err(err) = js_sys::Reflect::set(
        &detail,
        &JsValue::from_str("modalId"),
        &JsValue::from_str(notification.modal_id().as_str()),
    ) {
        warn_js("notification detail", &err);
    }
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail);
    let dispatched = CustomEvent::new_with_event_init_dict(notification.name(), &init)
        .and_then(|event| node.dispatch_event(&event));
    if let Err(err) = dispatched {
        warn_js("notification dispatch", &err);
    }
}

impl ModalHost for DomHost {
    type Node = Element;

    fn resolve(&self, id: &ModalId) -> Option<Element> {
        self.document.get_element_by_id(id.as_str())
    }

    fn element_id(&self, node: &Element) -> Option<ModalId> {
        let id = node.id();
        (!id.is_empty()).then(|| ModalId::from(id))
    }

    fn matches(&self, node: &Element, selector: &Selector) -> bool {
        node.matches(selector.as_str()).unwrap_or_else(|err| {
            warn_js("matches", &err);
            false
        })
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn descendants(&self, node: &Element) -> Vec<Element> {
        let list = match node.query_selector_all("*") {
            Ok(list) => list,
            Err(err) => {
                warn_js("querySelectorAll", &err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    fn bounding_box(&self, node: &Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.width(), r.height())
    }

    fn focus_traits(&self, node: &Element) -> FocusTraits {
        // A node inside a `display: none` subtree has an empty client box.
        let rendered = !self.bounding_box(node).is_empty() && !self.suppressed(node);
        FocusTraits {
            kind: ElementKind::from_tag(&node.tag_name()),
            has_href: node.has_attribute("href"),
            tab_index: node
                .get_attribute("tabindex")
                .and_then(|v| v.trim().parse().ok()),
            disabled: node.has_attribute("disabled"),
            rendered,
        }
    }

    fn set_surface_state(&mut self, node: &Element, state: SurfaceState) {
        if let Some(style) = Self::style_of(node) {
            let applied = match state {
                SurfaceState::Shown { z_index } => style
                    .set_property("display", "block")
                    .and_then(|()| style.set_property("z-index", &z_index.to_string())),
                SurfaceState::Hidden => style
                    .set_property("display", "none")
                    .and_then(|()| style.remove_property("z-index").map(drop)),
            };
            if let Err(err) = applied {
                warn_js("surface style update", &err);
            }
        }
        let aria = if state.aria_hidden() { "true" } else { "false" };
        if let Err(err) = node.set_attribute("aria-hidden", aria) {
            warn_js("aria-hidden update", &err);
        }
    }

    fn set_open_marker(&mut self, marker: &str, present: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let classes = body.class_list();
        let result = if present {
            classes.add_1(marker)
        } else {
            classes.remove_1(marker)
        };
        if let Err(err) = result {
            warn_js("body class update", &err);
        }
    }

    fn focus(&mut self, node: &Element) {
        self.effects.push(Effect::Focus(node.clone()));
    }

    /// The most recent queued focus target, else the document's active element.
    fn focused(&self) -> Option<Element> {
        self.effects
            .iter()
            .rev()
            .find_map(|e| match e {
                Effect::Focus(node) => Some(node.clone()),
                Effect::Notify(..) => None,
            })
            .or_else(|| self.document.active_element())
    }

    fn schedule_focus(&mut self, delay: Duration, task: DeferredFocus) {
        self.scheduled.push((delay, task));
    }

    fn notify(&mut self, node: &Element, notification: &ModalNotification) {
        self.effects
            .push(Effect::Notify(node.clone(), notification.clone()));
    }

    fn nearest_ancestor_matching(&self, node: &Element, selector: &Selector) -> Option<Element> {
        node.closest(selector.as_str()).unwrap_or_else(|err| {
            warn_js("closest", &err);
            None
        })
    }
}
