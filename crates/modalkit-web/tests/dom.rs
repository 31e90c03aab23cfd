//! Browser tests: `wasm-pack test --headless --firefox crates/modalkit-web`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use modalkit_core::{ModalConfig, ModalId, TrapState};
use modalkit_web::ModalBinding;
use pretty_assertions::assert_eq;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_test::*;
use web_sys::{
    CustomEvent, Document, Element, HtmlElement, KeyboardEvent, KeyboardEventInit, MouseEvent,
    MouseEventInit,
};

wasm_bindgen_test_configure!(run_in_browser);

struct Fixture {
    document: Document,
    root: Element,
    binding: Option<Rc<ModalBinding>>,
}

impl Fixture {
    /// One opener and one dialog `{id}` with buttons `{id}-first` and
    /// `{id}-close`. The content box sits well away from the top-left corner.
    fn new(id: &str) -> Self {
        Self::with_extra(id, "")
    }

    /// As [`Fixture::new`], with `extra` markup after the close button.
    fn with_extra(id: &str, extra: &str) -> Self {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(&format!(
            r#"<button id="{id}-opener" data-modal="{id}">Open</button>
            <div id="{id}" class="modal-wrapper"
                 style="display:none;position:fixed;left:0;top:0;width:100%;height:100%">
              <div class="modal-content" style="margin:120px auto 0;width:300px;height:160px">
                <button id="{id}-first">First</button>
                <button id="{id}-close" class="modal-close">Close</button>
                {extra}
              </div>
            </div>"#
        ));
        document.body().unwrap().append_child(&root).unwrap();
        let binding = ModalBinding::attach_to(document.clone(), ModalConfig::default()).unwrap();
        Self {
            document,
            root,
            binding: Some(Rc::new(binding)),
        }
    }

    fn binding(&self) -> &ModalBinding {
        self.binding.as_deref().unwrap()
    }

    fn detach(&mut self) {
        let binding = self.binding.take().unwrap();
        Rc::try_unwrap(binding).unwrap().detach();
    }

    fn el(&self, id: &str) -> HtmlElement {
        self.document
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }

    fn display(&self, id: &str) -> String {
        self.el(id).style().get_property_value("display").unwrap()
    }

    fn body_marked(&self) -> bool {
        self.document
            .body()
            .unwrap()
            .class_list()
            .contains("modal-open")
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.binding.take();
        self.root.remove();
    }
}

/// Dispatch a cancelable, bubbling mouse event; returns false if prevented.
fn mouse(target: &Element, kind: &str, x: i32, y: i32) -> bool {
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_client_x(x);
    init.set_client_y(y);
    let event = MouseEvent::new_with_mouse_event_init_dict(kind, &init).unwrap();
    target.dispatch_event(&event).unwrap()
}

fn key(target: &Element, name: &str, shift: bool) -> bool {
    let init = KeyboardEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_key(name);
    init.set_shift_key(shift);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    target.dispatch_event(&event).unwrap()
}

#[wasm_bindgen_test]
fn trigger_click_opens_dialog() {
    let f = Fixture::new("t1");
    let not_prevented = mouse(&f.el("t1-opener"), "click", 10, 10);

    assert!(!not_prevented);
    assert!(f.binding().is_open("t1"));
    assert_eq!(f.display("t1"), "block");
    assert_eq!(f.el("t1").get_attribute("aria-hidden").as_deref(), Some("false"));
    assert_eq!(f.el("t1").style().get_property_value("z-index").unwrap(), "1001");
    assert!(f.body_marked());
    assert_eq!(f.binding().trap_state(), TrapState::Trapped("t1".into()));
}

#[wasm_bindgen_test]
fn close_control_hides_and_restores_focus() {
    let f = Fixture::new("t2");
    let opener = f.el("t2-opener");
    opener.focus().unwrap();
    f.binding().open("t2");

    // A bubble-phase handler on the control itself must never see the press.
    let reached = Rc::new(RefCell::new(false));
    let on_button = {
        let reached = Rc::clone(&reached);
        Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            *reached.borrow_mut() = true;
        })
    };
    let close = f.el("t2-close");
    close
        .add_event_listener_with_callback("mousedown", on_button.as_ref().unchecked_ref())
        .unwrap();

    let not_prevented = mouse(&close, "mousedown", 0, 0);

    close
        .remove_event_listener_with_callback("mousedown", on_button.as_ref().unchecked_ref())
        .unwrap();
    assert!(!not_prevented);
    assert!(!*reached.borrow());
    assert!(!f.binding().is_open("t2"));
    assert_eq!(f.display("t2"), "none");
    assert_eq!(f.el("t2").get_attribute("aria-hidden").as_deref(), Some("true"));
    assert!(!f.body_marked());
    let active = f.document.active_element().unwrap();
    assert_eq!(active.id(), "t2-opener");
}

#[wasm_bindgen_test]
fn backdrop_mousedown_closes_but_content_does_not() {
    let f = Fixture::new("t3");
    f.binding().open("t3");
    let surface: Element = f.el("t3").into();

    let content = f.el("t3-first").parent_element().unwrap();
    let r = content.get_bounding_client_rect();
    let (cx, cy) = ((r.x() + 5.0) as i32, (r.y() + 5.0) as i32);
    mouse(&surface, "mousedown", cx, cy);
    assert!(f.binding().is_open("t3"));

    assert!(!mouse(&surface, "mousedown", 2, 2));
    assert!(!f.binding().is_open("t3"));
}

#[wasm_bindgen_test]
fn escape_and_tab_wrap() {
    let f = Fixture::new("t4");
    f.binding().open("t4");
    let first: Element = f.el("t4-first").into();
    let last = f.el("t4-close");

    last.focus().unwrap();
    assert!(!key(&last, "Tab", false));
    assert_eq!(f.document.active_element(), Some(first.clone()));

    assert!(!key(&first, "Tab", true));
    assert_eq!(f.document.active_element().unwrap().id(), "t4-close");

    assert!(!key(&first, "Escape", false));
    assert!(!f.binding().is_open("t4"));
}

#[wasm_bindgen_test]
fn notifications_carry_modal_id() {
    let f = Fixture::new("t5");
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let record = {
        let seen = Rc::clone(&seen);
        Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let event = event.dyn_into::<CustomEvent>().unwrap();
            let id = js_sys::Reflect::get(&event.detail(), &"modalId".into())
                .unwrap()
                .as_string()
                .unwrap();
            seen.borrow_mut().push(format!("{}:{id}", event.type_()));
        })
    };
    for name in ["modal:open", "modal:close"] {
        f.document
            .add_event_listener_with_callback(name, record.as_ref().unchecked_ref())
            .unwrap();
    }

    f.binding().open("t5");
    f.binding().close("t5");

    for name in ["modal:open", "modal:close"] {
        f.document
            .remove_event_listener_with_callback(name, record.as_ref().unchecked_ref())
            .unwrap();
    }
    assert_eq!(
        *seen.borrow(),
        vec!["modal:open:t5".to_string(), "modal:close:t5".to_string()]
    );
}

#[wasm_bindgen_test]
fn detach_closes_and_unlistens() {
    let mut f = Fixture::new("t6");
    f.binding().open("t6");
    f.detach();

    assert_eq!(f.display("t6"), "none");
    assert!(!f.body_marked());
    assert!(mouse(&f.el("t6-opener"), "click", 0, 0));
    assert_eq!(f.display("t6"), "none");
}

#[wasm_bindgen_test]
fn reattach_after_detach() {
    let mut f = Fixture::new("t7");
    f.detach();
    let config = ModalConfig::builder().base_z_index(50).build().unwrap();
    f.binding = Some(Rc::new(
        ModalBinding::attach_to(f.document.clone(), config).unwrap(),
    ));

    mouse(&f.el("t7-opener"), "click", 0, 0);
    assert_eq!(f.binding().list_open(), vec![ModalId::from("t7")]);
    assert_eq!(f.binding().z_index("t7"), Some(51));
}

#[wasm_bindgen_test]
fn notification_listeners_see_settled_state() {
    let f = Fixture::new("t8");
    let weak = Rc::downgrade(f.binding.as_ref().unwrap());
    let seen = Rc::new(RefCell::new(Vec::<(String, bool, Vec<ModalId>)>::new()));
    let record = {
        let seen = Rc::clone(&seen);
        Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let binding = weak.upgrade().unwrap();
            seen.borrow_mut()
                .push((event.type_(), binding.is_open("t8"), binding.list_open()));
        })
    };
    for name in ["modal:open", "modal:close"] {
        f.document
            .add_event_listener_with_callback(name, record.as_ref().unchecked_ref())
            .unwrap();
    }

    f.binding().open("t8");
    assert_eq!(f.binding().trap_state(), TrapState::Trapped("t8".into()));
    f.binding().close("t8");

    for name in ["modal:open", "modal:close"] {
        f.document
            .remove_event_listener_with_callback(name, record.as_ref().unchecked_ref())
            .unwrap();
    }
    assert_eq!(
        *seen.borrow(),
        vec![
            ("modal:open".to_string(), true, vec![ModalId::from("t8")]),
            ("modal:close".to_string(), false, vec![]),
        ]
    );
}

#[wasm_bindgen_test]
fn notification_listener_may_call_back_into_binding() {
    let f = Fixture::new("t9");
    let weak = Rc::downgrade(f.binding.as_ref().unwrap());
    let close_on_open = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        assert!(weak.upgrade().unwrap().close("t9"));
    });
    let surface = f.el("t9");
    surface
        .add_event_listener_with_callback("modal:open", close_on_open.as_ref().unchecked_ref())
        .unwrap();

    assert!(f.binding().open("t9"));

    surface
        .remove_event_listener_with_callback("modal:open", close_on_open.as_ref().unchecked_ref())
        .unwrap();
    assert!(!f.binding().is_open("t9"));
    assert_eq!(f.display("t9"), "none");
    assert!(!f.body_marked());
}

#[wasm_bindgen_test]
fn tab_wrap_skips_visibility_hidden_controls() {
    let f = Fixture::with_extra(
        "t10",
        r#"<button id="t10-ghost" style="visibility:hidden">Ghost</button>
           <button id="t10-inert" inert>Inert</button>"#,
    );
    f.binding().open("t10");
    let close = f.el("t10-close");
    close.focus().unwrap();

    // The close button is the last control that can actually take focus.
    assert!(!key(&close, "Tab", false));
    assert_eq!(f.document.active_element().unwrap().id(), "t10-first");

    let first = f.el("t10-first");
    assert!(!key(&first, "Tab", true));
    assert_eq!(f.document.active_element().unwrap().id(), "t10-close");
}
