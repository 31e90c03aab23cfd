#![forbid(unsafe_code)]

//! Wiring the engine to a live document.
//!
//! A [`ModalBinding`] owns a [`ModalManager<DomHost>`] behind
//! `Rc<RefCell<_>>` and three document listeners that feed it:
//!
//! ```text
//!   mousedown (capture) ─┐
//!   click     (bubble)  ─┼─▶ Listener::translate ─▶ handle_input ─▶ apply
//!   keydown   (bubble)  ─┘                              │
//!                                        flush, borrow released
//!                                                       │
//!                                  queued focus tasks ─┼─▶ gloo Timeout
//!                      queued focus moves and notices ─┴─▶ Effect::apply
//! ```
//!
//! # Invariants
//!
//! - The manager is never borrowed while page code runs. Focus moves and
//!   `modal:open` / `modal:close` dispatches are applied after the engine
//!   call returns, so their listeners see the new state and may call back
//!   into the binding.
//! - A listener or API call that still finds the manager borrowed is
//!   skipped and logged.
//! - Timers hold only a `Weak` handle; a timer firing after detach is inert.
//! - Detach (explicit or on drop) removes every listener it added.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use modalkit_core::{ModalConfig, ModalId, ModalManager, TrapState};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event};

use crate::dom::DomHost;
use crate::error::{BindError, describe};
use crate::input::{self, Listener};

type Shared = Rc<RefCell<ModalManager<DomHost>>>;

struct Registered {
    listener: Listener,
    callback: Closure<dyn FnMut(Event)>,
}

/// The engine attached to a browser document.
pub struct ModalBinding {
    manager: Shared,
    document: Document,
    listeners: Vec<Registered>,
}

impl std::fmt::Debug for ModalBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalBinding")
            .field("manager", &self.manager)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ModalBinding {
    /// Attach to `window.document`.
    pub fn attach(config: ModalConfig) -> Result<Self, BindError> {
        let host = DomHost::from_window()?;
        Self::bind(host, config)
    }

    /// Attach to a specific document.
    pub fn attach_to(document: Document, config: ModalConfig) -> Result<Self, BindError> {
        Self::bind(DomHost::new(document), config)
    }

    fn bind(host: DomHost, config: ModalConfig) -> Result<Self, BindError> {
        let document = host.document().clone();
        let manager = Rc::new(RefCell::new(ModalManager::new(host, config)?));
        let mut binding = Self {
            manager,
            document,
            listeners: Vec::with_capacity(Listener::ALL.len()),
        };
        for listener in Listener::ALL {
            // On failure `binding` drops here and removes what was added.
            binding.listen(listener)?;
        }
        tracing::debug!(listeners = binding.listeners.len(), "modal binding attached");
        Ok(binding)
    }

    fn listen(&mut self, listener: Listener) -> Result<(), BindError> {
        let weak = Rc::downgrade(&self.manager);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            dispatch(&weak, listener, &event);
        });
        self.document
            .add_event_listener_with_callback_and_bool(
                listener.event_type(),
                callback.as_ref().unchecked_ref(),
                listener.capture(),
            )
            .map_err(|err| BindError::listener(listener.event_type(), &err))?;
        self.listeners.push(Registered { listener, callback });
        Ok(())
    }

    /// Open `id`. See [`ModalManager::open`].
    pub fn open(&self, id: &str) -> bool {
        self.with_manager("open", |m| m.open(id)).unwrap_or(false)
    }

    /// Close `id`. See [`ModalManager::close`].
    pub fn close(&self, id: &str) -> bool {
        self.with_manager("close", |m| m.close(id)).unwrap_or(false)
    }

    /// Close everything. Returns how many modals were closed.
    pub fn close_all(&self) -> usize {
        self.with_manager("close_all", ModalManager::close_all)
            .unwrap_or(0)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.manager
            .try_borrow()
            .is_ok_and(|m| m.is_open(id))
    }

    pub fn list_open(&self) -> Vec<ModalId> {
        self.manager
            .try_borrow()
            .map(|m| m.list_open())
            .unwrap_or_default()
    }

    pub fn active(&self) -> Option<ModalId> {
        self.manager.try_borrow().ok()?.active().cloned()
    }

    pub fn z_index(&self, id: &str) -> Option<i32> {
        self.manager.try_borrow().ok()?.z_index(id)
    }

    pub fn trap_state(&self) -> TrapState {
        self.manager
            .try_borrow()
            .map(|m| m.trap_state().clone())
            .unwrap_or(TrapState::Inactive)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Close everything and remove the listeners.
    pub fn detach(self) {
        drop(self);
    }

    fn with_manager<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut ModalManager<DomHost>) -> T,
    ) -> Option<T> {
        let Ok(mut manager) = self.manager.try_borrow_mut() else {
            tracing::warn!(op, "modal manager busy; call skipped");
            return None;
        };
        let out = f(&mut manager);
        drop(manager);
        flush(&self.manager);
        Some(out)
    }
}

impl Drop for ModalBinding {
    fn drop(&mut self) {
        for Registered { listener, callback } in self.listeners.drain(..) {
            if let Err(err) = self.document.remove_event_listener_with_callback_and_bool(
                listener.event_type(),
                callback.as_ref().unchecked_ref(),
                listener.capture(),
            ) {
                tracing::warn!(
                    event = listener.event_type(),
                    error = %describe(&err),
                    "listener removal failed"
                );
            }
        }
        match self.manager.try_borrow_mut() {
            Ok(mut manager) => {
                manager.close_all();
            }
            Err(_) => tracing::warn!("modal manager busy during detach; modals left open"),
        }
        flush(&self.manager);
        tracing::debug!("modal binding detached");
    }
}

fn dispatch(weak: &Weak<RefCell<ModalManager<DomHost>>>, listener: Listener, event: &Event) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Some(input) = listener.translate(event) else {
        return;
    };
    let disposition = match shared.try_borrow_mut() {
        Ok(mut manager) => manager.handle_input(&input),
        Err(_) => {
            tracing::warn!(event = listener.event_type(), "re-entrant input ignored");
            return;
        }
    };
    input::apply(event, disposition);
    flush(&shared);
}

/// Hand queued focus requests to browser timers, then perform queued
/// effects with the manager released.
fn flush(shared: &Shared) {
    let (tasks, effects) = {
        let Ok(mut manager) = shared.try_borrow_mut() else {
            return;
        };
        let host = manager.host_mut();
        (host.take_scheduled(), host.take_effects())
    };
    for (delay, task) in tasks {
        let weak = Rc::downgrade(shared);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let ran = shared
                .try_borrow_mut()
                .map(|mut manager| manager.run_deferred(&task));
            if ran.is_ok() {
                flush(&shared);
            }
        })
        .forget();
    }
    for effect in &effects {
        effect.apply();
    }
}
