#![forbid(unsafe_code)]

//! The modal engine.
//!
//! A [`ModalManager`] owns the [`ModalStack`], the focus memory, the trap
//! state and the configuration for one document. It is constructed by the
//! embedding application and handed around explicitly; there is no global
//! instance.
//!
//! # Invariants
//!
//! - A surface is visible (and not accessibility-hidden) iff its id is open.
//! - The document open marker is present iff at least one modal is open.
//! - Focus memory is captured on the 0→1 transition and consumed on 1→0.
//! - The trap is `Trapped(top)` iff the stack is non-empty, scoped to the
//!   current topmost modal.
//!
//! # Failure Modes
//!
//! None are reported. Opening an unresolvable or already-open id, closing
//! an id that is not open, and focusing into a modal with nothing focusable
//! are all no-ops without side effects. Closing an open id whose surface
//! has since left the document still removes it from the stack.

use crate::config::{ConfigError, ModalConfig};
use crate::event::{Disposition, InputEvent, ModalNotification};
use crate::focusable;
use crate::host::ModalHost;
use crate::router::{self, Route};
use crate::schedule::DeferredFocus;
use crate::stack::{ModalId, ModalStack};
use crate::trap::{FocusTrap, TrapState};
use crate::visibility;

/// Modal stack and focus-trap engine bound to one host.
pub struct ModalManager<H: ModalHost> {
    host: H,
    config: ModalConfig,
    stack: ModalStack,
    /// Node focused before the first modal of the current nesting opened.
    focus_memory: Option<H::Node>,
    trap: FocusTrap,
}

impl<H: ModalHost> std::fmt::Debug for ModalManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalManager")
            .field("open", &self.stack.ids())
            .field("trap", self.trap.state())
            .field("focus_memory", &self.focus_memory)
            .finish_non_exhaustive()
    }
}

impl<H: ModalHost> ModalManager<H> {
    /// Create an engine with a validated configuration.
    pub fn new(host: H, config: ModalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stack: ModalStack::new(config.base_z_index()),
            host,
            config,
            focus_memory: None,
            trap: FocusTrap::default(),
        })
    }

    /// Create an engine with [`ModalConfig::default`].
    pub fn with_defaults(host: H) -> Self {
        let config = ModalConfig::default();
        Self {
            stack: ModalStack::new(config.base_z_index()),
            host,
            config,
            focus_memory: None,
            trap: FocusTrap::default(),
        }
    }

    // --- Stack operations ---

    /// Open `id` on top of the stack.
    ///
    /// Returns true if the modal was opened; false if it was already open or
    /// does not resolve. Initial focus is deferred through
    /// [`ModalHost::schedule_focus`].
    pub fn open(&mut self, id: &str) -> bool {
        let id = ModalId::from(id);
        let Some(surface) = self.host.resolve(&id) else {
            tracing::debug!(modal = %id, "open ignored: no live surface");
            return false;
        };
        if self.stack.contains(id.as_str()) {
            return false;
        }
        if self.stack.is_empty() {
            self.focus_memory = self.host.focused();
        }
        let Some(entry) = self.stack.push(id.clone()).cloned() else {
            return false;
        };

        visibility::reveal(&mut self.host, &surface, entry.z_index);
        visibility::sync_marker(&mut self.host, self.config.open_marker(), true);
        self.trap.sync(self.stack.active_id());
        self.host.schedule_focus(
            self.config.focus_delay(),
            DeferredFocus::new(entry.id, entry.epoch),
        );
        self.host
            .notify(&surface, &ModalNotification::Opened(id.clone()));

        tracing::debug!(
            modal = %id,
            depth = self.stack.depth(),
            z_index = entry.z_index,
            "modal opened"
        );
        true
    }

    /// Close `id` wherever it sits in the stack.
    ///
    /// Returns true if it was open. Remaining modals keep their order.
    pub fn close(&mut self, id: &str) -> bool {
        let Some(entry) = self.stack.remove(id) else {
            return false;
        };
        let surface = self.host.resolve(&entry.id);
        if let Some(surface) = &surface {
            visibility::conceal(&mut self.host, surface);
        }

        if self.stack.is_empty() {
            visibility::sync_marker(&mut self.host, self.config.open_marker(), false);
            if let Some(previous) = self.focus_memory.take() {
                self.host.focus(&previous);
            }
        } else {
            self.focus_first_in_active();
        }
        self.trap.sync(self.stack.active_id());

        if let Some(surface) = &surface {
            self.host
                .notify(surface, &ModalNotification::Closed(entry.id.clone()));
        }

        tracing::debug!(
            modal = %entry.id,
            depth = self.stack.depth(),
            detached = surface.is_none(),
            "modal closed"
        );
        true
    }

    /// Close every open modal, in open order, from a snapshot taken first.
    ///
    /// Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let snapshot = self.stack.ids();
        let mut closed = 0;
        for id in &snapshot {
            if self.close(id.as_str()) {
                closed += 1;
            }
        }
        closed
    }

    /// Close everything and hand the host back.
    pub fn destroy(mut self) -> H {
        self.close_all();
        self.host
    }

    // --- Queries ---

    #[inline]
    pub fn is_open(&self, id: &str) -> bool {
        self.stack.contains(id)
    }

    /// Open ids, bottom to top. The returned vector is a copy.
    pub fn list_open(&self) -> Vec<ModalId> {
        self.stack.ids()
    }

    /// The topmost modal.
    pub fn active(&self) -> Option<&ModalId> {
        self.stack.active_id()
    }

    /// Z-index assigned to `id` when it was opened.
    pub fn z_index(&self, id: &str) -> Option<i32> {
        self.stack.get(id).map(|e| e.z_index)
    }

    pub fn trap_state(&self) -> &TrapState {
        self.trap.state()
    }

    pub fn stack(&self) -> &ModalStack {
        &self.stack
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Input and scheduled work ---

    /// Route one input and apply the decision.
    ///
    /// The host must apply the returned [`Disposition`] to the native event.
    pub fn handle_input(&mut self, input: &InputEvent<H::Node>) -> Disposition {
        let route = router::route(&self.host, &self.stack, &self.config, input);
        let disposition = route.disposition();
        tracing::trace!(kind = ?input.kind, phase = ?input.phase, ?route, "input routed");

        match route {
            Route::Open(id) => {
                self.open(id.as_str());
            }
            Route::Close { modal, .. } => {
                self.close(modal.as_str());
            }
            Route::Wrap(node) => self.host.focus(&node),
            Route::Pass => {}
        }
        disposition
    }

    /// Run a task previously passed to [`ModalHost::schedule_focus`].
    ///
    /// Returns true if focus moved.
    pub fn run_deferred(&mut self, task: &DeferredFocus) -> bool {
        if !task.is_current(&self.stack) {
            tracing::debug!(modal = %task.modal(), epoch = task.epoch(), "stale deferred focus discarded");
            return false;
        }
        let Some(surface) = self.host.resolve(task.modal()) else {
            return false;
        };
        match focusable::locate(&self.host, &surface).first() {
            Some(first) => {
                self.host.focus(first);
                true
            }
            None => false,
        }
    }

    fn focus_first_in_active(&mut self) {
        let Some(surface) = self
            .stack
            .active_id()
            .and_then(|top| self.host.resolve(top))
        else {
            return;
        };
        if let Some(first) = focusable::locate(&self.host, &surface).first() {
            self.host.focus(first);
        }
    }
}
