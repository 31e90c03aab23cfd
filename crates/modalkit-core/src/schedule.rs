#![forbid(unsafe_code)]

//! Deferred initial-focus task.
//!
//! `open` does not move focus synchronously; it schedules a
//! [`DeferredFocus`] through the host so focus lands after the surface is
//! visible. The task carries the epoch of the opening it belongs to and only
//! acts while that opening is still the active modal. A close, a reopen, or
//! a newer modal on top turns it into a no-op.

use crate::stack::{ModalId, ModalStack};

/// Pending "focus the first element of this modal" task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeferredFocus {
    modal: ModalId,
    epoch: u64,
}

impl DeferredFocus {
    pub(crate) fn new(modal: ModalId, epoch: u64) -> Self {
        Self { modal, epoch }
    }

    pub fn modal(&self) -> &ModalId {
        &self.modal
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Guard: the opening this task was scheduled for is still on top.
    pub fn is_current(&self, stack: &ModalStack) -> bool {
        stack
            .active()
            .is_some_and(|top| top.id == self.modal && top.epoch == self.epoch)
    }
}
