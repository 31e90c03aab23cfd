#![forbid(unsafe_code)]

//! Ordered collection of open modals.
//!
//! The `ModalStack` is the single source of truth for which modals are open
//! and which one is on top. Order is open order; the last entry is active.
//!
//! # Invariants
//!
//! - Each `ModalId` appears at most once.
//! - Removing an entry never reorders the others (closing a lower modal
//!   while a higher one stays open is legal).
//! - Z-index strictly increases with every push over the stack's lifetime,
//!   whatever was closed in between. It is never renumbered when lower
//!   entries leave; a re-pushed id gets a fresh, higher index. The counter
//!   saturates at `i32::MAX` rather than wrapping.
//! - Every push gets a fresh epoch, used to invalidate deferred work
//!   scheduled for an earlier opening of the same id.
//!
//! # Failure Modes
//!
//! - `push()` of an id already present returns `None` and changes nothing.
//! - `remove()` of an absent id returns `None` and changes nothing.

use std::fmt;

/// Opaque identifier naming one modal surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(String);

impl ModalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModalId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ModalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ModalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ModalId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModalId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub id: ModalId,
    pub z_index: i32,
    pub epoch: u64,
}

/// Open modals in z-order (bottom to top).
#[derive(Debug, Clone)]
pub struct ModalStack {
    entries: Vec<StackEntry>,
    base_z: i32,
    /// Pushes so far. Never reset.
    opened: i32,
    next_epoch: u64,
}

impl ModalStack {
    /// Create an empty stack allocating z-indices above `base_z`.
    pub fn new(base_z: i32) -> Self {
        Self {
            entries: Vec::new(),
            base_z,
            opened: 0,
            next_epoch: 1,
        }
    }

    /// Append `id` on top. Returns the new entry, or `None` if already open.
    pub fn push(&mut self, id: ModalId) -> Option<&StackEntry> {
        if self.contains(id.as_str()) {
            return None;
        }
        self.opened = self.opened.saturating_add(1);
        let entry = StackEntry {
            id,
            z_index: self.base_z.saturating_add(self.opened),
            epoch: self.next_epoch,
        };
        self.next_epoch += 1;
        self.entries.push(entry);
        self.entries.last()
    }

    /// Remove `id` from wherever it sits.
    pub fn remove(&mut self, id: &str) -> Option<StackEntry> {
        let idx = self.position(id)?;
        Some(self.entries.remove(idx))
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// The topmost entry.
    #[inline]
    pub fn active(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn active_id(&self) -> Option<&ModalId> {
        self.active().map(|e| &e.id)
    }

    pub fn get(&self, id: &str) -> Option<&StackEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Copy of the open ids, bottom to top.
    pub fn ids(&self) -> Vec<ModalId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}
