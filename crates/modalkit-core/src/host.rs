#![forbid(unsafe_code)]

//! Capability interface the engine requires from its host environment.
//!
//! Everything the engine knows about the concrete visual tree goes through
//! [`ModalHost`]. A browser adapter implements it over the DOM; tests use
//! [`MemoryDocument`](crate::testing::MemoryDocument).
//!
//! Query methods take `&self` and must not change observable state; the
//! gesture router relies on that to stay a pure classification step.

use std::fmt;
use std::time::Duration;

use crate::config::Selector;
use crate::event::ModalNotification;
use crate::geometry::Rect;
use crate::schedule::DeferredFocus;
use crate::stack::ModalId;
use crate::visibility::SurfaceState;

/// Element class, as far as focus eligibility is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Button,
    Anchor,
    Input,
    Select,
    TextArea,
    Other,
}

impl ElementKind {
    /// Classify a tag name (case-insensitive).
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "button" => Self::Button,
            "a" => Self::Anchor,
            "input" => Self::Input,
            "select" => Self::Select,
            "textarea" => Self::TextArea,
            _ => Self::Other,
        }
    }
}

/// Facts about a node needed to decide whether it can take keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTraits {
    pub kind: ElementKind,
    /// Anchor carries a navigation target.
    pub has_href: bool,
    /// Explicit tab index, if any.
    pub tab_index: Option<i32>,
    pub disabled: bool,
    /// Laid out with a non-zero box and not hidden.
    pub rendered: bool,
}

impl FocusTraits {
    /// A rendered, enabled node of the given kind with no extra attributes.
    pub const fn of(kind: ElementKind) -> Self {
        Self {
            kind,
            has_href: false,
            tab_index: None,
            disabled: false,
            rendered: true,
        }
    }
}

/// Host-provided capabilities.
pub trait ModalHost {
    /// Handle to a live node. Equality must mean "same node".
    type Node: Clone + PartialEq + fmt::Debug;

    // --- Structure and matching ---

    /// Resolve a modal id to its surface, or `None` when nothing live has it.
    fn resolve(&self, id: &ModalId) -> Option<Self::Node>;

    /// The identifier a surface node is addressed by, if it has one.
    fn element_id(&self, node: &Self::Node) -> Option<ModalId>;

    /// Whether `node` matches `selector`.
    fn matches(&self, node: &Self::Node, selector: &Selector) -> bool;

    /// Attribute value, `None` when absent.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Immediate children in tree order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// All descendants in tree order, excluding `node` itself.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Layout box in viewport coordinates.
    fn bounding_box(&self, node: &Self::Node) -> Rect;

    fn focus_traits(&self, node: &Self::Node) -> FocusTraits;

    // --- Mutation ---

    /// Apply visibility, z-index and the accessibility-hidden flag.
    fn set_surface_state(&mut self, node: &Self::Node, state: SurfaceState);

    /// Add or remove the document-wide "modal open" marker.
    fn set_open_marker(&mut self, marker: &str, present: bool);

    fn focus(&mut self, node: &Self::Node);

    /// Currently focused node.
    fn focused(&self) -> Option<Self::Node>;

    /// Fire `task` once after `delay` by calling
    /// [`ModalManager::run_deferred`](crate::ModalManager::run_deferred).
    fn schedule_focus(&mut self, delay: Duration, task: DeferredFocus);

    /// Emit a notification from `node`.
    fn notify(&mut self, node: &Self::Node, notification: &ModalNotification);

    // --- Provided ---

    /// Nearest inclusive ancestor of `node` matching `selector`.
    fn nearest_ancestor_matching(
        &self,
        node: &Self::Node,
        selector: &Selector,
    ) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if self.matches(&n, selector) {
                return Some(n);
            }
            current = self.parent(&n);
        }
        None
    }

    /// Nearest inclusive ancestor carrying `attribute`, with its value.
    fn nearest_ancestor_with_attribute(
        &self,
        node: &Self::Node,
        attribute: &str,
    ) -> Option<(Self::Node, String)> {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if let Some(value) = self.attribute(&n, attribute) {
                return Some((n, value));
            }
            current = self.parent(&n);
        }
        None
    }
}
