#![forbid(unsafe_code)]

//! In-memory document host for tests.
//!
//! [`MemoryDocument`] is a small element tree implementing [`ModalHost`]. It
//! records every mutation the engine performs (surface states, the open
//! marker, focus, scheduled tasks, notifications) so tests can assert both
//! effects and the absence of effects.
//!
//! Selectors understood by [`ModalHost::matches`]: `.class`, `#id`,
//! `[attribute]`, a bare tag name, and comma-separated lists of those.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::Selector;
use crate::event::ModalNotification;
use crate::geometry::Rect;
use crate::host::{ElementKind, FocusTraits, ModalHost};
use crate::manager::ModalManager;
use crate::schedule::DeferredFocus;
use crate::stack::ModalId;
use crate::visibility::SurfaceState;

/// Viewport used for the body and for surfaces created by `modal_surface`.
pub const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

/// Element description used to build a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    rect: Rect,
    disabled: bool,
    hidden: bool,
    tab_index: Option<i32>,
}

impl ElementSpec {
    /// Element with a small default box at the origin.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            rect: Rect::new(0.0, 0.0, 100.0, 24.0),
            disabled: false,
            hidden: false,
            tab_index: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Not rendered (e.g. `display: none`); hides descendants too.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MemoryNode {
    spec: ElementSpec,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
    surface: Option<SurfaceState>,
}

/// Focus task captured by [`ModalHost::schedule_focus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledFocus {
    pub delay: Duration,
    pub task: DeferredFocus,
}

/// In-memory element tree rooted at `<body>`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    markers: BTreeSet<String>,
    focused: Option<NodeRef>,
    scheduled: Vec<ScheduledFocus>,
    notifications: Vec<(NodeRef, ModalNotification)>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Document containing only `<body>`.
    pub fn new() -> Self {
        let body = MemoryNode {
            spec: ElementSpec::new("body").rect(VIEWPORT),
            parent: None,
            children: Vec::new(),
            surface: None,
        };
        Self {
            nodes: vec![body],
            markers: BTreeSet::new(),
            focused: None,
            scheduled: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeRef {
        NodeRef(0)
    }

    /// Append a new element as the last child of `parent`.
    pub fn append(&mut self, parent: NodeRef, spec: ElementSpec) -> NodeRef {
        let node = NodeRef(self.nodes.len());
        self.nodes.push(MemoryNode {
            spec,
            parent: Some(parent),
            children: Vec::new(),
            surface: None,
        });
        self.nodes[parent.0].children.push(node);
        node
    }

    /// Append a hidden `div.modal-wrapper#{id}` covering the viewport to `<body>`.
    pub fn modal_surface(&mut self, id: &str) -> NodeRef {
        let node = self.append(
            NodeRef(0),
            ElementSpec::new("div")
                .id(id)
                .class("modal-wrapper")
                .attr("aria-hidden", "true")
                .rect(VIEWPORT),
        );
        self.nodes[node.0].surface = Some(SurfaceState::Hidden);
        node
    }

    /// Remove `node` (and its subtree) from the document.
    pub fn detach(&mut self, node: NodeRef) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// First attached element with this id.
    pub fn find(&self, id: &str) -> Option<NodeRef> {
        (0..self.nodes.len())
            .map(NodeRef)
            .find(|n| self.nodes[n.0].spec.id.as_deref() == Some(id) && self.is_attached(*n))
    }

    /// Simulate the user moving focus.
    pub fn set_focused(&mut self, node: Option<NodeRef>) {
        self.focused = node;
    }

    pub fn focused_node(&self) -> Option<NodeRef> {
        self.focused
    }

    /// Last state the engine applied to a surface.
    pub fn surface_state(&self, node: NodeRef) -> Option<SurfaceState> {
        self.nodes[node.0].surface
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn scheduled(&self) -> &[ScheduledFocus] {
        &self.scheduled
    }

    pub fn take_scheduled(&mut self) -> Vec<ScheduledFocus> {
        std::mem::take(&mut self.scheduled)
    }

    pub fn notifications(&self) -> &[(NodeRef, ModalNotification)] {
        &self.notifications
    }

    fn is_attached(&self, node: NodeRef) -> bool {
        let mut current = node;
        loop {
            if current.0 == 0 {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_rendered(&self, node: NodeRef) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.nodes[n.0].spec.hidden {
                return false;
            }
            current = self.nodes[n.0].parent;
        }
        !self.nodes[node.0].spec.rect.is_empty()
    }

    fn matches_simple(spec: &ElementSpec, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            spec.classes.iter().any(|c| c == class)
        } else if let Some(id) = selector.strip_prefix('#') {
            spec.id.as_deref() == Some(id)
        } else if let Some(attr) = selector
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
        {
            spec.attributes.iter().any(|(name, _)| name == attr)
        } else {
            spec.tag.eq_ignore_ascii_case(selector)
        }
    }
}

impl ModalHost for MemoryDocument {
    type Node = NodeRef;

    fn resolve(&self, id: &ModalId) -> Option<NodeRef> {
        self.find(id.as_str())
    }

    fn element_id(&self, node: &NodeRef) -> Option<ModalId> {
        self.nodes[node.0]
            .spec
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(ModalId::from)
    }

    fn matches(&self, node: &NodeRef, selector: &Selector) -> bool {
        let spec = &self.nodes[node.0].spec;
        selector
            .as_str()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .any(|s| Self::matches_simple(spec, s))
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.nodes[node.0]
            .spec
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        self.nodes[node.0].children.clone()
    }

    fn descendants(&self, node: &NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeRef> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(next) = pending.pop() {
            out.push(next);
            pending.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    fn bounding_box(&self, node: &NodeRef) -> Rect {
        self.nodes[node.0].spec.rect
    }

    fn focus_traits(&self, node: &NodeRef) -> FocusTraits {
        let spec = &self.nodes[node.0].spec;
        FocusTraits {
            kind: ElementKind::from_tag(&spec.tag),
            has_href: spec.attributes.iter().any(|(n, _)| n == "href"),
            tab_index: spec.tab_index,
            disabled: spec.disabled,
            rendered: self.is_rendered(*node),
        }
    }

    fn set_surface_state(&mut self, node: &NodeRef, state: SurfaceState) {
        self.nodes[node.0].surface = Some(state);
    }

    fn set_open_marker(&mut self, marker: &str, present: bool) {
        if present {
            self.markers.insert(marker.to_owned());
        } else {
            self.markers.remove(marker);
        }
    }

    fn focus(&mut self, node: &NodeRef) {
        self.focused = Some(*node);
    }

    fn focused(&self) -> Option<NodeRef> {
        self.focused
    }

    fn schedule_focus(&mut self, delay: Duration, task: DeferredFocus) {
        self.scheduled.push(ScheduledFocus { delay, task });
    }

    fn notify(&mut self, node: &NodeRef, notification: &ModalNotification) {
        self.notifications.push((*node, notification.clone()));
    }
}

/// Fire every scheduled focus task as if its timer elapsed.
///
/// Returns how many tasks actually moved focus.
pub fn run_scheduled(manager: &mut ModalManager<MemoryDocument>) -> usize {
    let tasks = manager.host_mut().take_scheduled();
    tasks
        .iter()
        .filter(|scheduled| manager.run_deferred(&scheduled.task))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendants_in_tree_order() {
        let mut doc = MemoryDocument::new();
        let a = doc.append(doc.body(), ElementSpec::new("div"));
        let a1 = doc.append(a, ElementSpec::new("p"));
        let a1x = doc.append(a1, ElementSpec::new("span"));
        let a2 = doc.append(a, ElementSpec::new("p"));
        let b = doc.append(doc.body(), ElementSpec::new("div"));
        assert_eq!(doc.descendants(&doc.body()), vec![a, a1, a1x, a2, b]);
        assert_eq!(doc.descendants(&a1x), Vec::<NodeRef>::new());
    }

    #[test]
    fn selector_forms() {
        let mut doc = MemoryDocument::new();
        let n = doc.append(
            doc.body(),
            ElementSpec::new("button")
                .id("go")
                .class("modal-close")
                .attr("data-modal", "x"),
        );
        for sel in [".modal-close", "#go", "[data-modal]", "BUTTON", ".nope, #go"] {
            assert!(doc.matches(&n, &Selector::from(sel)), "{sel}");
        }
        for sel in [".modal", "#stop", "[href]", "a", ""] {
            assert!(!doc.matches(&n, &Selector::from(sel)), "{sel}");
        }
    }

    #[test]
    fn detached_nodes_do_not_resolve() {
        let mut doc = MemoryDocument::new();
        let m = doc.modal_surface("m");
        assert_eq!(doc.resolve(&"m".into()), Some(m));
        doc.detach(m);
        assert_eq!(doc.resolve(&"m".into()), None);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut doc = MemoryDocument::new();
        let wrapper = doc.append(doc.body(), ElementSpec::new("div").hidden());
        let button = doc.append(wrapper, ElementSpec::new("button"));
        assert!(!doc.focus_traits(&button).rendered);
    }

    #[test]
    fn closest_is_inclusive() {
        let mut doc = MemoryDocument::new();
        let close = doc.append(doc.body(), ElementSpec::new("button").class("modal-close"));
        let icon = doc.append(close, ElementSpec::new("svg"));
        let sel = Selector::from(".modal-close");
        assert_eq!(doc.nearest_ancestor_matching(&close, &sel), Some(close));
        assert_eq!(doc.nearest_ancestor_matching(&icon, &sel), Some(close));
        assert_eq!(doc.nearest_ancestor_matching(&doc.body(), &sel), None);
    }
}
