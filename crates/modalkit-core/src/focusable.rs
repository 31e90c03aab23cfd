#![forbid(unsafe_code)]

//! Focusable-element locator.
//!
//! Eligible: buttons, anchors with a navigation target, inputs, selects,
//! textareas, and any element with an explicit non-negative tab index.
//! Disabled or unrendered elements never qualify. Results are in tree order
//! and recomputed on every call, since modal content changes between opens.

use crate::host::{ElementKind, FocusTraits, ModalHost};

/// Whether a node with these traits can receive keyboard focus.
pub fn is_focusable(traits: &FocusTraits) -> bool {
    if traits.disabled || !traits.rendered {
        return false;
    }
    let explicit = traits.tab_index.is_some_and(|i| i >= 0);
    match traits.kind {
        ElementKind::Button | ElementKind::Input | ElementKind::Select | ElementKind::TextArea => {
            true
        }
        ElementKind::Anchor => traits.has_href || explicit,
        ElementKind::Other => explicit,
    }
}

/// Focusable descendants of `container`, in tree order. Empty, never an error.
pub fn locate<H: ModalHost + ?Sized>(host: &H, container: &H::Node) -> Vec<H::Node> {
    host.descendants(container)
        .into_iter()
        .filter(|node| is_focusable(&host.focus_traits(node)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::testing::{ElementSpec, MemoryDocument};

    #[test]
    fn intrinsic_kinds_qualify() {
        for kind in [
            ElementKind::Button,
            ElementKind::Input,
            ElementKind::Select,
            ElementKind::TextArea,
        ] {
            assert!(is_focusable(&FocusTraits::of(kind)), "{kind:?}");
        }
        assert!(!is_focusable(&FocusTraits::of(ElementKind::Other)));
    }

    #[test]
    fn anchor_needs_href_or_tab_index() {
        let bare = FocusTraits::of(ElementKind::Anchor);
        assert!(!is_focusable(&bare));
        assert!(is_focusable(&FocusTraits {
            has_href: true,
            ..bare
        }));
        assert!(is_focusable(&FocusTraits {
            tab_index: Some(0),
            ..bare
        }));
    }

    #[test]
    fn negative_tab_index_excluded() {
        let div = FocusTraits::of(ElementKind::Other);
        assert!(!is_focusable(&FocusTraits {
            tab_index: Some(-1),
            ..div
        }));
        assert!(is_focusable(&FocusTraits {
            tab_index: Some(3),
            ..div
        }));
    }

    #[test]
    fn disabled_and_unrendered_excluded() {
        let button = FocusTraits::of(ElementKind::Button);
        assert!(!is_focusable(&FocusTraits {
            disabled: true,
            ..button
        }));
        assert!(!is_focusable(&FocusTraits {
            rendered: false,
            ..button
        }));
    }

    #[test]
    fn locate_walks_tree_order() {
        let mut doc = MemoryDocument::new();
        let surface = doc.modal_surface("m");
        let content = doc.append(surface, ElementSpec::new("div").class("modal-content"));
        let first = doc.append(content, ElementSpec::new("input"));
        let nested = doc.append(content, ElementSpec::new("div"));
        let second = doc.append(nested, ElementSpec::new("a").attr("href", "#"));
        doc.append(content, ElementSpec::new("button").disabled());
        doc.append(content, ElementSpec::new("button").hidden());
        doc.append(content, ElementSpec::new("span").tab_index(-1));
        let third = doc.append(content, ElementSpec::new("span").tab_index(0));
        doc.append(
            content,
            ElementSpec::new("button").rect(Rect::new(0.0, 0.0, 0.0, 0.0)),
        );

        assert_eq!(locate(&doc, &surface), vec![first, second, third]);
    }

    #[test]
    fn locate_empty_container() {
        let mut doc = MemoryDocument::new();
        let surface = doc.modal_surface("m");
        doc.append(surface, ElementSpec::new("p"));
        assert!(locate(&doc, &surface).is_empty());
    }

    #[test]
    fn locate_is_not_cached() {
        let mut doc = MemoryDocument::new();
        let surface = doc.modal_surface("m");
        assert!(locate(&doc, &surface).is_empty());
        let late = doc.append(surface, ElementSpec::new("button"));
        assert_eq!(locate(&doc, &surface), vec![late]);
    }
}
