//! Reconciler entry point

use crate::attrs::{apply_attribute, remove_attribute};
use crate::children::update_children;
use crate::create::{create, manages_children};
use crate::tree::LiveTree;
use sprig_vdom::{Element, VNode};
use std::mem;
use tracing::debug;

/// Bring `live` (which currently reflects `prev`) in line with `next`.
///
/// Returns the live node now representing `next`: the same handle when it
/// was patched in place, or a freshly built one that replaced it in its
/// parent. A detached `live` node is not replaced; installing the returned
/// node is then up to the caller.
pub fn update<T: LiveTree>(tree: &mut T, live: &T::Node, prev: &VNode, next: &VNode) -> T::Node {
    let prev = prev.normalized();
    let next = next.normalized();

    match (prev.as_ref(), next.as_ref()) {
        (VNode::Primitive(a), VNode::Primitive(b)) => {
            if a != b {
                tree.set_text(live, &b.to_string());
            }
            live.clone()
        }
        (VNode::Element(a), VNode::Element(b)) if a.tag == b.tag => {
            update_attributes(tree, live, a, b);
            if manages_children(b) {
                update_children(tree, live, &a.children, &b.children);
            }
            live.clone()
        }
        _ => replace(tree, live, &next),
    }
}

fn replace<T: LiveTree>(tree: &mut T, live: &T::Node, next: &VNode) -> T::Node {
    let node = create(tree, next);
    match tree.parent(live) {
        Some(parent) => {
            debug!(?live, ?node, tag = ?next.tag(), "replacing node");
            tree.replace_child(&parent, &node, live);
        }
        None => debug!(?live, "replacement for a detached node left to the caller"),
    }
    node
}

fn update_attributes<T: LiveTree>(tree: &mut T, live: &T::Node, prev: &Element, next: &Element) {
    for (name, value) in &next.attrs {
        match prev.attrs.get(name) {
            Some(old) if old == value => {}
            // A handler turning into text (or back) lives in a different slot
            Some(old) if mem::discriminant(old) != mem::discriminant(value) => {
                remove_attribute(tree, live, name, old);
                apply_attribute(tree, live, name, value);
            }
            _ => apply_attribute(tree, live, name, value),
        }
    }

    for (name, old) in &prev.attrs {
        if !next.attrs.contains_key(name) {
            remove_attribute(tree, live, name, old);
        }
    }
}
