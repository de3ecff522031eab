//! Tree builder: instantiate a live subtree from a snapshot

use crate::attrs::apply_attribute;
use crate::tree::LiveTree;
use sprig_vdom::{Element, VNode, HTML_ATTRIBUTE};
use tracing::trace;

/// Build a live node for `vnode` and everything below it
pub fn create<T: LiveTree>(tree: &mut T, vnode: &VNode) -> T::Node {
    let vnode = vnode.normalized();
    match vnode.as_ref() {
        VNode::Primitive(primitive) => tree.create_text(&primitive.to_string()),
        VNode::Element(element) => {
            trace!(tag = %element.tag, "creating element");
            let node = tree.create_element(&element.tag);
            for (name, value) in &element.attrs {
                apply_attribute(tree, &node, name, value);
            }
            if manages_children(element) {
                for child in &element.children {
                    let child = create(tree, child);
                    tree.append_child(&node, &child);
                }
            }
            node
        }
    }
}

/// Elements with raw inner HTML own their content
pub(crate) fn manages_children(element: &Element) -> bool {
    !element.attrs.contains_key(HTML_ATTRIBUTE)
}
