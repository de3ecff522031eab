//! The presentation-tree collaborator

use sprig_vdom::Handler;
use std::fmt;

/// Native node properties set by the attribute applier instead of
/// plain attributes
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    ClassName(String),
    Value(String),
    Disabled(bool),
    Checked(bool),
    /// Raw markup; children of such an element are not managed
    InnerHtml(String),
}

/// A live tree the reconciler mutates
///
/// Handles are owned by the implementation. The reconciler keeps none of
/// them beyond a single call, except the root stored in a
/// [`Mount`](crate::Mount).
pub trait LiveTree {
    type Node: Clone + PartialEq + fmt::Debug;

    fn create_element(&mut self, tag: &str) -> Self::Node;
    fn create_text(&mut self, text: &str) -> Self::Node;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);
    fn set_property(&mut self, node: &Self::Node, property: Property);

    fn set_handler(&mut self, node: &Self::Node, name: &str, handler: Handler);
    fn remove_handler(&mut self, node: &Self::Node, name: &str);
    fn handler(&self, node: &Self::Node, name: &str) -> Option<Handler>;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    /// Insert `child` before `reference`, or append when `reference` is `None`.
    /// A child that is already attached is moved.
    fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>);
    fn replace_child(&mut self, parent: &Self::Node, new: &Self::Node, old: &Self::Node);
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;
}
