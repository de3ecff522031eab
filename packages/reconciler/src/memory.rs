//! Arena-backed live tree for headless rendering and tests
//!
//! Every mutation made through [`LiveTree`] is recorded in a journal so
//! callers can observe exactly what a reconciliation did.

use crate::tree::{LiveTree, Property};
use sprig_template::is_void_element;
use sprig_vdom::Handler;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A recorded tree mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateElement { node: NodeId, tag: String },
    CreateText { node: NodeId, text: String },
    SetAttribute { node: NodeId, name: String, value: String },
    RemoveAttribute { node: NodeId, name: String },
    SetProperty { node: NodeId, property: Property },
    SetHandler { node: NodeId, name: String },
    RemoveHandler { node: NodeId, name: String },
    SetText { node: NodeId, text: String },
    AppendChild { parent: NodeId, child: NodeId },
    InsertBefore { parent: NodeId, child: NodeId, reference: Option<NodeId> },
    ReplaceChild { parent: NodeId, new: NodeId, old: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
}

impl Mutation {
    /// Whether the mutation changes tree shape rather than node content
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::AppendChild { .. }
                | Mutation::InsertBefore { .. }
                | Mutation::ReplaceChild { .. }
                | Mutation::RemoveChild { .. }
        )
    }
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    handlers: BTreeMap<String, Handler>,
    class_name: String,
    value: String,
    disabled: bool,
    checked: bool,
    inner_html: Option<String>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory presentation tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    body: NodeId,
    journal: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `body` container
    pub fn new() -> Self {
        let body = NodeEntry {
            data: NodeData::Element(ElementData {
                tag: "body".to_string(),
                ..ElementData::default()
            }),
            parent: None,
            children: Vec::new(),
        };

        Self {
            nodes: vec![body],
            body: NodeId(0),
            journal: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Take the recorded mutations, leaving the journal empty
    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.entry(node).map_or(&[][..], |entry| entry.children.as_slice())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    /// Content of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.entry(node)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attributes.get(name).map(String::as_str)
    }

    pub fn class_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.class_name.as_str())
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.value.as_str())
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.disabled)
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.checked)
    }

    pub fn inner_html(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.inner_html.as_deref()
    }

    /// Concatenated text of `node` and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(entry) = self.entry(node) else {
            return;
        };
        match &entry.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => {
                for child in &entry.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Serialize `node` and its subtree as HTML
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out, None);
        out
    }

    /// Serialize with two-space indentation, one node per line
    pub fn to_html_pretty(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out, Some(0));
        out
    }

    /// Serialized children of `node`
    pub fn inner_to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(*child, &mut out, None);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String, depth: Option<usize>) {
        let Some(entry) = self.entry(node) else {
            return;
        };
        let indent = |out: &mut String, depth: Option<usize>| {
            if let Some(depth) = depth {
                out.push_str(&"  ".repeat(depth));
            }
        };
        let newline = |out: &mut String| {
            if depth.is_some() {
                out.push('\n');
            }
        };

        let element = match &entry.data {
            NodeData::Text(text) => {
                indent(out, depth);
                out.push_str(&escape_html(text));
                newline(out);
                return;
            }
            NodeData::Element(element) => element,
        };

        indent(out, depth);
        out.push('<');
        out.push_str(&element.tag);
        if !element.class_name.is_empty() {
            push_attribute(out, "class", &element.class_name);
        }
        for (name, value) in &element.attributes {
            push_attribute(out, name, value);
        }
        if !element.value.is_empty() {
            push_attribute(out, "value", &element.value);
        }
        if element.checked {
            out.push_str(" checked");
        }
        if element.disabled {
            out.push_str(" disabled");
        }
        out.push('>');

        if is_void_element(&element.tag) {
            newline(out);
            return;
        }

        match &element.inner_html {
            Some(html) if !html.is_empty() => out.push_str(html),
            _ if entry.children.is_empty() => {}
            _ => {
                newline(out);
                for child in &entry.children {
                    self.write_html(*child, out, depth.map(|d| d + 1));
                }
                indent(out, depth);
            }
        }

        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
        newline(out);
    }

    fn entry(&self, node: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(node.0)
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.entry(node)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Remove `node` from its current parent's child list
    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node.0).and_then(|entry| entry.parent.take()) else {
            return;
        };
        if let Some(entry) = self.nodes.get_mut(parent.0) {
            entry.children.retain(|child| *child != node);
        }
    }

    fn attach_at(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        let Some(entry) = self.nodes.get_mut(parent.0) else {
            return;
        };
        match index {
            Some(index) if index <= entry.children.len() => entry.children.insert(index, child),
            _ => entry.children.push(child),
        }
        if let Some(entry) = self.nodes.get_mut(child.0) {
            entry.parent = Some(parent);
        }
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }
}

impl LiveTree for Document {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        let node = self.push_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            ..ElementData::default()
        }));
        self.journal.push(Mutation::CreateElement {
            node,
            tag: tag.to_string(),
        });
        node
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let node = self.push_node(NodeData::Text(text.to_string()));
        self.journal.push(Mutation::CreateText {
            node,
            text: text.to_string(),
        });
        node
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(*node) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
        self.journal.push(Mutation::SetAttribute {
            node: *node,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        if let Some(element) = self.element_mut(*node) {
            element.attributes.remove(name);
        }
        self.journal.push(Mutation::RemoveAttribute {
            node: *node,
            name: name.to_string(),
        });
    }

    fn set_property(&mut self, node: &NodeId, property: Property) {
        // Raw markup replaces whatever children the element had
        if matches!(property, Property::InnerHtml(_)) {
            for child in self.children(*node).to_vec() {
                self.detach(child);
            }
        }
        if let Some(element) = self.element_mut(*node) {
            match &property {
                Property::ClassName(class) => element.class_name = class.clone(),
                Property::Value(value) => element.value = value.clone(),
                Property::Disabled(disabled) => element.disabled = *disabled,
                Property::Checked(checked) => element.checked = *checked,
                Property::InnerHtml(html) => element.inner_html = Some(html.clone()),
            }
        }
        self.journal.push(Mutation::SetProperty {
            node: *node,
            property,
        });
    }

    fn set_handler(&mut self, node: &NodeId, name: &str, handler: Handler) {
        if let Some(element) = self.element_mut(*node) {
            element.handlers.insert(name.to_string(), handler);
        }
        self.journal.push(Mutation::SetHandler {
            node: *node,
            name: name.to_string(),
        });
    }

    fn remove_handler(&mut self, node: &NodeId, name: &str) {
        if let Some(element) = self.element_mut(*node) {
            element.handlers.remove(name);
        }
        self.journal.push(Mutation::RemoveHandler {
            node: *node,
            name: name.to_string(),
        });
    }

    fn handler(&self, node: &NodeId, name: &str) -> Option<Handler> {
        self.element(*node)?.handlers.get(name).cloned()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(NodeData::Text(content)) = self.nodes.get_mut(node.0).map(|e| &mut e.data) {
            *content = text.to_string();
        }
        self.journal.push(Mutation::SetText {
            node: *node,
            text: text.to_string(),
        });
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        self.attach_at(*parent, *child, None);
        self.journal.push(Mutation::AppendChild {
            parent: *parent,
            child: *child,
        });
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
        if reference == Some(child) {
            return;
        }
        self.detach(*child);
        let index = reference.and_then(|reference| self.position(*parent, *reference));
        self.attach_at(*parent, *child, index);
        self.journal.push(Mutation::InsertBefore {
            parent: *parent,
            child: *child,
            reference: reference.copied(),
        });
    }

    fn replace_child(&mut self, parent: &NodeId, new: &NodeId, old: &NodeId) {
        if new == old {
            return;
        }
        self.detach(*new);
        match self.position(*parent, *old) {
            Some(index) => {
                self.detach(*old);
                self.attach_at(*parent, *new, Some(index));
            }
            None => self.attach_at(*parent, *new, None),
        }
        self.journal.push(Mutation::ReplaceChild {
            parent: *parent,
            new: *new,
            old: *old,
        });
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.position(*parent, *child).is_some() {
            self.detach(*child);
        }
        self.journal.push(Mutation::RemoveChild {
            parent: *parent,
            child: *child,
        });
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.entry(*node)?.parent
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.children(*node).to_vec()
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
