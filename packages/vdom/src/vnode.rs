use crate::handler::Handler;
use crate::value::format_number;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name that carries a sibling identity
pub const KEY_ATTRIBUTE: &str = "key";

/// Attribute name that carries raw inner markup
pub const HTML_ATTRIBUTE: &str = "html";

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    /// Text or number, rendered as literal text content
    Primitive(Primitive),

    /// Element with attributes and ordered children
    Element(Element),
}

/// Leaf value of a virtual tree
///
/// Two primitives are only equal when they have the same kind and value,
/// so `Number(1.0)` and `Text("1")` differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Primitive {
    Text(String),
    Number(f64),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Text(text) => f.write_str(text),
            Primitive::Number(n) => format_number(*n, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, AttrValue>,
    pub children: Vec<VNode>,
}

/// Attribute value: literal text, or an event handler
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Handler(Handler),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Handler(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::Text(text)
    }
}

impl From<Handler> for AttrValue {
    fn from(handler: Handler) -> Self {
        AttrValue::Handler(handler)
    }
}

/// Per-sibling identity used to match children across snapshots
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Value of an explicit `key` attribute
    Explicit(String),
    /// Position in the child list; only matches the same index in another list
    Positional(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Explicit(key) => write!(f, "{:?}", key),
            Key::Positional(index) => write!(f, "#{}", index),
        }
    }
}

impl VNode {
    pub fn text(content: impl Into<String>) -> Self {
        VNode::Primitive(Primitive::Text(content.into()))
    }

    pub fn number(value: f64) -> Self {
        VNode::Primitive(Primitive::Number(value))
    }

    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element(Element {
            tag: tag.into(),
            ..Element::default()
        })
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        if let VNode::Element(ref mut element) = self {
            element.attrs.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_key(self, key: impl Into<String>) -> Self {
        self.with_attr(KEY_ATTRIBUTE, key.into())
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element(ref mut element) = self {
            element.children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNode::Element(ref mut element) = self {
            element.children.extend(new_children);
        }
        self
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            VNode::Element(element) => Some(element),
            VNode::Primitive(_) => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            VNode::Primitive(primitive) => Some(primitive),
            VNode::Element(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|element| element.tag.as_str())
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(element) => &element.children,
            VNode::Primitive(_) => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.as_element().and_then(|element| element.attrs.get(name))
    }

    /// Identity of this node at `index` in its sibling list
    pub fn key(&self, index: usize) -> Key {
        match self.attr(KEY_ATTRIBUTE).and_then(AttrValue::as_text) {
            Some(key) => Key::Explicit(key.to_string()),
            None => Key::Positional(index),
        }
    }

    /// Concatenated text of all primitive descendants
    pub fn text_content(&self) -> String {
        match self {
            VNode::Primitive(primitive) => primitive.to_string(),
            VNode::Element(element) => element.children.iter().map(VNode::text_content).collect(),
        }
    }

    /// Apply the textarea rule: a `textarea` without an explicit `value`
    /// carries its text children as `value` and has no children. An element
    /// with raw `html` content has no children either.
    ///
    /// Returns the node unchanged (borrowed) when the rule does not apply.
    pub fn normalized(&self) -> Cow<'_, VNode> {
        match self {
            VNode::Element(element)
                if element.tag == "textarea" && !element.attrs.contains_key("value") =>
            {
                let value: String = element
                    .children
                    .iter()
                    .filter_map(VNode::as_primitive)
                    .map(Primitive::to_string)
                    .collect();
                let mut attrs = element.attrs.clone();
                attrs.insert("value".to_string(), AttrValue::Text(value));
                Cow::Owned(VNode::Element(Element {
                    tag: element.tag.clone(),
                    attrs,
                    children: Vec::new(),
                }))
            }
            VNode::Element(element)
                if element.attrs.contains_key(HTML_ATTRIBUTE) && !element.children.is_empty() =>
            {
                Cow::Owned(VNode::Element(Element {
                    tag: element.tag.clone(),
                    attrs: element.attrs.clone(),
                    children: Vec::new(),
                }))
            }
            _ => Cow::Borrowed(self),
        }
    }
}

impl From<Primitive> for VNode {
    fn from(primitive: Primitive) -> Self {
        VNode::Primitive(primitive)
    }
}

impl From<Element> for VNode {
    fn from(element: Element) -> Self {
        VNode::Element(element)
    }
}
