//! Attribute applier: maps logical attributes onto live-node properties

use crate::tree::{LiveTree, Property};
use sprig_vdom::{AttrValue, HTML_ATTRIBUTE, KEY_ATTRIBUTE};

pub const CLASS_ATTRIBUTE: &str = "class";
pub const VALUE_ATTRIBUTE: &str = "value";

/// Apply one attribute to `node`
pub fn apply_attribute<T: LiveTree>(tree: &mut T, node: &T::Node, name: &str, value: &AttrValue) {
    let text = match value {
        AttrValue::Handler(handler) => return tree.set_handler(node, name, handler.clone()),
        AttrValue::Text(text) => text,
    };

    match name {
        KEY_ATTRIBUTE => {}
        CLASS_ATTRIBUTE => tree.set_property(node, Property::ClassName(text.clone())),
        VALUE_ATTRIBUTE => tree.set_property(node, Property::Value(text.clone())),
        "disabled" => tree.set_property(node, Property::Disabled(is_enabled_flag(text))),
        "checked" => tree.set_property(node, Property::Checked(is_enabled_flag(text))),
        HTML_ATTRIBUTE => tree.set_property(node, Property::InnerHtml(text.clone())),
        _ => tree.set_attribute(node, name, text),
    }
}

/// Undo an attribute previously applied with value `previous`
pub fn remove_attribute<T: LiveTree>(tree: &mut T, node: &T::Node, name: &str, previous: &AttrValue) {
    if let AttrValue::Handler(_) = previous {
        return tree.remove_handler(node, name);
    }

    match name {
        KEY_ATTRIBUTE => {}
        CLASS_ATTRIBUTE => tree.set_property(node, Property::ClassName(String::new())),
        VALUE_ATTRIBUTE => tree.set_property(node, Property::Value(String::new())),
        "disabled" => tree.set_property(node, Property::Disabled(false)),
        "checked" => tree.set_property(node, Property::Checked(false)),
        HTML_ATTRIBUTE => tree.set_property(node, Property::InnerHtml(String::new())),
        _ => tree.remove_attribute(node, name),
    }
}

/// Boolean property value of an attribute string; `""`, `"false"` and `"0"` are off
fn is_enabled_flag(text: &str) -> bool {
    !matches!(text.trim(), "" | "false" | "0")
}
