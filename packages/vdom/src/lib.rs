//! # Sprig VDOM
//!
//! The virtual node model shared by the template compiler and the
//! reconciler: [`VNode`] snapshots, the runtime [`Value`] used for render
//! contexts, sibling [`Key`]s, and compiled event [`Handler`]s together with
//! the [`Receiver`] they are bound to when invoked.

pub mod handler;
pub mod value;
pub mod vnode;

pub use handler::{Handler, HandlerError, HandlerResult, Receiver};
pub use value::Value;
pub use vnode::{AttrValue, Element, Key, Primitive, VNode, HTML_ATTRIBUTE, KEY_ATTRIBUTE};
