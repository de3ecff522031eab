//! # Sprig Reconciler
//!
//! Applies the difference between two [`VNode`](sprig_vdom::VNode)
//! snapshots to a live tree reached through the [`LiveTree`] trait.
//!
//! - [`create`] builds a live subtree from a snapshot
//! - [`update`] patches a live node from `prev` to `next`, replacing it when
//!   the node kind or tag changes
//! - [`update_children`] is the keyed children differ
//! - [`Mount`] ties a [`Component`] to a container and dispatches events
//! - [`memory::Document`] is an in-memory tree that records every mutation

pub mod attrs;
pub mod children;
pub mod create;
pub mod error;
pub mod memory;
pub mod mount;
pub mod tree;
pub mod update;

#[cfg(test)]
mod tests_children;
#[cfg(test)]
mod tests_update;

pub use attrs::{apply_attribute, remove_attribute};
pub use children::update_children;
pub use create::create;
pub use error::{MountError, MountResult};
pub use memory::{Document, Mutation, NodeId};
pub use mount::{Component, Mount};
pub use tree::{LiveTree, Property};
pub use update::update;
