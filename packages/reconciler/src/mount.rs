//! Mount handle: binds a component to a container node

use crate::create::create;
use crate::error::{MountError, MountResult};
use crate::tree::LiveTree;
use crate::update::update;
use sprig_vdom::{Receiver, VNode};
use tracing::{debug, instrument};

/// A renderable component, bound as `this` when its handlers run
pub trait Component<T: LiveTree>: Receiver {
    /// Produce the next snapshot
    fn render(&self) -> MountResult<VNode> {
        Err(MountError::MissingRenderMethod)
    }

    /// Called after the component's root node is built or replaced
    fn on_mount(&mut self, _tree: &mut T, _node: &T::Node) {}
}

/// Keeps the previous snapshot and live root of one mounted component
#[derive(Debug)]
pub struct Mount<T: LiveTree> {
    container: T::Node,
    root: Option<T::Node>,
    vnode: Option<VNode>,
}

impl<T: LiveTree> Mount<T> {
    pub fn new(container: T::Node) -> Self {
        Self {
            container,
            root: None,
            vnode: None,
        }
    }

    pub fn container(&self) -> &T::Node {
        &self.container
    }

    /// Live root, once the first update has run
    pub fn root(&self) -> Option<&T::Node> {
        self.root.as_ref()
    }

    /// Snapshot the live root currently reflects
    pub fn vnode(&self) -> Option<&VNode> {
        self.vnode.as_ref()
    }

    /// Re-render `component` and reconcile the live tree.
    ///
    /// With `force`, the previous snapshot is discarded and the root rebuilt.
    /// Rendering happens before any mutation, so a failed render leaves the
    /// tree untouched.
    #[instrument(skip(self, tree, component))]
    pub fn update<C: Component<T>>(&mut self, tree: &mut T, component: &mut C, force: bool) -> MountResult<T::Node> {
        let next = component.render()?;

        let node = match (&self.root, &self.vnode) {
            (Some(root), Some(prev)) if !force => {
                let node = update(tree, root, prev, &next);
                if tree.parent(&node).is_none() {
                    tree.replace_child(&self.container, &node, root);
                }
                node
            }
            (Some(root), _) => {
                let node = create(tree, &next);
                tree.replace_child(&self.container, &node, root);
                node
            }
            (None, _) => {
                let node = create(tree, &next);
                tree.append_child(&self.container, &node);
                node
            }
        };

        let changed = self.root.as_ref() != Some(&node);
        self.root = Some(node.clone());
        self.vnode = Some(next);

        if changed {
            debug!(?node, "mounted new root");
            component.on_mount(tree, &node);
        }

        Ok(node)
    }

    /// Run the `on{event}` handler stored on `node` with `component` as the
    /// receiver, then re-render
    #[instrument(skip(self, tree, component))]
    pub fn dispatch<C: Component<T>>(
        &mut self,
        tree: &mut T,
        component: &mut C,
        node: &T::Node,
        event: &str,
    ) -> MountResult<T::Node> {
        let name = format!("on{}", event);
        let handler = tree
            .handler(node, &name)
            .ok_or(MountError::NoHandler { event: name })?;

        handler.invoke(component)?;
        self.update(tree, component, false)
    }
}
