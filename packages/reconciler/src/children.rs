//! Keyed children differ
//!
//! Walks the next child list left to right, keeping track of runs of
//! children that are still in their previous relative order. Children in a
//! run are patched in place; a child that starts elsewhere is patched and
//! staged for a move, and unknown keys are built fresh and staged for
//! insertion. Leftover previous children are removed before the staged
//! nodes are inserted in ascending index order.
//!
//! This is a greedy heuristic, not a minimal-move diff. A run only ends
//! when an unknown key is met, so some permutations (a rotation to the
//! left, for one) leave matched children in their previous order.

use crate::create::create;
use crate::tree::LiveTree;
use crate::update::update;
use sprig_vdom::{Key, VNode};
use std::collections::HashMap;
use tracing::{trace, trace_span, warn};

/// Reconcile the children of `parent` from `prev` to `next`
pub fn update_children<T: LiveTree>(tree: &mut T, parent: &T::Node, prev: &[VNode], next: &[VNode]) {
    let span = trace_span!("update_children", prev = prev.len(), next = next.len());
    let _enter = span.enter();

    let live_children = tree.child_nodes(parent);
    let prev_key_to_index = key_map(prev);
    let next_keys: Vec<Key> = next.iter().enumerate().map(|(i, child)| child.key(i)).collect();
    warn_duplicates(&next_keys);

    let mut consumed = vec![false; live_children.len()];
    let mut staged: Vec<(usize, T::Node)> = Vec::new();
    let mut run = 0usize;

    for (i, child) in next.iter().enumerate() {
        let previous = prev_key_to_index
            .get(&next_keys[i])
            .copied()
            .filter(|&apos| apos < live_children.len());

        let Some(apos) = previous else {
            trace!(index = i, key = %next_keys[i], "inserting new child");
            staged.push((i, create(tree, child)));
            run = 0;
            continue;
        };

        let follows = next_keys
            .get(i + 1)
            .and_then(|key| prev_key_to_index.get(key))
            .is_some_and(|&next_apos| next_apos == apos + 1);

        let node = update(tree, &live_children[apos], &prev[apos], child);
        consumed[apos] = true;

        if run > 0 || follows {
            run += 1;
        } else {
            if apos != i {
                trace!(from = apos, to = i, key = %next_keys[i], "moving child");
                staged.push((i, node));
            }
            run = 0;
        }
    }

    for (apos, live) in live_children.iter().enumerate() {
        if !consumed[apos] {
            trace!(index = apos, "removing child");
            tree.remove_child(parent, live);
        }
    }

    for (i, node) in staged {
        let reference = tree.child_nodes(parent).get(i).cloned();
        match reference {
            Some(reference) if reference == node => {}
            Some(reference) => tree.insert_before(parent, &node, Some(&reference)),
            None => tree.append_child(parent, &node),
        }
    }
}

/// Key to index; with duplicate keys the last occurrence wins
fn key_map(children: &[VNode]) -> HashMap<Key, usize> {
    let keys: Vec<Key> = children.iter().enumerate().map(|(i, child)| child.key(i)).collect();
    warn_duplicates(&keys);
    keys.into_iter().enumerate().map(|(i, key)| (key, i)).collect()
}

fn warn_duplicates(keys: &[Key]) {
    let mut seen = HashMap::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        if let Some(first) = seen.insert(key, i) {
            warn!(key = %key, first, duplicate = i, "duplicate key among siblings");
        }
    }
}
