//! Insertion, search, deletion, and the tree-level facade.
//!
//! All node operations are free functions over [`NodeRef`] handles; the
//! recursion never needs a parent pointer because restructuring overwrites
//! nodes in place (see [`crate::node::update_node`]). [`AvlTree`] is the
//! surface a rendering front-end talks to.

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::balance::{apply_rotation, balance_tree};
use crate::check::live_values_in_order;
use crate::node::{balance_weight, update_node, NodeRef, TreeNode};

/// Insert `value` below `node`: strictly smaller values go left, everything
/// else (duplicates included) goes right.
#[instrument(level = "trace", skip(node))]
pub fn add_node(node: &NodeRef, value: i64) {
    let go_left = value < node.borrow().value;
    if go_left {
        insert_left(node, value);
    } else {
        insert_right(node, value);
    }
}

fn insert_left(node: &NodeRef, value: i64) {
    let child = {
        let n = node.borrow();
        n.left.as_ref().filter(|c| !c.borrow().deleted).cloned()
    };
    match child {
        Some(child) => add_node(&child, value),
        // An absent or tombstoned slot is overwritten with a fresh leaf.
        None => node.borrow_mut().left = Some(TreeNode::new(value)),
    }
    let weight = balance_weight(node);
    node.borrow_mut().weight = weight;
    apply_rotation(node);
}

fn insert_right(node: &NodeRef, value: i64) {
    let child = {
        let n = node.borrow();
        n.right.as_ref().filter(|c| !c.borrow().deleted).cloned()
    };
    match child {
        Some(child) => add_node(&child, value),
        None => node.borrow_mut().right = Some(TreeNode::new(value)),
    }
    let weight = balance_weight(node);
    node.borrow_mut().weight = weight;
    apply_rotation(node);
}

/// Recursive descent lookup. Returns the handle of the live node holding
/// `value`, or `None` when the path ends in an absent or tombstoned slot.
#[instrument(level = "trace", skip(node))]
pub fn search(node: &NodeRef, value: i64) -> Option<NodeRef> {
    {
        let n = node.borrow();
        if value == n.value && !n.deleted {
            return Some(Rc::clone(node));
        }
    }
    let next = {
        let n = node.borrow();
        if value < n.value {
            n.left.clone()
        } else {
            n.right.clone()
        }
    };
    match next {
        Some(next) if !next.borrow().deleted => search(&next, value),
        _ => None,
    }
}

/// Leftmost node reachable through live `left` pointers.
///
/// Only the `left` pointer's status is examined at each step; the stopping
/// node's own flag is not. Called on a tombstoned node with no live left
/// child, this returns the tombstone itself (see DESIGN.md).
pub fn leftmost_live(node: &NodeRef) -> NodeRef {
    let next = {
        let n = node.borrow();
        n.left.as_ref().filter(|c| !c.borrow().deleted).cloned()
    };
    match next {
        Some(next) => leftmost_live(&next),
        None => Rc::clone(node),
    }
}

/// Delete `value` from the tree rooted at `root`, then rebalance the whole
/// live tree.
///
/// A childless target is tombstoned in place; a target with one live child
/// becomes that child, discarding the dead sibling; a target with two live
/// children takes its in-order successor's value, the successor slot being
/// tombstoned or, when the successor has a right child, overwritten with that
/// child's content. The existence of the successor's right child is what is
/// checked, not its liveness. A missing value still triggers the rebalance
/// pass.
#[instrument(level = "trace", skip(root))]
pub fn delete_value(root: &NodeRef, value: i64) {
    if let Some(node) = search(root, value) {
        let (live_left, live_right) = {
            let n = node.borrow();
            (
                n.left.as_ref().filter(|c| !c.borrow().deleted).cloned(),
                n.right.as_ref().filter(|c| !c.borrow().deleted).cloned(),
            )
        };
        match (live_left, live_right) {
            (None, None) => node.borrow_mut().deleted = true,
            (Some(child), None) | (None, Some(child)) => update_node(&node, &child),
            (Some(_), Some(right)) => {
                let successor = leftmost_live(&right);
                successor.borrow_mut().deleted = true;
                let promoted = successor.borrow().value;
                node.borrow_mut().value = promoted;

                let successor_right = successor.borrow().right.clone();
                if let Some(successor_right) = successor_right {
                    successor.borrow_mut().deleted = false;
                    update_node(&successor, &successor_right);
                }
            }
        }
    }
    balance_tree(root);
}

/// Tree-level surface consumed by the visualization front-end.
///
/// Owns the root handle. The root may itself be a tombstone: callers observe
/// that through [`AvlTree::is_empty`] while [`AvlTree::root`] still returns
/// the handle, which distinguishes "no tree" from "tree whose root is dead".
#[derive(Debug, Default)]
pub struct AvlTree {
    root: Option<NodeRef>,
}

impl AvlTree {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Root handle, tombstoned or not. `None` only when no tree was ever
    /// created (or the last one was replaced).
    pub fn root(&self) -> Option<&NodeRef> {
        self.root.as_ref()
    }

    fn live_root(&self) -> Option<&NodeRef> {
        self.root.as_ref().filter(|r| !r.borrow().deleted)
    }

    /// True when there is no root or the root is a tombstone.
    pub fn is_empty(&self) -> bool {
        self.live_root().is_none()
    }

    /// Number of live nodes reachable from a live root.
    pub fn len(&self) -> usize {
        self.live_root()
            .map(|root| live_values_in_order(root).len())
            .unwrap_or(0)
    }

    /// Insert into the existing tree, or install a fresh single-node tree
    /// when none is live. A tombstoned root is discarded wholesale together
    /// with anything still hanging off it.
    #[instrument(level = "debug", skip(self))]
    pub fn create_or_insert(&mut self, value: i64) {
        match self.live_root() {
            Some(root) => {
                let root = Rc::clone(root);
                add_node(&root, value);
            }
            None => {
                debug!(value, "installing fresh root");
                self.root = Some(TreeNode::new(value));
            }
        }
    }

    /// True iff a live node with `value` is reachable from a live root.
    pub fn contains(&self, value: i64) -> bool {
        self.find(value).is_some()
    }

    /// Handle of the live node holding `value`, if any.
    pub fn find(&self, value: i64) -> Option<NodeRef> {
        self.live_root().and_then(|root| search(root, value))
    }

    /// Remove `value` if present. Missing values and empty or dead-rooted
    /// trees are no-ops, not errors.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, value: i64) {
        if let Some(root) = self.live_root() {
            let root = Rc::clone(root);
            delete_value(&root, value);
        }
    }
}
