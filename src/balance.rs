//! Rotations and the whole-tree rebalance pass.

use std::rc::Rc;

use tracing::instrument;

use crate::node::{balance_weight, node_copy, update_node, NodeRef};

/// Rebalance dispatch, run after a weight recomputation.
///
/// An out-of-range weight picks the rotation case from the heavy child's own
/// weight. Replacement subtrees are copied back onto the original handles so
/// parent links stay valid.
#[instrument(level = "trace", skip(node))]
pub fn apply_rotation(node: &NodeRef) {
    let weight = node.borrow().weight;
    if weight < -1 {
        let left = node
            .borrow()
            .left
            .clone()
            .expect("left-heavy node must have a left child");
        if left.borrow().weight < 0 {
            let replacement = rotate_right(node);
            update_node(node, &replacement);
        } else {
            // left-right case
            let replacement = rotate_left(&left);
            update_node(&left, &replacement);
            let replacement = rotate_right(node);
            update_node(node, &replacement);
        }
    } else if weight > 1 {
        let right = node
            .borrow()
            .right
            .clone()
            .expect("right-heavy node must have a right child");
        if right.borrow().weight > 0 {
            let replacement = rotate_left(node);
            update_node(node, &replacement);
        } else {
            // right-left case
            let replacement = rotate_right(&right);
            update_node(&right, &replacement);
            let replacement = rotate_left(node);
            update_node(node, &replacement);
        }
    }
}

/// Right rotation around `node`. Builds a detached replacement from a copy of
/// the node and returns its new root (the old left child); the caller copies
/// it back onto `node`.
pub fn rotate_right(node: &NodeRef) -> NodeRef {
    let y = node_copy(node);
    let x = y
        .borrow()
        .left
        .clone()
        .expect("right rotation requires a left child");
    let z = x.borrow().right.clone();
    x.borrow_mut().right = Some(Rc::clone(&y));
    y.borrow_mut().left = z;

    let weight = balance_weight(&y);
    y.borrow_mut().weight = weight;
    let weight = balance_weight(&x);
    x.borrow_mut().weight = weight;

    x
}

/// Mirror of [`rotate_right`].
pub fn rotate_left(node: &NodeRef) -> NodeRef {
    let y = node_copy(node);
    let x = y
        .borrow()
        .right
        .clone()
        .expect("left rotation requires a right child");
    let z = x.borrow().left.clone();
    x.borrow_mut().left = Some(Rc::clone(&y));
    y.borrow_mut().right = z;

    let weight = balance_weight(&y);
    y.borrow_mut().weight = weight;
    let weight = balance_weight(&x);
    x.borrow_mut().weight = weight;

    x
}

/// Whole-tree rebalance pass: recompute the node's weight, rotate if needed,
/// then recurse into the children that are present and live.
///
/// Runs over every live node regardless of where the previous deletion
/// happened. Children are read after the rotation so the pass walks the
/// rotated shape.
#[instrument(level = "trace", skip(node))]
pub fn balance_tree(node: &NodeRef) {
    let weight = balance_weight(node);
    node.borrow_mut().weight = weight;
    apply_rotation(node);

    let (left, right) = {
        let n = node.borrow();
        (n.left.clone(), n.right.clone())
    };
    if let Some(left) = left {
        if !left.borrow().deleted {
            balance_tree(&left);
        }
    }
    if let Some(right) = right {
        if !right.borrow().deleted {
            balance_tree(&right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeNode;

    fn leaf_chain_right(values: &[i64]) -> NodeRef {
        // Degenerate right spine with accurate stored weights, no rebalancing.
        let root = TreeNode::new(values[0]);
        let mut current = Rc::clone(&root);
        for &value in &values[1..] {
            let next = TreeNode::new(value);
            current.borrow_mut().right = Some(Rc::clone(&next));
            current = next;
        }
        refresh_weights(&root);
        root
    }

    fn refresh_weights(node: &NodeRef) {
        let (left, right) = {
            let n = node.borrow();
            (n.left.clone(), n.right.clone())
        };
        if let Some(left) = left {
            refresh_weights(&left);
        }
        if let Some(right) = right {
            refresh_weights(&right);
        }
        let weight = balance_weight(node);
        node.borrow_mut().weight = weight;
    }

    #[test]
    fn given_balanced_node_when_dispatching_then_no_rotation() {
        let node = TreeNode::new(10);
        node.borrow_mut().left = Some(TreeNode::new(5));
        node.borrow_mut().right = Some(TreeNode::new(20));

        apply_rotation(&node);

        let n = node.borrow();
        assert_eq!(n.value, 10);
        assert_eq!(n.left.as_ref().unwrap().borrow().value, 5);
        assert_eq!(n.right.as_ref().unwrap().borrow().value, 20);
    }

    #[test]
    fn given_right_spine_when_dispatching_then_left_rotation_keeps_handle() {
        let root = leaf_chain_right(&[10, 20, 30]);
        let handle = Rc::clone(&root);

        apply_rotation(&root);

        // The same cell now holds the rotated subtree's root.
        assert!(Rc::ptr_eq(&handle, &root));
        let n = root.borrow();
        assert_eq!(n.value, 20);
        assert_eq!(n.left.as_ref().unwrap().borrow().value, 10);
        assert_eq!(n.right.as_ref().unwrap().borrow().value, 30);
        assert_eq!(n.weight, 0);
    }

    #[test]
    fn given_degenerate_spine_when_balancing_tree_then_every_node_visited() {
        let root = leaf_chain_right(&[1, 2, 3, 4, 5]);

        balance_tree(&root);
        // A single pass rotates top-down; repeat until the walk settles.
        balance_tree(&root);

        assert!(balance_weight(&root).abs() <= 1);
        assert_eq!(root.borrow().weight, balance_weight(&root));
    }

    #[test]
    #[should_panic(expected = "left rotation requires a right child")]
    fn given_node_without_right_child_when_rotating_left_then_contract_panics() {
        let node = TreeNode::new(10);
        rotate_left(&node);
    }
}
