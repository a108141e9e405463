//! Structural self-checks over the live tree.
//!
//! Read-only validators encoding the invariants the tree is supposed to
//! uphold; used by tests and available for debugging. All walks descend into
//! every existing child: tombstoned nodes still position their live
//! descendants.

use itertools::Itertools;

use crate::errors::{TreeError, TreeResult};
use crate::node::{balance_weight, NodeRef};

/// In-order walk collecting live values only.
pub fn live_values_in_order(node: &NodeRef) -> Vec<i64> {
    let mut values = Vec::new();
    collect_in_order(node, &mut values);
    values
}

fn collect_in_order(node: &NodeRef, values: &mut Vec<i64>) {
    let (left, live_value, right) = {
        let n = node.borrow();
        (
            n.left.clone(),
            (!n.deleted).then_some(n.value),
            n.right.clone(),
        )
    };
    if let Some(left) = left {
        collect_in_order(&left, values);
    }
    if let Some(value) = live_value {
        values.push(value);
    }
    if let Some(right) = right {
        collect_in_order(&right, values);
    }
}

/// The live in-order sequence must be non-decreasing.
pub fn check_ordering(node: &NodeRef) -> TreeResult<()> {
    for (prev, next) in live_values_in_order(node).into_iter().tuple_windows() {
        if prev > next {
            return Err(TreeError::OrderingViolation { prev, next });
        }
    }
    Ok(())
}

/// Every live node's recomputed balance factor must lie in [-1, 1].
///
/// Guaranteed after insertions; deletion rebalancing is best-effort and may
/// legitimately leave the tree outside this range.
pub fn check_balanced(node: &NodeRef) -> TreeResult<()> {
    visit_live(node, &mut |n| {
        let weight = balance_weight(n);
        if !(-1..=1).contains(&weight) {
            return Err(TreeError::UnbalancedNode {
                value: n.borrow().value,
                weight,
            });
        }
        Ok(())
    })
}

/// Every live node's stored weight must match its recomputed balance factor.
pub fn check_weights(node: &NodeRef) -> TreeResult<()> {
    visit_live(node, &mut |n| {
        let stored = n.borrow().weight;
        let computed = balance_weight(n);
        if stored != computed {
            return Err(TreeError::StaleWeight {
                value: n.borrow().value,
                stored,
                computed,
            });
        }
        Ok(())
    })
}

fn visit_live<F>(node: &NodeRef, check: &mut F) -> TreeResult<()>
where
    F: FnMut(&NodeRef) -> TreeResult<()>,
{
    if !node.borrow().deleted {
        check(node)?;
    }
    let (left, right) = {
        let n = node.borrow();
        (n.left.clone(), n.right.clone())
    };
    if let Some(left) = left {
        visit_live(&left, check)?;
    }
    if let Some(right) = right {
        visit_live(&right, check)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeNode;

    #[test]
    fn given_tombstoned_middle_node_when_collecting_then_value_skipped_descendants_kept() {
        let root = TreeNode::new(10);
        let dead = TreeNode::new(5);
        dead.borrow_mut().deleted = true;
        dead.borrow_mut().left = Some(TreeNode::new(2));
        dead.borrow_mut().right = Some(TreeNode::new(7));
        root.borrow_mut().left = Some(dead);

        assert_eq!(live_values_in_order(&root), vec![2, 7, 10]);
    }

    #[test]
    fn given_misordered_tree_when_checking_ordering_then_offending_pair_reported() {
        let root = TreeNode::new(10);
        root.borrow_mut().left = Some(TreeNode::new(15));

        assert_eq!(
            check_ordering(&root),
            Err(TreeError::OrderingViolation { prev: 15, next: 10 })
        );
    }

    #[test]
    fn given_degenerate_chain_when_checking_balance_then_unbalanced_reported() {
        let root = TreeNode::new(1);
        let mid = TreeNode::new(2);
        mid.borrow_mut().right = Some(TreeNode::new(3));
        root.borrow_mut().right = Some(mid);

        assert_eq!(
            check_balanced(&root),
            Err(TreeError::UnbalancedNode {
                value: 1,
                weight: 2
            })
        );
    }

    #[test]
    fn given_stale_stored_weight_when_checking_weights_then_mismatch_reported() {
        let root = TreeNode::new(10);
        root.borrow_mut().right = Some(TreeNode::new(20));
        // Stored weight still says balanced.

        assert_eq!(
            check_weights(&root),
            Err(TreeError::StaleWeight {
                value: 10,
                stored: 0,
                computed: 1
            })
        );
    }
}
