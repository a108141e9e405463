//! Tree node and balance-factor computation.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a tree node.
///
/// The `RefCell` lets an operation overwrite a node's content while parents
/// keep their existing links; the `Rc` covers the transient sharing that
/// rotation and deletion need while they rebuild a subtree. Handles are never
/// retained across operations, so a node's children stay owned by it alone.
pub type NodeRef = Rc<RefCell<TreeNode>>;

/// Node of the balanced tree. The root node is the tree; there is no separate
/// tree object below the [`AvlTree`](crate::tree::AvlTree) facade.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Comparable key.
    pub value: i64,
    /// Stored balance factor: live height of the right subtree minus left.
    pub weight: i64,
    /// Tombstone flag. A tombstoned node is logically absent but stays
    /// linked until a later operation overwrites or discards it.
    pub deleted: bool,
    /// Values strictly less than `value`.
    pub left: Option<NodeRef>,
    /// Values greater than or equal to `value`.
    pub right: Option<NodeRef>,
}

impl TreeNode {
    /// Fresh live leaf with weight 0.
    pub fn new(value: i64) -> NodeRef {
        Rc::new(RefCell::new(Self {
            value,
            weight: 0,
            deleted: false,
            left: None,
            right: None,
        }))
    }
}

/// Detached copy of a node, sharing its child handles. The copy is always
/// live, whatever the original's flag.
pub fn node_copy(node: &NodeRef) -> NodeRef {
    let n = node.borrow();
    Rc::new(RefCell::new(TreeNode {
        value: n.value,
        weight: n.weight,
        deleted: false,
        left: n.left.clone(),
        right: n.right.clone(),
    }))
}

/// Overwrite `node`'s content with `replacement`'s, keeping the handle that
/// parents point to. The tombstone flag is NOT copied; callers that need the
/// flag to change set it explicitly.
pub fn update_node(node: &NodeRef, replacement: &NodeRef) {
    let (value, weight, left, right) = {
        let r = replacement.borrow();
        (r.value, r.weight, r.left.clone(), r.right.clone())
    };
    let mut n = node.borrow_mut();
    n.value = value;
    n.weight = weight;
    n.left = left;
    n.right = right;
}

/// Height of a subtree counting live nodes only: 0 for an absent or
/// tombstoned root, else 1 + the taller child.
///
/// Recomputed on every call, no caching; operations that consult it at every
/// level pay O(n) per level.
pub fn live_height(node: Option<&NodeRef>) -> i64 {
    match node {
        Some(node) => {
            let n = node.borrow();
            if n.deleted {
                return 0;
            }
            1 + live_height(n.left.as_ref()).max(live_height(n.right.as_ref()))
        }
        None => 0,
    }
}

/// Balance factor from scratch: right height minus left height.
pub fn balance_weight(node: &NodeRef) -> i64 {
    let n = node.borrow();
    live_height(n.right.as_ref()) - live_height(n.left.as_ref())
}
