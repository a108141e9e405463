//! Rendering the live tree as text.
//!
//! Rendering contract for front-ends: tombstoned nodes and the edges into
//! them are not shown, but an existing child is still descended into, so live
//! descendants of a tombstone surface under its nearest rendered ancestor.

use termtree::Tree;

use crate::node::NodeRef;
use crate::tree::AvlTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NodeRef {
    /// Render the live portion rooted at this handle. A tombstoned handle
    /// renders a `(deleted)` placeholder carrying whatever live subtrees
    /// splice up to it.
    fn to_tree_string(&self) -> Tree<String> {
        let mut subtrees = live_subtrees(self);
        if subtrees.len() == 1 && !self.borrow().deleted {
            subtrees.remove(0)
        } else {
            Tree::new("(deleted)".to_string()).with_leaves(subtrees)
        }
    }
}

impl TreeNodeConvert for AvlTree {
    fn to_tree_string(&self) -> Tree<String> {
        match self.root() {
            Some(root) if !self.is_empty() => root.to_tree_string(),
            _ => Tree::new("(empty)".to_string()),
        }
    }
}

fn label(node: &NodeRef) -> String {
    let n = node.borrow();
    format!("{} [weight: {}]", n.value, n.weight)
}

/// Rendered subtrees of the live portion rooted at `node`: one tree when the
/// node itself is live, otherwise the spliced-up renderings of its children.
fn live_subtrees(node: &NodeRef) -> Vec<Tree<String>> {
    let (deleted, left, right) = {
        let n = node.borrow();
        (n.deleted, n.left.clone(), n.right.clone())
    };
    let mut children = Vec::new();
    if let Some(left) = left {
        children.extend(live_subtrees(&left));
    }
    if let Some(right) = right {
        children.extend(live_subtrees(&right));
    }
    if deleted {
        children
    } else {
        vec![Tree::new(label(node)).with_leaves(children)]
    }
}
