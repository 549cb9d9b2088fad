//! Translation between node handles and physical rows.
//!
//! Both directions use the cached subtree row counts of [`NodeTree`] to skip
//! whole sibling subtrees, so the cost depends on depth and branching, not
//! on the number of rows.
//!
//! Virtual lists do not go through here: their row and item index coincide.

use horizon_dataview_core::logging::targets;

use crate::node::{NodeId, NodeTree};
use crate::row::Row;

/// The row a node currently occupies.
///
/// Returns [`Row::INVALID`] if the node is stale, is the root, or has a
/// collapsed ancestor.
pub fn node_to_row(tree: &NodeTree, id: NodeId) -> Row {
    if id == tree.root() || !tree.contains(id) {
        return Row::INVALID;
    }

    let mut path = tree.ancestors(id);
    path.reverse();
    path.push(id);

    let mut row = 0usize;
    let mut parent = tree.root();
    for &node in &path {
        let siblings = tree.children(parent);
        let Some(position) = siblings.iter().position(|&c| c == node) else {
            tracing::warn!(target: targets::TREE, ?node, "node missing from its parent's children");
            debug_assert!(false, "node {node:?} missing from its parent's children");
            return Row::INVALID;
        };
        row += siblings[..position]
            .iter()
            .map(|&s| tree.subtree_row_count(s))
            .sum::<usize>();

        if node != id {
            if !tree.is_expanded(node) {
                return Row::INVALID;
            }
            row += 1;
        }
        parent = node;
    }
    Row::new(row)
}

/// The node at a row, or `None` if the row is invalid or past the end.
pub fn row_to_node(tree: &NodeTree, row: Row) -> Option<NodeId> {
    let mut offset = row.index()?;
    if offset >= tree.row_count() {
        return None;
    }

    let mut current = tree.root();
    'descend: loop {
        for &child in tree.children(current) {
            let span = tree.subtree_row_count(child);
            if offset < span {
                if offset == 0 {
                    return Some(child);
                }
                offset -= 1;
                current = child;
                continue 'descend;
            }
            offset -= span;
        }
        tracing::warn!(target: targets::TREE, %row, ?current, "row count cache out of step with children");
        debug_assert!(false, "row {row} not found below {current:?}");
        return None;
    }
}
