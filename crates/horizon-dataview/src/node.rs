//! The node tree behind a hierarchical data view.
//!
//! [`NodeTree`] is an arena of [`Node`]s addressed by [`NodeId`] handles. Each
//! node owns an ordered list of children and keeps a plain back-reference to
//! its parent. A synthetic root node is always present; it is never visible
//! and never has a row.
//!
//! Every node caches the number of visible rows its children contribute when
//! it is expanded. The cache is kept exact on every mutation by propagating
//! the change up the ancestor chain until the first collapsed ancestor, which
//! is what lets [`crate::row_index`] skip whole subtrees.
//!
//! A handle to a removed node is simply stale: lookups return `None`, an
//! empty slice or zero.

use std::cmp::Ordering;

use horizon_dataview_core::TreeSource;
use horizon_dataview_core::logging::targets;
use slotmap::{SlotMap, new_key_type};

use crate::model::ItemKey;

new_key_type! {
    /// Stable identity of a node in a [`NodeTree`].
    ///
    /// The handle stays valid across expand, collapse, resort and sibling
    /// insertion. It becomes stale once the node (or an ancestor) is removed.
    pub struct NodeId;
}

static_assertions::assert_impl_all!(NodeId: Send, Sync, Copy);

/// One entry of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    key: ItemKey,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
    /// Visible rows the children contribute while this node is expanded.
    expanded_rows: usize,
    children_loaded: bool,
    has_children_hint: bool,
    row_height: Option<f32>,
}

impl Node {
    fn new(key: ItemKey, parent: Option<NodeId>) -> Self {
        Self {
            key,
            parent,
            children: Vec::new(),
            expanded: false,
            expanded_rows: 0,
            children_loaded: false,
            has_children_hint: false,
            row_height: None,
        }
    }

    /// The model key of the item this node represents.
    pub fn key(&self) -> ItemKey {
        self.key
    }

    /// The parent node. Only the root has none.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The materialized children, in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the node has (or, before its children are loaded, reports) children.
    pub fn has_children(&self) -> bool {
        if self.children_loaded {
            !self.children.is_empty()
        } else {
            self.has_children_hint || !self.children.is_empty()
        }
    }

    /// Whether the children have been fetched from the model.
    pub fn children_loaded(&self) -> bool {
        self.children_loaded
    }

    /// Per-node row height, if the model supplied one.
    pub fn row_height(&self) -> Option<f32> {
        self.row_height
    }

    /// Rows occupied by this node and its visible descendants.
    pub fn subtree_row_count(&self) -> usize {
        if self.expanded { 1 + self.expanded_rows } else { 1 }
    }

    /// Rows that expanding this node reveals (or collapsing it hides).
    pub fn expanded_row_count(&self) -> usize {
        self.expanded_rows
    }
}

/// Arena-backed tree of nodes with cached visible row counts.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = Node::new(ItemKey::ROOT, None);
        root_node.expanded = true;
        let root = nodes.insert(root_node);
        Self { nodes, root }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The synthetic root. It is never visible.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether the handle refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key(&self, id: NodeId) -> Option<ItemKey> {
        self.nodes.get(id).map(Node::key)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_expanded)
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::has_children)
    }

    /// Depth below the root: top-level nodes have level 0.
    pub fn indent_level(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Rows occupied by the node and its visible descendants; 0 for a stale handle.
    pub fn subtree_row_count(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, Node::subtree_row_count)
    }

    /// Rows that expanding the node reveals; 0 for a stale handle.
    pub fn expanded_row_count(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, Node::expanded_row_count)
    }

    /// Total number of visible rows.
    pub fn row_count(&self) -> usize {
        self.nodes[self.root].expanded_rows
    }

    /// Ancestors from the parent upwards, excluding the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == self.root {
                break;
            }
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Whether the node currently has a row: live, not the root, and every
    /// ancestor expanded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        id != self.root
            && self.contains(id)
            && self.ancestors(id).into_iter().all(|a| self.is_expanded(a))
    }

    /// Find the node representing a model item. Linear in the tree size.
    pub fn find_by_key(&self, key: ItemKey) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(id, node)| *id != self.root && node.key == key)
            .map(|(id, _)| id)
    }

    /// All visible nodes in row order.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.row_count());
        let mut stack: Vec<NodeId> = self.children(self.root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if self.is_expanded(id) {
                stack.extend(self.children(id).iter().rev().copied());
            }
        }
        out
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append a new collapsed child under `parent`.
    pub fn append_child(&mut self, parent: NodeId, key: ItemKey) -> Option<NodeId> {
        let position = self.child_count(parent);
        self.insert_child(parent, position, key)
    }

    /// Insert a new collapsed child under `parent` at `position` (clamped).
    ///
    /// Returns `None` if `parent` is stale.
    pub fn insert_child(&mut self, parent: NodeId, position: usize, key: ItemKey) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.nodes.insert(Node::new(key, Some(parent)));
        let parent_node = &mut self.nodes[parent];
        let position = position.min(parent_node.children.len());
        parent_node.children.insert(position, id);
        self.propagate(parent, 1);

        tracing::trace!(target: targets::TREE, ?id, ?parent, position, "node inserted");
        Some(id)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns the rows the node occupied (its subtree row count), whether or
    /// not it was visible. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<usize> {
        if id == self.root {
            return None;
        }
        let node = self.nodes.get(id)?;
        let span = node.subtree_row_count();
        let parent = node.parent;

        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&c| c != id);
            }
            self.propagate(parent, -(span as isize));
        }

        let mut stack = vec![id];
        let mut removed = 0usize;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        tracing::debug!(target: targets::TREE, ?id, removed, span, "subtree removed");
        Some(span)
    }

    /// Remove every node except the root.
    pub fn clear(&mut self) {
        let root = self.root;
        self.nodes.retain(|id, _| id == root);
        let root_node = &mut self.nodes[root];
        root_node.children.clear();
        root_node.expanded_rows = 0;
        root_node.children_loaded = false;
    }

    /// Change the expansion flag.
    ///
    /// Returns the number of rows revealed or hidden, or `None` if the handle
    /// is stale, is the root, or the state did not change.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> Option<usize> {
        if id == self.root {
            return None;
        }
        let node = self.nodes.get_mut(id)?;
        if node.expanded == expanded {
            return None;
        }
        node.expanded = expanded;
        let delta = node.expanded_rows;
        let parent = node.parent;

        if let Some(parent) = parent {
            let signed = if expanded { delta as isize } else { -(delta as isize) };
            self.propagate(parent, signed);
        }
        Some(delta)
    }

    pub fn set_children_loaded(&mut self, id: NodeId, loaded: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.children_loaded = loaded;
        }
    }

    /// Record whether the model reports children for a node whose children
    /// are not loaded yet.
    pub fn set_has_children_hint(&mut self, id: NodeId, has_children: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.has_children_hint = has_children;
        }
    }

    pub fn set_row_height(&mut self, id: NodeId, height: Option<f32>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.row_height = height;
        }
    }

    /// Stable-sort the children of one node by comparing their keys.
    pub fn sort_children<F>(&mut self, parent: NodeId, mut compare: F)
    where
        F: FnMut(ItemKey, ItemKey) -> Ordering,
    {
        let Some(node) = self.nodes.get(parent) else {
            return;
        };
        let mut children = node.children.clone();
        children.sort_by(|&a, &b| compare(self.nodes[a].key, self.nodes[b].key));
        self.nodes[parent].children = children;
    }

    /// Stable-sort the children of every node that has any.
    ///
    /// Row counts are unaffected: sorting only permutes siblings.
    pub fn sort_recursive<F>(&mut self, mut compare: F)
    where
        F: FnMut(ItemKey, ItemKey) -> Ordering,
    {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            self.sort_children(id, &mut compare);
            stack.extend(self.children(id).iter().copied());
        }
    }

    /// Move a node to its place among its (already sorted) siblings.
    ///
    /// Returns `true` if its position changed.
    pub fn reposition<F>(&mut self, id: NodeId, mut compare: F) -> bool
    where
        F: FnMut(ItemKey, ItemKey) -> Ordering,
    {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let key = self.nodes[id].key;
        let mut siblings = self.nodes[parent].children.clone();
        let Some(old_position) = siblings.iter().position(|&c| c == id) else {
            return false;
        };
        siblings.remove(old_position);
        let new_position = siblings
            .partition_point(|&c| compare(self.nodes[c].key, key) != Ordering::Greater);
        siblings.insert(new_position, id);
        self.nodes[parent].children = siblings;
        new_position != old_position
    }

    /// Apply a row delta to `start` and up the ancestor chain, stopping after
    /// the first collapsed node.
    fn propagate(&mut self, start: NodeId, delta: isize) {
        let mut current = Some(start);
        while let Some(id) = current {
            let Some(node) = self.nodes.get_mut(id) else {
                break;
            };
            node.expanded_rows = match node.expanded_rows.checked_add_signed(delta) {
                Some(rows) => rows,
                None => {
                    debug_assert!(false, "visible row count underflow on {id:?}");
                    tracing::warn!(target: targets::TREE, ?id, delta, "row count underflow clamped");
                    0
                }
            };
            if !node.expanded {
                break;
            }
            current = node.parent;
        }
    }
}

impl TreeSource for NodeTree {
    type Id = NodeId;

    fn roots(&self) -> Vec<NodeId> {
        self.children(self.root).to_vec()
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        NodeTree::children(self, id).to_vec()
    }

    fn label(&self, id: NodeId) -> String {
        self.key(id).map_or_else(|| "(stale)".to_string(), |key| key.to_string())
    }

    fn details(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        Some(if node.expanded {
            format!("expanded, {} rows", node.subtree_row_count())
        } else if node.has_children() {
            "collapsed".to_string()
        } else {
            "leaf".to_string()
        })
    }
}
