//! View-side item handles.

use std::fmt;

use crate::node::NodeId;

/// An item as the view addresses it.
///
/// Tree views address items by node handle, which survives expand, collapse
/// and resort. Virtual-list views have no nodes; an item is its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Node(NodeId),
    Index(usize),
}

impl Item {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Item::Node(id) => Some(id),
            Item::Index(_) => None,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Item::Index(index) => Some(index),
            Item::Node(_) => None,
        }
    }
}

impl From<NodeId> for Item {
    fn from(id: NodeId) -> Self {
        Item::Node(id)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Node(id) => write!(f, "{id:?}"),
            Item::Index(index) => write!(f, "item {index}"),
        }
    }
}
