//! Model collaborator interfaces.
//!
//! The view never stores cell values. It asks a model for children, values
//! and editability, and writes committed edits back through it. Two kinds of
//! model exist, chosen once when the view is built (see [`ModelKind`]):
//!
//! - [`TreeModel`]: hierarchical items. The view materializes a node per
//!   item, lazily, as parents are expanded.
//! - [`VirtualListModel`]: a flat list addressed by index. There is no node
//!   tree; row `r` is item `r`.
//!
//! Models do not notify the view on their own. Whoever mutates a model tells
//! the view through the structural notification methods on
//! [`MainWindow`](crate::MainWindow) (`insert_item`, `remove_item`,
//! `items_inserted`, `value_changed`, ...).
//!
//! # Example
//!
//! ```ignore
//! use horizon_dataview::model::{ModelKind, StandardTreeModel};
//!
//! let model = StandardTreeModel::new();
//! let docs = model.add_root(vec!["Documents".into()]);
//! model.add_child(docs, vec!["report.txt".into()]);
//!
//! let kind = ModelKind::tree(model);
//! ```

mod standard;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub use standard::{StandardListModel, StandardTreeModel};

use crate::column::ColumnId;
use crate::value::CellValue;

/// Model-side identity of an item.
///
/// Tree models choose their keys freely (except [`ItemKey::ROOT`]). In
/// virtual-list mode the key is the item index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey(u64);

impl ItemKey {
    /// Reserved for the view's synthetic root.
    pub const ROOT: ItemKey = ItemKey(u64::MAX);

    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Key of the item at `index` of a virtual list.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u64)
    }

    /// The item index of a virtual-list key.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == ItemKey::ROOT {
            f.write_str("#root")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Cell-level contract shared by both model kinds.
pub trait Model: Send + Sync {
    /// The value displayed in a cell. Return `CellValue::None` for "no data".
    fn value(&self, item: ItemKey, column: ColumnId) -> CellValue;

    /// The value an editor starts from. Defaults to [`Model::value`].
    fn editor_value(&self, item: ItemKey, column: ColumnId) -> CellValue {
        self.value(item, column)
    }

    /// Whether the cell may be edited in place. Read-only by default.
    fn is_editable(&self, _item: ItemKey, _column: ColumnId) -> bool {
        false
    }

    /// Store a committed value. Returns `true` if the value was accepted.
    fn set_value(&self, _item: ItemKey, _column: ColumnId, _value: CellValue) -> bool {
        false
    }

    /// Per-item row height used when variable row heights are enabled.
    fn row_height(&self, _item: ItemKey) -> Option<f32> {
        None
    }
}

/// A hierarchical model.
pub trait TreeModel: Model {
    /// Children of `parent` in display order; `None` asks for the top level.
    fn children(&self, parent: Option<ItemKey>) -> Vec<ItemKey>;

    /// Whether an item has children, asked before the children are loaded.
    fn has_children(&self, item: ItemKey) -> bool {
        !self.children(Some(item)).is_empty()
    }

    /// Ordering of two siblings when the view is sorted by `column`.
    fn compare(&self, a: ItemKey, b: ItemKey, column: ColumnId, ascending: bool) -> Ordering {
        let order = self.value(a, column).sort_cmp(&self.value(b, column));
        if ascending { order } else { order.reverse() }
    }
}

/// A flat model addressed by index.
pub trait VirtualListModel: Model {
    fn item_count(&self) -> usize;
}

/// The model a view is built on.
#[derive(Clone)]
pub enum ModelKind {
    Tree(Arc<dyn TreeModel>),
    VirtualList(Arc<dyn VirtualListModel>),
}

impl ModelKind {
    /// Wrap a tree model.
    pub fn tree(model: impl TreeModel + 'static) -> Self {
        ModelKind::Tree(Arc::new(model))
    }

    /// Wrap a virtual-list model.
    pub fn virtual_list(model: impl VirtualListModel + 'static) -> Self {
        ModelKind::VirtualList(Arc::new(model))
    }

    pub fn is_virtual_list(&self) -> bool {
        matches!(self, ModelKind::VirtualList(_))
    }

    /// The cell-level interface of either kind.
    pub fn cells(&self) -> &dyn Model {
        match self {
            ModelKind::Tree(model) => model.as_ref(),
            ModelKind::VirtualList(model) => model.as_ref(),
        }
    }
}

impl fmt::Debug for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Tree(_) => f.write_str("ModelKind::Tree"),
            ModelKind::VirtualList(model) => {
                write!(f, "ModelKind::VirtualList({} items)", model.item_count())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Numbers;

    impl Model for Numbers {
        fn value(&self, item: ItemKey, _column: ColumnId) -> CellValue {
            CellValue::Int(10 - item.get() as i64)
        }
    }

    impl TreeModel for Numbers {
        fn children(&self, parent: Option<ItemKey>) -> Vec<ItemKey> {
            match parent {
                None => (0..3).map(ItemKey::new).collect(),
                Some(_) => Vec::new(),
            }
        }
    }

    #[test]
    fn test_default_compare_uses_values() {
        let model = Numbers;
        let col = ColumnId::new(0);
        // Values are 10, 9: key 0 sorts after key 1 ascending.
        assert_eq!(model.compare(ItemKey::new(0), ItemKey::new(1), col, true), Ordering::Greater);
        assert_eq!(model.compare(ItemKey::new(0), ItemKey::new(1), col, false), Ordering::Less);
        assert!(!model.has_children(ItemKey::new(0)));
    }

    #[test]
    fn test_model_kind_dispatch() {
        let kind = ModelKind::tree(Numbers);
        assert!(!kind.is_virtual_list());
        assert_eq!(kind.cells().value(ItemKey::new(3), ColumnId::new(0)), CellValue::Int(7));
        assert!(!kind.cells().is_editable(ItemKey::new(3), ColumnId::new(0)));
    }

    #[test]
    fn test_item_key_display() {
        assert_eq!(ItemKey::new(4).to_string(), "#4");
        assert_eq!(ItemKey::ROOT.to_string(), "#root");
        assert_eq!(ItemKey::from_index(9).index(), 9);
    }
}
