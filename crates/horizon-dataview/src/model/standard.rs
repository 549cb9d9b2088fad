//! In-memory models.
//!
//! [`StandardTreeModel`] and [`StandardListModel`] keep rows of
//! [`CellValue`]s behind a `RwLock`, so they can be shared with the view
//! through an `Arc` and mutated from host code at the same time.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use super::{ItemKey, Model, TreeModel, VirtualListModel};
use crate::column::ColumnId;
use crate::value::CellValue;

/// One stored item.
struct Entry {
    parent: Option<ItemKey>,
    children: Vec<ItemKey>,
    values: Vec<CellValue>,
    row_height: Option<f32>,
}

struct TreeStorage {
    entries: HashMap<ItemKey, Entry>,
    roots: Vec<ItemKey>,
    next_key: u64,
}

impl TreeStorage {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            roots: Vec::new(),
            next_key: 0,
        }
    }

    fn allocate(&mut self) -> ItemKey {
        let key = ItemKey::new(self.next_key);
        self.next_key += 1;
        key
    }
}

/// A hierarchical in-memory model.
///
/// Each item holds one value per model column. Editability is configured per
/// column.
///
/// # Example
///
/// ```ignore
/// use horizon_dataview::model::StandardTreeModel;
///
/// let model = StandardTreeModel::new().with_editable_columns([0]);
/// let music = model.add_root(vec!["Music".into(), 3.into()]);
/// model.add_child(music, vec!["track01.ogg".into(), 1.into()]);
/// ```
pub struct StandardTreeModel {
    storage: RwLock<TreeStorage>,
    editable: RwLock<HashSet<ColumnId>>,
}

impl Default for StandardTreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardTreeModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(TreeStorage::new()),
            editable: RwLock::new(HashSet::new()),
        }
    }

    /// Mark columns editable using builder pattern.
    pub fn with_editable_columns(self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.editable.write().extend(columns.into_iter().map(ColumnId::new));
        self
    }

    pub fn set_column_editable(&self, column: ColumnId, editable: bool) {
        let mut set = self.editable.write();
        if editable {
            set.insert(column);
        } else {
            set.remove(&column);
        }
    }

    /// Add a top-level item.
    pub fn add_root(&self, values: Vec<CellValue>) -> ItemKey {
        let mut storage = self.storage.write();
        let key = storage.allocate();
        storage.entries.insert(
            key,
            Entry {
                parent: None,
                children: Vec::new(),
                values,
                row_height: None,
            },
        );
        storage.roots.push(key);
        key
    }

    /// Add a child item. Returns `None` if the parent does not exist.
    pub fn add_child(&self, parent: ItemKey, values: Vec<CellValue>) -> Option<ItemKey> {
        let mut storage = self.storage.write();
        if !storage.entries.contains_key(&parent) {
            return None;
        }
        let key = storage.allocate();
        storage.entries.insert(
            key,
            Entry {
                parent: Some(parent),
                children: Vec::new(),
                values,
                row_height: None,
            },
        );
        storage.entries.get_mut(&parent)?.children.push(key);
        Some(key)
    }

    /// Remove an item and its descendants. Returns `false` if it did not exist.
    pub fn remove(&self, key: ItemKey) -> bool {
        let mut storage = self.storage.write();
        let Some(parent) = storage.entries.get(&key).map(|e| e.parent) else {
            return false;
        };
        match parent {
            Some(parent) => {
                if let Some(parent_entry) = storage.entries.get_mut(&parent) {
                    parent_entry.children.retain(|&c| c != key);
                }
            }
            None => storage.roots.retain(|&r| r != key),
        }

        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(entry) = storage.entries.remove(&current) {
                stack.extend(entry.children);
            }
        }
        true
    }

    /// Remove every item.
    pub fn clear(&self) {
        let mut storage = self.storage.write();
        storage.entries.clear();
        storage.roots.clear();
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.storage.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parent of an item, `None` for top-level or unknown items.
    pub fn parent(&self, key: ItemKey) -> Option<ItemKey> {
        self.storage.read().entries.get(&key).and_then(|e| e.parent)
    }

    /// All values of an item.
    pub fn values(&self, key: ItemKey) -> Option<Vec<CellValue>> {
        self.storage.read().entries.get(&key).map(|e| e.values.clone())
    }

    /// Overwrite one value without the editability check.
    pub fn put_value(&self, key: ItemKey, column: ColumnId, value: CellValue) -> bool {
        let mut storage = self.storage.write();
        let Some(entry) = storage.entries.get_mut(&key) else {
            return false;
        };
        let index = column.index();
        if entry.values.len() <= index {
            entry.values.resize(index + 1, CellValue::None);
        }
        entry.values[index] = value;
        true
    }

    pub fn set_row_height(&self, key: ItemKey, height: Option<f32>) {
        if let Some(entry) = self.storage.write().entries.get_mut(&key) {
            entry.row_height = height;
        }
    }
}

impl Model for StandardTreeModel {
    fn value(&self, item: ItemKey, column: ColumnId) -> CellValue {
        self.storage
            .read()
            .entries
            .get(&item)
            .and_then(|e| e.values.get(column.index()).cloned())
            .unwrap_or_default()
    }

    fn is_editable(&self, item: ItemKey, column: ColumnId) -> bool {
        self.editable.read().contains(&column) && self.storage.read().entries.contains_key(&item)
    }

    fn set_value(&self, item: ItemKey, column: ColumnId, value: CellValue) -> bool {
        self.is_editable(item, column) && self.put_value(item, column, value)
    }

    fn row_height(&self, item: ItemKey) -> Option<f32> {
        self.storage.read().entries.get(&item).and_then(|e| e.row_height)
    }
}

impl TreeModel for StandardTreeModel {
    fn children(&self, parent: Option<ItemKey>) -> Vec<ItemKey> {
        let storage = self.storage.read();
        match parent {
            None => storage.roots.clone(),
            Some(key) => storage
                .entries
                .get(&key)
                .map(|e| e.children.clone())
                .unwrap_or_default(),
        }
    }

    fn has_children(&self, item: ItemKey) -> bool {
        self.storage
            .read()
            .entries
            .get(&item)
            .is_some_and(|e| !e.children.is_empty())
    }
}

/// A flat in-memory model for virtual-list views.
pub struct StandardListModel {
    rows: RwLock<Vec<Vec<CellValue>>>,
    editable: RwLock<HashSet<ColumnId>>,
}

impl Default for StandardListModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardListModel {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            editable: RwLock::new(HashSet::new()),
        }
    }

    /// Create a model from rows of values.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            rows: RwLock::new(rows),
            editable: RwLock::new(HashSet::new()),
        }
    }

    /// Mark columns editable using builder pattern.
    pub fn with_editable_columns(self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.editable.write().extend(columns.into_iter().map(ColumnId::new));
        self
    }

    pub fn push(&self, values: Vec<CellValue>) -> usize {
        let mut rows = self.rows.write();
        rows.push(values);
        rows.len() - 1
    }

    /// Insert a row at `index` (clamped to the end).
    pub fn insert(&self, index: usize, values: Vec<CellValue>) -> usize {
        let mut rows = self.rows.write();
        let index = index.min(rows.len());
        rows.insert(index, values);
        index
    }

    pub fn remove(&self, index: usize) -> Option<Vec<CellValue>> {
        let mut rows = self.rows.write();
        (index < rows.len()).then(|| rows.remove(index))
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Model for StandardListModel {
    fn value(&self, item: ItemKey, column: ColumnId) -> CellValue {
        self.rows
            .read()
            .get(item.index())
            .and_then(|row| row.get(column.index()).cloned())
            .unwrap_or_default()
    }

    fn is_editable(&self, item: ItemKey, column: ColumnId) -> bool {
        self.editable.read().contains(&column) && item.index() < self.len()
    }

    fn set_value(&self, item: ItemKey, column: ColumnId, value: CellValue) -> bool {
        if !self.is_editable(item, column) {
            return false;
        }
        let mut rows = self.rows.write();
        let Some(row) = rows.get_mut(item.index()) else {
            return false;
        };
        let index = column.index();
        if row.len() <= index {
            row.resize(index + 1, CellValue::None);
        }
        row[index] = value;
        true
    }
}

impl VirtualListModel for StandardListModel {
    fn item_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_model_structure() {
        let model = StandardTreeModel::new();
        let a = model.add_root(vec!["a".into()]);
        let b = model.add_root(vec!["b".into()]);
        let a1 = model.add_child(a, vec!["a1".into()]).unwrap();

        assert_eq!(model.children(None), vec![a, b]);
        assert_eq!(model.children(Some(a)), vec![a1]);
        assert!(model.has_children(a));
        assert!(!model.has_children(b));
        assert_eq!(model.parent(a1), Some(a));
        assert!(model.add_child(ItemKey::new(999), vec![]).is_none());
    }

    #[test]
    fn test_tree_model_remove_subtree() {
        let model = StandardTreeModel::new();
        let a = model.add_root(vec![]);
        let a1 = model.add_child(a, vec![]).unwrap();
        model.add_child(a1, vec![]).unwrap();
        assert_eq!(model.len(), 3);

        assert!(model.remove(a));
        assert!(model.is_empty());
        assert!(!model.remove(a));
    }

    #[test]
    fn test_tree_model_editing() {
        let model = StandardTreeModel::new().with_editable_columns([1]);
        let a = model.add_root(vec!["name".into(), 1.into()]);

        assert!(!model.set_value(a, ColumnId::new(0), "x".into()));
        assert!(model.set_value(a, ColumnId::new(1), 5.into()));
        assert_eq!(model.value(a, ColumnId::new(1)), CellValue::Int(5));
        assert_eq!(model.value(a, ColumnId::new(7)), CellValue::None);

        model.set_column_editable(ColumnId::new(1), false);
        assert!(!model.is_editable(a, ColumnId::new(1)));
    }

    #[test]
    fn test_list_model() {
        let model = StandardListModel::from_rows(vec![vec!["x".into()], vec!["y".into()]])
            .with_editable_columns([0]);
        assert_eq!(model.item_count(), 2);
        assert_eq!(model.insert(1, vec!["z".into()]), 1);
        assert_eq!(model.value(ItemKey::from_index(1), ColumnId::new(0)), CellValue::from("z"));
        assert!(model.set_value(ItemKey::from_index(2), ColumnId::new(0), "w".into()));
        assert!(!model.set_value(ItemKey::from_index(5), ColumnId::new(0), "w".into()));
        assert_eq!(model.remove(0), Some(vec![CellValue::from("x")]));
        assert_eq!(model.remove(9), None);
    }
}
