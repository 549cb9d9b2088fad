//! The data view orchestrator.
//!
//! [`MainWindow`] owns the node tree, the selection, the current row and
//! column, hot-track state and the open edit session. Every structural
//! change (expand, collapse, insert, remove, resort, clear) goes through it so
//! that selection and current row stay attached to the rows they describe.
//!
//! The implementation is split by concern:
//!
//! - this module: construction, tree building, expansion, structural
//!   notifications, selection and current row;
//! - `geometry`: row layout, hit-testing, scrolling and painting;
//! - `input`: keyboard and mouse handling;
//! - `editing`: the in-place edit session.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use horizon_dataview::prelude::*;
//!
//! let model = Arc::new(StandardTreeModel::new().with_editable_columns([0]));
//! let docs = model.add_root(vec!["Documents".into()]);
//! model.add_child(docs, vec!["report.txt".into()]);
//!
//! let columns = vec![Column::new(0, "Name").with_editable(true)];
//! let mut window = MainWindow::new(ModelKind::Tree(model), columns, DataViewConfig::default())?;
//!
//! let docs_node = window.node_at_row(Row::new(0)).unwrap();
//! window.expand(docs_node);
//! assert_eq!(window.row_count(), 2);
//! ```

mod dirty;
mod editing;
mod geometry;
mod input;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

use horizon_dataview_core::logging::{span_names, targets};
use horizon_dataview_core::{PerfSpan, Point, Size, TreeDebug};

pub use dirty::DirtyRegion;

use crate::column::{Column, ColumnId};
use crate::config::DataViewConfig;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::event::{DataViewEvent, DataViewSignals, EventKind};
use crate::item::Item;
use crate::model::{ItemKey, ModelKind, TreeModel};
use crate::node::{NodeId, NodeTree};
use crate::renderer::{DefaultRenderer, Renderer};
use crate::row::Row;
use crate::row_index::{node_to_row, row_to_node};
use crate::selection::{SelectionChange, SelectionMode, SelectionStore};

/// The data view core.
pub struct MainWindow {
    model: ModelKind,
    tree: NodeTree,
    columns: Vec<Column>,
    config: DataViewConfig,
    default_renderer: Arc<dyn Renderer>,
    signals: DataViewSignals,

    selection: SelectionStore,
    current_row: Row,
    current_column: Option<ColumnId>,
    current_column_by_keyboard: bool,
    has_focus: bool,

    hot_track_row: Row,
    hot_track_column: Option<ColumnId>,
    expander_under_mouse: Option<NodeId>,

    // Click bookkeeping for deferred selection and click-to-edit.
    row_select_single_on_up: Row,
    row_last_clicked: Row,
    row_before_last_clicked: Row,
    last_on_same: bool,

    sort: Option<(ColumnId, bool)>,
    /// Virtual-list item count, recomputed on demand.
    item_count: Cell<Option<usize>>,
    /// Prefix sums of row heights in variable-height mode: the top of every
    /// row, then the bottom of the last one. Rebuilt on demand.
    row_tops: RefCell<Option<Vec<f32>>>,

    viewport: Size,
    scroll_offset: Point,
    dirty: DirtyRegion,

    editor: Option<Editor>,
}

impl MainWindow {
    /// Build a view over `model`.
    ///
    /// Tree views materialize the top level immediately; deeper levels are
    /// loaded when their parent is first expanded.
    pub fn new(model: ModelKind, columns: Vec<Column>, config: DataViewConfig) -> Result<Self> {
        config.validate()?;
        if let Some(expander) = config.expander_column
            && !columns.iter().any(|c| c.id() == expander)
        {
            return Err(Error::UnknownColumn(expander));
        }

        let selection = SelectionStore::new().with_many_threshold(config.many_rows_threshold);
        let mut window = Self {
            model,
            tree: NodeTree::new(),
            columns,
            config,
            default_renderer: Arc::new(DefaultRenderer::new()),
            signals: DataViewSignals::new(),
            selection,
            current_row: Row::INVALID,
            current_column: None,
            current_column_by_keyboard: false,
            has_focus: false,
            hot_track_row: Row::INVALID,
            hot_track_column: None,
            expander_under_mouse: None,
            row_select_single_on_up: Row::INVALID,
            row_last_clicked: Row::INVALID,
            row_before_last_clicked: Row::INVALID,
            last_on_same: false,
            sort: None,
            item_count: Cell::new(None),
            row_tops: RefCell::new(None),
            viewport: Size::ZERO,
            scroll_offset: Point::ZERO,
            dirty: DirtyRegion::All,
            editor: None,
        };
        window.build_tree();

        tracing::debug!(
            target: targets::WINDOW,
            model = ?window.model,
            columns = window.columns.len(),
            rows = window.row_count(),
            "data view created"
        );
        Ok(window)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn model(&self) -> &ModelKind {
        &self.model
    }

    pub fn is_virtual_list(&self) -> bool {
        self.model.is_virtual_list()
    }

    /// The notifications this view emits.
    pub fn signals(&self) -> &DataViewSignals {
        &self.signals
    }

    /// The node tree. Empty for virtual lists.
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn config(&self) -> &DataViewConfig {
        &self.config
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id() == id)
    }

    fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id() == id)
    }

    /// Append a column, replacing any column with the same id.
    pub fn add_column(&mut self, column: Column) {
        match self.column_mut(column.id()) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        self.clamp_scroll_offset();
        self.refresh_all();
    }

    pub fn set_column_visible(&mut self, id: ColumnId, visible: bool) -> bool {
        let Some(column) = self.column_mut(id) else {
            return false;
        };
        column.set_visible(visible);
        self.clamp_scroll_offset();
        self.refresh_all();
        true
    }

    pub fn set_column_width(&mut self, id: ColumnId, width: f32) -> bool {
        let Some(column) = self.column_mut(id) else {
            return false;
        };
        column.set_width(width);
        self.clamp_scroll_offset();
        self.refresh_all();
        true
    }

    /// The renderer drawing a column: its own, or the view's default renderer.
    pub fn renderer(&self, column: ColumnId) -> Arc<dyn Renderer> {
        self.column(column)
            .and_then(|c| c.renderer().cloned())
            .unwrap_or_else(|| self.default_renderer.clone())
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Change the selection mode, trimming the selection to fit.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        match mode {
            SelectionMode::NoSelection => {
                if !self.selection.is_empty() {
                    self.selection.clear();
                    self.refresh_all();
                }
            }
            SelectionMode::SingleSelection if self.selection.len() > 1 => {
                let keep = if self.selection.is_selected(self.current_row) {
                    self.current_row
                } else {
                    self.selection.first()
                };
                self.selection.unselect_all(keep);
                self.refresh_all();
            }
            _ => {}
        }
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.config.selection_mode
    }

    pub fn set_indent(&mut self, indent: f32) {
        if indent.is_finite() && indent >= 0.0 {
            self.config.indent = indent;
            self.invalidate_best_widths();
            self.refresh_all();
        }
    }

    pub fn set_cell_focus(&mut self, enabled: bool) {
        self.config.cell_focus = enabled;
        if !enabled && self.current_column_by_keyboard {
            self.current_column = None;
            self.current_column_by_keyboard = false;
        }
        self.refresh_row(self.current_row);
    }

    // =========================================================================
    // Tree building
    // =========================================================================

    fn build_tree(&mut self) {
        let _span = PerfSpan::new(span_names::REBUILD);
        self.tree.clear();
        self.item_count.set(None);
        self.invalidate_layout();
        let root = self.tree.root();
        self.load_children(root);
    }

    /// Materialize a node's children from the model, once.
    fn load_children(&mut self, node: NodeId) {
        let ModelKind::Tree(model) = &self.model else {
            return;
        };
        let Some(entry) = self.tree.get(node) else {
            return;
        };
        if entry.children_loaded() {
            return;
        }
        let parent_key = (node != self.tree.root()).then_some(entry.key());

        let keys = model.children(parent_key);
        for key in keys {
            if let Some(child) = self.tree.append_child(node, key) {
                self.tree.set_has_children_hint(child, model.has_children(key));
                self.tree.set_row_height(child, model.row_height(key));
            }
        }
        self.tree.set_children_loaded(node, true);

        if let Some((column, ascending)) = self.sort {
            self.tree
                .sort_children(node, |a, b| model.compare(a, b, column, ascending));
        }
        self.invalidate_layout();
        tracing::trace!(target: targets::TREE, ?node, children = self.tree.child_count(node), "children loaded");
    }

    // =========================================================================
    // Rows and items
    // =========================================================================

    /// Number of visible rows.
    pub fn row_count(&self) -> usize {
        match &self.model {
            ModelKind::Tree(_) => self.tree.row_count(),
            ModelKind::VirtualList(model) => {
                if let Some(count) = self.item_count.get() {
                    return count;
                }
                let count = model.item_count();
                self.item_count.set(Some(count));
                count
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The item at a row, or `None` past the end.
    pub fn item_at_row(&self, row: Row) -> Option<Item> {
        match self.model {
            ModelKind::Tree(_) => row_to_node(&self.tree, row).map(Item::Node),
            ModelKind::VirtualList(_) => row
                .index()
                .filter(|&index| index < self.row_count())
                .map(Item::Index),
        }
    }

    /// The row an item occupies, or [`Row::INVALID`] if it is not visible.
    pub fn row_of_item(&self, item: Item) -> Row {
        match (&self.model, item) {
            (ModelKind::Tree(_), Item::Node(node)) => node_to_row(&self.tree, node),
            (ModelKind::VirtualList(_), Item::Index(index)) if index < self.row_count() => {
                Row::new(index)
            }
            _ => Row::INVALID,
        }
    }

    /// Tree views only: the node at a row.
    pub fn node_at_row(&self, row: Row) -> Option<NodeId> {
        row_to_node(&self.tree, row)
    }

    /// Tree views only: the row of a node.
    pub fn row_of_node(&self, node: NodeId) -> Row {
        node_to_row(&self.tree, node)
    }

    /// The model key of an item, if the item exists.
    pub fn item_key(&self, item: Item) -> Option<ItemKey> {
        match (&self.model, item) {
            (ModelKind::Tree(_), Item::Node(node)) if node != self.tree.root() => self.tree.key(node),
            (ModelKind::VirtualList(_), Item::Index(index)) if index < self.row_count() => {
                Some(ItemKey::from_index(index))
            }
            _ => None,
        }
    }

    /// Whether an item has (or reports) children.
    pub fn has_children(&self, item: Item) -> bool {
        item.node().is_some_and(|node| self.tree.has_children(node))
    }

    fn tree_model(&self) -> Option<Arc<dyn TreeModel>> {
        match &self.model {
            ModelKind::Tree(model) => Some(model.clone()),
            ModelKind::VirtualList(_) => None,
        }
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    pub fn is_expanded(&self, node: NodeId) -> bool {
        node != self.tree.root() && self.tree.is_expanded(node)
    }

    /// Expand a node, expanding its collapsed ancestors first.
    ///
    /// Returns `false` if nothing was expanded: the node has no children, is
    /// already expanded, or a listener vetoed `item_expanding`.
    pub fn expand(&mut self, node: NodeId) -> bool {
        if node == self.tree.root() || !self.tree.contains(node) {
            return false;
        }
        self.expand_ancestors(node);
        self.expand_node(node)
    }

    /// Expand every collapsed ancestor of `node`, top-down.
    ///
    /// Returns `true` if the node is visible afterwards.
    pub fn expand_ancestors(&mut self, node: NodeId) -> bool {
        let mut ancestors = self.tree.ancestors(node);
        ancestors.reverse();
        for ancestor in ancestors {
            if !self.tree.is_expanded(ancestor) && !self.expand_node(ancestor) {
                return false;
            }
        }
        self.tree.is_visible(node)
    }

    /// Collapse a node.
    ///
    /// Returns `false` if nothing was collapsed.
    pub fn collapse(&mut self, node: NodeId) -> bool {
        if node == self.tree.root() || !self.tree.is_expanded(node) || !self.tree.has_children(node) {
            return false;
        }

        let item = Item::Node(node);
        let event = self.notify(EventKind::ItemCollapsing, Some(item), None);
        if !event.is_allowed() {
            tracing::debug!(target: targets::TREE, ?node, "collapse vetoed");
            return false;
        }

        let row = node_to_row(&self.tree, node);
        let hidden = self.tree.expanded_row_count(node);

        if let Some(at) = row.index()
            && self.selection.on_items_deleted(at + 1, hidden)
        {
            self.refresh_row(row);
            self.notify(EventKind::SelectionChanged, Some(item), self.current_column);
        }
        self.tree.set_expanded(node, false);
        self.invalidate_layout();

        if let (Some(at), Some(current)) = (row.index(), self.current_row.index())
            && current > at
        {
            if current <= at + hidden {
                // The current row was inside the collapsed subtree.
                self.relocate_current_row(row);
            } else {
                self.current_row = Row::new(current - hidden);
            }
        }

        if let Some(editing) = self.editor.as_ref().and_then(|e| e.item().node())
            && !self.tree.is_visible(editing)
        {
            self.cancel_edit();
        }
        if self.expander_under_mouse.is_some_and(|n| !self.tree.is_visible(n)) {
            self.expander_under_mouse = None;
        }
        self.hot_track_row = Row::INVALID;

        self.clamp_scroll_offset();
        self.invalidate_best_widths();
        self.refresh_rows_after(row);
        tracing::debug!(target: targets::TREE, ?node, %row, hidden, "collapsed");

        self.notify(EventKind::ItemCollapsed, Some(item), None);
        true
    }

    /// Expand a collapsed node or collapse an expanded one.
    pub fn toggle_expand(&mut self, node: NodeId) -> bool {
        if self.is_expanded(node) {
            self.collapse(node)
        } else {
            self.expand(node)
        }
    }

    pub fn expand_row(&mut self, row: Row) -> bool {
        match self.node_at_row(row) {
            Some(node) => self.expand_node(node),
            None => false,
        }
    }

    pub fn collapse_row(&mut self, row: Row) -> bool {
        match self.node_at_row(row) {
            Some(node) => self.collapse(node),
            None => false,
        }
    }

    /// Expand every node of the tree, loading children as it goes.
    ///
    /// Models with unbounded depth should not be expanded this way.
    pub fn expand_all(&mut self) {
        let mut stack: Vec<NodeId> = self.tree.children(self.tree.root()).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            self.expand_node(node);
            if self.tree.is_expanded(node) {
                stack.extend(self.tree.children(node).iter().rev().copied());
            }
        }
    }

    /// The expansion protocol for one node whose ancestors are already handled.
    fn expand_node(&mut self, node: NodeId) -> bool {
        if node == self.tree.root() || !self.tree.contains(node) || self.tree.is_expanded(node) {
            return false;
        }
        self.load_children(node);
        if !self.tree.has_children(node) {
            return false;
        }

        let item = Item::Node(node);
        let event = self.notify(EventKind::ItemExpanding, Some(item), None);
        if !event.is_allowed() {
            tracing::debug!(target: targets::TREE, ?node, "expand vetoed");
            return false;
        }

        let row = node_to_row(&self.tree, node);
        let revealed = self.tree.set_expanded(node, true).unwrap_or(0);
        self.invalidate_layout();

        if let Some(at) = row.index() {
            self.selection.on_items_inserted(at + 1, revealed);
            if let Some(current) = self.current_row.index()
                && current > at
            {
                self.current_row = Row::new(current + revealed);
            }
            self.hot_track_row = Row::INVALID;
            self.refresh_rows_after(row);
        }

        self.invalidate_best_widths();
        tracing::debug!(target: targets::TREE, ?node, %row, revealed, "expanded");

        self.notify(EventKind::ItemExpanded, Some(item), None);
        true
    }

    // =========================================================================
    // Structural notifications
    // =========================================================================

    /// Tree views: the model gained item `key` under `parent` (`None` for the
    /// top level) at `position` among its siblings.
    ///
    /// Returns the new node, or `None` for virtual lists and stale parents.
    /// If the parent's children were never loaded, they are loaded now and
    /// the node already representing `key` is returned.
    pub fn insert_item(&mut self, parent: Option<NodeId>, position: usize, key: ItemKey) -> Option<NodeId> {
        let model = self.tree_model()?;
        let parent = parent.unwrap_or(self.tree.root());
        if !self.tree.contains(parent) {
            return None;
        }

        let loaded = self.tree.get(parent).is_some_and(|n| n.children_loaded());
        if !loaded {
            self.tree.set_has_children_hint(parent, true);
            self.load_children(parent);
            self.refresh_row(node_to_row(&self.tree, parent));
            return self
                .tree
                .children(parent)
                .iter()
                .copied()
                .find(|&c| self.tree.key(c) == Some(key));
        }

        let node = self.tree.insert_child(parent, position, key)?;
        self.tree.set_has_children_hint(node, model.has_children(key));
        self.tree.set_row_height(node, model.row_height(key));
        self.invalidate_layout();
        if let Some((column, ascending)) = self.sort {
            self.tree
                .reposition(node, |a, b| model.compare(a, b, column, ascending));
        }

        let row = node_to_row(&self.tree, node);
        if let Some(at) = row.index() {
            self.selection.on_items_inserted(at, 1);
            if let Some(current) = self.current_row.index()
                && current >= at
            {
                self.current_row = Row::new(current + 1);
            }
            self.hot_track_row = Row::INVALID;
            self.refresh_rows_after(row);
        } else {
            // Only the parent's expander may change.
            self.refresh_row(node_to_row(&self.tree, parent));
        }

        self.invalidate_best_widths();
        tracing::debug!(target: targets::TREE, ?node, ?parent, %row, "item inserted");
        Some(node)
    }

    /// Tree views: a node and its subtree left the model.
    pub fn remove_item(&mut self, node: NodeId) -> bool {
        if self.is_virtual_list() || node == self.tree.root() || !self.tree.contains(node) {
            return false;
        }

        if let Some(editing) = self.editor.as_ref().and_then(|e| e.item().node())
            && self.is_in_subtree(editing, node)
        {
            self.cancel_edit();
        }
        if self.expander_under_mouse.is_some_and(|n| self.is_in_subtree(n, node)) {
            self.expander_under_mouse = None;
        }

        let row = node_to_row(&self.tree, node);
        let span = self.tree.subtree_row_count(node);
        self.tree.remove(node);
        self.invalidate_layout();

        if let Some(at) = row.index() {
            if self.selection.on_items_deleted(at, span) {
                self.notify(EventKind::SelectionChanged, None, self.current_column);
            }
            if let Some(current) = self.current_row.index()
                && current >= at
            {
                if current < at + span {
                    self.relocate_current_row(Row::new(at));
                } else {
                    self.current_row = Row::new(current - span);
                }
            }
            self.hot_track_row = Row::INVALID;
            self.refresh_rows_after(row);
        }
        self.clamp_current_row();
        self.clamp_scroll_offset();

        self.invalidate_best_widths();
        tracing::debug!(target: targets::TREE, ?node, %row, span, "item removed");
        true
    }

    /// Virtual lists: `count` items were inserted before index `at`.
    pub fn items_inserted(&mut self, at: usize, count: usize) -> Result<()> {
        if !self.is_virtual_list() {
            return Err(Error::WrongModelKind { expected: "virtual list" });
        }
        self.item_count.set(None);
        self.invalidate_layout();
        if count == 0 {
            return Ok(());
        }

        self.selection.on_items_inserted(at, count);
        if let Some(current) = self.current_row.index()
            && current >= at
        {
            self.current_row = Row::new(current + count);
        }
        if let Some(editor) = self.editor.as_mut()
            && let Some(index) = editor.item().index()
            && index >= at
        {
            editor.retarget(Item::Index(index + count), ItemKey::from_index(index + count));
        }
        self.hot_track_row = Row::INVALID;
        self.invalidate_best_widths();
        self.refresh_rows_after(Row::new(at));
        tracing::debug!(target: targets::WINDOW, at, count, "items inserted");
        Ok(())
    }

    /// Virtual lists: items `at..at + count` were removed.
    pub fn items_removed(&mut self, at: usize, count: usize) -> Result<()> {
        if !self.is_virtual_list() {
            return Err(Error::WrongModelKind { expected: "virtual list" });
        }
        self.item_count.set(None);
        self.invalidate_layout();
        if count == 0 {
            return Ok(());
        }

        let end = at.saturating_add(count);
        let editing = self.editor.as_ref().and_then(|e| e.item().index());
        match editing {
            Some(index) if (at..end).contains(&index) => {
                self.cancel_edit();
            }
            Some(index) if index >= end => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.retarget(Item::Index(index - count), ItemKey::from_index(index - count));
                }
            }
            _ => {}
        }

        if self.selection.on_items_deleted(at, count) {
            self.notify(EventKind::SelectionChanged, None, self.current_column);
        }
        if let Some(current) = self.current_row.index()
            && current >= at
        {
            if current < end {
                self.relocate_current_row(Row::new(at));
            } else {
                self.current_row = Row::new(current - count);
            }
        }
        self.clamp_current_row();
        self.clamp_scroll_offset();

        self.hot_track_row = Row::INVALID;
        self.invalidate_best_widths();
        self.refresh_rows_after(Row::new(at));
        tracing::debug!(target: targets::WINDOW, at, count, "items removed");
        Ok(())
    }

    /// The model dropped all its items, or changed beyond incremental repair.
    ///
    /// Clears selection, current row and column, hot-track state and any open
    /// edit session, then rebuilds the tree from the model.
    pub fn items_cleared(&mut self) {
        self.cancel_edit();
        self.selection.clear();
        self.current_row = Row::INVALID;
        self.current_column = None;
        self.current_column_by_keyboard = false;
        self.hot_track_row = Row::INVALID;
        self.hot_track_column = None;
        self.expander_under_mouse = None;
        self.row_select_single_on_up = Row::INVALID;
        self.last_on_same = false;

        self.build_tree();
        self.clamp_scroll_offset();
        self.invalidate_best_widths();
        self.refresh_all();
        tracing::debug!(target: targets::WINDOW, rows = self.row_count(), "items cleared, tree rebuilt");
    }

    /// Alias of [`items_cleared`](Self::items_cleared).
    pub fn rebuild(&mut self) {
        self.items_cleared();
    }

    /// A cell value changed in the model.
    ///
    /// The item is moved to its sorted position (any column may take part in
    /// a comparison), cached best widths are dropped, the row is repainted
    /// and `value_changed` is sent. `column == None` means the whole item.
    pub fn value_changed(&mut self, item: Item, column: Option<ColumnId>) {
        if let (Some(node), Some(key)) = (item.node(), self.item_key(item)) {
            let height = self.model.cells().row_height(key);
            self.tree.set_row_height(node, height);
        }
        self.invalidate_layout();
        if self.config.variable_row_height {
            self.clamp_scroll_offset();
        }
        if let (Some(node), Some((sort_column, ascending)), Some(model)) =
            (item.node(), self.sort, self.tree_model())
            && self.tree.contains(node)
        {
            self.preserving_selection(|this| {
                this.tree
                    .reposition(node, |a, b| model.compare(a, b, sort_column, ascending));
            });
        }

        match column.and_then(|id| self.column_mut(id)) {
            Some(column) => column.invalidate_best_width(),
            None => self.invalidate_best_widths(),
        }
        self.refresh_row(self.row_of_item(item));

        let value = match (self.item_key(item), column) {
            (Some(key), Some(column)) => Some(self.model.cells().value(key, column)),
            _ => None,
        };
        let event = self.event(EventKind::ValueChanged, Some(item), column).with_value(value);
        self.signals.send(event);
    }

    /// Re-apply the current ordering: the sort column if one is set, the
    /// model's order otherwise.
    ///
    /// Node identity is preserved and the selection and current row follow
    /// their nodes to the new rows.
    pub fn resort(&mut self) {
        let Some(model) = self.tree_model() else {
            self.refresh_all();
            return;
        };
        let _span = PerfSpan::new(span_names::RESORT);
        let sort = self.sort;
        self.preserving_selection(|this| match sort {
            Some((column, ascending)) => {
                this.tree
                    .sort_recursive(|a, b| model.compare(a, b, column, ascending));
            }
            None => this.restore_model_order(model.as_ref()),
        });
        tracing::debug!(target: targets::TREE, ?sort, "resorted");
    }

    /// Sort by `column`. Tree views only; virtual lists sort in the model.
    pub fn set_sort(&mut self, column: ColumnId, ascending: bool) -> Result<()> {
        if self.is_virtual_list() {
            return Err(Error::WrongModelKind { expected: "tree" });
        }
        let sortable = self
            .column(column)
            .ok_or(Error::UnknownColumn(column))?
            .is_sortable();
        if !sortable {
            return Ok(());
        }
        self.sort = Some((column, ascending));
        self.resort();
        Ok(())
    }

    /// Return to the model's order.
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.resort();
        }
    }

    /// The active sort column and direction.
    pub fn sort_order(&self) -> Option<(ColumnId, bool)> {
        self.sort
    }

    fn restore_model_order(&mut self, model: &dyn TreeModel) {
        let mut stack = vec![self.tree.root()];
        while let Some(node) = stack.pop() {
            if self.tree.child_count(node) > 1 {
                let parent_key = (node != self.tree.root()).then(|| self.tree.key(node)).flatten();
                let order: HashMap<ItemKey, usize> = model
                    .children(parent_key)
                    .into_iter()
                    .enumerate()
                    .map(|(i, key)| (key, i))
                    .collect();
                let rank = |key: ItemKey| order.get(&key).copied().unwrap_or(usize::MAX);
                self.tree.sort_children(node, |a, b| rank(a).cmp(&rank(b)));
            }
            stack.extend(self.tree.children(node).iter().copied());
        }
    }

    /// Run a reordering and move selection and current row along with their
    /// nodes.
    fn preserving_selection<F>(&mut self, reorder: F)
    where
        F: FnOnce(&mut Self),
    {
        let selected: Vec<NodeId> = self
            .selection
            .iter()
            .filter_map(|row| row_to_node(&self.tree, row))
            .collect();
        let current = row_to_node(&self.tree, self.current_row);

        reorder(self);
        self.invalidate_layout();

        self.selection.clear();
        for node in selected {
            self.selection.select(node_to_row(&self.tree, node), true);
        }
        if let Some(node) = current {
            self.current_row = node_to_row(&self.tree, node);
        }
        self.hot_track_row = Row::INVALID;
        self.refresh_all();
    }

    fn is_in_subtree(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        candidate == ancestor || self.tree.ancestors(candidate).contains(&ancestor)
    }

    // =========================================================================
    // Current row and column
    // =========================================================================

    pub fn current_row(&self) -> Row {
        self.current_row
    }

    pub fn has_current_row(&self) -> bool {
        self.current_row.is_valid()
    }

    /// Make `row` current. Rows past the end clear the current row.
    pub fn set_current_row(&mut self, row: Row) {
        let row = if row.index().is_some_and(|r| r < self.row_count()) {
            row
        } else {
            Row::INVALID
        };
        self.change_current_row(row);
    }

    /// The item with keyboard focus.
    ///
    /// In single-selection mode this is the selected item, otherwise the item
    /// at the current row.
    pub fn current_item(&self) -> Option<Item> {
        match self.config.selection_mode {
            SelectionMode::SingleSelection => self.selection(),
            _ => self.item_at_row(self.current_row),
        }
    }

    /// The column with cell focus; `None` means the whole row.
    pub fn current_column(&self) -> Option<ColumnId> {
        self.current_column
    }

    pub fn set_current_column(&mut self, column: Option<ColumnId>) {
        self.current_column = column.filter(|&id| self.column(id).is_some());
        self.current_column_by_keyboard = false;
        self.refresh_row(self.current_row);
    }

    fn change_current_row(&mut self, row: Row) {
        if row != self.current_row {
            self.refresh_row(self.current_row);
            self.current_row = row;
            self.refresh_row(row);
            tracing::trace!(target: targets::WINDOW, %row, "current row changed");
        }
    }

    /// A structural change moved the current row: whole-row focus again.
    fn relocate_current_row(&mut self, row: Row) {
        self.current_row = row;
        self.current_column = None;
        self.current_column_by_keyboard = false;
    }

    fn clamp_current_row(&mut self) {
        let count = self.row_count();
        if let Some(current) = self.current_row.index()
            && current >= count
        {
            let row = if count == 0 { Row::INVALID } else { Row::new(count - 1) };
            self.relocate_current_row(row);
        }
    }

    // =========================================================================
    // Hot-track
    // =========================================================================

    /// The item under the mouse.
    pub fn hot_track_item(&self) -> Option<Item> {
        self.item_at_row(self.hot_track_row)
    }

    pub fn hot_track_column(&self) -> Option<ColumnId> {
        self.hot_track_column
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection_store(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn is_row_selected(&self, row: Row) -> bool {
        self.selection.is_selected(row)
    }

    pub fn is_item_selected(&self, item: Item) -> bool {
        self.selection.is_selected(self.row_of_item(item))
    }

    /// Select or unselect a row, honoring the selection mode.
    ///
    /// Returns `true` if its state changed.
    pub fn select_row(&mut self, row: Row, on: bool) -> bool {
        if on {
            match self.config.selection_mode {
                SelectionMode::NoSelection => return false,
                SelectionMode::SingleSelection if !self.selection.is_selected(row) => {
                    self.unselect_all_rows(Row::INVALID);
                }
                _ => {}
            }
        }
        let changed = self.selection.select(row, on);
        if changed {
            self.refresh_row(row);
        }
        changed
    }

    /// Select the inclusive range between two rows.
    pub fn select_rows(&mut self, from: Row, to: Row) {
        match self.config.selection_mode {
            SelectionMode::NoSelection => {}
            SelectionMode::SingleSelection => {
                self.select_row(to, true);
            }
            SelectionMode::MultiSelection => match self.selection.select_range(from, to, true) {
                SelectionChange::Rows(rows) => {
                    for row in rows {
                        self.refresh_row(row);
                    }
                }
                SelectionChange::Many { from, to } => self.refresh_rows(from, to),
            },
        }
    }

    /// Flip the selection state of a row.
    pub fn reverse_row_selection(&mut self, row: Row) {
        let on = !self.selection.is_selected(row);
        self.select_row(row, on);
    }

    /// Unselect every row except `except`.
    ///
    /// Returns `true` if nothing is selected afterwards.
    pub fn unselect_all_rows(&mut self, except: Row) -> bool {
        if self.selection.is_empty() {
            return true;
        }
        let dirty: Vec<Row> = self.selection.iter().filter(|&r| r != except).take(256).collect();
        if dirty.len() == 256 {
            self.refresh_all();
        } else {
            for row in dirty {
                self.refresh_row(row);
            }
        }
        self.selection.unselect_all(except)
    }

    /// Select an item, expanding its ancestors and making it current.
    pub fn select_item(&mut self, item: Item) -> bool {
        if self.config.selection_mode == SelectionMode::NoSelection {
            return false;
        }
        if let Some(node) = item.node() {
            self.expand_ancestors(node);
        }
        let row = self.row_of_item(item);
        if !row.is_valid() {
            return false;
        }
        self.select_row(row, true);
        self.change_current_row(row);
        self.notify(EventKind::SelectionChanged, Some(item), self.current_column);
        true
    }

    pub fn unselect_item(&mut self, item: Item) -> bool {
        let row = self.row_of_item(item);
        if self.selection.select(row, false) {
            self.refresh_row(row);
            self.notify(EventKind::SelectionChanged, Some(item), self.current_column);
            true
        } else {
            false
        }
    }

    /// Replace the selection. Single-selection views keep the first item.
    pub fn set_selections(&mut self, items: &[Item]) {
        self.unselect_all_rows(Row::INVALID);
        let limit = match self.config.selection_mode {
            SelectionMode::NoSelection => 0,
            SelectionMode::SingleSelection => 1,
            SelectionMode::MultiSelection => items.len(),
        };
        for &item in items.iter().take(limit) {
            if let Some(node) = item.node() {
                self.expand_ancestors(node);
            }
            let row = self.row_of_item(item);
            self.select_row(row, true);
        }
        let first = self.item_at_row(self.selection.first());
        self.notify(EventKind::SelectionChanged, first, self.current_column);
    }

    /// Selected items in row order.
    pub fn selections(&self) -> Vec<Item> {
        self.selection.iter().filter_map(|row| self.item_at_row(row)).collect()
    }

    /// The selected item, only when exactly one is selected.
    pub fn selection(&self) -> Option<Item> {
        if self.selection.len() == 1 {
            self.item_at_row(self.selection.first())
        } else {
            None
        }
    }

    /// Multi-selection views: select every row.
    pub fn select_all(&mut self) {
        if self.config.selection_mode != SelectionMode::MultiSelection {
            return;
        }
        self.selection.select_all(self.row_count());
        self.refresh_all();
        let first = self.item_at_row(self.selection.first());
        self.notify(EventKind::SelectionChanged, first, self.current_column);
    }

    pub fn unselect_all(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.unselect_all_rows(Row::INVALID);
        self.notify(EventKind::SelectionChanged, None, self.current_column);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The host window gained or lost keyboard focus.
    ///
    /// Gaining focus makes the first row current if there is no current row.
    pub fn set_focus(&mut self, focused: bool) {
        self.has_focus = focused;
        if focused && !self.current_row.is_valid() && !self.is_empty() {
            self.change_current_row(Row::new(0));
        }
        self.refresh_row(self.current_row);
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    // =========================================================================
    // Repaint tracking
    // =========================================================================

    /// The region accumulated since the last [`take_dirty`](Self::take_dirty).
    pub fn dirty(&self) -> &DirtyRegion {
        &self.dirty
    }

    /// Hand the accumulated repaint region to the host.
    pub fn take_dirty(&mut self) -> DirtyRegion {
        std::mem::take(&mut self.dirty)
    }

    pub fn refresh_row(&mut self, row: Row) {
        self.dirty.add_rows(row, row);
    }

    pub fn refresh_rows(&mut self, from: Row, to: Row) {
        self.dirty.add_rows(from, to);
    }

    /// Repaint `row` and everything below it.
    pub fn refresh_rows_after(&mut self, row: Row) {
        self.dirty.add_rows(row, Row::INVALID);
    }

    pub fn refresh_all(&mut self) {
        self.dirty.add_all();
    }

    /// Drop the cached row layout after rows or their heights changed.
    fn invalidate_layout(&self) {
        self.row_tops.replace(None);
    }

    fn invalidate_best_widths(&mut self) {
        for column in &mut self.columns {
            column.invalidate_best_width();
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    fn event(&self, kind: EventKind, item: Option<Item>, column: Option<ColumnId>) -> DataViewEvent {
        let key = item.and_then(|i| self.item_key(i));
        let row = item.map_or(Row::INVALID, |i| self.row_of_item(i));
        DataViewEvent::new(kind)
            .with_item(item, key)
            .with_row(row)
            .with_column(column)
    }

    fn notify(&self, kind: EventKind, item: Option<Item>, column: Option<ColumnId>) -> DataViewEvent {
        self.signals.send(self.event(kind, item, column))
    }

    // =========================================================================
    // Debugging
    // =========================================================================

    /// A text dump of the materialized tree.
    pub fn dump_tree(&self) -> String {
        match &self.model {
            ModelKind::Tree(_) => TreeDebug::new().format(&self.tree),
            ModelKind::VirtualList(_) => format!("Virtual list ({} items)\n", self.row_count()),
        }
    }
}

impl Drop for MainWindow {
    fn drop(&mut self) {
        self.cancel_edit();
    }
}

impl std::fmt::Debug for MainWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainWindow")
            .field("model", &self.model)
            .field("rows", &self.row_count())
            .field("selected", &self.selection.len())
            .field("current_row", &self.current_row)
            .field("current_column", &self.current_column)
            .field("editing", &self.editor.is_some())
            .finish()
    }
}
