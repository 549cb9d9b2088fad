//! Row layout, hit-testing, scrolling and painting.
//!
//! Content coordinates start at the top-left of row 0. Everything the host
//! passes in or gets back (`hit_test`, `item_rect`, painting) is in view
//! coordinates, i.e. content coordinates minus the scroll offset.

use horizon_dataview_core::logging::{span_names, targets};
use horizon_dataview_core::{PerfSpan, Point, Rect, Size};

use super::MainWindow;
use crate::column::ColumnId;
use crate::item::Item;
use crate::model::{ItemKey, ModelKind};
use crate::node::NodeId;
use crate::renderer::{CellState, Surface};
use crate::row::Row;

/// Rows measured by `column_best_width` when no viewport is known.
const MAX_MEASURED_ROWS: usize = 500;

impl MainWindow {
    // =========================================================================
    // Row layout
    // =========================================================================

    fn uses_variable_heights(&self) -> bool {
        self.config.variable_row_height
    }

    fn item_height(&self, item: Item) -> f32 {
        let height = match item {
            Item::Node(node) => self.tree.get(node).and_then(|n| n.row_height()),
            Item::Index(index) => self.model.cells().row_height(ItemKey::from_index(index)),
        };
        height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(self.config.uniform_row_height)
    }

    /// Visible items in row order. Only walked in variable-height mode.
    fn items_in_order(&self) -> Box<dyn Iterator<Item = Item> + '_> {
        match self.model {
            ModelKind::Tree(_) => Box::new(self.tree.visible_nodes().into_iter().map(Item::Node)),
            ModelKind::VirtualList(_) => Box::new((0..self.row_count()).map(Item::Index)),
        }
    }

    /// Run `f` over the variable-height prefix sums, measuring every row once
    /// after each layout change.
    fn with_row_tops<R>(&self, f: impl FnOnce(&[f32]) -> R) -> R {
        let mut cache = self.row_tops.borrow_mut();
        let tops = cache.get_or_insert_with(|| {
            let mut tops = Vec::with_capacity(self.row_count() + 1);
            let mut y = 0.0;
            tops.push(y);
            for item in self.items_in_order() {
                y += self.item_height(item);
                tops.push(y);
            }
            tracing::trace!(target: targets::WINDOW, rows = tops.len() - 1, height = y, "row layout measured");
            tops
        });
        f(tops)
    }

    /// Height of a row.
    pub fn row_height(&self, row: Row) -> f32 {
        if !self.uses_variable_heights() {
            return self.config.uniform_row_height;
        }
        match self.item_at_row(row) {
            Some(item) => self.item_height(item),
            None => self.config.uniform_row_height,
        }
    }

    /// Top of a row in content coordinates.
    ///
    /// Rows past the end (and [`Row::INVALID`]) start at the bottom of the
    /// last row.
    pub fn row_start(&self, row: Row) -> f32 {
        let count = self.row_count();
        let index = row.index().map_or(count, |r| r.min(count));
        if !self.uses_variable_heights() {
            return index as f32 * self.config.uniform_row_height;
        }
        self.with_row_tops(|tops| tops[index.min(tops.len() - 1)])
    }

    /// The row at a content y coordinate, or [`Row::INVALID`] outside the rows.
    pub fn row_at(&self, y: f32) -> Row {
        let row = self.row_at_unclamped(y);
        if row.index().is_some_and(|r| r < self.row_count()) {
            row
        } else {
            Row::INVALID
        }
    }

    /// Like [`row_at`](Self::row_at), but past the last row it returns the
    /// row that would be there.
    fn row_at_unclamped(&self, y: f32) -> Row {
        if !y.is_finite() || y < 0.0 {
            return Row::INVALID;
        }
        if !self.uses_variable_heights() {
            return Row::new((y / self.config.uniform_row_height) as usize);
        }

        self.with_row_tops(|tops| {
            let rows = tops.len() - 1;
            let bottom = tops[rows];
            if y < bottom {
                // tops[0] == 0.0 <= y, so at least one top is at or above y.
                Row::new(tops.partition_point(|&top| top <= y) - 1)
            } else {
                Row::new(rows + ((y - bottom) / self.config.uniform_row_height) as usize)
            }
        })
    }

    pub fn set_uniform_row_height(&mut self, height: f32) {
        if height.is_finite() && height > 0.0 {
            self.config.uniform_row_height = height;
            self.invalidate_layout();
            self.clamp_scroll_offset();
            self.refresh_all();
        }
    }

    pub fn set_variable_row_height(&mut self, enabled: bool) {
        self.config.variable_row_height = enabled;
        self.invalidate_layout();
        self.clamp_scroll_offset();
        self.refresh_all();
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Total width of the visible columns.
    pub fn row_width(&self) -> f32 {
        self.columns.iter().map(|c| c.exposed_width()).sum()
    }

    /// Left edge of a visible column in content coordinates.
    pub fn column_x(&self, id: ColumnId) -> Option<f32> {
        let mut x = 0.0;
        for column in &self.columns {
            if column.id() == id {
                return column.is_visible().then_some(x);
            }
            x += column.exposed_width();
        }
        None
    }

    /// The visible column at a content x coordinate.
    pub fn column_at_x(&self, x: f32) -> Option<ColumnId> {
        if x < 0.0 {
            return None;
        }
        let mut right = 0.0;
        for column in self.columns.iter().filter(|c| c.is_visible()) {
            right += column.width();
            if x < right {
                return Some(column.id());
            }
        }
        None
    }

    /// The column showing the tree structure: the configured one if it is
    /// visible, otherwise the first visible column.
    pub fn expander_column(&self) -> Option<ColumnId> {
        self.config
            .expander_column
            .filter(|&id| self.column(id).is_some_and(|c| c.is_visible()))
            .or_else(|| self.columns.iter().find(|c| c.is_visible()).map(|c| c.id()))
    }

    pub(super) fn is_expander_column(&self, column: ColumnId) -> bool {
        !self.is_virtual_list() && self.expander_column() == Some(column)
    }

    /// Horizontal space taken by tree structure in the expander column.
    fn structure_offset(&self, node: NodeId) -> f32 {
        self.config.indent * self.tree.indent_level(node) as f32 + self.config.uniform_row_height
    }

    // =========================================================================
    // Hit-testing and rectangles
    // =========================================================================

    /// The item and column under a point in view coordinates.
    pub fn hit_test(&self, point: Point) -> (Option<Item>, Option<ColumnId>) {
        let content = point.offset(self.scroll_offset.x, self.scroll_offset.y);
        let item = self.item_at_row(self.row_at(content.y));
        (item, self.column_at_x(content.x))
    }

    /// The unindented cell rectangle in view coordinates.
    fn cell_rect(&self, row: Row, column: Option<ColumnId>) -> Option<Rect> {
        if !row.is_valid() {
            return None;
        }
        let y = self.row_start(row) - self.scroll_offset.y;
        let height = self.row_height(row);
        let (x, width) = match column {
            None => (0.0, self.row_width()),
            Some(id) => (self.column_x(id)?, self.column(id)?.width()),
        };
        Some(Rect::new(x - self.scroll_offset.x, y, width, height))
    }

    /// Where an item is drawn, in view coordinates.
    ///
    /// With a column, the rectangle of that cell; in the expander column of a
    /// tree this excludes the indentation and the expander. Without a column,
    /// the whole row. Empty if the item is not visible or the column is
    /// hidden.
    pub fn item_rect(&self, item: Item, column: Option<ColumnId>) -> Rect {
        let row = self.row_of_item(item);
        let Some(rect) = self.cell_rect(row, column) else {
            return Rect::ZERO;
        };
        match (item.node(), column) {
            (Some(node), Some(id)) if self.is_expander_column(id) => {
                let offset = self.structure_offset(node).min(rect.width());
                Rect::new(rect.x() + offset, rect.y(), rect.width() - offset, rect.height())
            }
            _ => rect,
        }
    }

    /// The expander box of a node in view coordinates, if it has one.
    pub(super) fn expander_rect(&self, node: NodeId) -> Option<Rect> {
        if !self.tree.has_children(node) {
            return None;
        }
        let column = self.expander_column()?;
        let cell = self.cell_rect(node_row(self, node)?, Some(column))?;
        let size = self.config.uniform_row_height.min(cell.height());
        let x = cell.x() + self.config.indent * self.tree.indent_level(node) as f32;
        let y = cell.y() + (cell.height() - size) / 2.0;
        Some(Rect::new(x, y, size, size))
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// The host resized the view.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        self.clamp_scroll_offset();
        self.refresh_all();
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll_offset
    }

    /// Scroll to an offset, clamped to the content.
    pub fn set_scroll_offset(&mut self, offset: Point) {
        let previous = self.scroll_offset;
        self.scroll_offset = offset;
        self.clamp_scroll_offset();
        if self.scroll_offset != previous {
            self.refresh_all();
            tracing::trace!(target: targets::WINDOW, x = self.scroll_offset.x, y = self.scroll_offset.y, "scrolled");
        }
    }

    /// Pull the scroll offset back inside the content after it shrank.
    pub(super) fn clamp_scroll_offset(&mut self) {
        let content = self.virtual_size();
        let max_x = (content.width - self.viewport.width).max(0.0);
        let max_y = (content.height - self.viewport.height).max(0.0);
        let x = if self.scroll_offset.x.is_finite() { self.scroll_offset.x } else { 0.0 };
        let y = if self.scroll_offset.y.is_finite() { self.scroll_offset.y } else { 0.0 };
        self.scroll_offset = Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y));
    }

    /// Put a row at the top of the view.
    pub fn scroll_to(&mut self, row: Row) {
        if row.is_valid() {
            let y = self.row_start(row);
            self.set_scroll_offset(Point::new(self.scroll_offset.x, y));
        }
    }

    /// Scroll the least amount that makes a row fully visible.
    pub fn ensure_visible(&mut self, row: Row) {
        if !row.index().is_some_and(|r| r < self.row_count()) {
            return;
        }
        let top = self.row_start(row);
        let bottom = top + self.row_height(row);
        let view_top = self.scroll_offset.y;
        let view_bottom = view_top + self.viewport.height;

        if top < view_top {
            self.set_scroll_offset(Point::new(self.scroll_offset.x, top));
        } else if bottom > view_bottom {
            self.set_scroll_offset(Point::new(self.scroll_offset.x, bottom - self.viewport.height));
        }
    }

    /// Expand an item's ancestors and scroll it into view.
    pub fn ensure_item_visible(&mut self, item: Item) {
        if let Some(node) = item.node() {
            self.expand_ancestors(node);
        }
        let row = self.row_of_item(item);
        self.ensure_visible(row);
    }

    /// The first row at least partly visible.
    pub fn first_visible_row(&self) -> Row {
        if self.is_empty() {
            return Row::INVALID;
        }
        self.row_at(self.scroll_offset.y)
    }

    /// The last row at least partly visible.
    pub fn last_visible_row(&self) -> Row {
        let count = self.row_count();
        if count == 0 {
            return Row::INVALID;
        }
        let bottom = self.scroll_offset.y + self.viewport.height;
        let row = self.row_at_unclamped((bottom - 1.0).max(self.scroll_offset.y));
        match row.index() {
            Some(r) => Row::new(r.min(count - 1)),
            None => Row::new(0),
        }
    }

    /// Whole rows fitting in the viewport.
    pub fn count_per_page(&self) -> usize {
        (self.viewport.height / self.config.uniform_row_height) as usize
    }

    /// Size of the scrollable content.
    pub fn virtual_size(&self) -> Size {
        Size::new(self.row_width(), self.row_start(Row::INVALID))
    }

    /// The width a column needs to show its visible cells without clipping.
    ///
    /// Cached per column until the data or the layout changes.
    pub fn column_best_width(&mut self, id: ColumnId) -> Option<f32> {
        let column = self.column(id)?;
        if let Some(width) = column.cached_best_width() {
            return Some(width);
        }

        let rows: Vec<Row> = match (self.first_visible_row().index(), self.viewport.is_empty()) {
            (Some(first), false) => {
                let last = self.last_visible_row().index().unwrap_or(first);
                (first..=last).map(Row::new).collect()
            }
            _ => (0..self.row_count().min(MAX_MEASURED_ROWS)).map(Row::new).collect(),
        };

        let renderer = self.renderer(id);
        let mut best = column.min_width();
        for row in rows {
            let Some(item) = self.item_at_row(row) else {
                continue;
            };
            let Some(key) = self.item_key(item) else {
                continue;
            };
            let value = self.model.cells().value(key, id);
            let mut width = renderer.cell_size(&value).width;
            if let Some(node) = item.node()
                && self.is_expander_column(id)
            {
                width += self.structure_offset(node);
            }
            best = best.max(width);
        }

        if let Some(column) = self.column_mut(id) {
            column.set_cached_best_width(best);
        }
        Some(best)
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Draw the visible rows onto a host surface.
    pub fn paint(&self, surface: &mut dyn Surface) {
        let _span = PerfSpan::new(span_names::PAINT);
        let (Some(first), Some(last)) = (self.first_visible_row().index(), self.last_visible_row().index()) else {
            return;
        };

        for index in first..=last {
            let row = Row::new(index);
            let Some(item) = self.item_at_row(row) else {
                break;
            };
            let key = self.item_key(item);
            let selected = self.selection.is_selected(row);
            let current = row == self.current_row;
            let hot = row == self.hot_track_row;

            for column in self.columns.iter().filter(|c| c.is_visible()) {
                let id = column.id();
                let Some(cell) = self.cell_rect(row, Some(id)) else {
                    continue;
                };
                let focused_cell = self.current_column.is_none_or(|c| c == id);
                let state = CellState::new()
                    .with_selected(selected)
                    .with_current(current && focused_cell)
                    .with_hot(hot && self.hot_track_column.is_none_or(|c| c == id))
                    .with_focused(self.has_focus);
                let renderer = self.renderer(id);

                renderer.draw_background(surface, cell, state);
                if let Some(node) = item.node()
                    && self.is_expander_column(id)
                    && let Some(expander) = self.expander_rect(node)
                {
                    let hot_expander = self.expander_under_mouse == Some(node);
                    surface.draw_expander(expander, self.tree.is_expanded(node), hot_expander);
                }

                let Some(key) = key else {
                    continue;
                };
                let value = self.model.cells().value(key, id);
                renderer.draw_content(surface, self.item_rect(item, Some(id)), &value, state);
            }
        }
    }
}

fn node_row(window: &MainWindow, node: NodeId) -> Option<Row> {
    let row = window.row_of_node(node);
    row.is_valid().then_some(row)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::column::Column;
    use crate::config::DataViewConfig;
    use crate::model::{StandardListModel, StandardTreeModel};
    use crate::value::CellValue;

    #[derive(Default)]
    struct Recorder {
        fills: usize,
        texts: Vec<String>,
        expanders: Vec<(Rect, bool)>,
    }

    impl Surface for Recorder {
        fn fill_rect(&mut self, _rect: Rect, _state: CellState) {
            self.fills += 1;
        }

        fn draw_text(&mut self, _rect: Rect, text: &str, _state: CellState) {
            self.texts.push(text.to_string());
        }

        fn draw_expander(&mut self, rect: Rect, expanded: bool, _hot: bool) {
            self.expanders.push((rect, expanded));
        }
    }

    fn list(rows: usize) -> MainWindow {
        let model = StandardListModel::from_rows(
            (0..rows).map(|i| vec![CellValue::from(format!("item {i}"))]).collect(),
        );
        MainWindow::new(
            ModelKind::virtual_list(model),
            vec![Column::new(0, "Name").with_width(100.0), Column::new(1, "Size").with_width(50.0)],
            DataViewConfig::default().with_uniform_row_height(20.0),
        )
        .unwrap()
    }

    fn tree() -> MainWindow {
        let model = Arc::new(StandardTreeModel::new());
        let parent = model.add_root(vec!["parent".into()]);
        model.add_child(parent, vec!["child".into()]);
        model.add_root(vec!["sibling".into()]);
        MainWindow::new(
            ModelKind::Tree(model),
            vec![Column::new(0, "Name").with_width(120.0)],
            DataViewConfig::default().with_uniform_row_height(20.0).with_indent(10.0),
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_layout() {
        let window = list(10);
        assert_eq!(window.row_start(Row::new(3)), 60.0);
        assert_eq!(window.row_at(59.9), Row::new(2));
        assert_eq!(window.row_at(200.0), Row::INVALID);
        assert_eq!(window.row_at(-1.0), Row::INVALID);
        assert_eq!(window.virtual_size(), Size::new(150.0, 200.0));
    }

    #[test]
    fn test_variable_heights() {
        let model = Arc::new(StandardTreeModel::new());
        for (i, height) in [Some(10.0), None, Some(40.0)].into_iter().enumerate() {
            let key = model.add_root(vec![CellValue::Int(i as i64)]);
            model.set_row_height(key, height);
        }
        let window = MainWindow::new(
            ModelKind::Tree(model),
            vec![Column::new(0, "N")],
            DataViewConfig::default()
                .with_uniform_row_height(20.0)
                .with_variable_row_height(true),
        )
        .unwrap();

        assert_eq!(window.row_height(Row::new(1)), 20.0);
        assert_eq!(window.row_start(Row::new(2)), 30.0);
        assert_eq!(window.row_at(29.0), Row::new(1));
        assert_eq!(window.row_at(69.0), Row::new(2));
        assert_eq!(window.row_at(70.0), Row::INVALID);
    }

    #[test]
    fn test_hit_test_applies_scroll_offset() {
        let mut window = list(10);
        window.set_viewport(Size::new(150.0, 50.0));
        window.set_scroll_offset(Point::new(0.0, 40.0));

        let (item, column) = window.hit_test(Point::new(120.0, 5.0));
        assert_eq!(item, Some(Item::Index(2)));
        assert_eq!(column, Some(ColumnId::new(1)));
        assert_eq!(window.hit_test(Point::new(160.0, 5.0)).1, None);
    }

    #[test]
    fn test_item_rect_indents_expander_column() {
        let mut window = tree();
        let parent = window.node_at_row(Row::new(0)).unwrap();
        window.expand(parent);
        let child = window.node_at_row(Row::new(1)).unwrap();

        let rect = window.item_rect(Item::Node(child), Some(ColumnId::new(0)));
        assert_eq!(rect, Rect::new(30.0, 20.0, 90.0, 20.0));
        assert_eq!(window.item_rect(Item::Node(child), None), Rect::new(0.0, 20.0, 120.0, 20.0));

        window.collapse(parent);
        assert!(window.item_rect(Item::Node(child), None).is_empty());
    }

    #[test]
    fn test_scroll_clamping_and_ensure_visible() {
        let mut window = list(10);
        window.set_viewport(Size::new(150.0, 50.0));
        window.set_scroll_offset(Point::new(0.0, 1_000.0));
        assert_eq!(window.scroll_offset().y, 150.0);

        window.ensure_visible(Row::new(1));
        assert_eq!(window.scroll_offset().y, 20.0);
        window.ensure_visible(Row::new(5));
        assert_eq!(window.scroll_offset().y, 70.0);
        assert_eq!(window.first_visible_row(), Row::new(3));
        assert_eq!(window.last_visible_row(), Row::new(5));
        assert_eq!(window.count_per_page(), 2);
    }

    /// A top-level folder with `children` leaves followed by a sibling,
    /// folder expanded and scrolled to the bottom of a three-row viewport.
    fn scrolled_folder(children: usize) -> (MainWindow, Arc<StandardTreeModel>, NodeId) {
        let model = Arc::new(StandardTreeModel::new());
        let folder = model.add_root(vec!["folder".into()]);
        for i in 0..children {
            model.add_child(folder, vec![CellValue::from(format!("leaf {i}"))]);
        }
        model.add_root(vec!["sibling".into()]);
        let mut window = MainWindow::new(
            ModelKind::Tree(model.clone()),
            vec![Column::new(0, "Name").with_width(120.0)],
            DataViewConfig::default().with_uniform_row_height(20.0),
        )
        .unwrap();
        window.set_viewport(Size::new(120.0, 60.0));
        let node = window.node_at_row(Row::new(0)).unwrap();
        window.expand(node);
        window.scroll_to(Row::new(children + 1));
        assert_eq!(window.scroll_offset().y, (children as f32 + 2.0) * 20.0 - 60.0);
        (window, model, node)
    }

    #[test]
    fn test_items_removed_pulls_scroll_back_into_content() {
        let model = Arc::new(StandardListModel::from_rows(
            (0..100).map(|i| vec![CellValue::from(format!("item {i}"))]).collect(),
        ));
        let mut window = MainWindow::new(
            ModelKind::VirtualList(model.clone()),
            vec![Column::new(0, "Name").with_width(100.0)],
            DataViewConfig::default().with_uniform_row_height(20.0),
        )
        .unwrap();
        window.set_viewport(Size::new(100.0, 100.0));
        window.scroll_to(Row::new(95));
        assert_eq!(window.scroll_offset().y, 1_900.0);

        for _ in 0..90 {
            model.remove(10);
        }
        window.items_removed(10, 90).unwrap();

        assert_eq!(window.row_count(), 10);
        assert_eq!(window.scroll_offset().y, 100.0);
        assert_eq!(window.first_visible_row(), Row::new(5));
        assert_eq!(window.hit_test(Point::new(5.0, 5.0)).0, Some(Item::Index(5)));
    }

    #[test]
    fn test_collapse_pulls_scroll_back_into_content() {
        let (mut window, _model, folder) = scrolled_folder(10);
        assert!(window.collapse(folder));

        assert_eq!(window.row_count(), 2);
        assert_eq!(window.scroll_offset().y, 0.0);
        assert_eq!(window.first_visible_row(), Row::new(0));

        let mut surface = Recorder::default();
        window.paint(&mut surface);
        assert_eq!(surface.texts, vec!["folder", "sibling"]);
    }

    #[test]
    fn test_remove_item_pulls_scroll_back_into_content() {
        let (mut window, _model, folder) = scrolled_folder(10);
        assert!(window.remove_item(folder));

        assert_eq!(window.row_count(), 1);
        assert_eq!(window.scroll_offset().y, 0.0);
        assert_eq!(window.first_visible_row(), Row::new(0));
        assert!(window.hit_test(Point::new(5.0, 5.0)).0.is_some());
    }

    #[test]
    fn test_items_cleared_pulls_scroll_back_into_content() {
        let (mut window, model, folder) = scrolled_folder(10);
        let key = window.item_key(Item::Node(folder)).unwrap();
        assert!(model.remove(key));
        window.items_cleared();

        assert_eq!(window.row_count(), 1);
        assert_eq!(window.scroll_offset().y, 0.0);
        assert_eq!(window.first_visible_row(), Row::new(0));
    }

    #[test]
    fn test_narrower_columns_pull_horizontal_scroll_back() {
        let mut window = list(10);
        window.set_viewport(Size::new(100.0, 50.0));
        window.set_scroll_offset(Point::new(50.0, 0.0));
        assert_eq!(window.scroll_offset().x, 50.0);

        window.set_column_visible(ColumnId::new(1), false);
        assert_eq!(window.scroll_offset().x, 0.0);

        window.set_column_visible(ColumnId::new(1), true);
        window.set_scroll_offset(Point::new(50.0, 0.0));
        window.set_column_width(ColumnId::new(0), 60.0);
        assert_eq!(window.scroll_offset().x, 10.0);
    }

    #[test]
    fn test_variable_heights_follow_layout_changes() {
        let model = Arc::new(StandardTreeModel::new());
        let folder = model.add_root(vec!["folder".into()]);
        model.set_row_height(folder, Some(30.0));
        let leaf = model.add_child(folder, vec!["leaf".into()]).unwrap();
        model.set_row_height(leaf, Some(50.0));
        model.add_root(vec!["last".into()]);
        let mut window = MainWindow::new(
            ModelKind::Tree(model.clone()),
            vec![Column::new(0, "N")],
            DataViewConfig::default()
                .with_uniform_row_height(20.0)
                .with_variable_row_height(true),
        )
        .unwrap();

        assert_eq!(window.row_start(Row::new(1)), 30.0);
        assert_eq!(window.virtual_size().height, 50.0);

        let node = window.node_at_row(Row::new(0)).unwrap();
        window.expand(node);
        assert_eq!(window.row_start(Row::new(2)), 80.0);
        assert_eq!(window.row_at(79.0), Row::new(1));
        assert_eq!(window.row_at(80.0), Row::new(2));

        model.set_row_height(folder, Some(10.0));
        window.value_changed(Item::Node(node), None);
        assert_eq!(window.row_start(Row::new(2)), 60.0);
        assert_eq!(window.row_at(9.0), Row::new(0));
        assert_eq!(window.row_at(10.0), Row::new(1));

        window.collapse(node);
        assert_eq!(window.row_start(Row::new(1)), 10.0);
        assert_eq!(window.virtual_size().height, 30.0);
        assert_eq!(window.row_at(30.0), Row::INVALID);
    }

    #[test]
    fn test_column_best_width_is_cached() {
        let mut window = list(3);
        let width = window.column_best_width(ColumnId::new(0)).unwrap();
        assert!(width > 0.0);
        assert_eq!(window.column(ColumnId::new(0)).unwrap().cached_best_width(), Some(width));
        assert_eq!(window.column_best_width(ColumnId::new(9)), None);
    }

    #[test]
    fn test_paint_visible_cells() {
        let mut window = tree();
        window.set_viewport(Size::new(120.0, 100.0));
        let parent = window.node_at_row(Row::new(0)).unwrap();
        window.expand(parent);
        window.select_row(Row::new(1), true);

        let mut surface = Recorder::default();
        window.paint(&mut surface);
        assert_eq!(surface.texts, vec!["parent", "child", "sibling"]);
        assert_eq!(surface.expanders.len(), 1);
        assert!(surface.expanders[0].1);
        assert_eq!(surface.fills, 1);
    }
}
