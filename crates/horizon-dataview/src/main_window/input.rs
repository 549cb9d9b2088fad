//! Keyboard and mouse handling.

use horizon_dataview_core::logging::targets;

use super::MainWindow;
use crate::column::ColumnId;
use crate::event::EventKind;
use crate::input::{Key, KeyPress, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::item::Item;
use crate::node::NodeId;
use crate::row::Row;
use crate::selection::SelectionMode;

impl MainWindow {
    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press. Returns `true` if the view consumed it.
    pub fn key_press(&mut self, press: KeyPress) -> bool {
        let modifiers = press.modifiers;

        if self.is_editing() {
            return match press.key {
                Key::Escape => self.cancel_edit(),
                Key::Enter | Key::Tab if modifiers.none() => {
                    let outcome = self.end_edit();
                    tracing::debug!(target: targets::INPUT, ?outcome, "edit ended from keyboard");
                    true
                }
                _ => false,
            };
        }

        if self.config.cell_focus && press.key == Key::Tab && !modifiers.ctrl && !modifiers.alt {
            return if modifiers.shift {
                self.left_key(true)
            } else {
                self.right_key(true)
            };
        }

        if !self.current_row.is_valid() {
            return false;
        }

        let page = self.count_per_page().saturating_sub(1).max(1) as isize;
        let all = self.row_count() as isize;
        match press.key {
            Key::Enter if modifiers.none() => {
                let item = self.item_at_row(self.current_row);
                let event = self.notify(EventKind::ItemActivated, item, self.current_column);
                if event.is_handled() {
                    return true;
                }
                self.activate_current_row();
                true
            }
            Key::Space if modifiers.none() => {
                self.activate_current_row();
                true
            }
            Key::F2 if modifiers.none() => {
                self.edit_selected_row();
                true
            }
            Key::Up => self.vertical_navigation(-1, modifiers),
            Key::Down => self.vertical_navigation(1, modifiers),
            Key::Home => self.vertical_navigation(-all, modifiers),
            Key::End => self.vertical_navigation(all, modifiers),
            Key::PageUp => self.vertical_navigation(-page, modifiers),
            Key::PageDown => self.vertical_navigation(page, modifiers),
            Key::Left => self.left_key(false),
            Key::Right => self.right_key(false),
            _ => false,
        }
    }

    /// Space and unhandled Enter: let the renderer of the editing column act
    /// on the current cell.
    fn activate_current_row(&mut self) -> bool {
        let Some(item) = self.item_at_row(self.current_row) else {
            return false;
        };
        match self.find_column_for_editing(item) {
            Some(column) => self.activate_cell(item, column),
            None => false,
        }
    }

    /// F2: edit the current row if it is selected, the first selected row otherwise.
    fn edit_selected_row(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let row = if self.selection.is_selected(self.current_row) {
            self.current_row
        } else {
            self.selection.first()
        };
        let Some(item) = self.item_at_row(row) else {
            return false;
        };
        let Some(column) = self.find_column_for_editing(item) else {
            return false;
        };
        match self.edit_item(item, column) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(target: targets::INPUT, %item, ?column, %err, "F2 did not start an edit");
                false
            }
        }
    }

    /// Move the current row by `delta`, clamped to the rows.
    fn vertical_navigation(&mut self, delta: isize, modifiers: Modifiers) -> bool {
        if !self.current_row.is_valid() || self.is_empty() {
            return false;
        }
        let old = self.current_row;
        let new = old.offset(delta, self.row_count());
        if new == old {
            return true;
        }

        if modifiers.shift && self.config.selection_mode == SelectionMode::MultiSelection {
            self.change_current_row(new);
            let (from, to) = if old < new { (old, new) } else { (new, old) };
            self.select_rows(from, to);
            let first = self.item_at_row(self.selection.first());
            if first.is_some() {
                self.notify(EventKind::SelectionChanged, first, self.current_column);
            }
        } else if modifiers.ctrl {
            self.change_current_row(new);
        } else {
            self.unselect_all_rows(Row::INVALID);
            self.change_current_row(new);
            self.select_row(new, true);
            let item = self.item_at_row(new);
            self.notify(EventKind::SelectionChanged, item, self.current_column);
        }
        self.ensure_visible(self.current_row);
        true
    }

    /// Make `row` current and the only selected row, as keyboard moves do.
    fn move_selection_to(&mut self, row: Row) {
        self.select_row(self.current_row, false);
        self.select_row(row, true);
        self.change_current_row(row);
        self.ensure_visible(row);
        let item = self.item_at_row(row);
        self.notify(EventKind::SelectionChanged, item, self.current_column);
    }

    /// Left: previous column in cell-focus mode, otherwise collapse the
    /// current node or move to its parent.
    fn left_key(&mut self, wrap: bool) -> bool {
        if self.is_virtual_list() {
            return self.try_advance_column(None, false, wrap);
        }
        let Some(node) = self.node_at_row(self.current_row) else {
            return false;
        };
        if self.try_advance_column(Some(node), false, wrap) {
            return true;
        }
        if wrap {
            // Tab never collapses; focus may leave the view.
            self.current_column = None;
            self.refresh_row(self.current_row);
            return false;
        }

        if self.tree.has_children(node) && self.tree.is_expanded(node) {
            self.collapse(node);
            return true;
        }
        let parent = self.tree.parent(node).filter(|&p| p != self.tree.root());
        if let Some(parent) = parent {
            let row = self.row_of_node(parent);
            if row.is_valid() {
                self.move_selection_to(row);
            }
        }
        true
    }

    /// Right: expand the current node, move to its first child, or advance
    /// the column on leaf rows in cell-focus mode.
    fn right_key(&mut self, wrap: bool) -> bool {
        if self.is_virtual_list() {
            return self.try_advance_column(None, true, wrap);
        }
        let Some(node) = self.node_at_row(self.current_row) else {
            return false;
        };
        if !self.tree.has_children(node) {
            return self.try_advance_column(Some(node), true, wrap);
        }
        if !self.tree.is_expanded(node) {
            self.expand(node);
        } else if let Some(first_child) = self.current_row.index().map(|r| Row::new(r + 1))
            && first_child.index().is_some_and(|r| r < self.row_count())
        {
            self.move_selection_to(first_child);
        }
        true
    }

    /// Cell-focus column movement. Returns `false` when the movement does not
    /// apply and the key should get its row-level meaning instead.
    fn try_advance_column(&mut self, node: Option<NodeId>, forward: bool, wrap: bool) -> bool {
        let visible: Vec<ColumnId> = self
            .columns
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| c.id())
            .collect();
        if visible.is_empty() || !self.config.cell_focus {
            return false;
        }
        if node.is_some_and(|n| self.tree.has_children(n)) {
            return false;
        }

        let position = self
            .current_column
            .filter(|_| self.current_column_by_keyboard)
            .and_then(|current| visible.iter().position(|&c| c == current));
        let position = match position {
            Some(position) => position,
            None if forward => {
                let Some(&second) = visible.get(1) else {
                    return false;
                };
                self.current_column = Some(second);
                self.current_column_by_keyboard = true;
                self.refresh_row(self.current_row);
                return true;
            }
            None if wrap => 0,
            None => return false,
        };

        let count = self.row_count();
        let current = self.current_row.index().unwrap_or(0);
        let next = if forward {
            if position + 1 < visible.len() {
                position + 1
            } else if wrap && current + 1 < count {
                self.vertical_navigation(1, Modifiers::NONE);
                0
            } else {
                return false;
            }
        } else if position > 0 {
            position - 1
        } else if wrap && current > 0 {
            self.vertical_navigation(-1, Modifiers::NONE);
            visible.len() - 1
        } else {
            return false;
        };

        self.ensure_visible(self.current_row);
        if next == 0 {
            // Left of the second column is whole-row focus.
            self.current_column = None;
        } else {
            self.current_column = Some(visible[next]);
            self.current_column_by_keyboard = true;
        }
        self.refresh_row(self.current_row);
        true
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Handle a mouse event in view coordinates.
    pub fn mouse_event(&mut self, event: MouseEvent) {
        if event.kind == MouseEventKind::Leave {
            self.reset_expander_hover();
            return;
        }

        let content = event
            .position
            .offset(self.scroll_offset.x, self.scroll_offset.y);
        let column = self.column_at_x(content.x);
        let row = self.row_at(content.y);
        let item = self.item_at_row(row);

        self.update_hot_track(row, item, column);

        if event.kind == MouseEventKind::Release(MouseButton::Right) {
            self.cancel_edit();
            let menu = self
                .event(EventKind::ContextMenu, item, column)
                .with_position(event.position);
            self.signals.send(menu);
            return;
        }

        let (Some(item), Some(column)) = (item, column) else {
            // Clicking outside the items clears the selection.
            let pressed = matches!(
                event.kind,
                MouseEventKind::Press(MouseButton::Left | MouseButton::Right)
            );
            if pressed && !self.selection.is_empty() {
                self.unselect_all_rows(Row::INVALID);
                self.notify(EventKind::SelectionChanged, None, column);
            }
            return;
        };

        let hover_expander = self.update_expander_hover(item, column, event);

        let mut simulate_click = false;
        if let MouseEventKind::DoubleClick(_) = event.kind {
            self.last_on_same = false;
        }
        if event.kind == MouseEventKind::DoubleClick(MouseButton::Left) {
            if !hover_expander && row == self.row_last_clicked {
                let activated = self.notify(EventKind::ItemActivated, Some(item), Some(column));
                if activated.is_handled() {
                    return;
                }
            }
            // Handled like a plain click: select the item, activate the renderer.
            simulate_click = true;
        }

        if event.kind == MouseEventKind::Release(MouseButton::Left) {
            if !hover_expander {
                self.left_release(row, item, column);
            }
            return;
        }
        self.row_select_single_on_up = Row::INVALID;

        if event.kind == MouseEventKind::Press(MouseButton::Right) {
            self.row_before_last_clicked = self.row_last_clicked;
            self.row_last_clicked = row;
            if !self.selection.is_selected(row) {
                self.unselect_all_rows(Row::INVALID);
                self.change_current_row(row);
                self.select_row(row, true);
                self.notify(EventKind::SelectionChanged, Some(item), Some(column));
            }
        }

        let left_click = event.kind == MouseEventKind::Press(MouseButton::Left) || simulate_click;
        if left_click && hover_expander {
            if !simulate_click
                && let Some(node) = item.node()
            {
                self.toggle_expand(node);
            }
        } else if left_click {
            self.left_click(row, item, column, event.modifiers, simulate_click);
        }

        if matches!(event.kind, MouseEventKind::Press(_)) {
            self.refresh_row(self.current_row);
        }
    }

    fn update_hot_track(&mut self, row: Row, item: Option<Item>, column: Option<ColumnId>) {
        let hot_row = if item.is_some() { row } else { Row::INVALID };
        if hot_row == self.hot_track_row && column == self.hot_track_column {
            return;
        }
        if hot_row != self.hot_track_row {
            self.refresh_row(self.hot_track_row);
            if item.is_none() {
                self.reset_expander_hover();
            }
        }
        self.hot_track_row = hot_row;
        self.hot_track_column = column;
        self.refresh_row(hot_row);
        self.notify(EventKind::ItemHovered, item, column);
    }

    fn reset_expander_hover(&mut self) {
        if let Some(node) = self.expander_under_mouse.take() {
            let row = self.row_of_node(node);
            self.refresh_row(row);
        }
    }

    /// Track the expander under the mouse. Returns `true` if the pointer is
    /// over the expander of `item`.
    fn update_expander_hover(&mut self, item: Item, column: ColumnId, event: MouseEvent) -> bool {
        let hovered = item
            .node()
            .filter(|_| self.is_expander_column(column))
            .filter(|&node| {
                self.expander_rect(node)
                    .is_some_and(|rect| rect.contains(event.position))
            });

        match hovered {
            Some(node) => {
                if self.expander_under_mouse != Some(node) {
                    self.reset_expander_hover();
                    self.refresh_row(self.row_of_node(node));
                }
                self.expander_under_mouse = Some(node);
                true
            }
            None => {
                self.reset_expander_hover();
                false
            }
        }
    }

    fn left_release(&mut self, row: Row, item: Item, column: ColumnId) {
        let single_on_up = self.row_select_single_on_up;
        if single_on_up.is_valid() {
            self.unselect_all_rows(single_on_up);
            self.select_row(single_on_up, true);
            let selected = self.item_at_row(single_on_up);
            self.notify(EventKind::SelectionChanged, selected, Some(column));
        }

        let start_edit = self.last_on_same
            && row == self.current_row
            && self.current_column == Some(column)
            && self.is_cell_editable(item, column);
        self.last_on_same = false;
        self.row_select_single_on_up = Row::INVALID;

        if start_edit && let Err(err) = self.edit_item(item, column) {
            tracing::debug!(target: targets::INPUT, %item, ?column, %err, "click did not start an edit");
        }
    }

    fn left_click(&mut self, row: Row, item: Item, column: ColumnId, modifiers: Modifiers, simulated: bool) {
        self.row_before_last_clicked = self.row_last_clicked;
        self.row_last_clicked = row;

        let old_current = self.current_row;
        let old_was_selected = self.selection.is_selected(old_current);
        let multi = self.config.selection_mode == SelectionMode::MultiSelection;

        if !multi || !(modifiers.ctrl || modifiers.shift) {
            if !multi || !self.selection.is_selected(row) {
                self.change_current_row(row);
                if self.unselect_all_rows(row) && self.select_row(row, true) {
                    self.notify(EventKind::SelectionChanged, Some(item), Some(column));
                }
            } else {
                // Clicking a selected row keeps the selection until release
                // so the row can be dragged.
                self.row_select_single_on_up = row;
                self.change_current_row(row);
            }
        } else if modifiers.ctrl {
            self.change_current_row(row);
            self.reverse_row_selection(row);
            self.notify(EventKind::SelectionChanged, Some(item), Some(column));
        } else {
            self.change_current_row(row);
            let anchor = if old_current.is_valid() { old_current } else { row };
            let (from, to) = if anchor < row { (anchor, row) } else { (row, anchor) };
            self.select_rows(from, to);
            let first = self.item_at_row(self.selection.first());
            if first.is_some() {
                self.notify(EventKind::SelectionChanged, first, Some(column));
            }
        }

        let old_column = self.current_column;
        self.current_column = Some(column);
        self.current_column_by_keyboard = false;

        self.last_on_same = !simulated
            && old_column == Some(column)
            && old_current == row
            && old_was_selected
            && self.has_focus;

        if self.is_cell_editable(item, column) {
            self.activate_cell(item, column);
        }
    }

    /// Let a cell's renderer react to activation and write back what it
    /// returns. Returns `true` if the model accepted a new value.
    pub(super) fn activate_cell(&mut self, item: Item, column: ColumnId) -> bool {
        let Some(key) = self.item_key(item) else {
            return false;
        };
        let value = self.model.cells().value(key, column);
        let Some(new_value) = self.renderer(column).activate_cell(&value) else {
            return false;
        };
        if !self.model.cells().set_value(key, column, new_value) {
            tracing::debug!(target: targets::INPUT, %item, ?column, "model rejected activated value");
            return false;
        }
        self.value_changed(item, Some(column));
        true
    }
}
