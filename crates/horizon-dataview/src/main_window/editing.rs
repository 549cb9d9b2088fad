//! The in-place edit session as seen from the view.
//!
//! At most one [`Editor`] is open per view. Opening sends `editing_started`
//! (vetoable); committing sends `editing_done` (vetoable) before the value is
//! written; cancelling sends `editing_done` with `edit_canceled` set.

use horizon_dataview_core::logging::targets;

use super::MainWindow;
use crate::column::ColumnId;
use crate::editor::{EditOutcome, Editor, EditorAction, EditorInput, EditorState};
use crate::error::{Error, Result};
use crate::event::EventKind;
use crate::item::Item;
use crate::renderer::EditorControl;

impl MainWindow {
    /// Whether a cell can be edited: the column is visible and editable and
    /// the model allows it.
    pub fn is_cell_editable(&self, item: Item, column: ColumnId) -> bool {
        let Some(key) = self.item_key(item) else {
            return false;
        };
        self.column(column)
            .is_some_and(|c| c.is_visible() && c.is_editable())
            && self.model.cells().is_editable(key, column)
    }

    /// Open an edit session on a cell.
    ///
    /// Fails with [`Error::EditInProgress`] while another session is open,
    /// leaving that session untouched.
    pub fn begin_edit(&mut self, item: Item, column: ColumnId) -> Result<()> {
        if self.editor.is_some() {
            return Err(Error::EditInProgress);
        }
        self.open_editor(item, column)
    }

    /// Cancel any open session, then open one on a cell.
    pub fn edit_item(&mut self, item: Item, column: ColumnId) -> Result<()> {
        self.cancel_edit();
        self.open_editor(item, column)
    }

    fn open_editor(&mut self, item: Item, column: ColumnId) -> Result<()> {
        let key = self.item_key(item).ok_or(Error::InvalidItem)?;
        let editable = self.column(column).ok_or(Error::UnknownColumn(column))?.is_editable();
        if !editable || !self.model.cells().is_editable(key, column) {
            return Err(Error::NotEditable);
        }

        self.ensure_item_visible(item);
        self.has_focus = true;

        let started = self.notify(EventKind::EditingStarted, Some(item), Some(column));
        if !started.is_allowed() {
            tracing::debug!(target: targets::EDITOR, %item, ?column, "editing vetoed");
            return Err(Error::Vetoed);
        }

        let value = self.model.cells().editor_value(key, column);
        if value.is_none() {
            return Err(Error::NoEditableValue);
        }

        let rect = self.item_rect(item, Some(column));
        let control = self
            .renderer(column)
            .create_editor(rect, &value)
            .ok_or(Error::NoEditorControl)?;
        self.editor = Some(Editor::open(item, key, column, control));
        Ok(())
    }

    /// Commit the open session.
    ///
    /// The control is torn down before `editing_done` is sent, whatever the
    /// outcome.
    pub fn end_edit(&mut self) -> EditOutcome {
        let Some(mut editor) = self.editor.take() else {
            return EditOutcome::Unchanged;
        };
        let (item, key, column) = (editor.item(), editor.key(), editor.column());
        let renderer = self.renderer(column);
        let value = editor.begin_commit(renderer.as_ref());
        editor.destroy_control();
        drop(editor);

        let Some(value) = value else {
            tracing::debug!(target: targets::EDITOR, %item, ?column, "editor produced no value");
            return EditOutcome::NoValue;
        };

        let done = self.event(EventKind::EditingDone, Some(item), Some(column)).with_value(Some(value.clone()));
        let done = self.signals.send(done);
        if !done.is_allowed() {
            tracing::debug!(target: targets::EDITOR, %item, ?column, "commit vetoed");
            return EditOutcome::Vetoed;
        }

        if !self.model.cells().set_value(key, column, value) {
            tracing::debug!(target: targets::EDITOR, %item, ?column, "model rejected edited value");
            return EditOutcome::Rejected;
        }
        self.value_changed(item, Some(column));
        EditOutcome::Committed
    }

    /// Abandon the open session. Returns `false` if there was none.
    pub fn cancel_edit(&mut self) -> bool {
        let Some(mut editor) = self.editor.take() else {
            return false;
        };
        let (item, column) = (editor.item(), editor.column());
        editor.begin_cancel();
        editor.destroy_control();
        drop(editor);

        let done = self
            .event(EventKind::EditingDone, Some(item), Some(column))
            .with_edit_canceled(true);
        self.signals.send(done);
        true
    }

    /// Route an event from the transient control through the session's
    /// interception layer. Returns `true` if it ended the session.
    pub fn editor_input(&mut self, input: EditorInput) -> bool {
        let action = match self.editor.as_mut() {
            Some(editor) => editor.handle_input(input),
            None => return false,
        };
        match action {
            EditorAction::Ignore => false,
            EditorAction::Commit => {
                self.end_edit();
                true
            }
            EditorAction::Cancel => self.cancel_edit(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editing_item(&self) -> Option<Item> {
        self.editor.as_ref().map(Editor::item)
    }

    pub fn editing_column(&self) -> Option<ColumnId> {
        self.editor.as_ref().map(Editor::column)
    }

    pub fn editor_state(&self) -> EditorState {
        self.editor.as_ref().map_or(EditorState::Idle, Editor::state)
    }

    /// The transient control of the open session, for the host to drive.
    pub fn editor_control_mut(&mut self) -> Option<&mut (dyn EditorControl + 'static)> {
        self.editor.as_mut().and_then(Editor::control_mut)
    }

    /// The column Space, Enter and F2 act on for an item.
    ///
    /// The current column if it is editable; otherwise the first visible
    /// editable column, unless the current column was chosen by keyboard.
    /// Container rows only edit in the expander column.
    pub fn find_column_for_editing(&self, item: Item) -> Option<ColumnId> {
        let mut candidate = self
            .current_column
            .filter(|&c| self.is_cell_editable(item, c) || self.current_column_by_keyboard);

        if candidate.is_none() {
            candidate = self
                .columns
                .iter()
                .filter(|c| c.is_visible())
                .map(|c| c.id())
                .find(|&id| self.is_cell_editable(item, id));
        }

        if let Some(column) = candidate
            && self.has_children(item)
            && self.expander_column() != Some(column)
        {
            candidate = self.expander_column();
        }

        candidate.filter(|&c| self.is_cell_editable(item, c))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::column::Column;
    use crate::config::DataViewConfig;
    use crate::input::{Key, KeyPress};
    use crate::model::{ItemKey, Model, ModelKind, StandardListModel, StandardTreeModel};
    use crate::renderer::{TextEditorControl, TextRenderer};
    use crate::row::Row;
    use crate::value::CellValue;

    fn list() -> (MainWindow, Arc<StandardListModel>) {
        let model = Arc::new(
            StandardListModel::from_rows(vec![
                vec!["alpha".into(), CellValue::Int(1)],
                vec!["beta".into(), CellValue::Int(2)],
                vec!["gamma".into(), CellValue::None],
            ])
            .with_editable_columns([0, 1]),
        );
        let text = Arc::new(TextRenderer::new());
        let window = MainWindow::new(
            ModelKind::VirtualList(model.clone()),
            vec![
                Column::new(0, "Name").with_editable(true).with_renderer(text.clone()),
                Column::new(1, "Count").with_editable(true).with_renderer(text),
            ],
            DataViewConfig::default(),
        )
        .unwrap();
        (window, model)
    }

    fn type_text(window: &mut MainWindow, text: &str) {
        let control = window.editor_control_mut().unwrap();
        control
            .as_any_mut()
            .downcast_mut::<TextEditorControl>()
            .unwrap()
            .set_text(text);
    }

    #[test]
    fn test_commit_writes_model() {
        let (mut window, model) = list();
        window.begin_edit(Item::Index(1), ColumnId::new(1)).unwrap();
        assert!(window.is_editing());
        assert_eq!(window.editor_state(), EditorState::Editing);

        type_text(&mut window, "42");
        assert_eq!(window.end_edit(), EditOutcome::Committed);
        assert!(!window.is_editing());
        assert_eq!(model.value(ItemKey::from_index(1), ColumnId::new(1)), CellValue::Int(42));
    }

    #[test]
    fn test_begin_edit_refuses_second_session() {
        let (mut window, _) = list();
        window.begin_edit(Item::Index(0), ColumnId::new(0)).unwrap();
        assert_eq!(window.begin_edit(Item::Index(1), ColumnId::new(0)), Err(Error::EditInProgress));
        assert_eq!(window.editing_item(), Some(Item::Index(0)));

        window.edit_item(Item::Index(1), ColumnId::new(0)).unwrap();
        assert_eq!(window.editing_item(), Some(Item::Index(1)));
    }

    #[test]
    fn test_open_errors() {
        let (mut window, _) = list();
        assert_eq!(window.begin_edit(Item::Index(9), ColumnId::new(0)), Err(Error::InvalidItem));
        assert_eq!(
            window.begin_edit(Item::Index(0), ColumnId::new(5)),
            Err(Error::UnknownColumn(ColumnId::new(5)))
        );
        assert_eq!(window.begin_edit(Item::Index(2), ColumnId::new(1)), Err(Error::NoEditableValue));
        assert!(!window.is_editing());
    }

    #[test]
    fn test_veto_editing_started_and_done() {
        let (mut window, model) = list();
        let veto = window.signals().editing_started.connect(|event| event.veto());
        assert_eq!(window.begin_edit(Item::Index(0), ColumnId::new(0)), Err(Error::Vetoed));
        window.signals().editing_started.disconnect(veto);

        window.signals().editing_done.connect(|event| {
            if !event.edit_canceled {
                event.veto();
            }
        });
        window.begin_edit(Item::Index(0), ColumnId::new(0)).unwrap();
        type_text(&mut window, "changed");
        assert_eq!(window.end_edit(), EditOutcome::Vetoed);
        assert_eq!(model.value(ItemKey::from_index(0), ColumnId::new(0)), CellValue::from("alpha"));
    }

    #[test]
    fn test_cancel_sends_done_with_flag() {
        let (mut window, model) = list();
        let cancels = Arc::new(AtomicUsize::new(0));
        let seen = cancels.clone();
        window.signals().editing_done.connect(move |event| {
            if event.edit_canceled {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        window.begin_edit(Item::Index(0), ColumnId::new(0)).unwrap();
        type_text(&mut window, "discarded");
        assert!(window.key_press(KeyPress::new(Key::Escape)));
        assert!(!window.is_editing());
        assert!(!window.cancel_edit());
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert_eq!(model.value(ItemKey::from_index(0), ColumnId::new(0)), CellValue::from("alpha"));
    }

    #[test]
    fn test_kill_focus_commits_once() {
        let (mut window, model) = list();
        window.begin_edit(Item::Index(0), ColumnId::new(0)).unwrap();
        type_text(&mut window, "delta");
        assert!(window.editor_input(EditorInput::KillFocus));
        assert!(!window.editor_input(EditorInput::KillFocus));
        assert_eq!(model.value(ItemKey::from_index(0), ColumnId::new(0)), CellValue::from("delta"));
    }

    #[test]
    fn test_removal_cancels_and_shifts_edit() {
        let (mut window, model) = list();
        window.begin_edit(Item::Index(2), ColumnId::new(0)).unwrap();
        model.remove(0);
        window.items_removed(0, 1).unwrap();
        assert_eq!(window.editing_item(), Some(Item::Index(1)));

        model.remove(1);
        window.items_removed(1, 1).unwrap();
        assert!(!window.is_editing());
    }

    #[test]
    fn test_find_column_for_editing() {
        let model = Arc::new(StandardTreeModel::new().with_editable_columns([0, 1]));
        let parent = model.add_root(vec!["parent".into(), "p".into()]);
        model.add_child(parent, vec!["child".into(), "c".into()]);
        let mut window = MainWindow::new(
            ModelKind::Tree(model),
            vec![
                Column::new(0, "Name"),
                Column::new(1, "Note").with_editable(true),
            ],
            DataViewConfig::default(),
        )
        .unwrap();

        let parent = window.node_at_row(Row::new(0)).unwrap();
        window.expand(parent);
        let child = window.node_at_row(Row::new(1)).unwrap();

        assert_eq!(window.find_column_for_editing(Item::Node(child)), Some(ColumnId::new(1)));
        // Containers only edit in the expander column, which is not editable here.
        assert_eq!(window.find_column_for_editing(Item::Node(parent)), None);
    }

    #[test]
    fn test_drop_cancels_session() {
        let (mut window, _) = list();
        let done = Arc::new(AtomicUsize::new(0));
        let seen = done.clone();
        window.signals().editing_done.connect(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        window.begin_edit(Item::Index(0), ColumnId::new(0)).unwrap();
        drop(window);
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
