//! The in-place edit session.
//!
//! An [`Editor`] binds one item and column to a transient
//! [`EditorControl`] for the lifetime of a session. Keyboard and focus events
//! from the control first pass through an [`EditorControlHandler`], which
//! turns them into commit or cancel requests for the owning view.
//!
//! ```text
//! Idle --begin--> Editing --Enter/Tab/focus lost--> Committing --> Idle
//!                    \--------Escape/cancel-------> Cancelling --> Idle
//! ```
//!
//! Exclusivity (at most one session per view) is enforced by
//! [`MainWindow`](crate::MainWindow), not here.

use horizon_dataview_core::logging::targets;

use crate::column::ColumnId;
use crate::input::{Key, KeyPress};
use crate::item::Item;
use crate::model::ItemKey;
use crate::renderer::{EditorControl, Renderer};
use crate::value::CellValue;

/// Phase of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Editing,
    Committing,
    Cancelling,
}

/// An event coming from the transient control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorInput {
    Key(KeyPress),
    /// The control lost keyboard focus.
    KillFocus,
}

/// What the view should do in response to an [`EditorInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Let the control handle the event itself.
    Ignore,
    Commit,
    Cancel,
}

/// How an attempt to commit a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value was written to the model.
    Committed,
    /// The model refused the value.
    Rejected,
    /// A listener vetoed `editing_done`.
    Vetoed,
    /// The control had no readable value.
    NoValue,
    /// No session was open.
    Unchanged,
}

impl EditOutcome {
    pub fn is_committed(self) -> bool {
        self == EditOutcome::Committed
    }
}

/// Interception layer in front of the transient control.
///
/// Once it has requested a commit or cancel it ignores everything else, so a
/// focus loss caused by tearing the control down cannot finish the session a
/// second time.
#[derive(Debug, Default)]
pub struct EditorControlHandler {
    finished: bool,
}

impl EditorControlHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Mark the session finished; later input is ignored.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Classify an event from the control.
    pub fn process(&mut self, input: EditorInput) -> EditorAction {
        if self.finished {
            return EditorAction::Ignore;
        }
        let action = match input {
            EditorInput::Key(press) => match press.key {
                Key::Escape => EditorAction::Cancel,
                Key::Enter | Key::Tab if press.modifiers.none() => EditorAction::Commit,
                _ => EditorAction::Ignore,
            },
            EditorInput::KillFocus => EditorAction::Commit,
        };
        if action != EditorAction::Ignore {
            self.finished = true;
        }
        action
    }
}

/// One open edit session.
pub struct Editor {
    state: EditorState,
    item: Item,
    key: ItemKey,
    column: ColumnId,
    control: Option<Box<dyn EditorControl>>,
    handler: Option<EditorControlHandler>,
}

impl Editor {
    /// Start a session: focus the control and install the interception layer.
    pub fn open(item: Item, key: ItemKey, column: ColumnId, mut control: Box<dyn EditorControl>) -> Self {
        control.set_focus();
        tracing::debug!(target: targets::EDITOR, %item, ?column, "edit session opened");
        Self {
            state: EditorState::Editing,
            item,
            key,
            column,
            control: Some(control),
            handler: Some(EditorControlHandler::new()),
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn item(&self) -> Item {
        self.item
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    /// Point the session at a new item after rows moved underneath it.
    pub(crate) fn retarget(&mut self, item: Item, key: ItemKey) {
        self.item = item;
        self.key = key;
    }

    /// The transient control, while it is alive.
    pub fn control_mut(&mut self) -> Option<&mut (dyn EditorControl + 'static)> {
        self.control.as_deref_mut()
    }

    pub fn has_control(&self) -> bool {
        self.control.is_some()
    }

    /// Route an event from the control through the interception layer.
    ///
    /// Once the layer is detached every event is ignored.
    pub fn handle_input(&mut self, input: EditorInput) -> EditorAction {
        match self.handler.as_mut() {
            Some(handler) => handler.process(input),
            None => EditorAction::Ignore,
        }
    }

    /// Enter the commit phase and read the value out of the control.
    pub fn begin_commit(&mut self, renderer: &dyn Renderer) -> Option<CellValue> {
        self.state = EditorState::Committing;
        if let Some(handler) = self.handler.as_mut() {
            handler.finish();
        }
        let value = self.control.as_deref().and_then(|control| renderer.read_value(control));
        tracing::debug!(target: targets::EDITOR, item = %self.item, has_value = value.is_some(), "committing edit");
        value
    }

    /// Enter the cancel phase.
    pub fn begin_cancel(&mut self) {
        self.state = EditorState::Cancelling;
        if let Some(handler) = self.handler.as_mut() {
            handler.finish();
        }
        tracing::debug!(target: targets::EDITOR, item = %self.item, "cancelling edit");
    }

    /// Detach the interception layer, then hide and drop the control.
    pub fn destroy_control(&mut self) {
        self.handler = None;
        if let Some(mut control) = self.control.take() {
            control.hide();
        }
        self.state = EditorState::Idle;
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.destroy_control();
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("item", &self.item)
            .field("column", &self.column)
            .field("has_control", &self.control.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::input::Modifiers;
    use crate::renderer::TextRenderer;

    struct Probe {
        hidden: Arc<AtomicBool>,
    }

    impl EditorControl for Probe {
        fn value(&self) -> Option<CellValue> {
            Some(CellValue::from("probe"))
        }

        fn hide(&mut self) {
            self.hidden.store(true, Ordering::SeqCst);
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn key(k: Key) -> EditorInput {
        EditorInput::Key(KeyPress::new(k))
    }

    #[test]
    fn test_handler_key_mapping() {
        let mut handler = EditorControlHandler::new();
        assert_eq!(handler.process(key(Key::Char('a'))), EditorAction::Ignore);
        assert_eq!(
            handler.process(EditorInput::Key(KeyPress::new(Key::Enter).with_modifiers(Modifiers::SHIFT))),
            EditorAction::Ignore
        );
        assert_eq!(handler.process(key(Key::Escape)), EditorAction::Cancel);
        assert!(handler.is_finished());
        // Focus loss after the session finished is ignored.
        assert_eq!(handler.process(EditorInput::KillFocus), EditorAction::Ignore);
    }

    #[test]
    fn test_handler_commit_triggers() {
        assert_eq!(EditorControlHandler::new().process(key(Key::Enter)), EditorAction::Commit);
        assert_eq!(EditorControlHandler::new().process(key(Key::Tab)), EditorAction::Commit);
        assert_eq!(EditorControlHandler::new().process(EditorInput::KillFocus), EditorAction::Commit);
    }

    #[test]
    fn test_destroy_detaches_handler_first() {
        let hidden = Arc::new(AtomicBool::new(false));
        let control = Box::new(Probe { hidden: hidden.clone() });
        let mut editor = Editor::open(Item::Index(0), ItemKey::from_index(0), ColumnId::new(0), control);
        assert_eq!(editor.state(), EditorState::Editing);

        let value = editor.begin_commit(&TextRenderer::new());
        assert_eq!(value, Some(CellValue::from("probe")));
        assert_eq!(editor.state(), EditorState::Committing);

        editor.destroy_control();
        assert!(hidden.load(Ordering::SeqCst));
        assert!(!editor.has_control());
        assert_eq!(editor.state(), EditorState::Idle);
        assert_eq!(editor.handle_input(EditorInput::KillFocus), EditorAction::Ignore);
    }

    #[test]
    fn test_drop_hides_control() {
        let hidden = Arc::new(AtomicBool::new(false));
        let control = Box::new(Probe { hidden: hidden.clone() });
        drop(Editor::open(Item::Index(1), ItemKey::from_index(1), ColumnId::new(0), control));
        assert!(hidden.load(Ordering::SeqCst));
    }
}
