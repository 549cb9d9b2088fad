//! In-place editing driven through the view's input handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_dataview::prelude::*;
use horizon_dataview::{EditorInput, EditorState, TextEditorControl};

fn editable_tree() -> (MainWindow, Arc<StandardTreeModel>) {
    let model = Arc::new(StandardTreeModel::new().with_editable_columns([0]));
    let docs = model.add_root(vec!["docs".into()]);
    model.add_child(docs, vec!["guide.md".into()]);
    model.add_child(docs, vec!["notes.md".into()]);
    model.add_root(vec!["src".into()]);

    let mut window = MainWindow::new(
        ModelKind::Tree(model.clone()),
        vec![
            Column::new(0, "Name")
                .with_width(200.0)
                .with_editable(true)
                .with_renderer(Arc::new(TextRenderer::new())),
        ],
        DataViewConfig::default().with_uniform_row_height(20.0),
    )
    .unwrap();
    window.set_viewport(Size::new(200.0, 200.0));
    window.set_focus(true);
    (window, model)
}

fn type_text(window: &mut MainWindow, text: &str) {
    window
        .editor_control_mut()
        .and_then(|control| control.as_any_mut().downcast_mut::<TextEditorControl>())
        .unwrap()
        .set_text(text);
}

fn click(window: &mut MainWindow, at: (f32, f32)) {
    window.mouse_event(MouseEvent::press(MouseButton::Left, at));
    window.mouse_event(MouseEvent::release(MouseButton::Left, at));
}

fn name(window: &MainWindow, model: &StandardTreeModel, item: Item) -> String {
    let key = window.item_key(item).unwrap();
    model.values(key).unwrap()[0].display_text()
}

#[test]
fn test_second_click_starts_editing_and_enter_commits() {
    let (mut window, model) = editable_tree();
    let started = Arc::new(AtomicUsize::new(0));
    let seen = started.clone();
    window.signals().editing_started.connect(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    click(&mut window, (100.0, 25.0));
    assert!(!window.is_editing());
    click(&mut window, (100.0, 25.0));
    assert!(window.is_editing());
    assert_eq!(started.load(Ordering::SeqCst), 1);

    let item = window.editing_item().unwrap();
    type_text(&mut window, "source");
    assert!(window.key_press(KeyPress::new(Key::Enter)));
    assert!(!window.is_editing());
    assert_eq!(name(&window, &model, item), "source");
}

#[test]
fn test_shift_enter_is_left_to_the_control() {
    let (mut window, _) = editable_tree();
    window.select_row(Row::new(0), true);
    assert!(window.key_press(KeyPress::new(Key::F2)));
    assert!(window.is_editing());

    let shift_enter = KeyPress::new(Key::Enter).with_modifiers(Modifiers::SHIFT);
    assert!(!window.key_press(shift_enter));
    assert!(window.is_editing());
    assert_eq!(window.editor_state(), EditorState::Editing);
}

#[test]
fn test_f2_edits_first_selected_row_and_escape_cancels() {
    let (mut window, model) = editable_tree();
    window.select_row(Row::new(1), true);
    window.set_current_row(Row::new(0));

    assert!(window.key_press(KeyPress::new(Key::F2)));
    let item = window.editing_item().unwrap();
    assert_eq!(window.row_of_item(item), Row::new(1));

    type_text(&mut window, "discarded");
    assert!(window.key_press(KeyPress::new(Key::Escape)));
    assert_eq!(window.editor_state(), EditorState::Idle);
    assert!(window.editor_control_mut().is_none());
    assert_eq!(name(&window, &model, item), "src");
}

#[test]
fn test_focus_loss_commits_through_interception_layer() {
    let (mut window, model) = editable_tree();
    let item = Item::Node(window.node_at_row(Row::new(0)).unwrap());
    window.begin_edit(item, ColumnId::new(0)).unwrap();
    type_text(&mut window, "documents");

    assert!(!window.editor_input(EditorInput::Key(KeyPress::new(Key::Char('x')))));
    assert!(window.editor_input(EditorInput::KillFocus));
    assert_eq!(name(&window, &model, item), "documents");
}

#[test]
fn test_collapsing_parent_cancels_child_edit() {
    let (mut window, model) = editable_tree();
    let docs = window.node_at_row(Row::new(0)).unwrap();
    window.expand(docs);
    let guide = Item::Node(window.node_at_row(Row::new(1)).unwrap());

    window.begin_edit(guide, ColumnId::new(0)).unwrap();
    type_text(&mut window, "lost");
    window.collapse(docs);
    assert!(!window.is_editing());
    assert_eq!(name(&window, &model, guide), "guide.md");
}

#[test]
fn test_begin_edit_on_hidden_item_expands_it() {
    let (mut window, _) = editable_tree();
    let docs = window.node_at_row(Row::new(0)).unwrap();
    window.expand(docs);
    let notes = window.node_at_row(Row::new(2)).unwrap();
    window.collapse(docs);

    window.begin_edit(Item::Node(notes), ColumnId::new(0)).unwrap();
    assert_eq!(window.row_of_node(notes), Row::new(2));
    assert!(window.is_expanded(docs));
}

#[test]
fn test_items_cleared_cancels_edit() {
    let (mut window, model) = editable_tree();
    let item = Item::Node(window.node_at_row(Row::new(1)).unwrap());
    window.begin_edit(item, ColumnId::new(0)).unwrap();

    model.clear();
    window.items_cleared();
    assert!(!window.is_editing());
    assert_eq!(window.row_count(), 0);
}
