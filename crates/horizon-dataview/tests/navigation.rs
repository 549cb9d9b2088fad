//! Keyboard and mouse navigation over a tree and a virtual list.

use std::sync::{Arc, Mutex};

use horizon_dataview::prelude::*;

const ROW: f32 = 20.0;

/// Three groups of three leaves, 200x100 viewport (five rows per page).
fn grouped_tree(mode: SelectionMode) -> MainWindow {
    let model = StandardTreeModel::new();
    for group in ["alpha", "beta", "gamma"] {
        let parent = model.add_root(vec![group.into()]);
        for leaf in 0..3 {
            model.add_child(parent, vec![format!("{group}-{leaf}").into()]);
        }
    }

    let mut window = MainWindow::new(
        ModelKind::tree(model),
        vec![Column::new(0, "Name").with_width(200.0)],
        DataViewConfig::default()
            .with_selection_mode(mode)
            .with_uniform_row_height(ROW),
    )
    .unwrap();
    window.set_viewport(Size::new(200.0, 100.0));
    window.set_focus(true);
    window
}

fn row_center(row: usize) -> (f32, f32) {
    (120.0, row as f32 * ROW + ROW / 2.0)
}

fn click(window: &mut MainWindow, at: (f32, f32), modifiers: Modifiers) {
    window.mouse_event(MouseEvent::press(MouseButton::Left, at).with_modifiers(modifiers));
    window.mouse_event(MouseEvent::release(MouseButton::Left, at).with_modifiers(modifiers));
}

fn selected_rows(window: &MainWindow, count: usize) -> Vec<usize> {
    (0..count).filter(|&r| window.is_row_selected(Row::new(r))).collect()
}

fn record(window: &MainWindow, kind: EventKind) -> Arc<Mutex<Vec<Option<Item>>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    window.signals().signal(kind).connect(move |event| {
        sink.lock().unwrap().push(event.item);
    });
    seen
}

#[test]
fn test_right_and_left_walk_the_hierarchy() {
    let mut window = grouped_tree(SelectionMode::SingleSelection);
    let alpha = window.node_at_row(Row::new(0)).unwrap();
    assert_eq!(window.row_count(), 3);

    assert!(window.key_press(KeyPress::new(Key::Right)));
    assert!(window.is_expanded(alpha));
    assert_eq!(window.row_count(), 6);
    assert_eq!(window.current_row(), Row::new(0));

    assert!(window.key_press(KeyPress::new(Key::Right)));
    assert_eq!(window.current_row(), Row::new(1));
    assert!(window.is_row_selected(Row::new(1)));

    // A leaf goes back to its parent, then the parent collapses.
    assert!(window.key_press(KeyPress::new(Key::Left)));
    assert_eq!(window.current_row(), Row::new(0));
    assert!(window.is_row_selected(Row::new(0)));
    assert!(!window.is_row_selected(Row::new(1)));

    assert!(window.key_press(KeyPress::new(Key::Left)));
    assert!(!window.is_expanded(alpha));
    assert_eq!(window.row_count(), 3);
}

#[test]
fn test_shift_arrows_extend_selection_in_multi_mode() {
    let mut window = grouped_tree(SelectionMode::MultiSelection);
    window.expand_all();
    assert_eq!(window.row_count(), 12);

    window.key_press(KeyPress::new(Key::Down));
    assert_eq!(selected_rows(&window, 12), vec![1]);

    let shift_down = KeyPress::new(Key::Down).with_modifiers(Modifiers::SHIFT);
    window.key_press(shift_down);
    window.key_press(shift_down);
    assert_eq!(window.current_row(), Row::new(3));
    assert_eq!(selected_rows(&window, 12), vec![1, 2, 3]);

    // A plain move collapses the selection again.
    window.key_press(KeyPress::new(Key::Down));
    assert_eq!(selected_rows(&window, 12), vec![4]);
}

#[test]
fn test_ctrl_arrows_move_without_selecting() {
    let mut window = grouped_tree(SelectionMode::MultiSelection);
    window.expand_all();
    window.select_row(Row::new(0), true);

    window.key_press(KeyPress::new(Key::Down).with_modifiers(Modifiers::CTRL));
    assert_eq!(window.current_row(), Row::new(1));
    assert_eq!(selected_rows(&window, 12), vec![0]);
}

#[test]
fn test_page_and_end_keys_keep_current_row_visible() {
    let mut window = grouped_tree(SelectionMode::SingleSelection);
    window.expand_all();

    window.key_press(KeyPress::new(Key::PageDown));
    assert_eq!(window.current_row(), Row::new(4));

    window.key_press(KeyPress::new(Key::End));
    assert_eq!(window.current_row(), Row::new(11));
    assert!(window.first_visible_row() <= Row::new(11));
    assert!(window.last_visible_row() >= Row::new(11));
    assert!(window.scroll_offset().y > 0.0);

    window.key_press(KeyPress::new(Key::PageUp));
    assert_eq!(window.current_row(), Row::new(7));

    window.key_press(KeyPress::new(Key::Home));
    assert_eq!(window.current_row(), Row::new(0));
    assert_eq!(window.scroll_offset().y, 0.0);
    assert_eq!(selected_rows(&window, 12), vec![0]);
}

#[test]
fn test_shift_click_selects_range_and_ctrl_click_toggles() {
    let mut window = grouped_tree(SelectionMode::MultiSelection);
    window.expand_all();

    click(&mut window, row_center(2), Modifiers::NONE);
    click(&mut window, row_center(5), Modifiers::SHIFT);
    assert_eq!(selected_rows(&window, 12), vec![2, 3, 4, 5]);

    click(&mut window, row_center(3), Modifiers::CTRL);
    assert_eq!(selected_rows(&window, 12), vec![2, 4, 5]);
    assert_eq!(window.current_row(), Row::new(3));
}

#[test]
fn test_click_on_selected_row_defers_single_select_to_release() {
    let mut window = grouped_tree(SelectionMode::MultiSelection);
    window.expand_all();
    window.select_rows(Row::new(1), Row::new(3));

    window.mouse_event(MouseEvent::press(MouseButton::Left, row_center(2)));
    assert_eq!(selected_rows(&window, 12), vec![1, 2, 3]);
    window.mouse_event(MouseEvent::release(MouseButton::Left, row_center(2)));
    assert_eq!(selected_rows(&window, 12), vec![2]);
}

#[test]
fn test_click_below_last_row_clears_selection() {
    let mut window = grouped_tree(SelectionMode::SingleSelection);
    let changes = record(&window, EventKind::SelectionChanged);

    click(&mut window, row_center(1), Modifiers::NONE);
    assert_eq!(selected_rows(&window, 3), vec![1]);

    click(&mut window, row_center(4), Modifiers::NONE);
    assert!(selected_rows(&window, 3).is_empty());
    assert_eq!(changes.lock().unwrap().last(), Some(&None));
}

#[test]
fn test_double_click_activates_row() {
    let mut window = grouped_tree(SelectionMode::SingleSelection);
    let activated = record(&window, EventKind::ItemActivated);
    let beta = Item::Node(window.node_at_row(Row::new(1)).unwrap());

    click(&mut window, row_center(1), Modifiers::NONE);
    window.mouse_event(MouseEvent::double_click(MouseButton::Left, row_center(1)));
    window.mouse_event(MouseEvent::release(MouseButton::Left, row_center(1)));

    assert_eq!(*activated.lock().unwrap(), vec![Some(beta)]);
    assert!(window.is_row_selected(Row::new(1)));
    assert!(!window.is_editing());
}

#[test]
fn test_double_click_on_expander_toggles_once() {
    let mut window = grouped_tree(SelectionMode::SingleSelection);
    let activated = record(&window, EventKind::ItemActivated);
    let alpha = window.node_at_row(Row::new(0)).unwrap();
    let expander = (ROW / 2.0, ROW / 2.0);

    click(&mut window, expander, Modifiers::NONE);
    assert!(window.is_expanded(alpha));

    window.mouse_event(MouseEvent::double_click(MouseButton::Left, expander));
    window.mouse_event(MouseEvent::release(MouseButton::Left, expander));
    assert!(window.is_expanded(alpha));
    assert!(activated.lock().unwrap().is_empty());
}

#[test]
fn test_enter_sends_activation_that_handlers_can_claim() {
    let mut window = grouped_tree(SelectionMode::SingleSelection);
    window.signals().item_activated.connect(|event| event.set_handled());
    let activated = record(&window, EventKind::ItemActivated);

    assert!(window.key_press(KeyPress::new(Key::Enter)));
    assert_eq!(activated.lock().unwrap().len(), 1);
    assert!(!window.is_editing());
}

#[test]
fn test_tab_walks_cells_of_a_virtual_list() {
    let rows = (0..4)
        .map(|i| vec![CellValue::from(format!("file{i}")), CellValue::Int(i * 100)])
        .collect();
    let mut window = MainWindow::new(
        ModelKind::virtual_list(StandardListModel::from_rows(rows)),
        vec![Column::new(0, "Name"), Column::new(1, "Size")],
        DataViewConfig::default().with_cell_focus(true),
    )
    .unwrap();
    window.set_viewport(Size::new(200.0, 200.0));
    window.set_focus(true);

    let tab = KeyPress::new(Key::Tab);
    let back_tab = KeyPress::new(Key::Tab).with_modifiers(Modifiers::SHIFT);

    assert!(window.key_press(tab));
    assert_eq!(window.current_column(), Some(ColumnId::new(1)));

    assert!(window.key_press(tab));
    assert_eq!(window.current_row(), Row::new(1));
    assert_eq!(window.current_column(), None);

    assert!(window.key_press(back_tab));
    assert_eq!(window.current_row(), Row::new(0));
    assert_eq!(window.current_column(), Some(ColumnId::new(1)));
}
