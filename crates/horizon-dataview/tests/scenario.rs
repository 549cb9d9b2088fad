//! The three-parent scenario and structural repair of selection and current row.

use std::sync::Arc;

use horizon_dataview::prelude::*;

struct Fixture {
    window: MainWindow,
    model: Arc<StandardTreeModel>,
}

impl Fixture {
    /// Top-level A, B, C with two leaf children each, all collapsed.
    fn new(mode: SelectionMode) -> Self {
        let model = Arc::new(StandardTreeModel::new());
        for name in ["A", "B", "C"] {
            let parent = model.add_root(vec![name.into()]);
            for i in 0..2 {
                model.add_child(parent, vec![format!("{name}.{i}").into()]);
            }
        }
        let window = MainWindow::new(
            ModelKind::Tree(model.clone()),
            vec![Column::new(0, "Name")],
            DataViewConfig::default().with_selection_mode(mode),
        )
        .unwrap();
        Self { window, model }
    }

    fn label(&self, row: usize) -> Option<String> {
        let node = self.window.node_at_row(Row::new(row))?;
        let key = self.window.item_key(Item::Node(node))?;
        Some(self.model.values(key)?[0].display_text())
    }

    fn labels(&self) -> Vec<String> {
        (0..self.window.row_count()).filter_map(|row| self.label(row)).collect()
    }

    fn node(&self, label: &str) -> NodeId {
        (0..self.window.row_count())
            .find(|&row| self.label(row).as_deref() == Some(label))
            .and_then(|row| self.window.node_at_row(Row::new(row)))
            .unwrap()
    }
}

#[test]
fn test_expand_middle_parent() {
    let mut f = Fixture::new(SelectionMode::SingleSelection);
    assert_eq!(f.window.row_count(), 3);
    let c = f.node("C");
    assert_eq!(f.window.row_of_node(c), Row::new(2));

    let b = f.node("B");
    assert!(f.window.expand(b));
    assert_eq!(f.window.row_count(), 5);
    assert_eq!(f.labels(), ["A", "B", "B.0", "B.1", "C"]);
    assert_eq!(f.window.node_at_row(Row::new(1)), Some(b));
    assert_eq!(f.window.row_of_node(c), Row::new(4));
    assert_eq!(f.window.node_at_row(Row::new(5)), None);
}

#[test]
fn test_collapse_moves_current_row_to_parent() {
    let mut f = Fixture::new(SelectionMode::MultiSelection);
    let b = f.node("B");
    f.window.expand(b);
    f.window.set_current_row(Row::new(3));
    f.window.set_current_column(Some(ColumnId::new(0)));

    f.window.collapse(b);
    assert_eq!(f.window.current_row(), Row::new(1));
    assert_eq!(f.window.current_column(), None);
}

#[test]
fn test_current_row_below_collapse_shifts_up() {
    let mut f = Fixture::new(SelectionMode::MultiSelection);
    let a = f.node("A");
    f.window.expand(a);
    let c = f.node("C");
    f.window.select_item(Item::Node(c));
    assert_eq!(f.window.current_row(), Row::new(4));

    f.window.collapse(a);
    assert_eq!(f.window.current_row(), Row::new(2));
    assert_eq!(f.window.selections(), vec![Item::Node(c)]);
}

#[test]
fn test_select_item_reveals_hidden_node() {
    let mut f = Fixture::new(SelectionMode::SingleSelection);
    let c = f.node("C");
    f.window.expand(c);
    let child = f.node("C.1");
    f.window.collapse(c);
    assert_eq!(f.window.row_of_node(child), Row::INVALID);

    assert!(f.window.select_item(Item::Node(child)));
    assert_eq!(f.window.row_of_node(child), Row::new(4));
    assert_eq!(f.window.current_item(), Some(Item::Node(child)));
}

#[test]
fn test_removal_never_leaves_current_row_past_end() {
    let mut f = Fixture::new(SelectionMode::MultiSelection);
    let c = f.node("C");
    f.window.expand(c);
    f.window.set_current_row(Row::new(4));
    f.window.select_row(Row::new(4), true);
    f.window.select_row(Row::new(0), true);

    assert!(f.window.remove_item(c));
    assert_eq!(f.window.row_count(), 2);
    assert_eq!(f.window.current_row(), Row::new(1));
    assert_eq!(f.window.selections(), vec![Item::Node(f.node("A"))]);

    let a = f.node("A");
    let b = f.node("B");
    f.window.remove_item(a);
    f.window.remove_item(b);
    assert_eq!(f.window.row_count(), 0);
    assert!(!f.window.current_row().is_valid());
    assert!(f.window.selections().is_empty());
}

#[test]
fn test_insert_then_sort() {
    let mut f = Fixture::new(SelectionMode::MultiSelection);
    let b = f.node("B");
    f.window.expand(b);
    f.window.select_item(Item::Node(f.node("B.1")));

    let b_key = f.window.item_key(Item::Node(b)).unwrap();
    let key = f.model.add_child(b_key, vec!["B.00".into()]).unwrap();
    let inserted = f.window.insert_item(Some(b), 1, key).unwrap();
    assert_eq!(f.labels(), ["A", "B", "B.0", "B.00", "B.1", "C"]);
    assert!(f.window.is_item_selected(Item::Node(f.node("B.1"))));

    f.window.set_sort(ColumnId::new(0), false).unwrap();
    assert_eq!(f.labels(), ["C", "B", "B.1", "B.00", "B.0", "A"]);
    assert!(f.window.is_item_selected(Item::Node(f.node("B.1"))));
    assert_eq!(f.window.row_of_node(inserted), Row::new(3));

    f.window.clear_sort();
    assert_eq!(f.labels(), ["A", "B", "B.0", "B.1", "B.00", "C"]);
}

#[test]
fn test_expansion_notifications_in_order() {
    use std::sync::Mutex;

    let mut f = Fixture::new(SelectionMode::SingleSelection);
    let log = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        EventKind::ItemExpanding,
        EventKind::ItemExpanded,
        EventKind::ItemCollapsing,
        EventKind::ItemCollapsed,
    ] {
        let log = log.clone();
        f.window.signals().signal(kind).connect(move |event| {
            log.lock().unwrap().push((event.kind, event.row));
        });
    }

    let b = f.node("B");
    f.window.expand(b);
    f.window.collapse(b);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            (EventKind::ItemExpanding, Row::new(1)),
            (EventKind::ItemExpanded, Row::new(1)),
            (EventKind::ItemCollapsing, Row::new(1)),
            (EventKind::ItemCollapsed, Row::new(1)),
        ]
    );
}
