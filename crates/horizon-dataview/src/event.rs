//! Notifications published by the data view.
//!
//! Every notification is a [`DataViewEvent`] emitted on one of the
//! [`DataViewSignals`]. Notifications sent *before* a transition
//! (`item_expanding`, `item_collapsing`, `editing_started`, `editing_done`)
//! are vetoable: a slot calls [`DataViewEvent::veto`] and the view leaves its
//! state untouched. `item_activated` and `context_menu` can be marked handled,
//! which suppresses the view's fallback behavior.
//!
//! # Example
//!
//! ```ignore
//! let window = MainWindow::new(model, columns, DataViewConfig::default())?;
//! window.signals().item_collapsing.connect(|event| {
//!     // Keep the first top-level item open.
//!     if event.row == Row::new(0) {
//!         event.veto();
//!     }
//! });
//! ```

use std::cell::Cell;

use horizon_dataview_core::{Point, Signal};

use crate::column::ColumnId;
use crate::item::Item;
use crate::model::ItemKey;
use crate::row::Row;
use crate::value::CellValue;

/// Which notification an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ItemExpanding,
    ItemExpanded,
    ItemCollapsing,
    ItemCollapsed,
    SelectionChanged,
    EditingStarted,
    EditingDone,
    ValueChanged,
    ItemActivated,
    ItemHovered,
    ContextMenu,
}

impl EventKind {
    /// Whether a listener can stop the transition this event announces.
    pub fn is_vetoable(self) -> bool {
        matches!(
            self,
            EventKind::ItemExpanding
                | EventKind::ItemCollapsing
                | EventKind::EditingStarted
                | EventKind::EditingDone
        )
    }
}

/// Arguments of a data view notification.
#[derive(Debug)]
pub struct DataViewEvent {
    pub kind: EventKind,
    pub item: Option<Item>,
    /// Model key of the item, when there is one.
    pub key: Option<ItemKey>,
    pub row: Row,
    pub column: Option<ColumnId>,
    /// Edited value for `editing_done`, new value for `value_changed`.
    pub value: Option<CellValue>,
    /// `editing_done` was sent for a cancelled session.
    pub edit_canceled: bool,
    /// Mouse position for `context_menu`.
    pub position: Option<Point>,
    allowed: Cell<bool>,
    handled: Cell<bool>,
}

impl DataViewEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            item: None,
            key: None,
            row: Row::INVALID,
            column: None,
            value: None,
            edit_canceled: false,
            position: None,
            allowed: Cell::new(true),
            handled: Cell::new(false),
        }
    }

    pub fn with_item(mut self, item: Option<Item>, key: Option<ItemKey>) -> Self {
        self.item = item;
        self.key = key;
        self
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.row = row;
        self
    }

    pub fn with_column(mut self, column: Option<ColumnId>) -> Self {
        self.column = column;
        self
    }

    pub fn with_value(mut self, value: Option<CellValue>) -> Self {
        self.value = value;
        self
    }

    pub fn with_edit_canceled(mut self, canceled: bool) -> Self {
        self.edit_canceled = canceled;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Refuse the announced transition. Has no effect on events that are not
    /// vetoable.
    pub fn veto(&self) {
        if self.kind.is_vetoable() {
            self.allowed.set(false);
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed.get()
    }

    /// Mark the event as handled, suppressing the view's default action.
    pub fn set_handled(&self) {
        self.handled.set(true);
    }

    pub fn is_handled(&self) -> bool {
        self.handled.get()
    }
}

/// The signals a data view emits.
#[derive(Default)]
pub struct DataViewSignals {
    pub item_expanding: Signal<DataViewEvent>,
    pub item_expanded: Signal<DataViewEvent>,
    pub item_collapsing: Signal<DataViewEvent>,
    pub item_collapsed: Signal<DataViewEvent>,
    pub selection_changed: Signal<DataViewEvent>,
    pub editing_started: Signal<DataViewEvent>,
    pub editing_done: Signal<DataViewEvent>,
    pub value_changed: Signal<DataViewEvent>,
    pub item_activated: Signal<DataViewEvent>,
    pub item_hovered: Signal<DataViewEvent>,
    pub context_menu: Signal<DataViewEvent>,
}

impl DataViewSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signal an event of `kind` is emitted on.
    pub fn signal(&self, kind: EventKind) -> &Signal<DataViewEvent> {
        match kind {
            EventKind::ItemExpanding => &self.item_expanding,
            EventKind::ItemExpanded => &self.item_expanded,
            EventKind::ItemCollapsing => &self.item_collapsing,
            EventKind::ItemCollapsed => &self.item_collapsed,
            EventKind::SelectionChanged => &self.selection_changed,
            EventKind::EditingStarted => &self.editing_started,
            EventKind::EditingDone => &self.editing_done,
            EventKind::ValueChanged => &self.value_changed,
            EventKind::ItemActivated => &self.item_activated,
            EventKind::ItemHovered => &self.item_hovered,
            EventKind::ContextMenu => &self.context_menu,
        }
    }

    /// Emit an event on its signal and return it for inspection.
    pub fn send(&self, event: DataViewEvent) -> DataViewEvent {
        self.signal(event.kind).emit(&event);
        event
    }
}
