//! Horizon DataView - the interaction core of a virtualized tree/list view.
//!
//! The crate maps a lazily materialized node tree (or a flat virtual list)
//! onto a dense range of physical rows, keeps selection and the current row
//! attached to their rows across expand, collapse, insert, remove and resort,
//! and runs the single in-place edit session of a view.
//!
//! Drawing and windowing belong to the host: it forwards input as
//! [`KeyPress`] and [`MouseEvent`], paints through a [`Surface`], and repaints
//! whatever [`MainWindow::take_dirty`] reports.
//!
//! - [`NodeTree`]: node arena with cached visible-row counts
//! - [`row_index`]: node to row and row to node translation
//! - [`SelectionStore`]: range-compressed selected rows
//! - [`Editor`]: one in-place edit session
//! - [`MainWindow`]: the orchestrator tying them together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_dataview::prelude::*;
//!
//! let model = Arc::new(StandardTreeModel::new());
//! let parent = model.add_root(vec!["parent".into()]);
//! model.add_child(parent, vec!["child".into()]);
//!
//! let mut view = MainWindow::new(
//!     ModelKind::Tree(model),
//!     vec![Column::new(0, "Name")],
//!     DataViewConfig::default(),
//! )
//! .unwrap();
//!
//! let node = view.node_at_row(Row::new(0)).unwrap();
//! assert!(view.expand(node));
//! assert_eq!(view.row_count(), 2);
//! ```

pub mod column;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod input;
pub mod item;
pub mod main_window;
pub mod model;
pub mod node;
pub mod prelude;
pub mod renderer;
pub mod row;
pub mod row_index;
pub mod selection;
pub mod value;

pub use horizon_dataview_core::{ConnectionId, Point, Rect, Signal, Size};

pub use column::{Column, ColumnId};
pub use config::DataViewConfig;
pub use editor::{EditOutcome, Editor, EditorAction, EditorControlHandler, EditorInput, EditorState};
pub use error::{Error, Result};
pub use event::{DataViewEvent, DataViewSignals, EventKind};
pub use input::{Key, KeyPress, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use item::Item;
pub use main_window::{DirtyRegion, MainWindow};
pub use model::{
    ItemKey, Model, ModelKind, StandardListModel, StandardTreeModel, TreeModel, VirtualListModel,
};
pub use node::{Node, NodeId, NodeTree};
pub use renderer::{
    CellState, DefaultRenderer, EditorControl, Renderer, Surface, TextEditorControl, TextRenderer,
    ToggleRenderer,
};
pub use row::Row;
pub use row_index::{node_to_row, row_to_node};
pub use selection::{SelectionChange, SelectionMode, SelectionStore};
pub use value::CellValue;
