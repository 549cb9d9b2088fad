//! Commonly used types:
//!
//! ```ignore
//! use horizon_dataview::prelude::*;
//! ```

// ============================================================================
// View
// ============================================================================

pub use crate::config::DataViewConfig;
pub use crate::main_window::{DirtyRegion, MainWindow};
pub use crate::error::Error;

// ============================================================================
// Addressing
// ============================================================================

pub use crate::item::Item;
pub use crate::node::NodeId;
pub use crate::row::Row;

// ============================================================================
// Models and columns
// ============================================================================

pub use crate::column::{Column, ColumnId};
pub use crate::model::{
    ItemKey, Model, ModelKind, StandardListModel, StandardTreeModel, TreeModel, VirtualListModel,
};
pub use crate::value::CellValue;

// ============================================================================
// Rendering and editing
// ============================================================================

pub use crate::editor::EditOutcome;
pub use crate::renderer::{CellState, EditorControl, Renderer, Surface, TextRenderer, ToggleRenderer};

// ============================================================================
// Input, selection and notifications
// ============================================================================

pub use crate::event::{DataViewEvent, EventKind};
pub use crate::input::{Key, KeyPress, Modifiers, MouseButton, MouseEvent};
pub use crate::selection::SelectionMode;

// ============================================================================
// Geometry
// ============================================================================

pub use horizon_dataview_core::{Point, Rect, Size};
