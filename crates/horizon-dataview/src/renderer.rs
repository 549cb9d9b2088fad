//! Renderers draw cells and create in-place editor controls.
//!
//! Pixels are the host's business. A [`Renderer`] decides *what* a cell shows
//! and asks the host's [`Surface`] to draw it; it also creates the transient
//! [`EditorControl`] used while a cell is edited and reads the edited value
//! back out of it.
//!
//! Columns without a renderer of their own use the [`DefaultRenderer`]
//! instance owned by the view.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use horizon_dataview::{Column, TextRenderer, ToggleRenderer};
//!
//! let columns = vec![
//!     Column::new(0, "Name").with_editable(true).with_renderer(Arc::new(TextRenderer::new())),
//!     Column::new(1, "Enabled").with_renderer(Arc::new(ToggleRenderer::new())),
//! ];
//! ```

use std::any::Any;

use horizon_dataview_core::{Rect, Size};

use crate::value::CellValue;

/// Visual state of a cell being drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellState {
    /// The row is selected.
    pub selected: bool,
    /// The row is the current (keyboard focus) row.
    pub current: bool,
    /// The mouse is over the row.
    pub hot: bool,
    /// The view has keyboard focus.
    pub focused: bool,
}

impl CellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selected state.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Sets the current-row state.
    pub fn with_current(mut self, current: bool) -> Self {
        self.current = current;
        self
    }

    /// Sets the hot-track state.
    pub fn with_hot(mut self, hot: bool) -> Self {
        self.hot = hot;
        self
    }

    /// Sets the focused state.
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Drawing primitives supplied by the host.
pub trait Surface {
    /// Fill a cell or row background.
    fn fill_rect(&mut self, rect: Rect, state: CellState);

    /// Draw a line of text clipped to `rect`.
    fn draw_text(&mut self, rect: Rect, text: &str, state: CellState);

    /// Draw a tree expander button.
    fn draw_expander(&mut self, _rect: Rect, _expanded: bool, _hot: bool) {}

    /// Draw a check box.
    fn draw_check(&mut self, rect: Rect, checked: bool, state: CellState) {
        self.draw_text(rect, if checked { "[x]" } else { "[ ]" }, state);
    }
}

/// A transient input control living for the duration of one edit session.
pub trait EditorControl: Send {
    /// The value currently entered, or `None` if it cannot be read (for
    /// example, text that does not parse as a number).
    fn value(&self) -> Option<CellValue>;

    /// Give the control keyboard focus.
    fn set_focus(&mut self) {}

    /// Hide the control ahead of its destruction.
    fn hide(&mut self) {}

    /// Access the concrete control.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Draws one column's cells and manages its editors.
pub trait Renderer: Send + Sync {
    /// Preferred size of a cell showing `value`.
    fn cell_size(&self, value: &CellValue) -> Size;

    /// Paint the cell background.
    fn draw_background(&self, surface: &mut dyn Surface, rect: Rect, state: CellState) {
        if state.selected || state.hot {
            surface.fill_rect(rect, state);
        }
    }

    /// Paint the cell content.
    fn draw_content(&self, surface: &mut dyn Surface, rect: Rect, value: &CellValue, state: CellState);

    /// Handle activation (Space, or a click on an editable cell).
    ///
    /// Returns the new value to write back to the model, if any.
    fn activate_cell(&self, _value: &CellValue) -> Option<CellValue> {
        None
    }

    /// Create the editor control for a cell, positioned at `rect`.
    fn create_editor(&self, _rect: Rect, _value: &CellValue) -> Option<Box<dyn EditorControl>> {
        None
    }

    /// Read the edited value out of a control created by [`create_editor`](Self::create_editor).
    fn read_value(&self, control: &dyn EditorControl) -> Option<CellValue> {
        control.value()
    }
}

/// Approximate advance of one character, used for size estimates.
const CHAR_WIDTH: f32 = 7.0;
const LINE_HEIGHT: f32 = 17.0;
const PADDING: f32 = 4.0;

fn text_size(text: &str) -> Size {
    Size::new(text.chars().count() as f32 * CHAR_WIDTH + 2.0 * PADDING, LINE_HEIGHT)
}

/// Draws a value's text and never edits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl DefaultRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DefaultRenderer {
    fn cell_size(&self, value: &CellValue) -> Size {
        text_size(&value.display_text())
    }

    fn draw_content(&self, surface: &mut dyn Surface, rect: Rect, value: &CellValue, state: CellState) {
        if value.is_some() {
            surface.draw_text(rect, &value.display_text(), state);
        }
    }
}

/// Draws text and edits it with a [`TextEditorControl`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    fn cell_size(&self, value: &CellValue) -> Size {
        text_size(&value.display_text())
    }

    fn draw_content(&self, surface: &mut dyn Surface, rect: Rect, value: &CellValue, state: CellState) {
        surface.draw_text(rect, &value.display_text(), state);
    }

    fn create_editor(&self, rect: Rect, value: &CellValue) -> Option<Box<dyn EditorControl>> {
        match value {
            CellValue::Custom(_) => None,
            _ => Some(Box::new(TextEditorControl::new(rect, value.clone()))),
        }
    }
}

/// Draws a check box for boolean values; activation flips the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleRenderer;

impl ToggleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ToggleRenderer {
    fn cell_size(&self, _value: &CellValue) -> Size {
        Size::new(LINE_HEIGHT + 2.0 * PADDING, LINE_HEIGHT)
    }

    fn draw_content(&self, surface: &mut dyn Surface, rect: Rect, value: &CellValue, state: CellState) {
        if let Some(checked) = value.as_bool() {
            surface.draw_check(rect, checked, state);
        }
    }

    fn activate_cell(&self, value: &CellValue) -> Option<CellValue> {
        value.as_bool().map(|checked| CellValue::Bool(!checked))
    }
}

/// A single-line text editor.
///
/// The host mirrors its native text box into [`set_text`](Self::set_text).
/// The value read back has the same kind as the value editing started from.
#[derive(Debug, Clone)]
pub struct TextEditorControl {
    rect: Rect,
    original: CellValue,
    text: String,
    focused: bool,
    visible: bool,
}

impl TextEditorControl {
    pub fn new(rect: Rect, original: CellValue) -> Self {
        Self {
            rect,
            text: original.display_text(),
            original,
            focused: false,
            visible: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl EditorControl for TextEditorControl {
    fn value(&self) -> Option<CellValue> {
        self.original.parse_like(&self.text)
    }

    fn set_focus(&mut self) {
        self.focused = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.focused = false;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
