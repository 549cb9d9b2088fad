//! View configuration.

use crate::column::ColumnId;
use crate::error::{Error, Result};
use crate::selection::{SelectionMode, SelectionStore};

/// Settings a [`MainWindow`](crate::MainWindow) is built with.
///
/// # Example
///
/// ```ignore
/// use horizon_dataview::{DataViewConfig, SelectionMode};
///
/// let config = DataViewConfig::default()
///     .with_selection_mode(SelectionMode::MultiSelection)
///     .with_uniform_row_height(20.0)
///     .with_cell_focus(true);
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DataViewConfig {
    pub selection_mode: SelectionMode,
    /// Height of every row when variable heights are off, and of rows whose
    /// model gives no height when they are on.
    pub uniform_row_height: f32,
    /// Ask the model for per-item row heights.
    pub variable_row_height: bool,
    /// Horizontal indent per tree level in the expander column.
    pub indent: f32,
    /// Keyboard navigation moves between cells, not only rows.
    pub cell_focus: bool,
    /// Column showing the tree structure. Defaults to the first visible column.
    pub expander_column: Option<ColumnId>,
    /// Above this many rows, a range selection change is reported as a range.
    pub many_rows_threshold: usize,
}

impl Default for DataViewConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::SingleSelection,
            uniform_row_height: 24.0,
            variable_row_height: false,
            indent: 16.0,
            cell_focus: false,
            expander_column: None,
            many_rows_threshold: SelectionStore::DEFAULT_MANY_THRESHOLD,
        }
    }
}

impl DataViewConfig {
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn with_uniform_row_height(mut self, height: f32) -> Self {
        self.uniform_row_height = height;
        self
    }

    pub fn with_variable_row_height(mut self, enabled: bool) -> Self {
        self.variable_row_height = enabled;
        self
    }

    pub fn with_indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_cell_focus(mut self, enabled: bool) -> Self {
        self.cell_focus = enabled;
        self
    }

    pub fn with_expander_column(mut self, column: ColumnId) -> Self {
        self.expander_column = Some(column);
        self
    }

    pub fn with_many_rows_threshold(mut self, threshold: usize) -> Self {
        self.many_rows_threshold = threshold;
        self
    }

    /// Check that sizes are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.uniform_row_height.is_finite() || self.uniform_row_height <= 0.0 {
            return Err(Error::invalid_config(
                "uniform_row_height",
                format!("must be finite and positive, got {}", self.uniform_row_height),
            ));
        }
        if !self.indent.is_finite() || self.indent < 0.0 {
            return Err(Error::invalid_config(
                "indent",
                format!("must be finite and non-negative, got {}", self.indent),
            ));
        }
        Ok(())
    }
}
