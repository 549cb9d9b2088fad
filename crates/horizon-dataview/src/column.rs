//! Column descriptions.

use std::fmt;
use std::sync::Arc;

use crate::renderer::Renderer;

/// Identifies a column by its model column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnId(usize);

impl ColumnId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The model column index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ColumnId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// A displayed column: geometry, editability and the renderer that draws it.
///
/// Columns are displayed in the order they are held by the view.
#[derive(Clone)]
pub struct Column {
    id: ColumnId,
    title: String,
    width: f32,
    min_width: f32,
    visible: bool,
    editable: bool,
    sortable: bool,
    renderer: Option<Arc<dyn Renderer>>,
    best_width: Option<f32>,
}

impl Column {
    /// Default column width in pixels.
    pub const DEFAULT_WIDTH: f32 = 80.0;

    /// Create a visible, non-editable column for model column `id`.
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width: Self::DEFAULT_WIDTH,
            min_width: 0.0,
            visible: true,
            editable: false,
            sortable: true,
            renderer: None,
            best_width: None,
        }
    }

    /// Set the width using builder pattern.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width.max(self.min_width);
        self
    }

    /// Set the minimum width using builder pattern.
    pub fn with_min_width(mut self, min_width: f32) -> Self {
        self.min_width = min_width;
        self.width = self.width.max(min_width);
        self
    }

    /// Set whether cells of this column may be edited in place.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Use a specific renderer instead of the view's default renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the column allows editing. The model still has the final say
    /// per cell.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn renderer(&self) -> Option<&Arc<dyn Renderer>> {
        self.renderer.as_ref()
    }

    /// Width taken in the row layout: 0 when hidden.
    pub fn exposed_width(&self) -> f32 {
        if self.visible { self.width } else { 0.0 }
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.width = width.max(self.min_width);
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn cached_best_width(&self) -> Option<f32> {
        self.best_width
    }

    pub(crate) fn set_cached_best_width(&mut self, width: f32) {
        self.best_width = Some(width);
    }

    pub(crate) fn invalidate_best_width(&mut self) {
        self.best_width = None;
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("visible", &self.visible)
            .field("editable", &self.editable)
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}
