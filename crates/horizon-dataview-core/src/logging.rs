//! Logging and debugging facilities for Horizon DataView.
//!
//! This module provides:
//! - Target and span names for filtering the `tracing` output of each subsystem
//! - Debug visualization for hierarchies through [`TreeDebug`]
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon DataView uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("horizon_dataview::tree=debug"))
//!         .init();
//! }
//! ```
//!
//! # Debug Visualization
//!
//! Anything implementing [`TreeSource`] can be dumped as indented text:
//!
//! ```ignore
//! use horizon_dataview_core::logging::TreeDebug;
//!
//! let debug = TreeDebug::new();
//! println!("{}", debug.format(&tree));
//! ```

use std::fmt;

/// Span names used throughout Horizon DataView for tracing.
pub mod span_names {
    /// Signal emission span.
    pub const SIGNAL: &str = "horizon_dataview::signal";
    /// Full resort of the node tree.
    pub const RESORT: &str = "horizon_dataview::resort";
    /// Tree rebuild after the model was cleared.
    pub const REBUILD: &str = "horizon_dataview::rebuild";
    /// Paint dispatch over the visible rows.
    pub const PAINT: &str = "horizon_dataview::paint";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_dataview_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_dataview_core::signal";
    /// Node tree mutations.
    pub const TREE: &str = "horizon_dataview::tree";
    /// Selection store.
    pub const SELECTION: &str = "horizon_dataview::selection";
    /// In-place editor sessions.
    pub const EDITOR: &str = "horizon_dataview::editor";
    /// Main window orchestration.
    pub const WINDOW: &str = "horizon_dataview::window";
    /// Keyboard and mouse handling.
    pub const INPUT: &str = "horizon_dataview::input";
}

/// A hierarchy that can be dumped by [`TreeDebug`].
pub trait TreeSource {
    /// Handle identifying one entry of the hierarchy.
    type Id: Copy + fmt::Debug;

    /// Top-level entries, in display order.
    fn roots(&self) -> Vec<Self::Id>;

    /// Children of an entry, in display order.
    fn children(&self, id: Self::Id) -> Vec<Self::Id>;

    /// Short human-readable label.
    fn label(&self, id: Self::Id) -> String;

    /// Extra state shown when [`TreeFormatOptions::show_details`] is set.
    fn details(&self, _id: Self::Id) -> Option<String> {
        None
    }
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show entry handles.
    pub show_ids: bool,
    /// Whether to show [`TreeSource::details`].
    pub show_details: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_details: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output: labels only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_details: false,
            ..Default::default()
        }
    }

    /// Set the tree style.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Limit the traversal depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Debug utility for visualizing hierarchies.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the whole hierarchy.
    pub fn format<T: TreeSource>(&self, tree: &T) -> String {
        let roots = tree.roots();
        let mut output = format!("Tree ({} top-level entries):\n", roots.len());

        if roots.is_empty() {
            output.push_str("  (empty)\n");
            return output;
        }

        let count = roots.len();
        for (i, id) in roots.into_iter().enumerate() {
            self.format_into(tree, id, 1, i + 1 == count, &mut output);
        }
        output
    }

    fn format_into<T: TreeSource>(
        &self,
        tree: &T,
        id: T::Id,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) {
        if let Some(max) = self.options.max_depth {
            if depth > max {
                return;
            }
        }

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(&tree.label(id));

        if self.options.show_ids {
            output.push_str(&format!(" [{:?}]", id));
        }
        if self.options.show_details {
            if let Some(details) = tree.details(id) {
                output.push_str(&format!(" ({details})"));
            }
        }
        output.push('\n');

        let children = tree.children(id);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(tree, child, depth + 1, i + 1 == count, output);
        }
    }

    /// Build the prefix string for an entry.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for _ in 1..depth {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_dataview::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
