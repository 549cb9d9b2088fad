//! Row selection state.
//!
//! [`SelectionStore`] is a set of [`Row`]s kept as sorted, disjoint,
//! non-adjacent half-open ranges. Selecting everything in a million-row list
//! costs one range. The store knows nothing about nodes; when rows are
//! inserted or deleted the owner tells it, and selected rows below the change
//! shift by exactly the number of rows inserted or deleted before them.
//!
//! Single selection is a policy of the owner (clear, then select), not a
//! property of the store.
//!
//! # Example
//!
//! ```ignore
//! use horizon_dataview::{Row, SelectionStore};
//!
//! let mut selection = SelectionStore::new();
//! selection.select(Row::new(2), true);
//! selection.select(Row::new(5), true);
//!
//! // Two rows were inserted at row 3: row 5 is now row 7.
//! selection.on_items_inserted(3, 2);
//! assert!(selection.is_selected(Row::new(7)));
//! ```

use std::ops::Range;

use horizon_dataview_core::logging::targets;

use crate::row::Row;

/// Selection behavior mode for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// No items can be selected.
    NoSelection,
    /// Only one item can be selected at a time (default).
    #[default]
    SingleSelection,
    /// Any number of items; Ctrl toggles and Shift extends.
    MultiSelection,
}

/// Rows whose selection state changed in a range operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// The individual rows that changed.
    Rows(Vec<Row>),
    /// Too many rows changed to list; treat the whole inclusive range as changed.
    Many { from: Row, to: Row },
}

impl SelectionChange {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionChange::Rows(rows) if rows.is_empty())
    }
}

/// A compact set of selected rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    ranges: Vec<Range<usize>>,
    many_threshold: usize,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    /// Above this many changed rows, range operations report
    /// [`SelectionChange::Many`].
    pub const DEFAULT_MANY_THRESHOLD: usize = 100;

    /// Create an empty selection.
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            many_threshold: Self::DEFAULT_MANY_THRESHOLD,
        }
    }

    /// Set the "many rows changed" threshold using builder pattern.
    pub fn with_many_threshold(mut self, threshold: usize) -> Self {
        self.many_threshold = threshold;
        self
    }

    pub fn set_many_threshold(&mut self, threshold: usize) {
        self.many_threshold = threshold;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_selected(&self, row: Row) -> bool {
        let Some(index) = row.index() else {
            return false;
        };
        let i = self.ranges.partition_point(|r| r.end <= index);
        i < self.ranges.len() && self.ranges[i].start <= index
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|r| r.len()).sum()
    }

    /// The lowest selected row, or [`Row::INVALID`].
    pub fn first(&self) -> Row {
        self.ranges.first().map_or(Row::INVALID, |r| Row::new(r.start))
    }

    /// Selected rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Row> + '_ {
        self.ranges.iter().flat_map(|r| r.clone()).map(Row::new)
    }

    /// The underlying half-open ranges.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Select or unselect one row. Returns `true` if its state changed.
    pub fn select(&mut self, row: Row, on: bool) -> bool {
        let Some(index) = row.index() else {
            return false;
        };
        if self.is_selected(row) == on {
            return false;
        }
        if on {
            self.add_range(index..index + 1);
        } else {
            self.remove_range(index..index + 1);
        }
        true
    }

    /// Flip one row. Returns its new state.
    pub fn toggle(&mut self, row: Row) -> bool {
        let on = !self.is_selected(row);
        self.select(row, on);
        on && row.is_valid()
    }

    /// Select or unselect the inclusive range between `from` and `to`, in
    /// either order.
    pub fn select_range(&mut self, from: Row, to: Row, on: bool) -> SelectionChange {
        let (Some(a), Some(b)) = (from.index(), to.index()) else {
            return SelectionChange::Rows(Vec::new());
        };
        let (first, last) = if a <= b { (a, b) } else { (b, a) };
        let span = first..last + 1;

        let already = self.count_in(&span);
        let changing = if on { span.len() - already } else { already };

        let change = if changing > self.many_threshold {
            SelectionChange::Many {
                from: Row::new(first),
                to: Row::new(last),
            }
        } else {
            let rows = span
                .clone()
                .filter(|&i| self.is_selected(Row::new(i)) != on)
                .map(Row::new)
                .collect();
            SelectionChange::Rows(rows)
        };

        if on {
            self.add_range(span);
        } else {
            self.remove_range(span);
        }
        change
    }

    /// Select rows `0..count`.
    pub fn select_all(&mut self, count: usize) {
        self.ranges.clear();
        if count > 0 {
            self.ranges.push(0..count);
        }
    }

    /// Unselect everything except `except`, if it is selected.
    ///
    /// Returns `true` if nothing is left selected, `false` if `except` stayed
    /// selected.
    pub fn unselect_all(&mut self, except: Row) -> bool {
        if except.is_valid() && self.is_selected(except) {
            let index = except.index().unwrap_or_default();
            self.ranges.clear();
            self.ranges.push(index..index + 1);
            return false;
        }
        self.ranges.clear();
        true
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// `count` rows were inserted before row `at`: selected rows at or below
    /// `at` move down by `count`.
    pub fn on_items_inserted(&mut self, at: usize, count: usize) {
        if count == 0 || self.ranges.is_empty() {
            return;
        }
        let mut shifted = Vec::with_capacity(self.ranges.len() + 1);
        for r in self.ranges.drain(..) {
            if r.start >= at {
                shifted.push(r.start + count..r.end + count);
            } else if r.end > at {
                shifted.push(r.start..at);
                shifted.push(at + count..r.end + count);
            } else {
                shifted.push(r);
            }
        }
        self.ranges = shifted;
        tracing::trace!(target: targets::SELECTION, at, count, "selection shifted for insertion");
    }

    /// Rows `at..at + count` were deleted: they leave the selection and the
    /// rows below move up by `count`.
    ///
    /// Returns `true` if a selected row was among the deleted ones.
    pub fn on_items_deleted(&mut self, at: usize, count: usize) -> bool {
        if count == 0 || self.ranges.is_empty() {
            return false;
        }
        let end = at.saturating_add(count);
        let mut removed = false;
        let mut shifted = Vec::with_capacity(self.ranges.len());
        for r in self.ranges.drain(..) {
            if r.start < end && at < r.end {
                removed = true;
            }
            let before = r.start..r.end.min(at);
            if !before.is_empty() {
                shifted.push(before);
            }
            let after = r.start.max(end)..r.end;
            if !after.is_empty() {
                shifted.push(after.start - count..after.end - count);
            }
        }
        self.ranges = shifted;
        self.normalize();
        tracing::trace!(target: targets::SELECTION, at, count, removed, "selection shifted for deletion");
        removed
    }

    /// Shorthand for deleting a single row.
    pub fn on_item_deleted(&mut self, at: usize) -> bool {
        self.on_items_deleted(at, 1)
    }

    fn count_in(&self, span: &Range<usize>) -> usize {
        self.ranges
            .iter()
            .map(|r| r.end.min(span.end).saturating_sub(r.start.max(span.start)))
            .sum()
    }

    fn add_range(&mut self, range: Range<usize>) {
        let at = self.ranges.partition_point(|r| r.start < range.start);
        self.ranges.insert(at, range);
        self.normalize();
    }

    fn remove_range(&mut self, range: Range<usize>) {
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for r in self.ranges.drain(..) {
            if r.end <= range.start || r.start >= range.end {
                kept.push(r);
                continue;
            }
            if r.start < range.start {
                kept.push(r.start..range.start);
            }
            if r.end > range.end {
                kept.push(range.end..r.end);
            }
        }
        self.ranges = kept;
    }

    /// Merge overlapping or adjacent ranges. Expects `ranges` sorted by start.
    fn normalize(&mut self) {
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(self.ranges.len());
        for r in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
                _ => merged.push(r),
            }
        }
        self.ranges = merged;
    }
}
