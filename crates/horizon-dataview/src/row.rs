//! Physical row handles.
//!
//! A [`Row`] is a position in the flattened, currently-visible display order.
//! Rows are transient coordinates: the same row may name a different node
//! after an expand, collapse, insert or removal. Use node handles for stable
//! identity.

use std::fmt;

/// A position in the visible row order, or [`Row::INVALID`].
///
/// Rows are totally ordered and `INVALID` sorts after every valid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row(usize);

impl Row {
    /// The "no row" sentinel.
    pub const INVALID: Row = Row(usize::MAX);

    /// Create a row handle for the given index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns `true` unless this is [`Row::INVALID`].
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != usize::MAX
    }

    /// The numeric index, or `None` for [`Row::INVALID`].
    #[inline]
    pub fn index(self) -> Option<usize> {
        self.is_valid().then_some(self.0)
    }

    /// Move by `delta` rows, saturating inside `[0, row_count - 1]`.
    ///
    /// Returns [`Row::INVALID`] if the row is invalid or there are no rows.
    pub fn offset(self, delta: isize, row_count: usize) -> Row {
        if !self.is_valid() || row_count == 0 {
            return Row::INVALID;
        }
        let last = row_count - 1;
        let moved = if delta >= 0 {
            self.0.saturating_add(delta.unsigned_abs())
        } else {
            self.0.saturating_sub(delta.unsigned_abs())
        };
        Row(moved.min(last))
    }

    /// The following row, clamped to the last row.
    #[inline]
    pub fn next(self, row_count: usize) -> Row {
        self.offset(1, row_count)
    }

    /// The preceding row, clamped to row 0.
    #[inline]
    pub fn prev(self, row_count: usize) -> Row {
        self.offset(-1, row_count)
    }
}

impl Default for Row {
    fn default() -> Self {
        Row::INVALID
    }
}

impl From<usize> for Row {
    fn from(index: usize) -> Self {
        Row(index)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "{index}"),
            None => f.write_str("<invalid>"),
        }
    }
}

static_assertions::assert_impl_all!(Row: Send, Sync, Copy, Ord);
