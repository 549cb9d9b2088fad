//! Repaint tracking.

use crate::row::Row;

/// Rows the host should repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyRegion {
    /// Nothing to repaint.
    #[default]
    None,
    /// An inclusive row range. `to == Row::INVALID` means "through the last row".
    Rows { from: Row, to: Row },
    /// The whole view.
    All,
}

impl DirtyRegion {
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyRegion::None)
    }

    /// Whether `row` lies inside the region.
    pub fn contains(&self, row: Row) -> bool {
        match *self {
            DirtyRegion::None => false,
            DirtyRegion::All => true,
            DirtyRegion::Rows { from, to } => row.is_valid() && from <= row && row <= to,
        }
    }

    /// Grow the region to cover `from..=to`.
    pub(crate) fn add_rows(&mut self, from: Row, to: Row) {
        if !from.is_valid() {
            return;
        }
        let (from, to) = if to < from { (to, from) } else { (from, to) };
        *self = match *self {
            DirtyRegion::None => DirtyRegion::Rows { from, to },
            DirtyRegion::All => DirtyRegion::All,
            DirtyRegion::Rows { from: a, to: b } => DirtyRegion::Rows {
                from: a.min(from),
                to: b.max(to),
            },
        };
    }

    pub(crate) fn add_all(&mut self) {
        *self = DirtyRegion::All;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_region_merging() {
        let mut region = DirtyRegion::default();
        assert!(region.is_none());

        region.add_rows(Row::new(4), Row::new(4));
        region.add_rows(Row::new(9), Row::new(7));
        assert_eq!(region, DirtyRegion::Rows { from: Row::new(4), to: Row::new(9) });
        assert!(region.contains(Row::new(5)));
        assert!(!region.contains(Row::new(10)));

        region.add_rows(Row::INVALID, Row::new(1));
        assert_eq!(region, DirtyRegion::Rows { from: Row::new(4), to: Row::new(9) });

        region.add_rows(Row::new(2), Row::INVALID);
        assert!(region.contains(Row::new(1_000)));

        region.add_all();
        region.add_rows(Row::new(0), Row::new(0));
        assert_eq!(region, DirtyRegion::All);
    }
}
