//! Cursor ranges and multi-range selections.
//!
//! Offsets are char indices into the buffer rope. A [`Range`] is a pair of
//! `anchor` and `head`; when they are equal the range is a plain cursor.
//!
//! ```text
//! anchor=2, head=7: "he[llo w]orld"  (forward selection)
//! anchor=7, head=2: "he]llo w[orld"  (backward selection)
//! anchor=5, head=5: "hello|world"    (cursor)
//! ```
//!
//! A [`Selection`] always holds at least one range. Ranges are kept sorted by
//! position and overlapping ranges are merged on construction.

use smallvec::{SmallVec, smallvec};

use super::EditError;

/// A single cursor or selected span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    /// The fixed end of the selection.
    pub anchor: usize,
    /// The end that moves with the cursor.
    pub head: usize,
}

impl Range {
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A cursor with no selected text.
    pub const fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Start of the range regardless of direction.
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// End of the range regardless of direction.
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn len(&self) -> usize {
        self.to() - self.from()
    }

    pub const fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The cursor position, which is always the head.
    pub const fn cursor(&self) -> usize {
        self.head
    }

    /// Shift both ends forward by `delta`.
    pub const fn shifted(self, delta: usize) -> Self {
        Self::new(self.anchor + delta, self.head + delta)
    }

    fn overlaps(&self, other: &Self) -> bool {
        // Two identical cursors count as overlapping so they collapse into one.
        self.from() == other.from() || other.from() < self.to()
    }
}

/// One or more ranges with a designated primary ("main") range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ranges: SmallVec<[Range; 1]>,
    primary: usize,
}

impl Selection {
    /// Build a selection from arbitrary ranges.
    ///
    /// Ranges are sorted and overlapping ranges are merged. `primary` indexes
    /// into the ranges as given and follows its range through the merge.
    ///
    /// # Errors
    /// Returns [`EditError::EmptySelection`] if `ranges` is empty, or
    /// [`EditError::PrimaryOutOfRange`] if `primary` does not index a range.
    pub fn new<I>(ranges: I, primary: usize) -> Result<Self, EditError>
    where
        I: IntoIterator<Item = Range>,
    {
        let ranges: Vec<Range> = ranges.into_iter().collect();
        if ranges.is_empty() {
            return Err(EditError::EmptySelection);
        }
        if primary >= ranges.len() {
            return Err(EditError::PrimaryOutOfRange {
                primary,
                len: ranges.len(),
            });
        }
        Ok(Self::normalize(ranges, primary))
    }

    /// Sort and merge. Callers guarantee `ranges` is non-empty and `primary`
    /// indexes into it.
    fn normalize(ranges: Vec<Range>, primary: usize) -> Self {
        let mut indexed: Vec<(usize, Range)> = ranges.into_iter().enumerate().collect();
        indexed.sort_by_key(|(_, range)| (range.from(), range.to()));

        let mut merged: SmallVec<[Range; 1]> = SmallVec::with_capacity(indexed.len());
        let mut new_primary = 0;
        for (input_idx, range) in indexed {
            match merged.last_mut() {
                Some(last) if last.overlaps(&range) => {
                    if !range.is_empty() || !last.is_empty() {
                        let from = last.from();
                        let to = last.to().max(range.to());
                        let backward = if last.is_empty() {
                            range.head < range.anchor
                        } else {
                            last.head < last.anchor
                        };
                        *last = if backward {
                            Range::new(to, from)
                        } else {
                            Range::new(from, to)
                        };
                    }
                }
                _ => merged.push(range),
            }
            if input_idx == primary {
                new_primary = merged.len() - 1;
            }
        }

        Self {
            ranges: merged,
            primary: new_primary,
        }
    }

    /// Map every range through `f`, then sort and merge again.
    pub fn transform<F>(&self, f: F) -> Self
    where
        F: FnMut(Range) -> Range,
    {
        let mapped = self.ranges.iter().copied().map(f).collect();
        Self::normalize(mapped, self.primary)
    }

    /// A selection holding one range.
    pub fn single(anchor: usize, head: usize) -> Self {
        Self {
            ranges: smallvec![Range::new(anchor, head)],
            primary: 0,
        }
    }

    /// A selection holding one cursor.
    pub fn point(pos: usize) -> Self {
        Self::single(pos, pos)
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// The main range, used where a single position is needed.
    pub fn primary(&self) -> Range {
        self.ranges[self.primary]
    }

    pub const fn primary_index(&self) -> usize {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Always false: a selection holds at least one range.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }

    /// Largest offset referenced by any range.
    pub fn max_offset(&self) -> usize {
        self.ranges.iter().map(Range::to).max().unwrap_or(0)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::point(0)
    }
}
