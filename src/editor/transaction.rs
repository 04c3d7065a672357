//! Insert-only transactions applied atomically to a rope.
//!
//! A [`Transaction`] is a set of [`Insertion`]s, all expressed against the
//! same pre-edit document, plus the selection to install once they are
//! applied. [`Transaction::change_by_range`] builds one from a per-range
//! callback the way multi-cursor edits are usually composed: every callback
//! sees the unmutated document and the results are stitched together
//! afterwards.

use ropey::Rope;
use smallvec::SmallVec;

use super::selection::{Range, Selection};
use super::EditError;

/// Text inserted at a char offset of the pre-edit document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub at: usize,
    pub text: String,
}

impl Insertion {
    pub fn new(at: usize, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }

    /// Length of the inserted text in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The edit produced for one selection range.
///
/// `range` is expressed in the document as it looks after this range's own
/// insertions, ignoring every other range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEdit {
    pub insertions: SmallVec<[Insertion; 2]>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    insertions: Vec<Insertion>,
    selection: Selection,
}

impl Transaction {
    /// Build a transaction with one edit per selection range.
    ///
    /// Ranges are visited in document order. Each resulting range is shifted
    /// by the text inserted for the ranges before it, so the final selection
    /// lines up with the post-edit document.
    ///
    /// # Errors
    /// Returns [`EditError::InvalidRange`] if a selection range lies outside
    /// `doc`, or [`EditError::OutOfBounds`] if the callback inserts past the
    /// end of `doc`.
    pub fn change_by_range<F>(doc: &Rope, selection: &Selection, mut f: F) -> Result<Self, EditError>
    where
        F: FnMut(&Range) -> RangeEdit,
    {
        let len = doc.len_chars();
        let mut insertions = Vec::with_capacity(selection.len() * 2);
        let mut ranges: SmallVec<[Range; 1]> = SmallVec::with_capacity(selection.len());
        let mut shift = 0;

        for range in selection.iter() {
            if range.to() > len {
                return Err(EditError::InvalidRange {
                    anchor: range.anchor,
                    head: range.head,
                    len,
                });
            }
            let edit = f(range);
            let mut inserted = 0;
            for insertion in edit.insertions {
                if insertion.at > len {
                    return Err(EditError::OutOfBounds {
                        offset: insertion.at,
                        len,
                    });
                }
                inserted += insertion.len();
                insertions.push(insertion);
            }
            ranges.push(edit.range.shifted(shift));
            shift += inserted;
        }

        // Stable: insertions sharing an offset keep their emission order.
        insertions.sort_by_key(|insertion| insertion.at);
        let selection = Selection::new(ranges, selection.primary_index())?;

        Ok(Self {
            insertions,
            selection,
        })
    }

    pub fn insertions(&self) -> &[Insertion] {
        &self.insertions
    }

    /// Selection to install after the transaction is applied.
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.iter().all(Insertion::is_empty)
    }

    /// Total number of chars this transaction adds.
    pub fn inserted_len(&self) -> usize {
        self.insertions.iter().map(Insertion::len).sum()
    }

    /// Apply all insertions to `doc`.
    ///
    /// Bounds are checked before anything is written, so a failing
    /// transaction leaves `doc` untouched.
    ///
    /// # Errors
    /// Returns [`EditError::OutOfBounds`] if an insertion lies past the end of
    /// `doc`.
    pub fn apply(&self, doc: &mut Rope) -> Result<(), EditError> {
        let len = doc.len_chars();
        if let Some(bad) = self.insertions.iter().find(|insertion| insertion.at > len) {
            return Err(EditError::OutOfBounds {
                offset: bad.at,
                len,
            });
        }
        // Back to front so earlier offsets stay valid; equal offsets are
        // inserted in reverse so they read in emission order.
        for insertion in self.insertions.iter().rev() {
            doc.insert(insertion.at, &insertion.text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn insert_x(range: &Range) -> RangeEdit {
        RangeEdit {
            insertions: smallvec![Insertion::new(range.head, "x")],
            range: Range::point(range.head + 1),
        }
    }

    #[test]
    fn test_single_cursor_insert() {
        let mut doc = Rope::from_str("abc");
        let tx = Transaction::change_by_range(&doc, &Selection::point(1), insert_x).unwrap();
        tx.apply(&mut doc).unwrap();
        assert_eq!(doc.to_string(), "axbc");
        assert_eq!(tx.selection().primary(), Range::point(2));
    }

    #[test]
    fn test_multi_cursor_offsets_shift_by_earlier_ranges() {
        let mut doc = Rope::from_str("ab cd ef");
        let sel = Selection::new(
            vec![Range::point(2), Range::point(5), Range::point(8)],
            1,
        )
        .unwrap();
        let tx = Transaction::change_by_range(&doc, &sel, insert_x).unwrap();
        tx.apply(&mut doc).unwrap();
        assert_eq!(doc.to_string(), "abx cdx efx");
        assert_eq!(
            tx.selection().ranges(),
            &[Range::point(3), Range::point(7), Range::point(11)]
        );
        assert_eq!(tx.selection().primary(), Range::point(7));
    }

    #[test]
    fn test_same_offset_keeps_emission_order() {
        let mut doc = Rope::from_str("ab");
        let tx = Transaction::change_by_range(&doc, &Selection::point(1), |_| RangeEdit {
            insertions: smallvec![Insertion::new(1, "<"), Insertion::new(1, ">")],
            range: Range::point(2),
        })
        .unwrap();
        tx.apply(&mut doc).unwrap();
        assert_eq!(doc.to_string(), "a<>b");
    }

    #[test]
    fn test_multibyte_insertions_count_chars() {
        let mut doc = Rope::from_str("é é");
        let sel = Selection::new(vec![Range::point(1), Range::point(3)], 0).unwrap();
        let tx = Transaction::change_by_range(&doc, &sel, |range| RangeEdit {
            insertions: smallvec![Insertion::new(range.head, "”")],
            range: Range::point(range.head + 1),
        })
        .unwrap();
        assert_eq!(tx.inserted_len(), 2);
        tx.apply(&mut doc).unwrap();
        assert_eq!(doc.to_string(), "é” é”");
        assert_eq!(tx.selection().ranges(), &[Range::point(2), Range::point(5)]);
    }

    #[test]
    fn test_range_outside_document_is_rejected() {
        let doc = Rope::from_str("abc");
        let err = Transaction::change_by_range(&doc, &Selection::point(9), insert_x).unwrap_err();
        assert_eq!(
            err,
            EditError::InvalidRange {
                anchor: 9,
                head: 9,
                len: 3
            }
        );
    }

    #[test]
    fn test_insertion_past_end_is_rejected() {
        let doc = Rope::from_str("abc");
        let err = Transaction::change_by_range(&doc, &Selection::point(3), |_| RangeEdit {
            insertions: smallvec![Insertion::new(4, "x")],
            range: Range::point(5),
        })
        .unwrap_err();
        assert_eq!(err, EditError::OutOfBounds { offset: 4, len: 3 });
    }

    #[test]
    fn test_apply_to_shorter_doc_leaves_it_untouched() {
        let long = Rope::from_str("hello world");
        let tx = Transaction::change_by_range(&long, &Selection::point(11), insert_x).unwrap();

        let mut short = Rope::from_str("hi");
        assert!(tx.apply(&mut short).is_err());
        assert_eq!(short.to_string(), "hi");
    }

    #[test]
    fn test_empty_transaction() {
        let doc = Rope::from_str("abc");
        let tx = Transaction::change_by_range(&doc, &Selection::point(0), |range| RangeEdit {
            insertions: SmallVec::new(),
            range: *range,
        })
        .unwrap();
        assert!(tx.is_empty());
        assert_eq!(tx.inserted_len(), 0);
    }
}
