use ropey::Rope;

use super::selection::{Range, Selection};
use super::transaction::Transaction;
use super::EditError;

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// Holds the document text and the current selection. Plain typing goes
/// through [`insert_char`](Self::insert_char) and friends; hooks that need
/// an atomic multi-range edit build a [`Transaction`] against
/// [`rope`](Self::rope) and hand it to [`apply`](Self::apply).
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    dirty: bool,
    revision: u64,
}

impl EditorBuffer {
    /// Create a new buffer from a string, with the cursor at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::point(0),
            dirty: false,
            revision: 0,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Read-only view of the underlying rope.
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The current selection.
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Counter bumped by every change to the text.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Document length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text between two char offsets, clamped to the document.
    pub fn slice(&self, from: usize, to: usize) -> String {
        let len = self.rope.len_chars();
        let to = to.min(len);
        let from = from.min(to);
        self.rope.slice(from..to).to_string()
    }

    /// The char immediately before `offset`, if any.
    pub fn char_before(&self, offset: usize) -> Option<char> {
        if offset == 0 || offset > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char(offset - 1))
    }

    /// Char offset of the first occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let text = self.text();
        let byte_idx = text.find(needle)?;
        Some(self.rope.byte_to_char(byte_idx))
    }

    /// Replace the selection.
    ///
    /// # Errors
    /// Returns [`EditError::InvalidRange`] if any range reaches past the end
    /// of the document.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditError> {
        let len = self.rope.len_chars();
        if let Some(bad) = selection.iter().find(|range| range.to() > len) {
            return Err(EditError::InvalidRange {
                anchor: bad.anchor,
                head: bad.head,
                len,
            });
        }
        self.selection = selection;
        Ok(())
    }

    /// Collapse the selection to a single cursor, clamped to the document.
    pub fn move_to(&mut self, offset: usize) {
        self.selection = Selection::point(offset.min(self.rope.len_chars()));
    }

    /// Select a single span, clamped to the document.
    pub fn select(&mut self, anchor: usize, head: usize) {
        let len = self.rope.len_chars();
        self.selection = Selection::single(anchor.min(len), head.min(len));
    }

    /// Move every cursor one char. A non-empty range collapses to the
    /// matching edge instead.
    pub fn move_cursor(&mut self, direction: Direction) {
        let len = self.rope.len_chars();
        self.selection = self.selection.transform(|range| match direction {
            Direction::Left if !range.is_empty() => Range::point(range.from()),
            Direction::Right if !range.is_empty() => Range::point(range.to()),
            Direction::Left => Range::point(range.head.saturating_sub(1)),
            Direction::Right => Range::point((range.head + 1).min(len)),
        });
    }

    /// Insert a character at every range, replacing any selected text.
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Insert a string at every range, replacing any selected text.
    ///
    /// Each cursor ends up after its inserted text.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() && self.selection.iter().all(Range::is_empty) {
            return;
        }
        let inserted = s.chars().count();
        let ranges: Vec<Range> = self.selection.iter().copied().collect();

        for range in ranges.iter().rev() {
            self.rope.remove(range.from()..range.to());
            self.rope.insert(range.from(), s);
        }

        let mut removed = 0;
        let mut added = 0;
        self.selection = self.selection.transform(|range| {
            let pos = range.from() - removed + added + inserted;
            removed += range.len();
            added += inserted;
            Range::point(pos)
        });
        self.dirty = true;
        self.revision += 1;
    }

    /// Delete the selected text, or the char before each cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        // Spans are clipped against the previous one so a cursor touching the
        // end of a selection does not delete the same char twice.
        let mut prev_to = 0;
        let deletions: Vec<(usize, usize)> = self
            .selection
            .iter()
            .map(|range| {
                let (from, to) = if range.is_empty() {
                    (range.head.saturating_sub(1), range.head)
                } else {
                    (range.from(), range.to())
                };
                let from = from.max(prev_to);
                let to = to.max(from);
                prev_to = to;
                (from, to)
            })
            .collect();
        if deletions.iter().all(|(from, to)| from == to) {
            return false;
        }

        for (from, to) in deletions.iter().rev() {
            self.rope.remove(*from..*to);
        }

        let mut removed = 0;
        let mut next = deletions.iter();
        self.selection = self.selection.transform(|_| {
            let (from, to) = next.next().copied().unwrap_or_default();
            let pos = from - removed;
            removed += to - from;
            Range::point(pos)
        });
        self.dirty = true;
        self.revision += 1;
        true
    }

    /// Apply a transaction and install its selection.
    ///
    /// # Errors
    /// Propagates [`EditError`] from [`Transaction::apply`]; the buffer is
    /// left unchanged in that case.
    pub fn apply(&mut self, transaction: &Transaction) -> Result<(), EditError> {
        transaction.apply(&mut self.rope)?;
        self.selection = transaction.selection().clone();
        if !transaction.is_empty() {
            self.dirty = true;
            self.revision += 1;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .finish()
    }
}
