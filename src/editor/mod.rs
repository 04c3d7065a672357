//! Lightweight editor model for in-place markdown editing.
//!
//! Provides a rope-backed text buffer with multi-range selections and
//! insert-only transactions, designed for integration into the TEA
//! architecture.

mod buffer;
mod selection;
mod transaction;

pub use buffer::{Direction, EditorBuffer};
pub use selection::{Range, Selection};
pub use transaction::{Insertion, RangeEdit, Transaction};

use thiserror::Error;

/// Errors raised while building or applying edits.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("insertion at {offset} is past the end of the document (len {len})")]
    OutOfBounds { offset: usize, len: usize },
    #[error("range {anchor}..{head} lies outside the document (len {len})")]
    InvalidRange {
        anchor: usize,
        head: usize,
        len: usize,
    },
    #[error("a selection needs at least one range")]
    EmptySelection,
    #[error("primary index {primary} out of range for {len} ranges")]
    PrimaryOutOfRange { primary: usize, len: usize },
}
