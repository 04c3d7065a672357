//! Opening or closing quote, from the character before the cursor.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("non-word pattern is valid"));

/// Punctuation after which a quote still closes.
static CLOSES_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!?,.\-=“]").expect("closing punctuation pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSide {
    Left,
    Right,
}

/// Pick the quote side for an empty selection.
///
/// `preceding` is the character immediately before the cursor, `None` at
/// the start of the document.
///
/// ```
/// use smartmark::quotes::{QuoteSide, quote_side};
///
/// assert_eq!(quote_side(Some(' ')), QuoteSide::Left);
/// assert_eq!(quote_side(Some('d')), QuoteSide::Right);
/// assert_eq!(quote_side(None), QuoteSide::Left);
/// ```
pub fn quote_side(preceding: Option<char>) -> QuoteSide {
    let Some(ch) = preceding else {
        return QuoteSide::Left;
    };
    let mut buf = [0; 4];
    let text = ch.encode_utf8(&mut buf);
    if NON_WORD.is_match(text) && !CLOSES_AFTER.is_match(text) {
        QuoteSide::Left
    } else {
        QuoteSide::Right
    }
}
