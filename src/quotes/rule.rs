//! Interception rules: one trigger character bound to one glyph pair.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use tracing::{debug, trace, warn};

use super::context::{Context, classify};
use super::side::{QuoteSide, quote_side};
use crate::config::QuoteSettings;
use crate::editor::{EditError, EditorBuffer, Insertion, Range, RangeEdit, Transaction};
use crate::syntax::SyntaxTree;

/// Replacement glyphs for one quote kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePair {
    pub left: String,
    pub right: String,
}

impl QuotePair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// `“` and `”`.
    pub fn double() -> Self {
        Self::new("\u{201C}", "\u{201D}")
    }

    /// `‘` and `’`.
    pub fn single() -> Self {
        Self::new("\u{2018}", "\u{2019}")
    }

    pub fn glyph(&self, side: QuoteSide) -> &str {
        match side {
            QuoteSide::Left => &self.left,
            QuoteSide::Right => &self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    Double,
    Single,
}

impl QuoteKind {
    pub const ALL: [Self; 2] = [Self::Double, Self::Single];

    pub const fn trigger(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }

    pub fn default_pair(self) -> QuotePair {
        match self {
            Self::Double => QuotePair::double(),
            Self::Single => QuotePair::single(),
        }
    }

    /// Config key for this kind, e.g. `smartQuotes.double`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Single => "single",
        }
    }
}

/// The mutation decided for one selection range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditIntent<'a> {
    /// Surround a non-empty range with a glyph pair.
    Wrap { left: &'a str, right: &'a str },
    /// Insert a single glyph at the cursor.
    Insert { glyph: &'a str },
}

impl EditIntent<'_> {
    /// Turn the intent into insertions for `range`, with the resulting range
    /// expressed after those insertions.
    pub fn into_edit(self, range: &Range) -> RangeEdit {
        match self {
            Self::Wrap { left, right } => RangeEdit {
                insertions: smallvec![
                    Insertion::new(range.from(), left),
                    Insertion::new(range.to(), right),
                ],
                range: range.shifted(left.chars().count()),
            },
            Self::Insert { glyph } => {
                let cursor = range.cursor();
                RangeEdit {
                    insertions: smallvec![Insertion::new(cursor, glyph)],
                    range: Range::point(cursor + glyph.chars().count()),
                }
            }
        }
    }
}

/// A trigger character bound to its replacement glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRule {
    trigger: char,
    pair: QuotePair,
}

impl QuoteRule {
    pub const fn new(trigger: char, pair: QuotePair) -> Self {
        Self { trigger, pair }
    }

    pub const fn trigger(&self) -> char {
        self.trigger
    }

    pub const fn pair(&self) -> &QuotePair {
        &self.pair
    }

    /// Decide what typing the trigger does to `range`.
    ///
    /// Returns `None` in a literal context, where the keystroke should fall
    /// through to plain insertion.
    pub fn decide(
        &self,
        context: Context,
        range: &Range,
        preceding: Option<char>,
    ) -> Option<EditIntent<'_>> {
        match context {
            Context::Literal => None,
            Context::Prose => Some(self.intent(range, preceding)),
        }
    }

    fn intent(&self, range: &Range, preceding: Option<char>) -> EditIntent<'_> {
        if range.is_empty() {
            EditIntent::Insert {
                glyph: self.pair.glyph(quote_side(preceding)),
            }
        } else {
            EditIntent::Wrap {
                left: &self.pair.left,
                right: &self.pair.right,
            }
        }
    }

    /// Build the transaction for every range of the current selection.
    ///
    /// Context is classified once, at the start of the primary range; when it
    /// is literal no transaction is produced.
    pub fn transaction<T: SyntaxTree>(
        &self,
        buffer: &EditorBuffer,
        tree: &T,
    ) -> Option<Result<Transaction, EditError>> {
        let main = buffer.selection().primary();
        let context = classify(tree, main.from());
        trace!(trigger = ?self.trigger, offset = main.from(), ?context, "quote key");
        if context == Context::Literal {
            return None;
        }

        Some(Transaction::change_by_range(
            buffer.rope(),
            buffer.selection(),
            |range| {
                self.intent(range, buffer.char_before(range.from()))
                    .into_edit(range)
            },
        ))
    }

    /// Apply the rule to `buffer`. Returns whether the keystroke was consumed.
    pub fn apply<T: SyntaxTree>(&self, buffer: &mut EditorBuffer, tree: &T) -> bool {
        let transaction = match self.transaction(buffer, tree) {
            None => return false,
            Some(Ok(transaction)) => transaction,
            Some(Err(err)) => {
                warn!(trigger = ?self.trigger, %err, "smart quote edit rejected");
                return false;
            }
        };
        if let Err(err) = buffer.apply(&transaction) {
            warn!(trigger = ?self.trigger, %err, "smart quote edit rejected");
            return false;
        }
        true
    }
}

/// The registered interception rules. Empty when smart quotes are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmartQuotes {
    rules: Vec<QuoteRule>,
}

impl SmartQuotes {
    pub fn from_settings(settings: &QuoteSettings) -> Self {
        if !settings.enabled {
            debug!("smart quotes disabled, no rules registered");
            return Self::default();
        }
        let rules = QuoteKind::ALL
            .into_iter()
            .map(|kind| QuoteRule::new(kind.trigger(), settings.pair(kind).clone()))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[QuoteRule] {
        &self.rules
    }

    pub fn is_enabled(&self) -> bool {
        !self.rules.is_empty()
    }

    pub fn rule_for(&self, ch: char) -> Option<&QuoteRule> {
        self.rules.iter().find(|rule| rule.trigger == ch)
    }

    /// Offer a key event to the rules. Returns `true` when it was consumed
    /// and the default insertion must not run.
    ///
    /// Matching is on the character the key produced; modifiers are not
    /// looked at.
    pub fn handle_key<T: SyntaxTree>(
        &self,
        key: &KeyEvent,
        buffer: &mut EditorBuffer,
        tree: &T,
    ) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let KeyCode::Char(ch) = key.code else {
            return false;
        };
        match self.rule_for(ch) {
            Some(rule) => rule.apply(buffer, tree),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{MarkdownTree, NodeKind, TreeBuilder};
    use crossterm::event::KeyModifiers;

    fn key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    fn prose(len: usize) -> MarkdownTree {
        TreeBuilder::new(len).finish()
    }

    fn type_quote(buffer: &mut EditorBuffer, ch: char) -> bool {
        let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
        let tree = MarkdownTree::parse(&buffer.text());
        quotes.handle_key(&key(ch), buffer, &tree)
    }

    // --- Decision ---

    #[test]
    fn test_decide_declines_in_literal_context() {
        let rule = QuoteRule::new('"', QuotePair::double());
        assert_eq!(rule.decide(Context::Literal, &Range::point(3), Some(' ')), None);
    }

    #[test]
    fn test_decide_cursor_picks_side() {
        let rule = QuoteRule::new('"', QuotePair::double());
        assert_eq!(
            rule.decide(Context::Prose, &Range::point(3), Some(' ')),
            Some(EditIntent::Insert { glyph: "“" })
        );
        assert_eq!(
            rule.decide(Context::Prose, &Range::point(3), Some('x')),
            Some(EditIntent::Insert { glyph: "”" })
        );
    }

    #[test]
    fn test_decide_range_wraps_regardless_of_preceding() {
        let rule = QuoteRule::new('\'', QuotePair::single());
        assert_eq!(
            rule.decide(Context::Prose, &Range::new(2, 5), Some('x')),
            Some(EditIntent::Wrap {
                left: "‘",
                right: "’"
            })
        );
    }

    #[test]
    fn test_wrap_edit_shifts_range_by_left_len() {
        let edit = EditIntent::Wrap {
            left: "<<",
            right: ">",
        }
        .into_edit(&Range::new(7, 3));
        assert_eq!(
            edit.insertions.as_slice(),
            &[Insertion::new(3, "<<"), Insertion::new(7, ">")]
        );
        assert_eq!(edit.range, Range::new(9, 5));
    }

    #[test]
    fn test_insert_edit_moves_cursor_past_glyph() {
        let edit = EditIntent::Insert { glyph: "«\u{a0}" }.into_edit(&Range::point(4));
        assert_eq!(edit.range, Range::point(6));
    }

    // --- Key handling ---

    #[test]
    fn test_handle_key_inserts_opening_quote() {
        let mut buffer = EditorBuffer::from_text("He said ");
        buffer.move_to(8);
        assert!(type_quote(&mut buffer, '"'));
        assert_eq!(buffer.text(), "He said “");
        assert_eq!(buffer.selection().primary(), Range::point(9));
    }

    #[test]
    fn test_handle_key_inserts_closing_quote() {
        let mut buffer = EditorBuffer::from_text("word");
        buffer.move_to(4);
        assert!(type_quote(&mut buffer, '"'));
        assert_eq!(buffer.text(), "word”");
        assert_eq!(buffer.selection().primary(), Range::point(5));
    }

    #[test]
    fn test_handle_key_wraps_selection() {
        let mut buffer = EditorBuffer::from_text("say hello now");
        buffer.select(4, 9);
        assert!(type_quote(&mut buffer, '\''));
        assert_eq!(buffer.text(), "say ‘hello’ now");
        let range = buffer.selection().primary();
        assert_eq!(range, Range::new(5, 10));
        assert_eq!(buffer.slice(range.from(), range.to()), "hello");
    }

    #[test]
    fn test_handle_key_ignores_other_keys() {
        let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
        let mut buffer = EditorBuffer::from_text("abc");
        let tree = prose(3);
        assert!(!quotes.handle_key(&key('x'), &mut buffer, &tree));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!quotes.handle_key(&enter, &mut buffer, &tree));
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_handle_key_ignores_modifiers() {
        let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
        let mut buffer = EditorBuffer::from_text("");
        let shifted = KeyEvent::new(KeyCode::Char('"'), KeyModifiers::SHIFT);
        assert!(quotes.handle_key(&shifted, &mut buffer, &prose(0)));
        assert_eq!(buffer.text(), "“");
    }

    #[test]
    fn test_handle_key_ignores_release() {
        let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
        let mut buffer = EditorBuffer::from_text("");
        let mut release = key('"');
        release.kind = KeyEventKind::Release;
        assert!(!quotes.handle_key(&release, &mut buffer, &prose(0)));
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_handle_key_declines_in_inline_code() {
        let mut buffer = EditorBuffer::from_text("a `code here` b\n");
        buffer.move_to(6);
        assert!(!type_quote(&mut buffer, '"'));
        assert_eq!(buffer.text(), "a `code here` b\n");
    }

    #[test]
    fn test_handle_key_declines_under_literal_ancestor() {
        let mut builder = TreeBuilder::new(20);
        let lua = builder.push(builder.root(), NodeKind::LuaDirective, 0..20);
        let para = builder.push(lua, NodeKind::Paragraph, 1..19);
        builder.push(para, NodeKind::Emphasis, 2..18);
        let tree = builder.finish();

        let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
        let mut buffer = EditorBuffer::from_text(&"x".repeat(20));
        buffer.move_to(10);
        assert!(!quotes.handle_key(&key('\''), &mut buffer, &tree));
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn test_disabled_registers_no_rules() {
        let settings = QuoteSettings {
            enabled: false,
            ..QuoteSettings::default()
        };
        let quotes = SmartQuotes::from_settings(&settings);
        assert!(!quotes.is_enabled());
        let mut buffer = EditorBuffer::from_text("");
        assert!(!quotes.handle_key(&key('"'), &mut buffer, &prose(0)));
    }

    #[test]
    fn test_custom_glyph_override() {
        let settings = QuoteSettings {
            single: QuotePair::new("<", "’"),
            ..QuoteSettings::default()
        };
        let quotes = SmartQuotes::from_settings(&settings);
        let mut buffer = EditorBuffer::from_text("a ");
        buffer.move_to(2);
        assert!(quotes.handle_key(&key('\''), &mut buffer, &prose(2)));
        assert_eq!(buffer.text(), "a <");
    }

    // --- Multiple ranges ---

    #[test]
    fn test_multi_cursor_sides_are_independent() {
        let mut buffer = EditorBuffer::from_text("one two");
        let selection =
            crate::editor::Selection::new([Range::point(0), Range::point(3)], 0).unwrap();
        buffer.set_selection(selection).unwrap();
        assert!(type_quote(&mut buffer, '"'));
        assert_eq!(buffer.text(), "“one” two");
        let ranges = buffer.selection().ranges().to_vec();
        assert_eq!(ranges, vec![Range::point(1), Range::point(5)]);
    }

    #[test]
    fn test_mixed_wrap_and_cursor() {
        let mut buffer = EditorBuffer::from_text("ab cd ");
        let selection =
            crate::editor::Selection::new([Range::new(0, 2), Range::point(6)], 1).unwrap();
        buffer.set_selection(selection).unwrap();
        assert!(type_quote(&mut buffer, '\''));
        assert_eq!(buffer.text(), "‘ab’ cd ‘");
        assert_eq!(
            buffer.selection().ranges(),
            &[Range::new(1, 3), Range::point(9)]
        );
        assert_eq!(buffer.selection().primary(), Range::point(9));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrap_preserves_selected_text(
                text in "[a-z ]{1,40}",
                a in 0usize..40,
                b in 0usize..40,
            ) {
                let len = text.chars().count();
                let (anchor, head) = (a % (len + 1), b % (len + 1));
                prop_assume!(anchor != head);

                let mut buffer = EditorBuffer::from_text(&text);
                buffer.select(anchor, head);
                let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
                prop_assert!(quotes.handle_key(&key('"'), &mut buffer, &prose(len)));

                let (from, to) = (anchor.min(head), anchor.max(head));
                let range = buffer.selection().primary();
                prop_assert_eq!(range, Range::new(anchor + 1, head + 1));
                prop_assert_eq!(buffer.slice(range.from(), range.to()), text[from..to].to_string());
                prop_assert_eq!(buffer.slice(from, from + 1), "“");
                prop_assert_eq!(buffer.slice(to + 1, to + 2), "”");
            }

            #[test]
            fn length_grows_by_glyph_lengths(
                text in "[a-z (.]{0,30}",
                cursors in proptest::collection::vec(0usize..31, 1..4),
            ) {
                let len = text.chars().count();
                let ranges: Vec<Range> = cursors.iter().map(|c| Range::point(c % (len + 1))).collect();
                let selection = crate::editor::Selection::new(ranges, 0).unwrap();
                let cursor_count = selection.len();

                let mut buffer = EditorBuffer::from_text(&text);
                buffer.set_selection(selection).unwrap();
                let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
                prop_assert!(quotes.handle_key(&key('\''), &mut buffer, &prose(len)));
                prop_assert_eq!(buffer.len_chars(), len + cursor_count);
            }
        }
    }
}
