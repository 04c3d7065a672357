//! Smart quote key interception.
//!
//! Typing `"` or `'` in prose replaces the straight quote with a typographic
//! one. The flow for one keystroke:
//!
//! 1. Match the typed character against the registered [`QuoteRule`]s
//! 2. Classify the cursor position by walking the syntax tree upward
//!    ([`classify`]); code, comments and directives keep straight quotes
//! 3. For each selection range decide an [`EditIntent`]: wrap a non-empty
//!    range in the glyph pair, or insert one glyph picked by [`quote_side`]
//! 4. Commit every range as one [`Transaction`](crate::editor::Transaction)
//!
//! # Example
//!
//! ```
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//! use smartmark::config::QuoteSettings;
//! use smartmark::editor::EditorBuffer;
//! use smartmark::quotes::SmartQuotes;
//! use smartmark::syntax::MarkdownTree;
//!
//! let quotes = SmartQuotes::from_settings(&QuoteSettings::default());
//! let mut buffer = EditorBuffer::from_text("He said ");
//! buffer.move_to(8);
//! let tree = MarkdownTree::parse(&buffer.text());
//!
//! let key = KeyEvent::new(KeyCode::Char('"'), KeyModifiers::NONE);
//! assert!(quotes.handle_key(&key, &mut buffer, &tree));
//! assert_eq!(buffer.text(), "He said “");
//! ```

mod context;
mod rule;
mod side;

pub use context::{Context, LITERAL_CONTEXTS, classify, is_literal};
pub use rule::{EditIntent, QuoteKind, QuotePair, QuoteRule, SmartQuotes};
pub use side::{QuoteSide, quote_side};
