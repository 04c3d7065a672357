// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. quotes::QuoteKind)
    clippy::module_name_repetitions
)]

//! # Smartmark
//!
//! Smart quotes and widget event wiring for a markdown editor.
//!
//! Smartmark turns straight quotes into typographic ones as you type:
//! - `"` and `'` become `“ ”` and `‘ ’`, opening or closing depending on the
//!   character before the cursor
//! - A selection is wrapped in the quote pair instead of replaced
//! - Code, comments, front matter and inline directives keep straight quotes
//! - Every cursor of a multi-cursor selection is edited in one transaction
//!
//! ## Architecture
//!
//! Smartmark uses The Elm Architecture (TEA) pattern:
//! - **Model**: Buffer, syntax tree, quote rules and widgets
//! - **Message**: Key presses, selections and widget events
//! - **Update**: State transitions
//!
//! ## Modules
//!
//! - [`app`]: Model, messages and update
//! - [`config`]: JSON configuration and quote settings
//! - [`editor`]: Rope buffer, selections and transactions
//! - [`quotes`]: Smart quote key interception
//! - [`syntax`]: Markdown syntax tree and context lookup
//! - [`widget`]: Inline widget event wiring

pub mod app;
pub mod config;
pub mod editor;
pub mod quotes;
pub mod syntax;
pub mod widget;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{Message, Model, update};
    pub use crate::config::QuoteSettings;
    pub use crate::editor::{EditorBuffer, Range, Selection};
    pub use crate::quotes::SmartQuotes;
    pub use crate::syntax::{MarkdownTree, SyntaxTree};
}
