use crossterm::event::KeyEvent;
use tracing::{trace, warn};

use crate::config::QuoteSettings;
use crate::editor::{EditorBuffer, Range, Selection};
use crate::quotes::SmartQuotes;
use crate::syntax::{MarkdownTree, context_chain};
use crate::widget::{EventOutcome, Target, Widget, WidgetAction, WidgetEvent, move_cursor_into_text};

use super::input::{apply_default_key, key_for_char};

/// The complete editor state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    /// Document text and selection
    pub buffer: EditorBuffer,
    /// Syntax tree for the current buffer text
    pub tree: MarkdownTree,
    /// Registered smart quote rules
    pub smart_quotes: SmartQuotes,
    /// Rendered widgets, addressed by index
    pub widgets: Vec<Widget>,
    /// Widget requests waiting for the host
    pub effects: Vec<WidgetAction>,
    parsed_revision: u64,
}

impl Model {
    pub fn new(source: &str, settings: &QuoteSettings) -> Self {
        let buffer = EditorBuffer::from_text(source);
        let parsed_revision = buffer.revision();
        Self {
            tree: MarkdownTree::parse(source),
            buffer,
            smart_quotes: SmartQuotes::from_settings(settings),
            widgets: Vec::new(),
            effects: Vec::new(),
            parsed_revision,
        }
    }

    /// Register a widget and return its index.
    pub fn add_widget(&mut self, widget: Widget) -> usize {
        self.widgets.push(widget);
        self.widgets.len() - 1
    }

    /// Offer the key to the quote rules, falling back to plain insertion.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        let consumed = self
            .smart_quotes
            .handle_key(key, &mut self.buffer, &self.tree);
        if !consumed {
            apply_default_key(&mut self.buffer, key);
        }
        self.sync_tree();
    }

    /// Replay `text` one key at a time.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.handle_key(&key_for_char(ch));
        }
    }

    pub fn handle_widget_event(
        &mut self,
        widget: usize,
        target: Target,
        event: &WidgetEvent,
    ) -> EventOutcome {
        let Some(widget_ref) = self.widgets.get_mut(widget) else {
            warn!(widget, "event for unknown widget");
            return EventOutcome::default();
        };
        let outcome = widget_ref.dispatch(target, event);
        for action in &outcome.actions {
            match action {
                WidgetAction::MoveCursorIntoText(text) => {
                    move_cursor_into_text(&mut self.buffer, text);
                }
                other => self.effects.push(other.clone()),
            }
        }
        outcome
    }

    /// Add a cursor at `offset` (clamped). The new cursor becomes primary.
    pub fn add_cursor(&mut self, offset: usize) {
        let offset = offset.min(self.buffer.len_chars());
        let mut ranges = self.buffer.selection().ranges().to_vec();
        let primary = ranges.len();
        ranges.push(Range::point(offset));
        let result = Selection::new(ranges, primary)
            .and_then(|selection| self.buffer.set_selection(selection));
        if let Err(err) = result {
            warn!(offset, %err, "could not add cursor");
        }
    }

    /// Hand queued widget requests to the host.
    pub fn take_effects(&mut self) -> Vec<WidgetAction> {
        std::mem::take(&mut self.effects)
    }

    /// Node type names at the primary cursor, innermost first.
    pub fn context_at_cursor(&self) -> Vec<String> {
        context_chain(&self.tree, self.buffer.selection().primary().from())
    }

    /// Reparse if the text changed since the last parse.
    pub(super) fn sync_tree(&mut self) {
        if self.buffer.revision() == self.parsed_revision {
            return;
        }
        self.tree = MarkdownTree::parse(&self.buffer.text());
        self.parsed_revision = self.buffer.revision();
        trace!(revision = self.parsed_revision, nodes = self.tree.len(), "reparsed");
    }
}
