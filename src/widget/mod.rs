//! Event wiring for rendered inline widgets.
//!
//! A [`Widget`] is a container holding interactive [`WidgetElement`]s: wiki
//! links, hashtags, command buttons and task checkboxes. Events are
//! dispatched the way a browser would: the target element's listeners run
//! first, then the container's, unless the element stopped propagation.
//!
//! Nothing is executed here. Navigation, commands and task updates come back
//! as [`WidgetAction`] requests for the host to carry out.

mod element;
mod page_ref;

use std::collections::BTreeMap;
use std::fmt;

use crossterm::event::KeyModifiers;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub use element::{CommandCall, WidgetElement};
pub use page_ref::{PageRef, TAG_PREFIX, extract_hashtag};

use crate::editor::EditorBuffer;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("invalid onclick JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("onclick is not an array: {0}")]
    NotAnArray(String),
    #[error("command onclick has no command name: {0}")]
    MissingCommandName(String),
}

/// The kind of a DOM-style event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    MouseDown,
    Click,
    Change,
    /// Any other named event, for custom handlers.
    Custom(String),
}

impl EventKind {
    pub fn name(&self) -> &str {
        match self {
            Self::MouseDown => "mousedown",
            Self::Click => "click",
            Self::Change => "change",
            Self::Custom(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
    pub kind: EventKind,
    pub modifiers: KeyModifiers,
    pub data: Value,
}

impl WidgetEvent {
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            modifiers: KeyModifiers::NONE,
            data: Value::Null,
        }
    }

    pub const fn click() -> Self {
        Self::new(EventKind::Click)
    }

    pub const fn mouse_down() -> Self {
        Self::new(EventKind::MouseDown)
    }

    pub const fn change() -> Self {
        Self::new(EventKind::Change)
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    fn ctrl_or_meta(&self) -> bool {
        self.modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META)
    }

    fn alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }
}

/// Where an event was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The widget container itself.
    Container,
    /// An element, by index into [`Widget::elements`].
    Element(usize),
}

/// A request for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    Navigate { page_ref: PageRef, new_window: bool },
    RunCommand { name: String, args: Option<Value> },
    ToggleTask {
        task_ref: String,
        old_state: String,
        new_state: String,
    },
    /// Place the editor cursor at the widget's source text.
    MoveCursorIntoText(String),
    /// Produced by a custom handler.
    Custom(EventPayload),
}

/// What a custom handler receives.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    pub name: String,
    pub data: Value,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOutcome {
    pub actions: Vec<WidgetAction>,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventOutcome {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

pub type EventHandler = Box<dyn Fn(&EventPayload) -> Option<WidgetAction>>;

/// A rendered widget and its event handlers.
pub struct Widget {
    text: Option<String>,
    elements: Vec<WidgetElement>,
    handlers: BTreeMap<String, EventHandler>,
}

impl Widget {
    /// `text` is the widget's source text in the document, used for
    /// alt-click cursor placement.
    pub fn new(text: Option<String>) -> Self {
        Self {
            text,
            elements: Vec::new(),
            handlers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: WidgetElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Register a handler for events named `name` on the container.
    #[must_use]
    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&EventPayload) -> Option<WidgetAction> + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn elements(&self) -> &[WidgetElement] {
        &self.elements
    }

    pub fn element(&self, idx: usize) -> Option<&WidgetElement> {
        self.elements.get(idx)
    }

    /// Fire `event` at `target` and bubble it to the container.
    pub fn dispatch(&mut self, target: Target, event: &WidgetEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        if let Target::Element(idx) = target {
            match self.elements.get_mut(idx) {
                Some(element) => element.handle(event, &mut outcome),
                None => warn!(idx, "event target is not an element of this widget"),
            }
        }
        if !outcome.propagation_stopped {
            self.handle_container(event, &mut outcome);
        }
        outcome
    }

    fn handle_container(&self, event: &WidgetEvent, outcome: &mut EventOutcome) {
        if event.kind == EventKind::MouseDown {
            if let Some(text) = self.text.as_ref().filter(|_| event.alt()) {
                outcome
                    .actions
                    .push(WidgetAction::MoveCursorIntoText(text.clone()));
                outcome.prevent_default();
            }
            // The editor must not see mousedowns on widgets.
            outcome.stop_propagation();
        }

        if let Some(handler) = self.handlers.get(event.kind.name()) {
            let payload = EventPayload {
                name: event.kind.name().to_string(),
                data: event.data.clone(),
            };
            outcome.actions.extend(handler(&payload));
        }
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("text", &self.text)
            .field("elements", &self.elements)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Put the cursor at the first occurrence of `text`.
///
/// Returns `false`, leaving the selection alone, when `text` is not in the
/// document.
pub fn move_cursor_into_text(buffer: &mut EditorBuffer, text: &str) -> bool {
    match buffer.find(text) {
        Some(offset) => {
            buffer.move_to(offset);
            true
        }
        None => {
            warn!(text, "could not find position of widget in text");
            false
        }
    }
}
