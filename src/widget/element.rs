//! Interactive elements inside a rendered widget.

use serde_json::Value;
use tracing::info;

use super::page_ref::{PageRef, TAG_PREFIX, extract_hashtag};
use super::{EventKind, EventOutcome, WidgetAction, WidgetError, WidgetEvent};

/// A command invocation parsed from a button's `onclick` data.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandCall {
    pub name: String,
    pub args: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetElement {
    /// A wiki link carrying its reference.
    PageLink { data_ref: String },
    /// A rendered `#tag`.
    Hashtag { text: String },
    /// A button; `command` is `None` when its onclick is not a command.
    CommandButton { command: Option<CommandCall> },
    /// A task checkbox mirrored from another page.
    TaskCheckbox { task_ref: String, state: String },
}

impl WidgetElement {
    pub fn page_link(data_ref: impl Into<String>) -> Self {
        Self::PageLink {
            data_ref: data_ref.into(),
        }
    }

    pub fn hashtag(text: impl Into<String>) -> Self {
        Self::Hashtag { text: text.into() }
    }

    pub fn task_checkbox(task_ref: impl Into<String>, state: impl Into<String>) -> Self {
        Self::TaskCheckbox {
            task_ref: task_ref.into(),
            state: state.into(),
        }
    }

    /// Build a button from its `onclick` JSON, e.g.
    /// `["command", "Page: New", {"name": "x"}]`.
    ///
    /// # Errors
    /// Returns [`WidgetError`] if `onclick` is not a JSON array, or is a
    /// command without a string name.
    pub fn command_button(onclick: &str) -> Result<Self, WidgetError> {
        let parsed: Value = serde_json::from_str(onclick)?;
        let Value::Array(items) = parsed else {
            return Err(WidgetError::NotAnArray(onclick.to_string()));
        };
        if items.first().and_then(Value::as_str) != Some("command") {
            return Ok(Self::CommandButton { command: None });
        }
        let name = items
            .get(1)
            .and_then(Value::as_str)
            .ok_or_else(|| WidgetError::MissingCommandName(onclick.to_string()))?;
        Ok(Self::CommandButton {
            command: Some(CommandCall {
                name: name.to_string(),
                args: items.get(2).cloned(),
            }),
        })
    }

    /// Run this element's listeners for `event`.
    pub(super) fn handle(&mut self, event: &WidgetEvent, outcome: &mut EventOutcome) {
        match (self, &event.kind) {
            (Self::PageLink { data_ref }, EventKind::Click) => {
                if event.ctrl_or_meta() {
                    return;
                }
                outcome.prevent_default();
                outcome.stop_propagation();
                outcome.actions.push(WidgetAction::Navigate {
                    page_ref: PageRef::parse(data_ref),
                    new_window: false,
                });
            }
            (Self::Hashtag { text }, EventKind::Click) => {
                if event.ctrl_or_meta() {
                    return;
                }
                outcome.actions.push(WidgetAction::Navigate {
                    page_ref: PageRef {
                        page: format!("{TAG_PREFIX}{}", extract_hashtag(text)),
                        pos: Some(0),
                        header: None,
                    },
                    new_window: false,
                });
            }
            (
                Self::CommandButton {
                    command: Some(command),
                },
                EventKind::Click,
            ) => {
                outcome.prevent_default();
                outcome.stop_propagation();
                info!(command = %command.name, "command link clicked in widget");
                outcome.actions.push(WidgetAction::RunCommand {
                    name: command.name.clone(),
                    args: command.args.clone(),
                });
            }
            (Self::TaskCheckbox { .. }, EventKind::Click) => outcome.stop_propagation(),
            (Self::TaskCheckbox { task_ref, state }, EventKind::Change) => {
                outcome.stop_propagation();
                let new_state = if *state == " " { "x" } else { " " };
                let old_state = std::mem::replace(state, new_state.to_string());
                info!(task = %task_ref, %old_state, new_state, "toggling task");
                outcome.actions.push(WidgetAction::ToggleTask {
                    task_ref: task_ref.clone(),
                    old_state,
                    new_state: new_state.to_string(),
                });
            }
            _ => {}
        }
    }
}
