//! Application state and message handling.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The editor state (buffer, syntax tree, quote rules, widgets)
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions
//!
//! Requests the editor cannot carry out itself (navigation, commands, task
//! updates) are queued on [`Model::effects`] for the host.

mod input;
mod model;
mod update;

pub use input::key_for_char;
pub use model::Model;
pub use update::{Message, update};

#[cfg(test)]
mod tests;
