use crossterm::event::KeyEvent;

use crate::app::Model;
use crate::widget::{Target, WidgetEvent};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A key press from the terminal or a replayed character
    Key(KeyEvent),
    /// A DOM-style event on a rendered widget
    Widget {
        widget: usize,
        target: Target,
        event: WidgetEvent,
    },
    /// Replace the selection with a single range (clamped)
    Select { anchor: usize, head: usize },
    /// Append a cursor at an offset, keeping the existing ranges
    AddCursor(usize),
}

/// Update the model based on a message.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Key(key) => model.handle_key(&key),
        Message::Widget {
            widget,
            target,
            event,
        } => {
            model.handle_widget_event(widget, target, &event);
        }
        Message::Select { anchor, head } => model.buffer.select(anchor, head),
        Message::AddCursor(offset) => model.add_cursor(offset),
    }
    model
}
