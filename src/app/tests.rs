use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::QuoteSettings;
use crate::editor::Range;
use crate::widget::{PageRef, Target, Widget, WidgetAction, WidgetElement, WidgetEvent};

use super::{Message, Model, key_for_char, update};

fn create_test_model(source: &str) -> Model {
    Model::new(source, &QuoteSettings::default())
}

fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn cursor(model: &Model) -> usize {
    model.buffer.selection().primary().cursor()
}

// --- Typing ---

#[test]
fn test_typing_a_quoted_phrase() {
    let mut model = create_test_model("");
    model.type_text("He said \"hi\" and 'bye'.");
    assert_eq!(model.buffer.text(), "He said “hi” and ‘bye’.");
}

#[test]
fn test_apostrophe_in_word_closes() {
    let mut model = create_test_model("");
    model.type_text("don't");
    assert_eq!(model.buffer.text(), "don’t");
}

#[test]
fn test_quote_after_newline_opens() {
    let mut model = create_test_model("");
    model.type_text("line\n\"next");
    assert_eq!(model.buffer.text(), "line\n“next");
}

#[test]
fn test_quotes_stay_straight_in_fenced_code() {
    let mut model = create_test_model("```\nx = \n```\n");
    model = update(model, Message::Select { anchor: 8, head: 8 });
    model.type_text("\"a\"");
    assert_eq!(model.buffer.text(), "```\nx = \"a\"\n```\n");
}

#[test]
fn test_tree_follows_edits() {
    let mut model = create_test_model("");
    model.type_text("`code ");
    // No closing backtick yet, so still prose.
    model.type_text("\"");
    assert_eq!(model.buffer.text(), "`code “");

    let mut model = create_test_model("");
    model.type_text("`code  ` tail");
    model = update(model, Message::Select { anchor: 6, head: 6 });
    assert_eq!(
        model.context_at_cursor(),
        vec!["InlineCode", "Paragraph", "Document"]
    );
    model.type_text("\"");
    assert_eq!(model.buffer.text(), "`code \" ` tail");
}

#[test]
fn test_wrap_selection_through_update() {
    let model = create_test_model("pick this word");
    let model = update(model, Message::Select { anchor: 5, head: 9 });
    let model = update(model, Message::Key(key_for_char('"')));
    assert_eq!(model.buffer.text(), "pick “this” word");
    assert_eq!(model.buffer.selection().primary(), Range::new(6, 10));
}

#[test]
fn test_disabled_quotes_insert_straight() {
    let settings = QuoteSettings {
        enabled: false,
        ..QuoteSettings::default()
    };
    let mut model = Model::new("", &settings);
    model.type_text("\"x\"");
    assert_eq!(model.buffer.text(), "\"x\"");
}

#[test]
fn test_add_cursor_types_at_both() {
    let model = create_test_model("a b");
    let model = update(model, Message::Select { anchor: 0, head: 0 });
    let mut model = update(model, Message::AddCursor(2));
    assert_eq!(model.buffer.selection().len(), 2);
    model.type_text("'");
    assert_eq!(model.buffer.text(), "‘a ‘b");
}

#[test]
fn test_backspace_with_cursor_at_selection_end() {
    let model = create_test_model("ab");
    let model = update(model, Message::Select { anchor: 0, head: 2 });
    let model = update(model, Message::AddCursor(2));
    assert_eq!(model.buffer.selection().len(), 2);
    let model = update(model, key(KeyCode::Backspace));
    assert_eq!(model.buffer.text(), "");
    assert_eq!(cursor(&model), 0);
}

// --- Default keys ---

#[test]
fn test_default_keys() {
    let model = create_test_model("ab");
    let model = update(model, Message::Select { anchor: 2, head: 2 });
    let model = update(model, key(KeyCode::Backspace));
    assert_eq!(model.buffer.text(), "a");
    let model = update(model, key(KeyCode::Left));
    assert_eq!(cursor(&model), 0);
    let model = update(model, key(KeyCode::Right));
    let model = update(model, key(KeyCode::Enter));
    assert_eq!(model.buffer.text(), "a\n");
    assert_eq!(cursor(&model), 2);
}

#[test]
fn test_ctrl_char_is_not_inserted() {
    let model = create_test_model("");
    let model = update(
        model,
        Message::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
    );
    assert_eq!(model.buffer.text(), "");
}

// --- Widgets ---

#[test]
fn test_widget_actions_become_effects() {
    let mut model = create_test_model("see {{links}} here");
    let widget = model.add_widget(
        Widget::new(Some("{{links}}".to_string()))
            .with_element(WidgetElement::page_link("Inbox@4")),
    );
    let model = update(
        model,
        Message::Widget {
            widget,
            target: Target::Element(0),
            event: WidgetEvent::click(),
        },
    );
    let mut model = model;
    assert_eq!(
        model.take_effects(),
        vec![WidgetAction::Navigate {
            page_ref: PageRef {
                page: "Inbox".to_string(),
                pos: Some(4),
                header: None,
            },
            new_window: false,
        }]
    );
    assert!(model.effects.is_empty());
}

#[test]
fn test_alt_mousedown_moves_cursor_to_widget() {
    let mut model = create_test_model("see {{links}} here");
    let widget = model.add_widget(Widget::new(Some("{{links}}".to_string())));
    let model = update(
        model,
        Message::Widget {
            widget,
            target: Target::Container,
            event: WidgetEvent::mouse_down().with_modifiers(KeyModifiers::ALT),
        },
    );
    assert_eq!(cursor(&model), 4);
    assert!(model.effects.is_empty());
}

#[test]
fn test_unknown_widget_is_ignored() {
    let model = create_test_model("text");
    let model = update(
        model,
        Message::Widget {
            widget: 3,
            target: Target::Container,
            event: WidgetEvent::click(),
        },
    );
    assert!(model.effects.is_empty());
}
