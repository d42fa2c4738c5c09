use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::time::Instant;
use tracing::debug;

use crate::widget::{Focus, SearchWidget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    /// The search field changed; carries the new text.
    Edited(String),
    Quit,
}

/// Applies one key press to the widget. Returns what the event loop should do
/// next.
pub fn handle_key(widget: &mut SearchWidget, k: KeyEvent, now: Instant) -> KeyAction {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    match widget.focus() {
        Focus::Input => handle_input_key(widget, k, now),
        Focus::Autocomplete => handle_autocomplete_key(widget, k, now),
        Focus::Saved => handle_saved_key(widget, k),
    }
}

fn edit(widget: &mut SearchWidget, k: KeyEvent) -> Option<KeyAction> {
    match k.code {
        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Edited(widget.push_char(c).to_string()))
        }
        KeyCode::Backspace => Some(KeyAction::Edited(widget.pop_char().to_string())),
        _ => None,
    }
}

fn rows_selectable(widget: &SearchWidget) -> bool {
    widget.selection_attached() && !widget.autocomplete().is_empty()
}

fn save(widget: &mut SearchWidget, now: Instant) -> KeyAction {
    let outcome = widget.add_highlighted(now);
    debug!(?outcome, "selection");
    KeyAction::Continue
}

fn handle_input_key(widget: &mut SearchWidget, k: KeyEvent, now: Instant) -> KeyAction {
    if let Some(action) = edit(widget, k) {
        return action;
    }
    match k.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Down if rows_selectable(widget) => {
            widget.set_focus(Focus::Autocomplete);
            KeyAction::Continue
        }
        KeyCode::Tab => {
            if rows_selectable(widget) {
                widget.set_focus(Focus::Autocomplete);
            } else if !widget.saved().is_empty() {
                widget.set_focus(Focus::Saved);
            }
            KeyAction::Continue
        }
        KeyCode::Enter if rows_selectable(widget) => save(widget, now),
        _ => KeyAction::Continue,
    }
}

fn handle_autocomplete_key(widget: &mut SearchWidget, k: KeyEvent, now: Instant) -> KeyAction {
    if !rows_selectable(widget) {
        widget.set_focus(Focus::Input);
        return handle_input_key(widget, k, now);
    }
    if let Some(action) = edit(widget, k) {
        widget.set_focus(Focus::Input);
        return action;
    }
    match k.code {
        KeyCode::Up => {
            if widget.autocomplete().cursor() == Some(0) {
                widget.set_focus(Focus::Input);
            } else {
                widget.autocomplete_mut().move_cursor(-1);
            }
        }
        KeyCode::Down => widget.autocomplete_mut().move_cursor(1),
        KeyCode::Enter => return save(widget, now),
        KeyCode::Tab => {
            let next = if widget.saved().is_empty() {
                Focus::Input
            } else {
                Focus::Saved
            };
            widget.set_focus(next);
        }
        KeyCode::Esc => widget.set_focus(Focus::Input),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_saved_key(widget: &mut SearchWidget, k: KeyEvent) -> KeyAction {
    match k.code {
        KeyCode::Up => widget.saved_mut().move_cursor(-1),
        KeyCode::Down => widget.saved_mut().move_cursor(1),
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
            if let Some(removed) = widget.remove_highlighted() {
                debug!(name=%removed.name, "removed from saved panel");
            }
        }
        KeyCode::Tab | KeyCode::Esc => widget.set_focus(Focus::Input),
        _ => {}
    }
    KeyAction::Continue
}
