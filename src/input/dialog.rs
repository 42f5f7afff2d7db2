//! Key handling for modal dialogs

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::prompt::Answer;
use crate::state::mode::{ConfirmFocus, ConfirmState, InputState, Mode, PickState};

use super::text_field::TextField;

/// Rows moved by PageUp/PageDown in a picker
const PICK_PAGE: isize = 10;

/// Result of feeding one key to a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Dialog stays open
    Pending,
    Input(Option<String>),
    Answer(Answer),
    Pick(Option<usize>),
}

pub fn handle_dialog_key(mode: &mut Mode, key: KeyEvent) -> DialogOutcome {
    match mode {
        Mode::Normal => DialogOutcome::Pending,
        Mode::Input(state) => handle_input_key(state, key),
        Mode::Confirm(state) => handle_confirm_key(state, key),
        Mode::Pick(state) => handle_pick_key(state, key),
    }
}

fn handle_input_key(state: &mut InputState, key: KeyEvent) -> DialogOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let was_selected = std::mem::replace(&mut state.selected, false);

    match key.code {
        KeyCode::Esc => return DialogOutcome::Input(None),
        KeyCode::Enter => {
            let value = state.value.trim_end_matches(['\r', '\n']).to_string();
            return DialogOutcome::Input(if value.is_empty() { None } else { Some(value) });
        }
        KeyCode::Char('c') if ctrl => return DialogOutcome::Input(None),
        KeyCode::Char('a') if ctrl => TextField::home(&mut state.cursor),
        KeyCode::Char('e') if ctrl => TextField::end(&state.value, &mut state.cursor),
        KeyCode::Char('u') if ctrl => TextField::delete_to_start(&mut state.value, &mut state.cursor),
        KeyCode::Char('w') if ctrl => TextField::delete_word(&mut state.value, &mut state.cursor),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            if was_selected {
                state.value.clear();
                state.cursor = 0;
            }
            TextField::insert_char(&mut state.value, &mut state.cursor, c);
        }
        KeyCode::Backspace if was_selected => {
            state.value.clear();
            state.cursor = 0;
        }
        KeyCode::Backspace => TextField::backspace(&mut state.value, &mut state.cursor),
        KeyCode::Delete => TextField::delete(&mut state.value, state.cursor),
        KeyCode::Left => TextField::left(&state.value, &mut state.cursor),
        KeyCode::Right => TextField::right(&state.value, &mut state.cursor),
        KeyCode::Home => TextField::home(&mut state.cursor),
        KeyCode::End => TextField::end(&state.value, &mut state.cursor),
        _ => state.selected = was_selected,
    }
    DialogOutcome::Pending
}

fn handle_confirm_key(state: &mut ConfirmState, key: KeyEvent) -> DialogOutcome {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => DialogOutcome::Answer(Answer::Cancel),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            DialogOutcome::Answer(Answer::Cancel)
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => DialogOutcome::Answer(Answer::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') => DialogOutcome::Answer(Answer::No),
        KeyCode::Enter => DialogOutcome::Answer(match state.focus {
            ConfirmFocus::Accept => Answer::Yes,
            ConfirmFocus::Decline => Answer::No,
        }),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
            state.focus = match state.focus {
                ConfirmFocus::Accept => ConfirmFocus::Decline,
                ConfirmFocus::Decline => ConfirmFocus::Accept,
            };
            DialogOutcome::Pending
        }
        _ => DialogOutcome::Pending,
    }
}

fn handle_pick_key(state: &mut PickState, key: KeyEvent) -> DialogOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return DialogOutcome::Pick(None),
        KeyCode::Char('c') if ctrl => return DialogOutcome::Pick(None),
        KeyCode::Enter if !state.items.is_empty() => return DialogOutcome::Pick(Some(state.selected)),
        KeyCode::Up => state.move_by(-1),
        KeyCode::Char('p') if ctrl => state.move_by(-1),
        KeyCode::Down => state.move_by(1),
        KeyCode::Char('n') if ctrl => state.move_by(1),
        KeyCode::PageUp => state.move_by(-PICK_PAGE),
        KeyCode::PageDown => state.move_by(PICK_PAGE),
        KeyCode::Home => state.selected = 0,
        KeyCode::End => state.selected = state.items.len().saturating_sub(1),
        KeyCode::Char(c) if !ctrl => {
            state.jump_to(c);
        }
        _ => {}
    }
    DialogOutcome::Pending
}
