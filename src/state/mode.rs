//! Host-side UI modes.
//!
//! The core asks its questions through blocking prompts; the terminal host
//! answers them by switching into one of these modal states until the user
//! accepts or dismisses the dialog.

use crate::prompt::InputRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Listing has focus
    #[default]
    Normal,
    Input(InputState),
    Confirm(ConfirmState),
    Pick(PickState),
}

/// Text-input dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub title: String,
    pub placeholder: String,
    pub value: String,
    /// Byte offset into `value`, always on a char boundary
    pub cursor: usize,
    /// Pre-filled text is selected until the first edit replaces it or a
    /// movement key deselects it
    pub selected: bool,
}

impl InputState {
    pub fn new(request: &InputRequest) -> Self {
        let value = request.initial.clone().unwrap_or_default();
        Self {
            title: request.title.clone(),
            placeholder: request.placeholder.clone(),
            cursor: value.len(),
            selected: !value.is_empty(),
            value,
        }
    }
}

/// Which confirmation button has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmFocus {
    Accept,
    Decline,
}

/// Yes/no dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub accept_label: String,
    pub focus: ConfirmFocus,
}

impl ConfirmState {
    pub fn new(message: &str, accept_label: &str) -> Self {
        Self {
            message: message.to_string(),
            accept_label: accept_label.to_string(),
            // Destructive actions start on the safe button
            focus: ConfirmFocus::Decline,
        }
    }
}

/// Single-choice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickState {
    pub title: String,
    pub items: Vec<String>,
    pub selected: usize,
}

impl PickState {
    pub fn new(title: &str, items: &[String]) -> Self {
        Self {
            title: title.to_string(),
            items: items.to_vec(),
            selected: 0,
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    /// Select the next item after the current one starting with `c`,
    /// wrapping around
    pub fn jump_to(&mut self, c: char) -> bool {
        let len = self.items.len();
        (1..=len)
            .map(|offset| (self.selected + offset) % len)
            .find(|&i| self.items[i].starts_with(c))
            .map(|i| self.selected = i)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_input_state_prefill_is_selected() {
        let state = InputState::new(&InputRequest::new("Rename", "New name").with_initial("a.txt"));
        assert_eq!(state.value, "a.txt");
        assert_eq!(state.cursor, 5);
        assert!(state.selected);

        let empty = InputState::new(&InputRequest::new("Create", "Name"));
        assert!(!empty.selected);
        assert_eq!(empty.cursor, 0);
    }

    #[test]
    fn test_pick_move_is_clamped() {
        let mut pick = PickState::new("Bookmarks", &items(&["a", "b", "c"]));
        pick.move_by(-1);
        assert_eq!(pick.selected, 0);
        pick.move_by(10);
        assert_eq!(pick.selected, 2);
    }

    #[test]
    fn test_pick_jump_cycles_matches() {
        let mut pick = PickState::new("Bookmarks", &items(&["w  /a", "x  /b", "w  /c"]));
        assert!(pick.jump_to('w'));
        assert_eq!(pick.selected, 2);
        assert!(pick.jump_to('w'));
        assert_eq!(pick.selected, 0);
        assert!(!pick.jump_to('z'));
        assert_eq!(pick.selected, 0);
    }
}
