//! Normal mode key handling: cursor motions and listing commands

use crossterm::event::KeyEvent;

use crate::config::KeyBindings;
use crate::state::app::Command;
use crate::state::view::View;

/// Cursor or selection movement inside the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    ExtendUp,
    ExtendDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(Motion),
    Command(Command),
}

/// Actions in matching order. Both an action's binding and its `_alt`
/// variant are tried.
const ACTIONS: &[&str] = &[
    "quit",
    "extend_up",
    "extend_down",
    "move_up",
    "move_down",
    "page_up",
    "page_down",
    "go_top",
    "go_bottom",
    "clear_selection",
    "open",
    "parent",
    "home",
    "refresh",
    "rename",
    "delete",
    "create",
    "mkdir",
    "bookmark_save",
    "bookmark_jump",
    "bookmark_remove",
];

fn action_for(name: &str) -> Option<Action> {
    let action = match name {
        "quit" => Action::Command(Command::Quit),
        "extend_up" => Action::Motion(Motion::ExtendUp),
        "extend_down" => Action::Motion(Motion::ExtendDown),
        "move_up" => Action::Motion(Motion::Up),
        "move_down" => Action::Motion(Motion::Down),
        "page_up" => Action::Motion(Motion::PageUp),
        "page_down" => Action::Motion(Motion::PageDown),
        "go_top" => Action::Motion(Motion::Top),
        "go_bottom" => Action::Motion(Motion::Bottom),
        "clear_selection" => Action::Motion(Motion::ClearSelection),
        "open" => Action::Command(Command::OpenAtCursor),
        "parent" => Action::Command(Command::OpenParent),
        "home" => Action::Command(Command::OpenHome),
        "refresh" => Action::Command(Command::Refresh),
        "rename" => Action::Command(Command::Rename),
        "delete" => Action::Command(Command::Delete),
        "create" => Action::Command(Command::Create),
        "mkdir" => Action::Command(Command::CreateDirectory),
        "bookmark_save" => Action::Command(Command::BookmarkSave),
        "bookmark_jump" => Action::Command(Command::BookmarkJump),
        "bookmark_remove" => Action::Command(Command::BookmarkRemove),
        _ => return None,
    };
    Some(action)
}

/// Translate a key press into an action using the configured bindings
pub fn map_key(bindings: &KeyBindings, key: &KeyEvent) -> Option<Action> {
    ACTIONS
        .iter()
        .find(|name| bindings.matches_any(name, key))
        .and_then(|name| action_for(name))
}

pub fn apply_motion(view: &mut View, motion: Motion) {
    match motion {
        Motion::Up => view.move_up(),
        Motion::Down => view.move_down(),
        Motion::ExtendUp => view.extend_up(),
        Motion::ExtendDown => view.extend_down(),
        Motion::PageUp => view.page_up(),
        Motion::PageDown => view.page_down(),
        Motion::Top => view.move_home(),
        Motion::Bottom => view.move_end(),
        Motion::ClearSelection => view.clear_selection(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_default_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::Command(Command::OpenAtCursor))
        );
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Char('-'), KeyModifiers::NONE)),
            Some(Action::Command(Command::OpenParent))
        );
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Char('D'), KeyModifiers::SHIFT)),
            Some(Action::Command(Command::Delete))
        );
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Char('d'), KeyModifiers::NONE)),
            Some(Action::Command(Command::CreateDirectory))
        );
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Command(Command::Refresh))
        );
        assert_eq!(map_key(&bindings, &key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_shift_arrows_extend() {
        let bindings = KeyBindings::default();
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Down, KeyModifiers::SHIFT)),
            Some(Action::Motion(Motion::ExtendDown))
        );
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Down, KeyModifiers::NONE)),
            Some(Action::Motion(Motion::Down))
        );
    }

    #[test]
    fn test_rebound_key() {
        let mut bindings = KeyBindings::default();
        bindings.bindings.insert("bookmark_jump".to_string(), "b".to_string());
        assert_eq!(
            map_key(&bindings, &key(KeyCode::Char('b'), KeyModifiers::NONE)),
            Some(Action::Command(Command::BookmarkJump))
        );
        assert_eq!(map_key(&bindings, &key(KeyCode::Char('\''), KeyModifiers::NONE)), None);
    }
}
