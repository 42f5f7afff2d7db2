//! Input handling
//!
//! Keys reach the listing in normal mode; while the core waits on a prompt
//! they go to the open dialog instead.

mod dialog;
mod normal;
mod text_field;

pub use dialog::{DialogOutcome, handle_dialog_key};
pub use normal::{Action, Motion, apply_motion, map_key};
pub use text_field::TextField;

use crossterm::event::KeyEvent;

use crate::prompt::Prompt;
use crate::state::app::{App, Effect};

/// Handle a key pressed while the listing has focus
pub fn handle_normal_key(app: &mut App, key: KeyEvent, prompt: &mut dyn Prompt) -> Effect {
    match map_key(&app.config.keybindings, &key) {
        Some(Action::Motion(motion)) => {
            if let Some(view) = app.view_mut() {
                apply_motion(view, motion);
            }
            Effect::Stay
        }
        Some(Action::Command(command)) => app.dispatch(command, prompt),
        None => Effect::Stay,
    }
}
