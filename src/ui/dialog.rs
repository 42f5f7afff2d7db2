//! Modal dialogs drawn over the listing

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
};

use crate::input::TextField;
use crate::state::mode::{ConfirmFocus, ConfirmState, InputState, Mode, PickState};

use super::Theme;
use super::dialog_helpers::{DialogRenderer, DialogStyles, truncate_end};

const INPUT_WIDTH: u16 = 60;
const INPUT_HEIGHT: u16 = 5;
const CONFIRM_MIN_WIDTH: u16 = 40;
const CONFIRM_HEIGHT: u16 = 6;
const PICK_WIDTH: u16 = 64;
const MIN_WIDTH: u16 = 20;

/// Replays a previously drawn frame so a dialog can sit on top of it
pub struct Backdrop<'a> {
    buffer: &'a Buffer,
}

impl<'a> Backdrop<'a> {
    pub fn new(buffer: &'a Buffer) -> Self {
        Self { buffer }
    }
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let shared = area.intersection(self.buffer.area);
        for y in shared.top()..shared.bottom() {
            for x in shared.left()..shared.right() {
                buf[(x, y)] = self.buffer[(x, y)].clone();
            }
        }
    }
}

/// Renders whichever dialog `mode` holds; nothing in normal mode
pub struct DialogWidget<'a> {
    mode: &'a Mode,
    theme: &'a Theme,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a Mode, theme: &'a Theme) -> Self {
        Self { mode, theme }
    }
}

impl Widget for DialogWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.mode {
            Mode::Normal => {}
            Mode::Input(state) => render_input(state, self.theme, area, buf),
            Mode::Confirm(state) => render_confirm(state, self.theme, area, buf),
            Mode::Pick(state) => render_pick(state, self.theme, area, buf),
        }
    }
}

/// Terminal cursor position for the open dialog, if it takes text
pub fn dialog_cursor_position(mode: &Mode, area: Rect) -> Option<(u16, u16)> {
    let Mode::Input(state) = mode else {
        return None;
    };
    let dialog = DialogRenderer::center_dialog(area, INPUT_WIDTH, INPUT_HEIGHT, MIN_WIDTH)?;
    let (x, y, width) = input_field_area(dialog);
    let visible = width.saturating_sub(1).max(1);
    let col = TextField::display_column(&state.value, state.cursor);
    let skip = (col + 1).saturating_sub(visible);
    Some((x + (col - skip) as u16, y))
}

fn input_field_area(dialog: Rect) -> (u16, u16, usize) {
    (dialog.x + 2, dialog.y + 2, dialog.width.saturating_sub(4) as usize)
}

fn render_input(state: &InputState, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let Some(dialog) = DialogRenderer::center_dialog(area, INPUT_WIDTH, INPUT_HEIGHT, MIN_WIDTH) else {
        return;
    };
    let styles = DialogStyles::new(theme, theme.dialog_bg, theme.dialog_border);

    DialogRenderer::fill_background(dialog, buf, styles.bg);
    DialogRenderer::draw_border(dialog, buf, styles.border);
    DialogRenderer::draw_title(dialog, buf, &state.title, styles.title);

    let (x, y, width) = input_field_area(dialog);
    if state.value.is_empty() {
        DialogRenderer::draw_input_field(buf, x, y, width, &state.placeholder, 0, styles.placeholder);
    } else {
        let style = if state.selected { styles.input_selected } else { styles.input_focused };
        let col = TextField::display_column(&state.value, state.cursor);
        DialogRenderer::draw_input_field(buf, x, y, width, &state.value, col, style);
    }

    DialogRenderer::draw_help(dialog, buf, "Enter: OK  Esc: Cancel", styles.help);
}

fn confirm_buttons(state: &ConfirmState) -> [(String, bool); 2] {
    [
        (format!("[ {} ]", state.accept_label), state.focus == ConfirmFocus::Accept),
        ("[ Cancel ]".to_string(), state.focus == ConfirmFocus::Decline),
    ]
}

fn render_confirm(state: &ConfirmState, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let width = (state.message.chars().count() as u16 + 6).max(CONFIRM_MIN_WIDTH);
    let Some(dialog) = DialogRenderer::center_dialog(area, width, CONFIRM_HEIGHT, MIN_WIDTH) else {
        return;
    };
    let styles = DialogStyles::danger(theme);

    DialogRenderer::fill_background(dialog, buf, styles.bg);
    DialogRenderer::draw_border(dialog, buf, styles.border);
    DialogRenderer::draw_title(dialog, buf, &state.accept_label, styles.title);

    let message = truncate_end(&state.message, dialog.width.saturating_sub(4) as usize);
    let message_x = dialog.x + (dialog.width.saturating_sub(message.chars().count() as u16)) / 2;
    buf.set_string(message_x, dialog.y + 2, &message, styles.label);

    let buttons = confirm_buttons(state);
    let buttons: Vec<(&str, bool)> = buttons.iter().map(|(text, focused)| (text.as_str(), *focused)).collect();
    DialogRenderer::draw_buttons(dialog, buf, 4, &buttons, styles.button_focused, styles.button_unfocused);
}

/// First visible row of a picker list
fn pick_scroll(selected: usize, visible: usize) -> usize {
    if visible == 0 { 0 } else { (selected + 1).saturating_sub(visible) }
}

fn render_pick(state: &PickState, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let wanted = (state.items.len() as u16).saturating_add(3).max(4);
    let height = wanted.min(area.height.saturating_sub(2)).max(4);
    let Some(dialog) = DialogRenderer::center_dialog(area, PICK_WIDTH, height, MIN_WIDTH) else {
        return;
    };
    let styles = DialogStyles::new(theme, theme.dialog_bg, theme.dialog_border);

    DialogRenderer::fill_background(dialog, buf, styles.bg);
    DialogRenderer::draw_border(dialog, buf, styles.border);
    DialogRenderer::draw_title(dialog, buf, &state.title, styles.title);

    let visible = dialog.height.saturating_sub(3) as usize;
    let scroll = pick_scroll(state.selected, visible);
    let row_width = dialog.width.saturating_sub(2) as usize;
    for (row, (index, item)) in state.items.iter().enumerate().skip(scroll).take(visible).enumerate() {
        let style = if index == state.selected { styles.input_focused } else { styles.label };
        let text = format!(" {:<width$}", truncate_end(item, row_width.saturating_sub(1)), width = row_width.saturating_sub(1));
        buf.set_string(dialog.x + 1, dialog.y + 1 + row as u16, &text, style);
    }

    DialogRenderer::draw_help(dialog, buf, "Enter: Select  Esc: Cancel", styles.help);
}
