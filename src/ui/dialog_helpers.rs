//! Dialog rendering helper utilities.
//!
//! Common drawing operations shared by the input, confirmation and picker
//! dialogs.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use super::Theme;

/// Pre-computed styles for dialog rendering.
pub struct DialogStyles {
    pub border: Style,
    pub title: Style,
    pub label: Style,
    pub input_focused: Style,
    pub input_selected: Style, // Pre-filled text not yet edited
    pub placeholder: Style,
    pub button_focused: Style,
    pub button_unfocused: Style,
    pub help: Style,
    pub bg: Style,
}

impl DialogStyles {
    /// Create dialog styles from theme with given background color.
    pub fn new(theme: &Theme, bg_color: Color, border_color: Color) -> Self {
        Self {
            border: Style::default().bg(bg_color).fg(border_color),
            title: Style::default().bg(bg_color).fg(theme.dialog_title).add_modifier(Modifier::BOLD),
            label: Style::default().bg(bg_color).fg(theme.dialog_text),
            input_focused: Style::default().bg(theme.dialog_input_focused_bg).fg(theme.dialog_input_focused_fg),
            input_selected: Style::default().bg(theme.dialog_input_selected_bg).fg(theme.dialog_input_selected_fg),
            placeholder: Style::default()
                .bg(theme.dialog_input_focused_bg)
                .fg(theme.dialog_help)
                .add_modifier(Modifier::ITALIC),
            button_focused: Style::default().fg(theme.dialog_button_focused_fg).bg(theme.dialog_button_focused_bg).add_modifier(Modifier::BOLD),
            button_unfocused: Style::default().fg(theme.dialog_button_unfocused).bg(bg_color),
            help: Style::default().bg(bg_color).fg(theme.dialog_help),
            bg: Style::default().bg(bg_color),
        }
    }

    /// Styles for destructive confirmations
    pub fn danger(theme: &Theme) -> Self {
        let mut styles = Self::new(theme, theme.dialog_danger_bg, theme.dialog_danger_border);
        styles.button_focused = Style::default()
            .fg(theme.dialog_danger_button_focused_fg)
            .bg(theme.dialog_danger_button_focused_bg)
            .add_modifier(Modifier::BOLD);
        styles
    }
}

/// Helper functions for dialog rendering.
pub struct DialogRenderer;

impl DialogRenderer {
    /// Calculate centered dialog position and return the dialog area.
    /// Returns None if the area is too small.
    pub fn center_dialog(area: Rect, width: u16, height: u16, min_width: u16) -> Option<Rect> {
        if area.width < min_width || area.height < height {
            return None;
        }

        let dialog_width = width.min(area.width.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;

        Some(Rect {
            x,
            y,
            width: dialog_width,
            height,
        })
    }

    /// Fill dialog area with background color.
    pub fn fill_background(area: Rect, buf: &mut Buffer, style: Style) {
        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                buf[(col, row)].set_char(' ').set_style(style);
            }
        }
    }

    /// Draw dialog border using box-drawing characters.
    pub fn draw_border(area: Rect, buf: &mut Buffer, style: Style) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        buf[(area.x, area.y)].set_char('┌').set_style(style);
        buf[(right, area.y)].set_char('┐').set_style(style);
        buf[(area.x, bottom)].set_char('└').set_style(style);
        buf[(right, bottom)].set_char('┘').set_style(style);
        for col in area.x + 1..right {
            buf[(col, area.y)].set_char('─').set_style(style);
            buf[(col, bottom)].set_char('─').set_style(style);
        }
        for row in area.y + 1..bottom {
            buf[(area.x, row)].set_char('│').set_style(style);
            buf[(right, row)].set_char('│').set_style(style);
        }
    }

    /// Draw centered title on the top border.
    pub fn draw_title(area: Rect, buf: &mut Buffer, title: &str, style: Style) {
        let title = format!(" {} ", title);
        let width = title.chars().count() as u16;
        let title_x = area.x + (area.width.saturating_sub(width)) / 2;
        buf.set_string(title_x, area.y, &title, style);
    }

    /// Draw a line of text inside the border, truncated to fit.
    pub fn draw_text(area: Rect, buf: &mut Buffer, y_offset: u16, text: &str, style: Style) {
        let width = area.width.saturating_sub(4) as usize;
        let shown = truncate_end(text, width);
        buf.set_string(area.x + 2, area.y + y_offset, &shown, style);
    }

    /// Draw a horizontal row of buttons, centered.
    pub fn draw_buttons(
        area: Rect,
        buf: &mut Buffer,
        y_offset: u16,
        buttons: &[(&str, bool)], // (text, is_focused)
        focused_style: Style,
        unfocused_style: Style,
    ) {
        let button_y = area.y + y_offset;

        let total_width: usize = buttons.iter()
            .map(|(text, _)| text.chars().count())
            .sum::<usize>() + (buttons.len().saturating_sub(1)) * 2;

        let mut x = area.x + (area.width.saturating_sub(total_width as u16)) / 2;

        for (text, is_focused) in buttons {
            let style = if *is_focused { focused_style } else { unfocused_style };
            buf.set_string(x, button_y, text, style);
            x += text.chars().count() as u16 + 2;
        }
    }

    /// Draw an input field. Long input is scrolled so the cursor column
    /// stays visible; returns the screen column of the cursor.
    pub fn draw_input_field(
        buf: &mut Buffer,
        x: u16,
        y: u16,
        width: usize,
        text: &str,
        cursor_col: usize,
        style: Style,
    ) -> u16 {
        for col in x..x + width as u16 {
            buf[(col, y)].set_char(' ').set_style(style);
        }

        let visible = width.saturating_sub(1).max(1);
        let skip = (cursor_col + 1).saturating_sub(visible);
        let display_text: String = if skip > 0 {
            std::iter::once('…').chain(text.chars().skip(skip + 1)).take(visible).collect()
        } else {
            text.chars().take(visible).collect()
        };

        buf.set_string(x, y, &display_text, style);
        x + (cursor_col - skip) as u16
    }

    /// Draw help text centered at the bottom of dialog.
    pub fn draw_help(area: Rect, buf: &mut Buffer, text: &str, style: Style) {
        let width = text.chars().count() as u16;
        let help_x = area.x + (area.width.saturating_sub(width)) / 2;
        buf.set_string(help_x, area.y + area.height - 2, text, style);
    }
}

/// Truncate a string to max_width characters (keeps the start)
pub fn truncate_end(s: &str, max_width: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        let mut result: String = s.chars().take(max_width - 1).collect();
        result.push('…');
        result
    }
}

/// Truncate a path to max_width characters (keeps the end)
pub fn truncate_start(s: &str, max_width: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        let skip = char_count - max_width + 1;
        let mut result = String::from("…");
        result.extend(s.chars().skip(skip));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_dialog() {
        let area = Rect { x: 0, y: 0, width: 80, height: 24 };
        let dialog = DialogRenderer::center_dialog(area, 40, 10, 20).unwrap();
        assert_eq!(dialog.width, 40);
        assert_eq!(dialog.height, 10);
        assert_eq!(dialog.x, 20); // (80 - 40) / 2
        assert_eq!(dialog.y, 7); // (24 - 10) / 2
    }

    #[test]
    fn test_center_dialog_too_small() {
        let area = Rect { x: 0, y: 0, width: 15, height: 24 };
        assert!(DialogRenderer::center_dialog(area, 40, 10, 20).is_none());
    }

    #[test]
    fn test_truncation() {
        assert_eq!(truncate_end("report.txt", 20), "report.txt");
        assert_eq!(truncate_end("report.txt", 5), "repo…");
        assert_eq!(truncate_start("/home/user/proj", 8), "…er/proj");
        assert_eq!(truncate_start("/x", 1), "…");
    }

    #[test]
    fn test_input_field_scrolls_to_cursor() {
        let area = Rect { x: 0, y: 0, width: 10, height: 1 };
        let mut buf = Buffer::empty(area);
        let col = DialogRenderer::draw_input_field(&mut buf, 0, 0, 6, "abcdefghij", 10, Style::default());
        assert_eq!(col, 4);
        assert_eq!(buf[(0, 0)].symbol(), "…");
        assert_eq!(buf[(3, 0)].symbol(), "j");

        let col = DialogRenderer::draw_input_field(&mut buf, 0, 0, 6, "abc", 1, Style::default());
        assert_eq!(col, 1);
        assert_eq!(buf[(0, 0)].symbol(), "a");
    }
}
