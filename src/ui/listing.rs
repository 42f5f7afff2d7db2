//! Listing widget: the rendered directory with cursor, selections and a
//! diagnostics gutter

use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, StatefulWidget, Widget},
};

use crate::diagnostics::{AggregatedDiagnostic, DiagnosticsAggregator, Severity};
use crate::listing::is_parent_sentinel;
use crate::state::view::View;

use super::Theme;
use super::dialog_helpers::{truncate_end, truncate_start};
use super::icons::icon_for_line;

/// Columns reserved for the diagnostic marker
const GUTTER_WIDTH: u16 = 2;

/// Icon glyph plus a space
const ICON_WIDTH: u16 = 2;

/// Widget for rendering a directory view
pub struct ListingWidget<'a> {
    theme: &'a Theme,
    diagnostics: Option<&'a DiagnosticsAggregator>,
    icons: bool,
}

impl<'a> ListingWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme, diagnostics: None, icons: false }
    }

    /// Draw a file-type icon in the gutter before each name
    pub fn with_icons(mut self, icons: bool) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: &'a DiagnosticsAggregator) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Format the directory path (replacing $HOME with ~)
    fn format_path(path: &Path, max_width: usize) -> String {
        let path_str = path.to_string_lossy();
        let display_path = match std::env::var("HOME") {
            Ok(home) if !home.is_empty() && path_str.starts_with(&home) => {
                format!("~{}", &path_str[home.len()..])
            }
            _ => path_str.to_string(),
        };
        format!(" {} ", truncate_start(&display_path, max_width.saturating_sub(2)))
    }

    fn line_style(&self, text: &str, is_cursor: bool, is_selected: bool) -> Style {
        let fg = if is_parent_sentinel(text) {
            self.theme.parent_line
        } else if text.ends_with('/') {
            self.theme.file_directory
        } else {
            self.theme
                .find_highlight(text)
                .unwrap_or(self.theme.file_normal)
        };

        let mut style = if is_cursor {
            Style::default().bg(self.theme.cursor_bg).fg(self.theme.cursor_fg)
        } else if is_selected {
            Style::default().bg(self.theme.selection_bg).fg(fg)
        } else {
            Style::default().bg(self.theme.background).fg(fg)
        };

        if text.ends_with('/') {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    fn render_gutter(&self, diag: Option<&AggregatedDiagnostic>, x: u16, y: u16, bg: Style, buf: &mut Buffer) {
        buf.set_string(x, y, " ".repeat(GUTTER_WIDTH as usize), bg);
        if let Some(diag) = diag {
            let style = bg.fg(self.theme.severity_color(diag.severity)).add_modifier(Modifier::BOLD);
            buf.set_string(x, y, severity_marker(diag.severity), style);
        }
    }
}

/// Single-letter gutter marker
pub fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "E",
        Severity::Warning => "W",
        Severity::Information => "I",
        Severity::Hint => "H",
    }
}

impl StatefulWidget for ListingWidget<'_> {
    type State = View;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border_style = Style::default().fg(self.theme.border).bg(self.theme.background);
        let header_style = Style::default()
            .fg(self.theme.header)
            .bg(self.theme.background)
            .add_modifier(Modifier::BOLD);

        let title = Self::format_path(state.listing().dir(), area.width.saturating_sub(4) as usize);
        let block = Block::default()
            .title(Span::styled(title, header_style))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        // Keep navigation in step with what fits on screen
        state.set_visible_height(inner.height as usize);

        let gutter = if self.icons { GUTTER_WIDTH + ICON_WIDTH } else { GUTTER_WIDTH };
        if inner.width <= gutter || inner.height == 0 {
            return;
        }

        let name_x = inner.x + gutter;
        let name_width = (inner.width - gutter) as usize;
        let start = state.scroll_offset;
        let cursor = state.cursor();

        for (row, index) in (start..state.listing().len()).take(inner.height as usize).enumerate() {
            let Some(text) = state.listing().line(index) else {
                continue;
            };
            let y = inner.y + row as u16;
            let is_cursor = index == cursor;
            let style = self.line_style(text, is_cursor, state.is_selected(index));
            let row_bg = if is_cursor || state.is_selected(index) {
                Style::default().bg(style.bg.unwrap_or(self.theme.background))
            } else {
                Style::default().bg(self.theme.background)
            };

            let diag = self.diagnostics.and_then(|d| d.for_line(index));
            self.render_gutter(diag, inner.x, y, row_bg, buf);
            if self.icons {
                // Kept out of the line text so lines still map to paths
                let icon_x = inner.x + GUTTER_WIDTH;
                buf.set_string(icon_x, y, " ".repeat(ICON_WIDTH as usize), style);
                if let Some(icon) = icon_for_line(text) {
                    buf.set_string(icon_x, y, icon, style);
                }
            }

            let name = truncate_end(text, name_width);
            let name_len = name.chars().count();
            buf.set_string(name_x, y, format!("{:<width$}", name, width = name_width), style);

            // Inline summary after the name when it fits
            if let Some(diag) = diag {
                let summary = format!("  {}", diag.message);
                let summary_len = summary.chars().count();
                if name_len + summary_len <= name_width {
                    let summary_style = row_bg
                        .fg(self.theme.severity_color(diag.severity))
                        .add_modifier(Modifier::ITALIC);
                    buf.set_string(name_x + name_len as u16, y, &summary, summary_style);
                }
            }
        }
    }
}
