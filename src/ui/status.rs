//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::diagnostics::AggregatedDiagnostic;
use crate::fs::utils::basename;
use crate::git::GitStatus;
use crate::state::view::View;

use super::Theme;
use super::dialog_helpers::{truncate_end, truncate_start};

/// A message shown until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// Status bar: git branch, then a message or details about the cursor line,
/// and the cursor position on the right
pub struct StatusBar<'a> {
    view: Option<&'a View>,
    git_status: Option<&'a GitStatus>,
    message: Option<&'a StatusMessage>,
    diagnostic: Option<&'a AggregatedDiagnostic>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(view: Option<&'a View>, theme: &'a Theme) -> Self {
        Self { view, git_status: None, message: None, diagnostic: None, theme }
    }

    pub fn with_git(mut self, git_status: Option<&'a GitStatus>) -> Self {
        self.git_status = git_status;
        self
    }

    pub fn with_message(mut self, message: Option<&'a StatusMessage>) -> Self {
        self.message = message;
        self
    }

    /// Aggregate on the cursor line, detailed in the bar
    pub fn with_diagnostic(mut self, diagnostic: Option<&'a AggregatedDiagnostic>) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    fn position_text(&self) -> String {
        let Some(view) = self.view else {
            return String::new();
        };
        let total = view.listing().len();
        let selected = view.selected_lines().len();
        if selected > 1 {
            format!(" {} selected  {}/{} ", selected, view.cursor() + 1, total)
        } else {
            format!(" {}/{} ", (view.cursor() + 1).min(total), total)
        }
    }

    fn cursor_text(&self) -> String {
        if let Some(diag) = self.diagnostic {
            return describe_diagnostic(diag);
        }
        self.view
            .and_then(|v| v.listing().path_at(v.cursor()))
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// "2 problems (error: main.rs mismatched types)"
pub fn describe_diagnostic(diag: &AggregatedDiagnostic) -> String {
    match diag.children.first() {
        Some(first) => format!(
            "{} ({}: {} {})",
            diag.message,
            diag.severity.label(),
            basename(&first.path),
            first.message
        ),
        None => diag.message.clone(),
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width == 0 {
            return;
        }

        let style = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);

        // Clear the line with background
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_char(' ').set_style(style);
        }

        let mut x_offset: u16 = 0;

        if let Some(git) = self.git_status {
            let git_str = git.format();
            if !git_str.is_empty() {
                let color = if git.dirty || git.staged || git.untracked {
                    self.theme.git_dirty
                } else {
                    self.theme.git_clean
                };
                let display = format!(" {} ", git_str);
                buf.set_string(area.x, area.y, &display, style.fg(color).add_modifier(Modifier::BOLD));
                x_offset = display.chars().count() as u16;
            }
        }

        let position = self.position_text();
        let position_width = position.chars().count() as u16;
        let available = area.width.saturating_sub(x_offset).saturating_sub(position_width) as usize;

        match self.message {
            Some(message) => {
                let msg_style = if message.is_error {
                    Style::default().bg(self.theme.status_error_bg).fg(self.theme.status_error_fg)
                } else {
                    style
                };
                let text = truncate_end(&format!(" {} ", message.text), available);
                buf.set_string(area.x + x_offset, area.y, &text, msg_style);
            }
            None => {
                let text = format!(" {}", self.cursor_text());
                let shown = if self.diagnostic.is_some() {
                    truncate_end(&text, available)
                } else {
                    truncate_start(&text, available)
                };
                let info_style = match self.diagnostic {
                    Some(diag) => style.fg(self.theme.severity_color(diag.severity)),
                    None => style,
                };
                buf.set_string(area.x + x_offset, area.y, &shown, info_style);
            }
        }

        if position_width <= area.width {
            buf.set_string(area.x + area.width - position_width, area.y, &position, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Range, RelatedInfo, Severity};
    use crate::fs::DirectoryEntry;
    use crate::listing::Listing;
    use std::path::{Path, PathBuf};

    fn row_text(buf: &Buffer) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf[(x, buf.area.y)].symbol().to_string())
            .collect()
    }

    fn view() -> View {
        let entries = vec![DirectoryEntry::directory("src"), DirectoryEntry::file("a.txt")];
        View::new(Listing::from_entries(Path::new("/w"), entries))
    }

    #[test]
    fn test_shows_cursor_path_and_position() {
        let theme = Theme::default();
        let mut v = view();
        v.set_cursor(2);
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(Some(&v), &theme).render(area, &mut buf);

        let text = row_text(&buf);
        assert!(text.contains("/w/a.txt"));
        assert!(text.trim_end().ends_with("3/3"));
    }

    #[test]
    fn test_error_message_replaces_path() {
        let theme = Theme::default();
        let v = view();
        let message = StatusMessage::error("Target is a directory: /w/src/a.txt");
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(Some(&v), &theme)
            .with_message(Some(&message))
            .render(area, &mut buf);

        let text = row_text(&buf);
        assert!(text.contains("Target is a directory"));
        assert_eq!(buf[(2, 0)].bg, theme.status_error_bg);
    }

    #[test]
    fn test_git_and_selection_count() {
        let theme = Theme::default();
        let mut v = view();
        v.set_cursor(1);
        v.extend_down();
        let git = GitStatus { branch: Some("main".to_string()), dirty: true, staged: false, untracked: false };
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(Some(&v), &theme).with_git(Some(&git)).render(area, &mut buf);

        let text = row_text(&buf);
        assert!(text.starts_with(" [main"));
        assert!(text.contains("2 selected  3/3"));
    }

    #[test]
    fn test_describe_diagnostic() {
        let diag = AggregatedDiagnostic {
            line: 1,
            range: Range::default(),
            severity: Severity::Warning,
            count: 2,
            message: "2 problems".to_string(),
            children: vec![RelatedInfo {
                path: PathBuf::from("/w/src/lib.rs"),
                range: Range::default(),
                severity: Severity::Warning,
                message: "modified".to_string(),
            }],
        };
        assert_eq!(describe_diagnostic(&diag), "2 problems (warning: lib.rs modified)");
    }
}
