//! Color theme system
//!
//! Provides built-in presets (classic, dark, light) and custom color configuration.

use ratatui::style::Color;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::diagnostics::Severity;

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Listing
    pub border: Color,
    pub header: Color,
    pub background: Color,
    pub file_normal: Color,
    pub file_directory: Color,
    pub parent_line: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub selection_bg: Color,

    // Diagnostics gutter
    pub diag_error: Color,
    pub diag_warning: Color,
    pub diag_info: Color,
    pub diag_hint: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,
    pub status_error_bg: Color,
    pub status_error_fg: Color,
    pub git_clean: Color,
    pub git_dirty: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border: Color,
    pub dialog_danger_bg: Color,
    pub dialog_danger_border: Color,
    pub dialog_title: Color,
    pub dialog_text: Color,
    pub dialog_input_focused_bg: Color,
    pub dialog_input_focused_fg: Color,
    pub dialog_input_selected_bg: Color,
    pub dialog_input_selected_fg: Color,
    pub dialog_button_focused_bg: Color,
    pub dialog_button_focused_fg: Color,
    pub dialog_button_unfocused: Color,
    pub dialog_danger_button_focused_bg: Color,
    pub dialog_danger_button_focused_fg: Color,
    pub dialog_help: Color,

    // File highlighting rules
    pub highlights: Vec<CompiledHighlight>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        let teal = Color::Rgb(0, 150, 136);
        let gold = Color::Rgb(200, 170, 100);
        let light_gray = Color::Rgb(171, 178, 191);
        let dark_gray = Color::Rgb(76, 82, 99);
        let charcoal = Color::Rgb(58, 58, 58);

        Self {
            border: Color::Rgb(160, 160, 160),
            header: gold,
            background: charcoal,
            file_normal: Color::Rgb(220, 220, 220),
            file_directory: Color::Rgb(171, 175, 135),
            parent_line: dark_gray,
            cursor_bg: Color::Rgb(0, 95, 95),
            cursor_fg: Color::Rgb(220, 220, 220),
            selection_bg: Color::Rgb(70, 70, 100),

            diag_error: Color::Rgb(224, 108, 117),
            diag_warning: gold,
            diag_info: Color::Rgb(97, 175, 239),
            diag_hint: dark_gray,

            status_bg: Color::Rgb(45, 45, 45),
            status_fg: light_gray,
            status_error_bg: Color::Rgb(180, 60, 60),
            status_error_fg: Color::White,
            git_clean: Color::Rgb(152, 195, 121),
            git_dirty: gold,

            dialog_bg: Color::Rgb(30, 40, 55),
            dialog_border: Color::Rgb(97, 175, 239),
            dialog_danger_bg: Color::Rgb(55, 35, 35),
            dialog_danger_border: Color::Rgb(224, 108, 117),
            dialog_title: Color::White,
            dialog_text: light_gray,
            dialog_input_focused_bg: dark_gray,
            dialog_input_focused_fg: Color::White,
            dialog_input_selected_bg: Color::Rgb(0, 100, 150),
            dialog_input_selected_fg: Color::White,
            dialog_button_focused_bg: teal,
            dialog_button_focused_fg: Color::Black,
            dialog_button_unfocused: dark_gray,
            dialog_danger_button_focused_bg: Color::Rgb(224, 108, 117),
            dialog_danger_button_focused_fg: Color::White,
            dialog_help: dark_gray,

            highlights: Vec::new(),
        }
    }

    /// Classic Norton Commander blue theme
    pub fn classic() -> Self {
        Self {
            border: Color::LightCyan,
            header: Color::Yellow,
            background: Color::Blue,
            file_normal: Color::LightCyan,
            file_directory: Color::White,
            parent_line: Color::Cyan,
            cursor_bg: Color::Cyan,
            cursor_fg: Color::Black,
            selection_bg: Color::Rgb(80, 80, 128),

            diag_error: Color::LightRed,
            diag_warning: Color::Yellow,
            diag_info: Color::LightGreen,
            diag_hint: Color::Cyan,

            status_bg: Color::Cyan,
            status_fg: Color::Black,
            status_error_bg: Color::Red,
            status_error_fg: Color::White,
            git_clean: Color::Green,
            git_dirty: Color::Yellow,

            dialog_bg: Color::Blue,
            dialog_border: Color::LightCyan,
            dialog_danger_bg: Color::Blue,
            dialog_danger_border: Color::Red,
            dialog_title: Color::White,
            dialog_text: Color::LightCyan,
            dialog_input_focused_bg: Color::Cyan,
            dialog_input_focused_fg: Color::Black,
            dialog_input_selected_bg: Color::LightCyan,
            dialog_input_selected_fg: Color::Black,
            dialog_button_focused_bg: Color::Cyan,
            dialog_button_focused_fg: Color::Black,
            dialog_button_unfocused: Color::LightCyan,
            dialog_danger_button_focused_bg: Color::Red,
            dialog_danger_button_focused_fg: Color::White,
            dialog_help: Color::Cyan,

            highlights: Vec::new(),
        }
    }

    /// Light theme - for light terminal backgrounds
    pub fn light() -> Self {
        Self {
            border: Color::Blue,
            header: Color::Blue,
            background: Color::White,
            file_normal: Color::Black,
            file_directory: Color::Blue,
            parent_line: Color::DarkGray,
            cursor_bg: Color::Blue,
            cursor_fg: Color::White,
            selection_bg: Color::Rgb(200, 215, 240),

            diag_error: Color::Red,
            diag_warning: Color::Rgb(180, 100, 0),
            diag_info: Color::Blue,
            diag_hint: Color::Gray,

            status_bg: Color::Gray,
            status_fg: Color::Black,
            status_error_bg: Color::Red,
            status_error_fg: Color::White,
            git_clean: Color::Green,
            git_dirty: Color::Rgb(180, 100, 0),

            dialog_bg: Color::Rgb(220, 220, 255),
            dialog_border: Color::Blue,
            dialog_danger_bg: Color::Rgb(255, 220, 220),
            dialog_danger_border: Color::Red,
            dialog_title: Color::Black,
            dialog_text: Color::Black,
            dialog_input_focused_bg: Color::White,
            dialog_input_focused_fg: Color::Black,
            dialog_input_selected_bg: Color::Rgb(180, 210, 255),
            dialog_input_selected_fg: Color::Black,
            dialog_button_focused_bg: Color::Blue,
            dialog_button_focused_fg: Color::White,
            dialog_button_unfocused: Color::DarkGray,
            dialog_danger_button_focused_bg: Color::Red,
            dialog_danger_button_focused_fg: Color::White,
            dialog_help: Color::Gray,

            highlights: Vec::new(),
        }
    }

    /// Get a theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "classic" => Some(Self::classic()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Apply custom color overrides from config
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, value) in overrides {
            let Some(color) = parse_color(value) else {
                tracing::warn!("theme: invalid color '{}' for {}", value, key);
                continue;
            };
            match key.as_str() {
                "border" => self.border = color,
                "header" => self.header = color,
                "background" => self.background = color,
                "file_normal" => self.file_normal = color,
                "file_directory" => self.file_directory = color,
                "parent_line" => self.parent_line = color,
                "cursor_bg" => self.cursor_bg = color,
                "cursor_fg" => self.cursor_fg = color,
                "selection_bg" => self.selection_bg = color,
                "diag_error" => self.diag_error = color,
                "diag_warning" => self.diag_warning = color,
                "diag_info" => self.diag_info = color,
                "diag_hint" => self.diag_hint = color,
                "status_bg" => self.status_bg = color,
                "status_fg" => self.status_fg = color,
                "status_error_bg" => self.status_error_bg = color,
                "status_error_fg" => self.status_error_fg = color,
                "git_clean" => self.git_clean = color,
                "git_dirty" => self.git_dirty = color,
                "dialog_bg" => self.dialog_bg = color,
                "dialog_border" => self.dialog_border = color,
                "dialog_danger_bg" => self.dialog_danger_bg = color,
                "dialog_danger_border" => self.dialog_danger_border = color,
                "dialog_title" => self.dialog_title = color,
                "dialog_text" => self.dialog_text = color,
                "dialog_input_focused_bg" => self.dialog_input_focused_bg = color,
                "dialog_input_focused_fg" => self.dialog_input_focused_fg = color,
                "dialog_input_selected_bg" => self.dialog_input_selected_bg = color,
                "dialog_input_selected_fg" => self.dialog_input_selected_fg = color,
                "dialog_button_focused_bg" => self.dialog_button_focused_bg = color,
                "dialog_button_focused_fg" => self.dialog_button_focused_fg = color,
                "dialog_button_unfocused" => self.dialog_button_unfocused = color,
                "dialog_danger_button_focused_bg" => self.dialog_danger_button_focused_bg = color,
                "dialog_danger_button_focused_fg" => self.dialog_danger_button_focused_fg = color,
                "dialog_help" => self.dialog_help = color,
                _ => {} // Ignore unknown keys
            }
        }
        self
    }

    /// Color of a diagnostic marker
    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.diag_error,
            Severity::Warning => self.diag_warning,
            Severity::Information => self.diag_info,
            Severity::Hint => self.diag_hint,
        }
    }

    /// Color of the first highlight rule matching an entry name
    pub fn find_highlight(&self, name: &str) -> Option<Color> {
        self.highlights
            .iter()
            .find(|h| h.regex.is_match(name))
            .map(|h| h.color)
    }
}

/// A user-defined custom theme
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CustomTheme {
    /// Base theme to inherit from: "dark", "classic", "light", or another custom theme name
    pub base: Option<String>,
    /// Color overrides
    #[serde(flatten)]
    pub colors: HashMap<String, String>,
}

/// File highlighting rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHighlight {
    /// Regex matched case-insensitively against the entry name
    pub pattern: String,
    /// Color for matching files (name, hex, or rgb)
    pub color: String,
}

/// Compiled file highlighting rule
#[derive(Debug, Clone)]
pub struct CompiledHighlight {
    pub regex: Regex,
    pub color: Color,
}

/// Theme configuration for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Active theme name: "dark", "classic", "light", or a custom theme name
    pub preset: String,
    /// Custom color overrides for the active theme (quick customization)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// User-defined themes
    #[serde(default)]
    pub themes: HashMap<String, CustomTheme>,
    /// File highlighting rules (first match wins)
    #[serde(default = "default_highlights")]
    pub highlights: Vec<FileHighlight>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            preset: "dark".to_string(),
            colors: HashMap::new(),
            themes: HashMap::new(),
            highlights: default_highlights(),
        }
    }
}

fn highlight(pattern: &str, color: &str) -> FileHighlight {
    FileHighlight {
        pattern: pattern.to_string(),
        color: color.to_string(),
    }
}

/// Default file highlighting rules
fn default_highlights() -> Vec<FileHighlight> {
    vec![
        highlight(r"\.(tar|gz|bz2|xz|zip|rar|7z|tgz|zst)$", "#b05050"),
        highlight(r"\.(jpg|jpeg|png|gif|bmp|svg|webp|ico|tiff?)$", "magenta"),
        highlight(r"\.(mp3|mp4|mkv|avi|mov|wav|flac|ogg|webm|m4a)$", "cyan"),
        highlight(r"\.(pdf|doc|docx|odt|xls|xlsx|ppt|pptx)$", "yellow"),
        highlight(r"\.(rs|py|js|ts|c|cpp|h|hpp|java|go|rb|sh|bash|zsh)$", "lightblue"),
    ]
}

impl ThemeConfig {
    /// Build a Theme from this config
    pub fn build_theme(&self) -> Theme {
        let mut theme = self
            .resolve_theme(&self.preset, &mut Vec::new())
            .with_overrides(&self.colors);
        theme.highlights = self.compile_highlights();
        theme
    }

    fn compile_highlights(&self) -> Vec<CompiledHighlight> {
        self.highlights
            .iter()
            .filter_map(|h| {
                let color = parse_color(&h.color)?;
                match Regex::new(&format!("(?i){}", h.pattern)) {
                    Ok(regex) => Some(CompiledHighlight { regex, color }),
                    Err(e) => {
                        tracing::warn!("theme: skipping highlight '{}': {}", h.pattern, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Resolve a theme by name, handling inheritance
    /// visited tracks already-seen themes to prevent infinite loops
    fn resolve_theme(&self, name: &str, visited: &mut Vec<String>) -> Theme {
        if visited.iter().any(|v| v == name) {
            return Theme::default();
        }
        visited.push(name.to_string());

        if let Some(theme) = Theme::by_name(name) {
            return theme;
        }

        if let Some(custom) = self.themes.get(name) {
            let base_name = custom.base.as_deref().unwrap_or("dark");
            let base = self.resolve_theme(base_name, visited);
            return base.with_overrides(&custom.colors);
        }

        tracing::warn!("theme: unknown preset '{}', using dark", name);
        Theme::default()
    }
}

/// Parse a color string into a ratatui Color
///
/// Supports:
/// - Named colors: "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white", "gray"
/// - Light variants: "light_red", "light_green", etc.
/// - RGB hex: "#RRGGBB" or "RRGGBB"
/// - RGB decimal: "rgb(R,G,B)"
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "black" => return Some(Color::Black),
        "red" => return Some(Color::Red),
        "green" => return Some(Color::Green),
        "yellow" => return Some(Color::Yellow),
        "blue" => return Some(Color::Blue),
        "magenta" => return Some(Color::Magenta),
        "cyan" => return Some(Color::Cyan),
        "white" => return Some(Color::White),
        "gray" | "grey" => return Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => return Some(Color::DarkGray),
        "light_red" | "lightred" => return Some(Color::LightRed),
        "light_green" | "lightgreen" => return Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => return Some(Color::LightYellow),
        "light_blue" | "lightblue" => return Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => return Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => return Some(Color::LightCyan),
        "reset" => return Some(Color::Reset),
        _ => {}
    }

    // Hex color: #RRGGBB or RRGGBB
    let hex = s.strip_prefix('#').unwrap_or(&s);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    // RGB format: rgb(R,G,B)
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse().ok()?;
            let g = parts[1].trim().parse().ok()?;
            let b = parts[2].trim().parse().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("BLUE"), Some(Color::Blue));
        assert_eq!(parse_color("dark_gray"), Some(Color::DarkGray));
        assert_eq!(parse_color("lightcyan"), Some(Color::LightCyan));
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_color("#1a2b3c"), Some(Color::Rgb(26, 43, 60)));
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_parse_rgb_colors() {
        assert_eq!(parse_color("rgb(255,0,0)"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("rgb(0, 128, 255)"), Some(Color::Rgb(0, 128, 255)));
        assert_eq!(parse_color("rgb(300,0,0)"), None);
    }

    #[test]
    fn test_theme_presets() {
        assert!(Theme::by_name("dark").is_some());
        assert!(Theme::by_name("Classic").is_some());
        assert!(Theme::by_name("light").is_some());
        assert!(Theme::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_overrides_and_custom_themes() {
        let mut config = ThemeConfig::default();
        config.themes.insert(
            "mine".to_string(),
            CustomTheme {
                base: Some("light".to_string()),
                colors: HashMap::from([("cursor_bg".to_string(), "#010203".to_string())]),
            },
        );
        config.preset = "mine".to_string();
        config.colors.insert("diag_error".to_string(), "green".to_string());

        let theme = config.build_theme();
        assert_eq!(theme.cursor_bg, Color::Rgb(1, 2, 3));
        assert_eq!(theme.background, Color::White);
        assert_eq!(theme.severity_color(Severity::Error), Color::Green);
    }

    #[test]
    fn test_circular_custom_theme_falls_back() {
        let mut config = ThemeConfig::default();
        config.themes.insert(
            "a".to_string(),
            CustomTheme { base: Some("b".to_string()), colors: HashMap::new() },
        );
        config.themes.insert(
            "b".to_string(),
            CustomTheme { base: Some("a".to_string()), colors: HashMap::new() },
        );
        config.preset = "a".to_string();
        assert_eq!(config.build_theme().background, Theme::dark().background);
    }

    #[test]
    fn test_default_highlights() {
        let theme = ThemeConfig::default().build_theme();
        assert_eq!(theme.find_highlight("ARCHIVE.TAR.GZ"), Some(Color::Rgb(0xb0, 0x50, 0x50)));
        assert_eq!(theme.find_highlight("main.rs"), Some(Color::LightBlue));
        assert_eq!(theme.find_highlight("notes.txt"), None);
    }

    #[test]
    fn test_invalid_highlight_is_skipped() {
        let config = ThemeConfig {
            highlights: vec![highlight("(unclosed", "red"), highlight(r"\.txt$", "green")],
            ..ThemeConfig::default()
        };
        let theme = config.build_theme();
        assert_eq!(theme.highlights.len(), 1);
        assert_eq!(theme.find_highlight("a.txt"), Some(Color::Green));
    }

    #[test]
    fn test_highlights_from_toml() {
        let config: ThemeConfig = toml_edit::de::from_str("preset = \"classic\"\n").unwrap();
        assert_eq!(config.preset, "classic");
        assert!(!config.highlights.is_empty());
    }
}
