//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::ThemeConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Display settings
    pub display: DisplayConfig,
    /// Editor settings
    pub editor: EditorConfig,
    /// Confirmation settings
    pub confirmations: ConfirmConfig,
    /// Theme settings
    pub theme: ThemeConfig,
    /// Keyboard shortcuts
    pub keybindings: KeyBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Move deleted entries to the system trash instead of unlinking them
    pub use_trash: bool,
    /// Files or directories marking a project root (for the home command)
    pub project_markers: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            use_trash: true,
            project_markers: vec![".git".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show git branch in the status bar and git status as diagnostics
    pub show_git_status: bool,
    /// Show rolled-up diagnostics next to listing lines
    pub show_diagnostics: bool,
    /// Seconds between git status polls (0 = only on navigation)
    pub git_poll_secs: u64,
    /// Nerd Font file-type icons before each line
    pub nerd_font_icons: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_git_status: true,
            show_diagnostics: true,
            git_poll_secs: 2,
            nerd_font_icons: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// External editor command (empty = use $VISUAL/$EDITOR/default)
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Confirm before delete
    pub delete: bool,
    /// Confirm before a rename replaces an existing file
    pub overwrite: bool,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            delete: true,
            overwrite: true,
        }
    }
}

/// Keyboard shortcut configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyBindings {
    /// Custom keybindings (action -> key)
    #[serde(flatten)]
    pub bindings: HashMap<String, String>,
}

impl KeyBindings {
    /// Get the key binding for an action, falling back to default
    pub fn get(&self, action: &str) -> &str {
        self.bindings
            .get(action)
            .map(|s| s.as_str())
            .unwrap_or_else(|| default_keybinding(action))
    }

    /// Check if a key event matches an action
    pub fn matches(&self, action: &str, key: &KeyEvent) -> bool {
        parse_key_binding(self.get(action))
            .map(|(code, mods)| match (&key.code, &code) {
                // Shift is already part of the character
                (KeyCode::Char(a), KeyCode::Char(b)) => {
                    a == b
                        && key.modifiers.difference(KeyModifiers::SHIFT)
                            == mods.difference(KeyModifiers::SHIFT)
                }
                _ => key.code == code && key.modifiers == mods,
            })
            .unwrap_or(false)
    }

    /// Check an action and its `_alt` variant
    pub fn matches_any(&self, action: &str, key: &KeyEvent) -> bool {
        self.matches(action, key) || self.matches(&format!("{}_alt", action), key)
    }
}

/// Parse a key binding string like "Ctrl+C", "Shift+Up", "F10", "D", etc.
pub fn parse_key_binding(s: &str) -> Option<(KeyCode, KeyModifiers)> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = s.split('+').collect();

    // Process modifiers (all but last part)
    while parts.len() > 1 {
        let modifier = parts.remove(0).to_lowercase();
        match modifier.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return None, // Unknown modifier
        }
    }

    let code = match parse_key_code(parts[0])? {
        // Terminals report Ctrl/Alt chords with the lowercase letter
        KeyCode::Char(c) if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            KeyCode::Char(c.to_ascii_lowercase())
        }
        code => code,
    };
    Some((code, modifiers))
}

/// Parse a key code string
fn parse_key_code(s: &str) -> Option<KeyCode> {
    let s_lower = s.to_lowercase();

    // Function keys
    if s_lower.starts_with('f')
        && s_lower.len() >= 2
        && let Ok(n) = s_lower[1..].parse::<u8>()
        && (1..=12).contains(&n)
    {
        return Some(KeyCode::F(n));
    }

    match s_lower.as_str() {
        "esc" | "escape" => Some(KeyCode::Esc),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "backspace" | "bs" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "insert" | "ins" => Some(KeyCode::Insert),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "space" => Some(KeyCode::Char(' ')),
        // Single character, case preserved
        _ if s.chars().count() == 1 => s.chars().next().map(KeyCode::Char),
        _ => None,
    }
}

/// Get the default key binding for an action
pub fn default_keybinding(action: &str) -> &'static str {
    match action {
        // Application
        "quit" => "q",
        "quit_alt" => "Ctrl+C",

        // Cursor
        "move_up" => "Up",
        "move_up_alt" => "k",
        "move_down" => "Down",
        "move_down_alt" => "j",
        "extend_up" => "Shift+Up",
        "extend_up_alt" => "K",
        "extend_down" => "Shift+Down",
        "extend_down_alt" => "J",
        "page_up" => "PageUp",
        "page_down" => "PageDown",
        "go_top" => "Home",
        "go_top_alt" => "g",
        "go_bottom" => "End",
        "go_bottom_alt" => "G",
        "clear_selection" => "Esc",

        // Navigation
        "open" => "Enter",
        "open_alt" => "l",
        "parent" => "-",
        "parent_alt" => "Backspace",
        "home" => "~",
        "refresh" => "Ctrl+R",

        // File operations
        "rename" => "r",
        "rename_alt" => "F2",
        "delete" => "D",
        "delete_alt" => "Delete",
        "create" => "%",
        "mkdir" => "d",
        "mkdir_alt" => "F7",

        // Bookmarks
        "bookmark_save" => "m",
        "bookmark_jump" => "'",
        "bookmark_remove" => "M",

        // Unknown action
        _ => "",
    }
}

/// Get the config directory path for the current platform
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        // Linux: $XDG_CONFIG_HOME/dirbuf or ~/.config/dirbuf
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config")))
            .map(|p| p.join("dirbuf"))
    }

    #[cfg(target_os = "macos")]
    {
        // macOS: ~/.config/dirbuf (consistent with other CLI tools)
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config/dirbuf"))
    }

    #[cfg(target_os = "windows")]
    {
        // Windows: %APPDATA%\dirbuf
        std::env::var("APPDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("dirbuf"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config/dirbuf"))
    }
}

/// Get the config file path
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// File holding persistent state (bookmarks)
pub fn state_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("state.toml"))
}

pub fn log_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("dirbuf.log"))
}

/// Default config file content with comments
fn default_config() -> &'static str {
    r##"# dirbuf configuration
# This file is auto-generated. Edit as needed.

[general]
# Move deleted files to the system trash (false = delete permanently)
use_trash = true

# Files or directories that mark a project root; "~" jumps to the nearest
# enclosing project root before falling back to the home directory
project_markers = [".git"]

[display]
# Show the git branch in the status bar and per-file git status as diagnostics
show_git_status = true

# Show rolled-up diagnostics next to listing lines
show_diagnostics = true

# Seconds between git status polls (0 = only when changing directory)
git_poll_secs = 2

# File-type icons before each line (needs a Nerd Font in the terminal)
nerd_font_icons = false

[editor]
# Editor for opening files (empty = $VISUAL, then $EDITOR, then vi)
command = ""

[confirmations]
# Ask before deleting
delete = true

# Ask before a rename replaces an existing file
overwrite = true

[theme]
# Built-in presets: "dark", "classic", "light"
preset = "dark"

# Override individual colors of the active preset
# [theme.colors]
# cursor_bg = "#005f5f"
# diag_error = "light_red"

# Define your own themes based on a preset
# [theme.themes.mine]
# base = "light"
# cursor_bg = "rgb(0, 95, 135)"

# File name highlighting (regex, first match wins)
# [[theme.highlights]]
# pattern = "\\.md$"
# color = "yellow"

[keybindings]
# Override any action, e.g.:
# delete = "Ctrl+D"
# bookmark_jump = "b"
"##
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Self {
        let Some(config_path) = config_file() else {
            tracing::warn!("could not determine config directory");
            return Config::default();
        };

        if !config_path.exists() {
            if let Some(dir) = config_path.parent()
                && let Err(e) = fs::create_dir_all(dir)
            {
                tracing::warn!("could not create config directory: {}", e);
                return Config::default();
            }
            if let Err(e) = fs::write(&config_path, default_config()) {
                tracing::warn!("could not create config file: {}", e);
                return Config::default();
            }
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file; falls back to defaults on
    /// any error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!("could not parse {}: {}; using defaults", path.display(), e);
                Config::default()
            }),
            Err(e) => {
                tracing::warn!("could not read {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml_edit::de::Error> {
        toml_edit::de::from_str(content)
    }
}
