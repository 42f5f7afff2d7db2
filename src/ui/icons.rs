//! Nerd Font glyphs for listing lines

use crate::listing::is_parent_sentinel;

/// Glyph for directory lines
pub const DIRECTORY_ICON: &str = "\u{EA83}";

/// Glyph for files with no known extension
pub const DEFAULT_FILE_ICON: &str = "\u{EA7B}";

/// Icon for a listing line, or None for the parent sentinel
pub fn icon_for_line(line: &str) -> Option<&'static str> {
    if is_parent_sentinel(line) {
        return None;
    }
    if line.ends_with('/') {
        Some(DIRECTORY_ICON)
    } else {
        Some(file_icon(line))
    }
}

/// Icon for a file name: special names first, then the extension
pub fn file_icon(name: &str) -> &'static str {
    if let Some(icon) = special_file_icon(name) {
        return icon;
    }
    let extension = name.rsplit('.').next().unwrap_or(name).to_lowercase();
    extension_icon(&extension).unwrap_or(DEFAULT_FILE_ICON)
}

fn special_file_icon(name: &str) -> Option<&'static str> {
    let icon = match name.to_lowercase().as_str() {
        "package.json" => "\u{E71E}",
        "dockerfile" => "\u{E7B0}",
        _ => return None,
    };
    Some(icon)
}

fn extension_icon(extension: &str) -> Option<&'static str> {
    let icon = match extension {
        // docs
        "txt" | "doc" | "docx" => "\u{F15C}",
        "pdf" => "\u{F1C1}",
        "xls" | "xlsx" => "\u{F1C3}",
        "ppt" | "pptx" => "\u{F1C4}",
        // images
        "jpg" | "png" | "gif" => "\u{E60D}",
        "svg" => "\u{F0721}",
        // programming
        "json" => "\u{EB0F}",
        "md" => "\u{E73E}",
        "vscodeignore" => "\u{F0A1E}",
        "gitignore" => "\u{E65D}",
        "java" => "\u{E738}",
        "py" => "\u{E606}",
        "cpp" | "cs" => "\u{F031B}",
        "c" => "\u{F0671}",
        "php" => "\u{F031F}",
        "html" => "\u{F031D}",
        "css" => "\u{E749}",
        "rb" => "\u{E791}",
        "go" => "\u{F07D3}",
        "swift" => "\u{E755}",
        "rs" | "rust" => "\u{E7A8}",
        "ts" => "\u{E628}",
        "js" => "\u{E74E}",
        "jsx" | "tsx" => "\u{E7BA}",
        "sh" | "zsh" | "bash" => "\u{E795}",
        "sql" => "\u{E706}",
        "lua" => "\u{F08B1}",
        "r" => "\u{F07D4}",
        "scala" => "\u{E737}",
        "kotlin" => "\u{E634}",
        "asm" => "\u{E6AB}",
        "dockerignore" => "\u{E7B0}",
        "yml" | "ini" | "cmd" | "conf" => "\u{E615}",
        "xml" => "\u{F05C0}",
        "vue" => "\u{E6A0}",
        "coffee" => "\u{E751}",
        "groovy" => "\u{E775}",
        "gradle" => "\u{E660}",
        "dart" => "\u{E798}",
        "ejs" => "\u{E618}",
        "less" => "\u{E60B}",
        "sass" | "scss" => "\u{E603}",
        "styl" => "\u{E600}",
        "xaml" => "\u{E60E}",
        "csproj" | "sln" | "vb" => "\u{E70C}",
        "toml" => "\u{E6B2}",
        _ => return None,
    };
    Some(icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_map_to_icons() {
        assert_eq!(icon_for_line("../"), None);
        assert_eq!(icon_for_line("src/"), Some(DIRECTORY_ICON));
        assert_eq!(icon_for_line("main.rs"), Some("\u{E7A8}"));
        assert_eq!(icon_for_line("notes"), Some(DEFAULT_FILE_ICON));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(file_icon("REPORT.PDF"), file_icon("report.pdf"));
        assert_eq!(file_icon("archive.tar.toml"), "\u{E6B2}");
    }

    #[test]
    fn test_special_names_win_over_extension() {
        assert_eq!(file_icon("package.json"), "\u{E71E}");
        assert_eq!(file_icon("other.json"), "\u{EB0F}");
        assert_eq!(file_icon("Dockerfile"), "\u{E7B0}");
    }
}
