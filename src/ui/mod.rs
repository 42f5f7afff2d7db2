//! UI components

pub mod dialog;
mod dialog_helpers;
pub mod icons;
pub mod listing;
pub mod status;
pub mod theme;

pub use dialog::{Backdrop, DialogWidget, dialog_cursor_position};
pub use listing::ListingWidget;
pub use status::{StatusBar, StatusMessage};
pub use theme::Theme;
pub use theme::ThemeConfig;
