pub mod app;
pub mod bookmarks;
pub mod mode;
pub mod navigation;
pub mod view;

pub use app::{App, Command, Effect};
pub use bookmarks::BookmarkRegistry;
pub use mode::Mode;
pub use navigation::{NavigationState, SelectionMemory};
pub use view::{Selection, View};
