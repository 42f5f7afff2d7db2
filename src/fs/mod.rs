//! Filesystem module

pub mod entry;
pub mod ops;
pub mod utils;

pub use entry::{DirectoryEntry, EntryKind};
pub use ops::read_directory;
