//! dirbuf - browse and edit directories as plain text listings
//!
//! A directory is rendered as one line per entry (directories first, with a
//! trailing `/`, behind a `../` line for the parent). Commands act on the
//! lines under the cursor: open, rename, delete, create, bookmark. Problems
//! reported against files roll up onto the line of every directory above
//! them.

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod file_ops;
pub mod fs;
pub mod git;
pub mod input;
pub mod listing;
pub mod prompt;
pub mod providers;
pub mod state;
pub mod store;
pub mod ui;

pub use config::Config;
pub use diagnostics::{AnnotationSource, DiagnosticStore, DiagnosticsAggregator, Severity};
pub use errors::{AppError, AppResult};
pub use file_ops::{FileOps, OpsPolicy, Outcome};
pub use listing::Listing;
pub use prompt::{Answer, InputRequest, Prompt};
pub use providers::{FileSystem, LocalProvider};
pub use state::{App, Command, Effect};
pub use store::{KeyValueStore, MemoryStore, TomlStore};
