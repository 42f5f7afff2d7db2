use std::path::PathBuf;

use thiserror::Error;
use crate::providers::ProviderError;

/// Application-level errors.
///
/// Everything that can fail inside a command ends up here and is reported
/// once at the command boundary (`App::dispatch`).
#[derive(Error, Debug)]
pub enum AppError {
    /// A path that was assumed to exist is missing (or is not a directory
    /// where one was required)
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A rename would implicitly replace a directory
    #[error("Cannot replace directory: {}", .0.display())]
    InvalidTarget(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Store(String),

    /// Some items of a batch delete failed; the others were removed
    #[error("Failed to delete {} of {total} item(s): {}", .failures.len(), first_failure(.failures))]
    BatchDelete {
        total: usize,
        failures: Vec<(PathBuf, ProviderError)>,
    },
}

fn first_failure(failures: &[(PathBuf, ProviderError)]) -> String {
    failures
        .first()
        .map(|(path, err)| format!("{}: {}", path.display(), err))
        .unwrap_or_default()
}

pub type AppResult<T> = Result<T, AppError>;
