//! Git working-tree status: branch summary for the status bar, and per-file
//! status exposed as diagnostics so directory lines roll up their changes.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::diagnostics::{AnnotationSource, Diagnostic, DiagnosticStore, Severity};

/// Git repository status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
    /// Current branch name (or :hash if detached)
    pub branch: Option<String>,
    /// Has uncommitted changes
    pub dirty: bool,
    /// Has staged changes
    pub staged: bool,
    /// Has untracked files
    pub untracked: bool,
}

impl GitStatus {
    /// Format for display in status bar: [branch *+?]
    pub fn format(&self) -> String {
        let Some(ref branch) = self.branch else {
            return String::new();
        };

        let mut indicators = String::new();
        if self.staged {
            indicators.push('+');
        }
        if self.dirty {
            indicators.push('*');
        }
        if self.untracked {
            indicators.push('?');
        }

        if indicators.is_empty() {
            format!("[{}]", branch)
        } else {
            format!("[{} {}]", branch, indicators)
        }
    }
}

/// Status of a single path as reported by `git status --porcelain`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Conflicted,
    Modified,
    Deleted,
    Added,
    Renamed,
    Untracked,
}

impl FileState {
    /// Classify a two-letter porcelain status code
    pub fn from_code(index: char, worktree: char) -> Option<Self> {
        match (index, worktree) {
            ('?', '?') => Some(FileState::Untracked),
            // ignored paths are not problems
            ('!', '!') => None,
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => Some(FileState::Conflicted),
            (_, 'D') | ('D', _) => Some(FileState::Deleted),
            (_, 'M') | (_, 'T') | ('M', _) | ('T', _) => Some(FileState::Modified),
            ('R', _) | ('C', _) => Some(FileState::Renamed),
            ('A', _) => Some(FileState::Added),
            _ => None,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            FileState::Conflicted => Severity::Error,
            FileState::Modified | FileState::Deleted => Severity::Warning,
            FileState::Added | FileState::Renamed | FileState::Untracked => Severity::Information,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            FileState::Conflicted => "merge conflict",
            FileState::Modified => "modified",
            FileState::Deleted => "deleted",
            FileState::Added => "added",
            FileState::Renamed => "renamed",
            FileState::Untracked => "untracked",
        }
    }
}

/// Parse `git status --porcelain` output into (repo-relative path, state)
/// pairs. Branch header lines are skipped.
pub fn parse_porcelain(output: &str) -> Vec<(String, FileState)> {
    output
        .lines()
        .filter(|line| !line.starts_with("##"))
        .filter_map(|line| {
            let mut chars = line.chars();
            let index = chars.next()?;
            let worktree = chars.next()?;
            let state = FileState::from_code(index, worktree)?;
            let rest = line.get(3..)?;
            // "old -> new" for renames and copies
            let path = rest.rsplit(" -> ").next().unwrap_or(rest);
            let path = unquote(path).trim_end_matches('/').to_string();
            (!path.is_empty()).then_some((path, state))
        })
        .collect()
}

fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).current_dir(dir).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Get git status for a directory
pub fn get_git_status(path: &Path) -> Option<GitStatus> {
    let branch = git_output(path, &["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string();

    let branch = if branch == "HEAD" {
        // Detached HEAD - show short commit hash
        match git_output(path, &["rev-parse", "--short", "HEAD"]) {
            Some(hash) => format!(":{}", hash.trim()),
            None => "HEAD".to_string(),
        }
    } else {
        branch
    };

    let status = git_output(path, &["status", "--porcelain"]).unwrap_or_default();
    let mut result = GitStatus {
        branch: Some(branch),
        ..GitStatus::default()
    };
    for line in status.lines() {
        let mut chars = line.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');
        if index == '?' {
            result.untracked = true;
            continue;
        }
        if index != ' ' {
            result.staged = true;
        }
        if worktree != ' ' {
            result.dirty = true;
        }
    }

    Some(result)
}

/// Per-file git status as an annotation source
#[derive(Debug, Default)]
pub struct GitAnnotations {
    /// Top level of the repository the last poll looked at
    root: Option<PathBuf>,
    snapshot: Vec<(PathBuf, FileState)>,
    store: DiagnosticStore,
}

impl GitAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(dir: &Path) -> Option<(PathBuf, Vec<(PathBuf, FileState)>)> {
        let root = PathBuf::from(git_output(dir, &["rev-parse", "--show-toplevel"])?.trim());
        let status = git_output(dir, &["status", "--porcelain", "--untracked-files=all"])?;
        let entries = parse_porcelain(&status)
            .into_iter()
            .map(|(rel, state)| (root.join(rel), state))
            .collect();
        Some((root, entries))
    }

    fn apply(&mut self, root: Option<PathBuf>, snapshot: Vec<(PathBuf, FileState)>) -> bool {
        if root == self.root && snapshot == self.snapshot {
            return false;
        }

        self.store.clear_all();
        for (path, state) in &snapshot {
            let diagnostic = Diagnostic::new(state.severity(), state.describe()).with_source("git");
            self.store.set(path.clone(), vec![diagnostic]);
        }
        tracing::debug!("git annotations: {} path(s) under {:?}", snapshot.len(), root);
        self.root = root;
        self.snapshot = snapshot;
        true
    }
}

impl AnnotationSource for GitAnnotations {
    fn diagnostics_for(&self, path: &Path) -> Vec<(PathBuf, Diagnostic)> {
        self.store.diagnostics_for(path)
    }

    fn poll(&mut self, dir: &Path) -> bool {
        match Self::scan(dir) {
            Some((root, snapshot)) => self.apply(Some(root), snapshot),
            None => self.apply(None, Vec::new()),
        }
    }
}
