//! Per-line problem roll-up for directory listings.
//!
//! Diagnostics are reported against files by an [`AnnotationSource`]. Each
//! listing line gets at most one [`AggregatedDiagnostic`] summarizing every
//! diagnostic on the path it stands for, or anywhere beneath it for a
//! directory line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::fs::utils::strip_trailing_slash;
use crate::listing::{Listing, is_parent_sentinel};

/// Diagnostic severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        }
    }
}

/// Zero-based line/character position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A problem reported against a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    /// Producer of the diagnostic ("git", a linter name, ...)
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            range: Range::default(),
            severity,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A child diagnostic attached to an aggregate, with its original location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub path: PathBuf,
    pub range: Range,
    pub severity: Severity,
    pub message: String,
}

/// Summary annotation for one listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedDiagnostic {
    pub line: usize,
    /// Spans the displayed name on `line`
    pub range: Range,
    /// Most severe child severity
    pub severity: Severity,
    pub count: usize,
    pub message: String,
    pub children: Vec<RelatedInfo>,
}

/// Something that can report diagnostics for paths
pub trait AnnotationSource {
    /// Diagnostics reported against `path` or any path beneath it
    fn diagnostics_for(&self, path: &Path) -> Vec<(PathBuf, Diagnostic)>;

    /// Bring annotations for `dir` up to date. Returns true if they changed
    /// since the previous poll.
    fn poll(&mut self, dir: &Path) -> bool;
}

/// In-memory annotation source keyed by file path
#[derive(Debug, Clone, Default)]
pub struct DiagnosticStore {
    by_path: BTreeMap<PathBuf, Vec<Diagnostic>>,
    changed: bool,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostics of `path`; an empty set removes the path
    pub fn set(&mut self, path: impl Into<PathBuf>, diagnostics: Vec<Diagnostic>) {
        let path = path.into();
        if diagnostics.is_empty() {
            self.clear(&path);
            return;
        }
        if self.by_path.get(&path) != Some(&diagnostics) {
            self.by_path.insert(path, diagnostics);
            self.changed = true;
        }
    }

    pub fn clear(&mut self, path: &Path) {
        if self.by_path.remove(path).is_some() {
            self.changed = true;
        }
    }

    pub fn clear_all(&mut self) {
        if !self.by_path.is_empty() {
            self.by_path.clear();
            self.changed = true;
        }
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

impl AnnotationSource for DiagnosticStore {
    fn diagnostics_for(&self, path: &Path) -> Vec<(PathBuf, Diagnostic)> {
        self.by_path
            .range(path.to_path_buf()..)
            .take_while(|(p, _)| p.starts_with(path))
            .flat_map(|(p, diags)| diags.iter().map(move |d| (p.clone(), d.clone())))
            .collect()
    }

    fn poll(&mut self, _dir: &Path) -> bool {
        std::mem::take(&mut self.changed)
    }
}

/// Message shown on an aggregated line
pub fn summary_message(count: usize) -> String {
    if count == 1 {
        "1 problem".to_string()
    } else {
        format!("{} problems", count)
    }
}

/// Computes the aggregated annotations for the lines of a listing
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsAggregator {
    current: Vec<AggregatedDiagnostic>,
}

impl DiagnosticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the whole annotation set for `listing`, replacing the
    /// previous one.
    pub fn refresh(&mut self, listing: &Listing, source: &dyn AnnotationSource) -> &[AggregatedDiagnostic] {
        self.current = listing
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| !is_parent_sentinel(line))
            .filter_map(|(index, line)| {
                let path = listing.path_at(index)?;
                aggregate(index, line, source.diagnostics_for(&path))
            })
            .collect();
        tracing::debug!(
            "aggregated diagnostics for {:?}: {} line(s)",
            listing.dir(),
            self.current.len()
        );
        &self.current
    }

    pub fn all(&self) -> &[AggregatedDiagnostic] {
        &self.current
    }

    /// Aggregate on `line`, if any
    pub fn for_line(&self, line: usize) -> Option<&AggregatedDiagnostic> {
        self.current
            .binary_search_by_key(&line, |a| a.line)
            .ok()
            .map(|i| &self.current[i])
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }
}

fn aggregate(index: usize, line: &str, found: Vec<(PathBuf, Diagnostic)>) -> Option<AggregatedDiagnostic> {
    let severity = found.iter().map(|(_, d)| d.severity).min()?;

    let mut children: Vec<RelatedInfo> = found
        .into_iter()
        .map(|(path, d)| RelatedInfo {
            path,
            range: d.range,
            severity: d.severity,
            message: d.message,
        })
        .collect();
    children.sort_by(|a, b| a.path.cmp(&b.path).then(a.range.cmp(&b.range)));

    let width = strip_trailing_slash(line).chars().count();
    Some(AggregatedDiagnostic {
        line: index,
        range: Range::new(Position::new(index, 0), Position::new(index, width)),
        severity,
        count: children.len(),
        message: summary_message(children.len()),
        children,
    })
}
