//! Application state and the command boundary

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diagnostics::{AnnotationSource, DiagnosticsAggregator};
use crate::errors::{AppError, AppResult};
use crate::file_ops::{FileOps, OpsPolicy, Outcome};
use crate::fs::utils::{dirname, join, normalize};
use crate::git::{self, GitStatus};
use crate::listing::{Listing, is_parent_sentinel};
use crate::prompt::{InputRequest, Prompt};
use crate::providers::FileSystem;
use crate::store::KeyValueStore;

use super::bookmarks::BookmarkRegistry;
use super::navigation::{NavigationState, find_project_root};
use super::view::View;

/// A user-level command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a directory; None opens the directory of the active document
    Open(Option<PathBuf>),
    /// Open the entry under the cursor
    OpenAtCursor,
    OpenParent,
    /// Open the project root of the active path, or the home directory
    OpenHome,
    Refresh,
    Rename,
    Delete,
    Create,
    CreateDirectory,
    BookmarkSave,
    BookmarkJump,
    BookmarkRemove,
    Quit,
}

/// What the host has to do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Stay,
    /// Open a regular file in an editor
    OpenFile(PathBuf),
}

/// Main application state
pub struct App {
    fs: Box<dyn FileSystem>,
    pub config: Config,
    nav: NavigationState,
    bookmarks: BookmarkRegistry,
    annotations: Box<dyn AnnotationSource>,
    aggregator: DiagnosticsAggregator,
    view: Option<View>,
    /// Directory used when there is neither a view nor an active document
    start_dir: PathBuf,
    active_document: Option<PathBuf>,
    /// Branch summary for the status bar
    pub git_status: Option<GitStatus>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        fs: Box<dyn FileSystem>,
        store: Box<dyn KeyValueStore>,
        annotations: Box<dyn AnnotationSource>,
        start_dir: PathBuf,
    ) -> AppResult<Self> {
        Ok(Self {
            fs,
            config,
            nav: NavigationState::new(),
            bookmarks: BookmarkRegistry::load(store)?,
            annotations,
            aggregator: DiagnosticsAggregator::new(),
            view: None,
            start_dir,
            active_document: None,
            git_status: None,
            should_quit: false,
        })
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut View> {
        self.view.as_mut()
    }

    pub fn diagnostics(&self) -> &DiagnosticsAggregator {
        &self.aggregator
    }

    /// The view together with its aggregates, for drawing
    pub fn view_with_diagnostics(&mut self) -> (Option<&mut View>, &DiagnosticsAggregator) {
        (self.view.as_mut(), &self.aggregator)
    }

    pub fn bookmarks(&self) -> &BookmarkRegistry {
        &self.bookmarks
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn active_document(&self) -> Option<&Path> {
        self.active_document.as_deref()
    }

    /// Record the document the host is now showing
    pub fn set_active_document(&mut self, path: Option<PathBuf>) {
        self.active_document = path;
    }

    fn policy(&self) -> OpsPolicy {
        OpsPolicy {
            confirm_delete: self.config.confirmations.delete,
            confirm_overwrite: self.config.confirmations.overwrite,
            recoverable_delete: self.config.general.use_trash,
        }
    }

    /// Run a command. Failures are reported through `prompt` and never
    /// escape this call.
    pub fn dispatch(&mut self, command: Command, prompt: &mut dyn Prompt) -> Effect {
        tracing::debug!("dispatch {:?}", command);
        match self.run(command, prompt) {
            Ok(effect) => effect,
            Err(e) => {
                tracing::warn!("command failed: {}", e);
                prompt.notify_error(&e.to_string());
                Effect::Stay
            }
        }
    }

    fn run(&mut self, command: Command, prompt: &mut dyn Prompt) -> AppResult<Effect> {
        match command {
            Command::Open(Some(path)) => {
                let path = if path.is_absolute() {
                    normalize(&path)
                } else {
                    join(&self.base_dir(), &path.to_string_lossy())
                };
                self.open(&path)?;
            }
            Command::Open(None) => {
                let dir = match self.active_document.as_deref() {
                    Some(doc) => dirname(doc),
                    None => self.start_dir.clone(),
                };
                self.open(&dir)?;
            }
            Command::OpenAtCursor => return self.open_at_cursor(),
            Command::OpenParent => {
                self.nav.open_parent(self.fs.as_ref(), &mut self.view)?;
                self.after_navigation();
            }
            Command::OpenHome => {
                let start = self.base_dir();
                let target = find_project_root(self.fs.as_ref(), &start, &self.config.general.project_markers)
                    .unwrap_or_else(|| self.fs.home_dir());
                self.open(&target)?;
            }
            Command::Refresh => self.refresh(None)?,
            Command::Rename => self.rename(prompt)?,
            Command::Delete => self.delete(prompt)?,
            Command::Create => return self.create(prompt, false),
            Command::CreateDirectory => return self.create(prompt, true),
            Command::BookmarkSave => self.bookmark_save(prompt)?,
            Command::BookmarkJump => self.bookmark_jump(prompt)?,
            Command::BookmarkRemove => self.bookmark_remove(prompt)?,
            Command::Quit => self.should_quit = true,
        }
        Ok(Effect::Stay)
    }

    /// Directory relative names are resolved against
    fn base_dir(&self) -> PathBuf {
        if let Some(view) = &self.view {
            return view.listing().dir().to_path_buf();
        }
        match self.active_document.as_deref() {
            Some(doc) => dirname(doc),
            None => self.start_dir.clone(),
        }
    }

    fn open(&mut self, path: &Path) -> AppResult<()> {
        let active = self.active_document.clone();
        self.nav.open(self.fs.as_ref(), &mut self.view, path, active.as_deref())?;
        self.after_navigation();
        Ok(())
    }

    fn after_navigation(&mut self) {
        let Some(dir) = self.nav.current_dir().map(Path::to_path_buf) else {
            return;
        };
        if self.config.display.show_git_status {
            self.git_status = git::get_git_status(&dir);
        }
        self.annotations.poll(&dir);
        self.refresh_diagnostics();
    }

    fn refresh_diagnostics(&mut self) {
        match (&self.view, self.config.display.show_diagnostics) {
            (Some(view), true) => {
                self.aggregator.refresh(view.listing(), self.annotations.as_ref());
            }
            _ => self.aggregator.clear(),
        }
    }

    /// Ask the annotation source for changes; re-aggregates if there were any.
    /// Returns whether the view needs to be redrawn.
    pub fn poll_annotations(&mut self) -> bool {
        let Some(dir) = self.view.as_ref().map(|v| v.listing().dir().to_path_buf()) else {
            return false;
        };
        if self.config.display.show_git_status {
            self.git_status = git::get_git_status(&dir);
        }
        if !self.annotations.poll(&dir) {
            return false;
        }
        self.refresh_diagnostics();
        true
    }

    /// Re-render the current directory, optionally moving the cursor onto the
    /// line that leads to `focus`.
    fn refresh(&mut self, focus: Option<&Path>) -> AppResult<()> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };
        self.nav.refresh(self.fs.as_ref(), view)?;
        if let Some(line) = focus.and_then(|path| focus_line(view.listing(), path)) {
            view.set_cursor(line);
        }
        self.annotations.poll(view.listing().dir());
        self.refresh_diagnostics();
        Ok(())
    }

    fn open_at_cursor(&mut self) -> AppResult<Effect> {
        let Some(view) = self.view.as_ref() else {
            return Ok(Effect::Stay);
        };
        let Some(line) = view.current_line() else {
            return Ok(Effect::Stay);
        };
        let Some(path) = view.listing().path_at(view.cursor()) else {
            return Ok(Effect::Stay);
        };

        if line.ends_with('/') {
            self.open(&path)?;
            return Ok(Effect::Stay);
        }

        self.nav.save_selection(view);
        tracing::info!("opening file {:?}", path);
        Ok(Effect::OpenFile(path))
    }

    fn rename(&mut self, prompt: &mut dyn Prompt) -> AppResult<()> {
        let Some(view) = self.view.as_ref() else {
            return Ok(());
        };
        let Some(line) = view.current_line().map(str::to_string) else {
            return Ok(());
        };
        if is_parent_sentinel(&line) {
            return Ok(());
        }
        let dir = view.listing().dir().to_path_buf();

        let request = InputRequest::new("Rename", "New name").with_initial(line.as_str());
        let Some(new_name) = prompt.input(&request) else {
            return Ok(());
        };

        let policy = self.policy();
        let outcome = FileOps::new(self.fs.as_mut(), policy).rename(&dir, &line, &new_name, prompt)?;
        if outcome.needs_render() {
            self.refresh(Some(&join(&dir, &new_name)))?;
        }
        Ok(())
    }

    fn delete(&mut self, prompt: &mut dyn Prompt) -> AppResult<()> {
        let Some(view) = self.view.as_ref() else {
            return Ok(());
        };
        let lines = view.selected_texts();
        let dir = view.listing().dir().to_path_buf();

        let policy = self.policy();
        let result = FileOps::new(self.fs.as_mut(), policy).delete(&dir, &lines, prompt);
        match result {
            Ok(outcome) if outcome.needs_render() => {
                if let Some(view) = self.view.as_mut() {
                    view.clear_selection();
                }
                self.refresh(None)
            }
            Ok(_) => Ok(()),
            Err(e @ AppError::BatchDelete { .. }) => {
                // part of the batch is gone; show what is left before reporting
                self.refresh(None)?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn create(&mut self, prompt: &mut dyn Prompt, directory: bool) -> AppResult<Effect> {
        let Some(dir) = self.view.as_ref().map(|v| v.listing().dir().to_path_buf()) else {
            return Ok(Effect::Stay);
        };

        let request = if directory {
            InputRequest::new("Create directory", "Directory name")
        } else {
            InputRequest::new("Create", "File name (end with / for a directory)")
        };
        let Some(name) = prompt.input(&request) else {
            return Ok(Effect::Stay);
        };

        let policy = self.policy();
        let mut ops = FileOps::new(self.fs.as_mut(), policy);
        let outcome = if directory {
            ops.create_directory(&dir, &name)?
        } else {
            ops.create(&dir, &name)?
        };

        match outcome {
            Outcome::Created(path) => {
                self.refresh(Some(&path))?;
                Ok(Effect::OpenFile(path))
            }
            Outcome::Changed | Outcome::Unchanged => {
                self.refresh(Some(&join(&dir, &name)))?;
                Ok(Effect::Stay)
            }
            Outcome::Cancelled => Ok(Effect::Stay),
        }
    }

    fn bookmark_save(&mut self, prompt: &mut dyn Prompt) -> AppResult<()> {
        let Some(dir) = self.nav.current_dir().map(Path::to_path_buf) else {
            return Ok(());
        };
        let request = InputRequest::new("Bookmark", "Register");
        let Some(register) = prompt.input(&request) else {
            return Ok(());
        };
        let register = register.trim();
        if register.is_empty() {
            return Ok(());
        }
        self.bookmarks.save(register, &dir)?;
        tracing::info!("bookmark '{}' -> {:?}", register, dir);
        prompt.notify(&format!("Bookmark '{}' set to {}", register, dir.display()));
        Ok(())
    }

    /// Let the user pick a bookmark; None if there are none or the picker
    /// was dismissed.
    fn pick_bookmark(&self, title: &str, prompt: &mut dyn Prompt) -> Option<(String, PathBuf)> {
        if self.bookmarks.is_empty() {
            prompt.notify("No bookmarks");
            return None;
        }
        let entries = self.bookmarks.list();
        let items: Vec<String> = entries
            .iter()
            .map(|(register, path)| format!("{}  {}", register, path.display()))
            .collect();
        let index = prompt.pick(title, &items)?;
        entries.into_iter().nth(index)
    }

    fn bookmark_jump(&mut self, prompt: &mut dyn Prompt) -> AppResult<()> {
        let Some((_, path)) = self.pick_bookmark("Jump to bookmark", prompt) else {
            return Ok(());
        };
        self.open(&path)
    }

    fn bookmark_remove(&mut self, prompt: &mut dyn Prompt) -> AppResult<()> {
        let Some((register, _)) = self.pick_bookmark("Remove bookmark", prompt) else {
            return Ok(());
        };
        self.bookmarks.delete(&register)?;
        tracing::info!("bookmark '{}' removed", register);
        Ok(())
    }
}

/// Line of `listing` that is `path` or one of its ancestors
fn focus_line(listing: &Listing, path: &Path) -> Option<usize> {
    path.ancestors()
        .find(|p| p.parent() == Some(listing.dir()))
        .and_then(|p| listing.position_of_path(p))
}
