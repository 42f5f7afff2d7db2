//! Navigation between directories: the current directory, the path that was
//! active before the last navigation, and the remembered selections of every
//! directory visited in this session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;
use crate::fs::utils::{dirname, join};
use crate::listing::Listing;
use crate::providers::FileSystem;

use super::view::{Selection, View};

/// Per-directory selections, saved when a view is left
#[derive(Debug, Clone, Default)]
pub struct SelectionMemory {
    entries: HashMap<PathBuf, Vec<Selection>>,
}

impl SelectionMemory {
    pub fn remember(&mut self, dir: &Path, selections: &[Selection]) {
        self.entries.insert(dir.to_path_buf(), selections.to_vec());
    }

    pub fn recall(&self, dir: &Path) -> Option<&[Selection]> {
        self.entries.get(dir).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    current_dir: Option<PathBuf>,
    previous_path: Option<PathBuf>,
    memory: SelectionMemory,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn previous_path(&self) -> Option<&Path> {
        self.previous_path.as_deref()
    }

    pub fn memory(&self) -> &SelectionMemory {
        &self.memory
    }

    /// Show `path` in `view`.
    ///
    /// `active` is the document that was focused when no view is showing.
    /// If the directory cannot be rendered, the current view and state are
    /// left as they were.
    pub fn open(
        &mut self,
        fs: &dyn FileSystem,
        view: &mut Option<View>,
        path: &Path,
        active: Option<&Path>,
    ) -> AppResult<()> {
        let listing = Listing::render(fs, path)?;

        let previous = match view.as_ref() {
            Some(old) => {
                self.memory.remember(old.listing().dir(), old.selections());
                Some(old.listing().dir().to_path_buf())
            }
            None => active.map(Path::to_path_buf),
        };
        self.previous_path = previous;
        self.current_dir = Some(path.to_path_buf());

        let mut fresh = View::new(listing);
        if let Some(height) = view.as_ref().map(|v| v.visible_height) {
            fresh.set_visible_height(height);
        }
        if let Some(remembered) = self.memory.recall(path) {
            fresh.set_selections(remembered);
        }
        self.restore_cursor(&mut fresh);

        tracing::debug!("opened {:?} (previous {:?})", path, self.previous_path);
        *view = Some(fresh);
        Ok(())
    }

    /// Remember the selections of a view that is being left for something
    /// other than another directory
    pub fn save_selection(&mut self, view: &View) {
        self.memory.remember(view.listing().dir(), view.selections());
    }

    /// Put the cursor on the entry line standing for the previously active
    /// path, if the listing has one. Coming down from the parent matches
    /// nothing, since `../` is not an entry, and remembered selections stay.
    pub fn restore_cursor(&self, view: &mut View) -> bool {
        let Some(previous) = self.previous_path.as_deref() else {
            return false;
        };
        match view.listing().position_of_path(previous) {
            Some(line) => {
                view.set_cursor(line);
                true
            }
            None => false,
        }
    }

    /// Open the parent of the current directory. At the root this renders
    /// the same directory again.
    pub fn open_parent(&mut self, fs: &dyn FileSystem, view: &mut Option<View>) -> AppResult<()> {
        let Some(current) = self.current_dir.clone() else {
            return Ok(());
        };
        self.open(fs, view, &dirname(&current), None)
    }

    /// Re-render the current directory in place, keeping the selections
    pub fn refresh(&mut self, fs: &dyn FileSystem, view: &mut View) -> AppResult<()> {
        let listing = Listing::render(fs, view.listing().dir())?;
        view.replace_listing(listing);
        Ok(())
    }
}

/// Nearest directory at or above `start` that contains one of `markers`
pub fn find_project_root(fs: &dyn FileSystem, start: &Path, markers: &[String]) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        for marker in markers {
            if matches!(fs.exists(&join(&dir, marker)), Ok(true)) {
                return Some(dir);
            }
        }
        let parent = dirname(&dir);
        if parent == dir {
            return None;
        }
        dir = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LocalProvider;

    fn workspace(files: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for name in files {
            let path = tmp.path().join(name);
            if name.ends_with('/') {
                std::fs::create_dir_all(&path).unwrap();
            } else {
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(&path, name).unwrap();
            }
        }
        tmp
    }

    #[test]
    fn test_open_parent_puts_cursor_on_child() {
        let tmp = workspace(&["a.txt", "d/d1.txt", "e/"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;

        nav.open(&fs, &mut view, &tmp.path().join("e"), None).unwrap();
        nav.open_parent(&fs, &mut view).unwrap();

        let v = view.as_ref().unwrap();
        assert_eq!(v.listing().dir(), tmp.path());
        assert_eq!(v.current_line(), Some("e/"));
        assert_eq!(nav.previous_path(), Some(tmp.path().join("e").as_path()));
    }

    #[test]
    fn test_open_from_document_selects_it() {
        let tmp = workspace(&["a.txt", "b.txt", "c.txt"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;

        let doc = tmp.path().join("b.txt");
        nav.open(&fs, &mut view, tmp.path(), Some(&doc)).unwrap();
        assert_eq!(view.unwrap().current_line(), Some("b.txt"));
    }

    #[test]
    fn test_memory_restores_selection_when_no_path_matches() {
        let tmp = workspace(&["a.txt", "b.txt", "c.txt", "d/"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;

        nav.open(&fs, &mut view, tmp.path(), None).unwrap();
        view.as_mut().unwrap().set_selections(&[Selection::new(2, 3)]);

        let elsewhere = workspace(&["x"]);
        nav.open(&fs, &mut view, elsewhere.path(), None).unwrap();
        nav.open(&fs, &mut view, tmp.path(), None).unwrap();

        let v = view.unwrap();
        assert_eq!(v.selections(), &[Selection::new(2, 3)]);
        assert_eq!(nav.memory().len(), 2);
    }

    #[test]
    fn test_memory_survives_going_back_down() {
        let tmp = workspace(&["d/a", "d/b", "d/c"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;
        let d = tmp.path().join("d");

        nav.open(&fs, &mut view, &d, None).unwrap();
        view.as_mut().unwrap().set_cursor(3);
        assert_eq!(view.as_ref().unwrap().current_line(), Some("c"));

        nav.open_parent(&fs, &mut view).unwrap();
        assert_eq!(view.as_ref().unwrap().current_line(), Some("d/"));

        nav.open(&fs, &mut view, &d, None).unwrap();
        assert_eq!(view.unwrap().current_line(), Some("c"));
    }

    #[test]
    fn test_path_match_wins_over_memory() {
        let tmp = workspace(&["a.txt", "d/d1.txt"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;

        nav.open(&fs, &mut view, tmp.path(), None).unwrap();
        view.as_mut().unwrap().set_cursor(2);
        nav.open(&fs, &mut view, &tmp.path().join("d"), None).unwrap();
        nav.open_parent(&fs, &mut view).unwrap();

        // remembered cursor was on a.txt, but we came from d/
        assert_eq!(view.unwrap().current_line(), Some("d/"));
    }

    #[cfg(unix)]
    #[test]
    fn test_open_parent_at_root_is_idempotent() {
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;
        nav.open(&fs, &mut view, Path::new("/"), None).unwrap();
        let before = view.as_ref().unwrap().listing().lines().len();

        nav.open_parent(&fs, &mut view).unwrap();
        assert_eq!(nav.current_dir(), Some(Path::new("/")));
        assert_eq!(view.unwrap().listing().lines().len(), before);
    }

    #[test]
    fn test_failed_open_keeps_view() {
        let tmp = workspace(&["a.txt"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;
        nav.open(&fs, &mut view, tmp.path(), None).unwrap();

        assert!(nav.open(&fs, &mut view, &tmp.path().join("gone"), None).is_err());
        assert_eq!(view.unwrap().listing().dir(), tmp.path());
        assert_eq!(nav.current_dir(), Some(tmp.path()));
    }

    #[test]
    fn test_refresh_picks_up_changes() {
        let tmp = workspace(&["a.txt"]);
        let fs = LocalProvider::new();
        let mut nav = NavigationState::new();
        let mut view = None;
        nav.open(&fs, &mut view, tmp.path(), None).unwrap();

        std::fs::write(tmp.path().join("b.txt"), "").unwrap();
        let v = view.as_mut().unwrap();
        nav.refresh(&fs, v).unwrap();
        assert_eq!(v.listing().lines(), &["../", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_find_project_root() {
        let tmp = workspace(&["proj/.git/", "proj/src/deep/x.rs"]);
        let fs = LocalProvider::new();
        let markers = vec![".git".to_string()];

        let root = find_project_root(&fs, &tmp.path().join("proj/src/deep"), &markers);
        assert_eq!(root, Some(tmp.path().join("proj")));
        assert_eq!(find_project_root(&fs, tmp.path(), &["no-such-marker".to_string()]), None);
    }
}
