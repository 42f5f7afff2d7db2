//! File operations driven by listing lines: create, rename, delete.
//!
//! Each operation resolves lines through the listing model, asks the user
//! where a decision is needed, and reports whether the directory view has to
//! be re-rendered. Declining a prompt is an ordinary [`Outcome::Cancelled`].

use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::fs::EntryKind;
use crate::fs::utils::{basename, dirname, has_trailing_separator, join};
use crate::listing::{is_parent_sentinel, line_to_path};
use crate::prompt::{Answer, Prompt};
use crate::providers::{DeleteOptions, FileSystem};

/// Result of a file operation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The directory changed; re-render it
    Changed,
    /// A regular file was created; re-render and open it in an editor
    Created(PathBuf),
    /// Nothing to do (target already present, nothing selected)
    Unchanged,
    /// The user declined or dismissed a prompt
    Cancelled,
}

impl Outcome {
    pub fn needs_render(&self) -> bool {
        matches!(self, Outcome::Changed | Outcome::Created(_))
    }
}

/// Which confirmations are asked, and how deletes are performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpsPolicy {
    pub confirm_delete: bool,
    pub confirm_overwrite: bool,
    /// Delete to the trash where the provider supports it
    pub recoverable_delete: bool,
}

impl Default for OpsPolicy {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            confirm_overwrite: true,
            recoverable_delete: true,
        }
    }
}

pub struct FileOps<'a> {
    fs: &'a mut dyn FileSystem,
    policy: OpsPolicy,
}

impl<'a> FileOps<'a> {
    pub fn new(fs: &'a mut dyn FileSystem, policy: OpsPolicy) -> Self {
        Self { fs, policy }
    }

    /// Create a file, or a directory if `name` ends with a separator.
    ///
    /// Missing intermediate directories are created. An existing path is
    /// left untouched.
    pub fn create(&mut self, dir: &Path, name: &str) -> AppResult<Outcome> {
        if name.is_empty() {
            return Ok(Outcome::Cancelled);
        }
        if has_trailing_separator(name) {
            return self.create_directory(dir, name);
        }

        let path = join(dir, name);
        if self.fs.exists(&path)? {
            tracing::debug!("create: {:?} already exists", path);
            return Ok(Outcome::Unchanged);
        }

        let parent = dirname(&path);
        if !self.fs.exists(&parent)? {
            self.fs.create_directory(&parent)?;
        }
        self.fs.write_file(&path, &[])?;
        tracing::info!("created file {:?}", path);
        Ok(Outcome::Created(path))
    }

    /// Create a directory (and all missing parents), regardless of a
    /// trailing separator on `name`.
    pub fn create_directory(&mut self, dir: &Path, name: &str) -> AppResult<Outcome> {
        if name.is_empty() {
            return Ok(Outcome::Cancelled);
        }
        let path = join(dir, name);
        if self.fs.exists(&path)? {
            tracing::debug!("mkdir: {:?} already exists", path);
            return Ok(Outcome::Unchanged);
        }
        self.fs.create_directory(&path)?;
        tracing::info!("created directory {:?}", path);
        Ok(Outcome::Changed)
    }

    /// Rename the entry on `line` to `new_name` (relative to `dir`).
    ///
    /// Renaming onto an existing directory moves the entry inside it. The
    /// relocated target must not itself be a directory. An existing file at
    /// the target is only replaced after confirmation.
    pub fn rename(
        &mut self,
        dir: &Path,
        line: &str,
        new_name: &str,
        prompt: &mut dyn Prompt,
    ) -> AppResult<Outcome> {
        if new_name.is_empty() || is_parent_sentinel(line) {
            return Ok(Outcome::Cancelled);
        }

        let src = line_to_path(dir, line);
        let mut dst = line_to_path(dir, new_name);
        if src == dst {
            return Ok(Outcome::Unchanged);
        }
        if !self.fs.exists(&src)? {
            return Err(AppError::NotFound(src));
        }

        if self.fs.stat(&dst)? == Some(EntryKind::Directory) {
            dst = dst.join(basename(&src));
            // "." or the entry's own directory lands back on the source
            if src == dst {
                return Ok(Outcome::Unchanged);
            }
        }

        match self.fs.stat(&dst)? {
            Some(EntryKind::Directory) => return Err(AppError::InvalidTarget(dst)),
            Some(EntryKind::File) => {
                if self.policy.confirm_overwrite
                    && prompt.confirm("Overwrite existing file?", "Overwrite") != Answer::Yes
                {
                    return Ok(Outcome::Cancelled);
                }
            }
            None => {
                let parent = dirname(&dst);
                if !self.fs.exists(&parent)? {
                    self.fs.create_directory(&parent)?;
                }
            }
        }

        self.fs.rename(&src, &dst, true)?;
        tracing::info!("renamed {:?} -> {:?}", src, dst);
        Ok(Outcome::Changed)
    }

    /// Delete every entry named by `lines` after a single confirmation.
    ///
    /// The parent sentinel is never deleted. Items are removed one at a time;
    /// a failure does not stop the rest of the batch, and all failures are
    /// reported together.
    pub fn delete(
        &mut self,
        dir: &Path,
        lines: &[String],
        prompt: &mut dyn Prompt,
    ) -> AppResult<Outcome> {
        let targets: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|line| !line.is_empty() && !is_parent_sentinel(line))
            .collect();

        if targets.is_empty() {
            return Ok(Outcome::Unchanged);
        }

        if self.policy.confirm_delete {
            let message = match targets.as_slice() {
                [single] => format!("Delete {}?", single),
                many => format!("Delete {} items?", many.len()),
            };
            if prompt.confirm(&message, "Delete") != Answer::Yes {
                return Ok(Outcome::Cancelled);
            }
        }

        let options = DeleteOptions {
            recursive: true,
            recoverable: self.policy.recoverable_delete,
        };
        let mut failures = Vec::new();
        for line in &targets {
            let path = line_to_path(dir, line);
            match self.fs.delete(&path, options) {
                Ok(()) => tracing::info!("deleted {:?}", path),
                Err(e) => {
                    tracing::warn!("failed to delete {:?}: {}", path, e);
                    failures.push((path, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(Outcome::Changed)
        } else {
            Err(AppError::BatchDelete {
                total: targets.len(),
                failures,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Listing;
    use crate::prompt::ScriptedPrompt;
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

    fn provider() -> LocalProvider {
        LocalProvider::new().with_trash(false)
    }

    fn lines(fs: &LocalProvider, dir: &Path) -> Vec<String> {
        Listing::render(fs, dir).unwrap().lines().to_vec()
    }

    #[test]
    fn test_create_file() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .create(tmp.path(), "b.txt")
            .unwrap();
        assert_eq!(outcome, Outcome::Created(tmp.path().join("b.txt")));
        assert!(tmp.path().join("b.txt").is_file());
    }

    #[test]
    fn test_create_with_trailing_slash_makes_directory() {
        let tmp = workspace(&[]);
        let mut fs = provider();
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .create(tmp.path(), "a/")
            .unwrap();
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "a/"]);
    }

    #[test]
    fn test_create_intermediate_directories() {
        let tmp = workspace(&[]);
        let mut fs = provider();
        let mut ops = FileOps::new(&mut fs, OpsPolicy::default());
        ops.create(tmp.path(), "a/b/c").unwrap();
        assert!(tmp.path().join("a/b/c").is_file());
        ops.create(tmp.path(), "x/y/z/").unwrap();
        assert!(tmp.path().join("x/y/z").is_dir());
    }

    #[test]
    fn test_create_does_not_overwrite() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .create(tmp.path(), "a.txt")
            .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(std::fs::read_to_string(tmp.path().join("a.txt")).unwrap(), "a.txt");
    }

    #[test]
    fn test_create_empty_name_is_cancelled() {
        let tmp = workspace(&[]);
        let mut fs = provider();
        let mut ops = FileOps::new(&mut fs, OpsPolicy::default());
        assert_eq!(ops.create(tmp.path(), "").unwrap(), Outcome::Cancelled);
        assert_eq!(ops.create_directory(tmp.path(), "").unwrap(), Outcome::Cancelled);
    }

    #[test]
    fn test_create_directory_without_slash() {
        let tmp = workspace(&[]);
        let mut fs = provider();
        FileOps::new(&mut fs, OpsPolicy::default())
            .create_directory(tmp.path(), "a/b")
            .unwrap();
        assert!(tmp.path().join("a/b").is_dir());
    }

    #[test]
    fn test_rename_file() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a.txt", "b.txt", &mut prompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "b.txt"]);
        assert!(prompt.confirmations.is_empty());
    }

    #[test]
    fn test_rename_into_new_directory() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a.txt", "b/c.txt", &mut prompt)
            .unwrap();
        assert!(!tmp.path().join("a.txt").exists());
        assert!(tmp.path().join("b/c.txt").is_file());
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "b/"]);
    }

    #[test]
    fn test_rename_directory() {
        let tmp = workspace(&["a/b.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a/", "b", &mut prompt)
            .unwrap();
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "b/"]);
        assert!(tmp.path().join("b/b.txt").is_file());
    }

    #[test]
    fn test_rename_overwrite_confirmed() {
        let tmp = workspace(&["a.txt", "b.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new().with_answer(Answer::Yes);
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a.txt", "b.txt", &mut prompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(prompt.confirmations.len(), 1);
        assert_eq!(std::fs::read_to_string(tmp.path().join("b.txt")).unwrap(), "a.txt");
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "b.txt"]);
    }

    #[test]
    fn test_rename_overwrite_declined() {
        let tmp = workspace(&["a.txt", "b.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new().with_answer(Answer::No);
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a.txt", "b.txt", &mut prompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_rename_overwrite_without_confirmation_policy() {
        let tmp = workspace(&["a.txt", "b.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        let policy = OpsPolicy { confirm_overwrite: false, ..OpsPolicy::default() };
        let outcome = FileOps::new(&mut fs, policy)
            .rename(tmp.path(), "a.txt", "b.txt", &mut prompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Changed);
        assert!(prompt.confirmations.is_empty());
    }

    #[test]
    fn test_implicit_directory_rename() {
        let tmp = workspace(&["a.txt", "b/"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a.txt", "b", &mut prompt)
            .unwrap();
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "b/"]);
        assert!(tmp.path().join("b/a.txt").is_file());
    }

    #[test]
    fn test_implicit_rename_never_replaces_directory() {
        let tmp = workspace(&["a.txt", "b/a.txt/c.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        let result = FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "a.txt", "b", &mut prompt);
        assert!(matches!(result, Err(AppError::InvalidTarget(p)) if p == tmp.path().join("b/a.txt")));
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "b/", "a.txt"]);
    }

    #[test]
    fn test_rename_cancelled_or_noop() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        let mut ops = FileOps::new(&mut fs, OpsPolicy::default());
        assert_eq!(ops.rename(tmp.path(), "a.txt", "", &mut prompt).unwrap(), Outcome::Cancelled);
        assert_eq!(ops.rename(tmp.path(), "../", "x", &mut prompt).unwrap(), Outcome::Cancelled);
        assert_eq!(ops.rename(tmp.path(), "a.txt", "a.txt", &mut prompt).unwrap(), Outcome::Unchanged);
        assert!(tmp.path().join("a.txt").is_file());
    }

    #[test]
    fn test_rename_into_own_directory_is_noop() {
        let tmp = workspace(&["a.txt", "d/x.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new().with_answer(Answer::Yes);
        let mut ops = FileOps::new(&mut fs, OpsPolicy::default());
        assert_eq!(ops.rename(tmp.path(), "a.txt", ".", &mut prompt).unwrap(), Outcome::Unchanged);
        assert_eq!(ops.rename(tmp.path(), "d/", "./", &mut prompt).unwrap(), Outcome::Unchanged);
        assert!(prompt.confirmations.is_empty());
        assert_eq!(std::fs::read_to_string(tmp.path().join("a.txt")).unwrap(), "a.txt");
        assert!(tmp.path().join("d/x.txt").is_file());
    }

    #[test]
    fn test_rename_missing_source_is_not_found() {
        let tmp = workspace(&[]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new();
        let result = FileOps::new(&mut fs, OpsPolicy::default())
            .rename(tmp.path(), "ghost.txt", "b.txt", &mut prompt);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_single_file() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new().with_answer(Answer::Yes);
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .delete(tmp.path(), &["a.txt".to_string()], &mut prompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(prompt.confirmations, vec!["Delete a.txt?"]);
        assert_eq!(lines(&fs, tmp.path()), vec!["../"]);
    }

    #[test]
    fn test_delete_batch_confirmed_and_declined() {
        let tmp = workspace(&["a/a.txt", "b.txt", "c.txt"]);
        let batch = vec!["../".to_string(), "a/".to_string(), "b.txt".to_string()];
        let mut fs = provider();

        let mut no = ScriptedPrompt::new().with_answer(Answer::No);
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .delete(tmp.path(), &batch, &mut no)
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(no.confirmations, vec!["Delete 2 items?"]);
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "a/", "b.txt", "c.txt"]);

        let mut yes = ScriptedPrompt::new().with_answer(Answer::Yes);
        FileOps::new(&mut fs, OpsPolicy::default())
            .delete(tmp.path(), &batch, &mut yes)
            .unwrap();
        assert_eq!(lines(&fs, tmp.path()), vec!["../", "c.txt"]);
    }

    #[test]
    fn test_delete_parent_sentinel_is_noop() {
        let tmp = workspace(&["a.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new().with_answer(Answer::Yes);
        let outcome = FileOps::new(&mut fs, OpsPolicy::default())
            .delete(tmp.path(), &["../".to_string()], &mut prompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(prompt.confirmations.is_empty());
        assert!(tmp.path().exists());
    }

    #[test]
    fn test_delete_continues_past_failures() {
        let tmp = workspace(&["a.txt", "c.txt"]);
        let mut fs = provider();
        let mut prompt = ScriptedPrompt::new().with_answer(Answer::Yes);
        let batch = vec!["a.txt".to_string(), "ghost.txt".to_string(), "c.txt".to_string()];
        let result = FileOps::new(&mut fs, OpsPolicy::default())
            .delete(tmp.path(), &batch, &mut prompt);
        match result {
            Err(AppError::BatchDelete { total, failures }) => {
                assert_eq!(total, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].0, tmp.path().join("ghost.txt"));
            }
            other => panic!("expected batch failure, got {:?}", other),
        }
        assert_eq!(lines(&fs, tmp.path()), vec!["../"]);
    }
}
