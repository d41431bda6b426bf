//! The project handle: a root directory plus its layout, and the read-only
//! file searches every resolver shares.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use walkdir::WalkDir;

use crate::components::ComponentIndex;
use crate::config::Config;
use crate::error::Error;
use crate::types::ComponentEntry;

/// A project root and its layout. Never writes to the tree.
#[derive(Debug)]
pub struct Project {
    /// Component index, built on first use.
    components: OnceLock<Vec<ComponentEntry>>,
    /// Layout settings.
    config: Config,
    /// Absolute root directory.
    root: PathBuf,
}

impl Project {
    /// Open a project at `root`, reading `.viewlink.toml` if present.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectRootNotFound` if `root` is not a directory,
    /// or errors from config loading.
    pub fn open(root: &Path) -> Result<Self, Error> {
        let config = Config::load(root).or_else(|e| {
            // A missing root surfaces as the clearer error below.
            return if root.is_dir() { Err(e) } else { Ok(Config::default()) };
        })?;
        return Self::with_config(root, config);
    }

    /// Open a project at `root` with an explicit layout.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectRootNotFound` if `root` is not a directory.
    pub fn with_config(root: &Path, config: Config) -> Result<Self, Error> {
        let root = root.canonicalize().map_err(|_err| {
            return Error::ProjectRootNotFound {
                path: root.to_path_buf(),
            };
        })?;
        if !root.is_dir() {
            return Err(Error::ProjectRootNotFound { path: root });
        }

        return Ok(Self {
            components: OnceLock::new(),
            config,
            root,
        });
    }

    /// Absolute root directory.
    pub fn root(&self) -> &Path {
        return &self.root;
    }

    /// Layout settings.
    pub const fn config(&self) -> &Config {
        return &self.config;
    }

    /// Absolute views directory.
    pub fn views_dir(&self) -> PathBuf {
        return self.root.join(&self.config.views_dir);
    }

    /// Absolute components directory.
    pub fn components_dir(&self) -> PathBuf {
        return self.views_dir().join(&self.config.components_dir);
    }

    /// Absolute controllers directory.
    pub fn controllers_dir(&self) -> PathBuf {
        return self.root.join(&self.config.controllers_dir);
    }

    /// The component index, scanned on first call and cached afterwards.
    pub fn components(&self) -> &[ComponentEntry] {
        return self
            .components
            .get_or_init(|| return ComponentIndex::build(self));
    }

    /// Drop the cached component index so the next call rescans.
    pub fn invalidate(&mut self) {
        self.components.take();
    }

    /// Find the template a slash-separated logical path names, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCandidate` for paths that would leave the views
    /// directory, or `Error::Io` if a directory on the way can't be read.
    pub fn find_template(&self, logical: &str) -> Result<Option<PathBuf>, Error> {
        let file = format!("{logical}.{}", self.config.template_extension);
        return find_case_insensitive(&self.views_dir(), &file);
    }

    /// Find the controller a route handler module names, trying each
    /// configured extension in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCandidate` or `Error::Io` as [`Self::find_template`].
    pub fn find_controller(&self, module: &str) -> Result<Option<PathBuf>, Error> {
        let dir = self.controllers_dir();
        for ext in &self.config.controller_extensions {
            if let Some(found) = find_case_insensitive(&dir, &format!("{module}.{ext}"))? {
                return Ok(Some(found));
            }
        }
        return Ok(None);
    }

    /// Every template under the views directory as (dotted name, path).
    pub fn templates(&self) -> Vec<(String, PathBuf)> {
        let ext = self.config.template_extension.as_str();
        return files_with_extension(&self.views_dir(), &[ext])
            .into_iter()
            .map(|(relative, path)| return (relative.replace('/', "."), path))
            .collect();
    }

    /// Every controller module as (slash-separated module path, path).
    pub fn controllers(&self) -> Vec<(String, PathBuf)> {
        let exts: Vec<&str> = self
            .config
            .controller_extensions
            .iter()
            .map(String::as_str)
            .collect();
        return files_with_extension(&self.controllers_dir(), &exts)
            .into_iter()
            .filter(|(relative, _)| return !relative.ends_with(".d"))
            .collect();
    }
}

/// Resolve `relative` under `base`, matching each segment case-insensitively.
/// Exact-case entries are tried first; when a branch has no match the
/// search falls back to the next case variant of that directory.
///
/// # Errors
///
/// Returns `Error::InvalidCandidate` if `relative` is absolute, empty, or has
/// `.`/`..` segments, or `Error::Io` if a directory can't be read.
pub fn find_case_insensitive(base: &Path, relative: &str) -> Result<Option<PathBuf>, Error> {
    let segments = logical_segments(relative)?;

    let Some((file, dirs)) = segments.split_last() else {
        return Err(Error::InvalidCandidate {
            candidate: relative.to_string(),
            reason: "empty path",
        });
    };

    return search(base, dirs, file);
}

/// Depth-first search through every case-insensitive match of each directory
/// segment, exact-case entries first, until `file` is found.
fn search(dir: &Path, dirs: &[&str], file: &str) -> Result<Option<PathBuf>, Error> {
    let Some((next, rest)) = dirs.split_first() else {
        return Ok(matching_entries(dir, file, false)?.into_iter().next());
    };

    for candidate in matching_entries(dir, next, true)? {
        if let Some(found) = search(&candidate, rest, file)? {
            return Ok(Some(found));
        }
    }
    return Ok(None);
}

/// Split a logical path into its segments, rejecting anything that could escape.
fn logical_segments(relative: &str) -> Result<Vec<&str>, Error> {
    let path = Path::new(relative);
    let invalid = |reason| {
        return Error::InvalidCandidate {
            candidate: relative.to_string(),
            reason,
        };
    };

    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => {
                segments.push(segment.to_str().ok_or_else(|| return invalid("not utf-8"))?);
            },
            Component::CurDir | Component::ParentDir => return Err(invalid("relative segment")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("absolute path")),
        }
    }
    return Ok(segments);
}

/// Entries of `dir` named `name` ignoring ASCII case, of the wanted kind.
/// The exact-case entry, if any, comes first.
fn matching_entries(dir: &Path, name: &str, want_dir: bool) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Some(entry_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !entry_name.eq_ignore_ascii_case(name) || !is_kind(&entry.path(), want_dir) {
            continue;
        }
        if entry_name == name {
            matches.insert(0, entry.path());
        } else {
            matches.push(entry.path());
        }
    }
    return Ok(matches);
}

fn is_kind(path: &Path, want_dir: bool) -> bool {
    return if want_dir { path.is_dir() } else { path.is_file() };
}

/// Files under `base` with one of `exts`, as (slash-separated path without
/// extension, absolute path). Unreadable entries are skipped.
pub(crate) fn files_with_extension(base: &Path, exts: &[&str]) -> Vec<(String, PathBuf)> {
    if !base.is_dir() {
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(base).into_iter() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(base = %base.display(), error = %e, "skipping unreadable entry");
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let has_ext = path
            .extension()
            .and_then(|e| return e.to_str())
            .is_some_and(|e| return exts.iter().any(|want| return e.eq_ignore_ascii_case(want)));
        if !has_ext {
            continue;
        }
        let Some(relative) = relative_logical_path(base, path) else {
            continue;
        };
        files.push((relative, path.to_path_buf()));
    }
    return files;
}

/// `base/a/b/c.ext` → `a/b/c`, always with forward slashes.
fn relative_logical_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?.with_extension("");
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| return c.as_os_str().to_str())
        .collect();
    return Some(parts?.join("/"));
}
