//! # Tree Scanner
//!
//! Walks a directory tree looking for project manifests and produces a
//! simplified folder tree for browsing. Two entry points are provided:
//!
//! - `Scanner::scan` builds a `FolderNode` hierarchy mirroring the directory
//!   layout, with noise folders simplified away so large trees stay
//!   navigable.
//! - `discover` registers every manifest under a root without building a
//!   tree, which is all the flat commands (`ls`, `check`, `new`) need.
//!
//! ## Behavior
//!
//! Scanning recurses post-order and fans out across subdirectories with
//! rayon. Every manifest found is registered in the shared
//! `ProjectRepository`; registration is the only shared-state interaction,
//! so sibling subtrees never contend with each other. Directories whose name
//! matches an ignore pattern are skipped entirely, unreadable directories
//! are logged and treated as empty, and a `CancelFlag` checked at every
//! recursion step lets a caller abandon a long scan with
//! `Error::ScanCancelled`.
//!
//! Simplification runs per folder until nothing changes: a child folder
//! holding exactly one project and no subfolders is collapsed (its project
//! hoisted up), and a folder with no projects of its own and a single child
//! folder adopts that child's contents. Empty folders are always pruned,
//! simplification or not; the scan root is the one folder that survives
//! empty. Children end up sorted by name, case-insensitively, with the
//! exact name breaking ties.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::defaults::DEFAULT_IGNORE_DIRS;
use crate::error::{Error, Result};
use crate::fsio::{self, DiskFs, FsRead};
use crate::path::compile_patterns;
use crate::repository::{Project, ProjectRepository};

/// Options controlling a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Glob patterns matched (case-insensitively) against directory names.
    pub ignore: Vec<String>,
    /// Whether to collapse and skip noise folders.
    pub simplify: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            simplify: true,
        }
    }
}

/// Shared cancellation handle. Cloning yields a handle to the same flag.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The scan notices at its next recursion step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Callback receiving the cumulative number of projects discovered so far.
pub type ProgressFn = Box<dyn Fn(usize) + Send + Sync>;

/// A folder in the scanned tree: subfolders plus the projects found inside.
#[derive(Debug)]
pub struct FolderNode {
    pub name: String,
    pub path: PathBuf,
    pub folders: Vec<FolderNode>,
    pub projects: Vec<Arc<Project>>,
}

impl FolderNode {
    fn empty(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path: path.to_path_buf(),
            folders: Vec::new(),
            projects: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.projects.is_empty()
    }

    /// Total number of projects in this folder and below.
    pub fn project_count(&self) -> usize {
        self.projects.len()
            + self
                .folders
                .iter()
                .map(FolderNode::project_count)
                .sum::<usize>()
    }

    /// Total number of folders below this one.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
            + self
                .folders
                .iter()
                .map(FolderNode::folder_count)
                .sum::<usize>()
    }

    /// Collapse and skip noise folders until nothing changes.
    fn simplify(&mut self) {
        loop {
            let mut changed = false;

            // Collapse: hoist the project out of any child folder that holds
            // exactly one project and no subfolders.
            let mut kept = Vec::with_capacity(self.folders.len());
            for folder in self.folders.drain(..) {
                if folder.folders.is_empty() && folder.projects.len() == 1 {
                    self.projects.extend(folder.projects);
                    changed = true;
                } else {
                    kept.push(folder);
                }
            }
            self.folders = kept;

            // Skip: while this folder holds no projects and a single child
            // folder, adopt that child's contents.
            while self.projects.is_empty() && self.folders.len() == 1 {
                if let Some(child) = self.folders.pop() {
                    self.projects = child.projects;
                    self.folders = child.folders;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Case-insensitive name order, exact name as the tie-break.
    fn sort(&mut self) {
        self.folders.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        self.projects.sort_by(|a, b| {
            a.display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase())
                .then_with(|| a.display_name().cmp(b.display_name()))
        });
    }
}

/// Recursive tree scanner bound to a repository.
pub struct Scanner<'a> {
    repo: &'a ProjectRepository,
    fs: Box<dyn FsRead>,
    options: ScanOptions,
    cancel: CancelFlag,
    progress: Option<ProgressFn>,
    discovered: AtomicUsize,
    warnings: AtomicUsize,
}

impl<'a> Scanner<'a> {
    /// Scanner over the real filesystem with default options.
    pub fn new(repo: &'a ProjectRepository) -> Self {
        Self {
            repo,
            fs: Box::new(DiskFs),
            options: ScanOptions::default(),
            cancel: CancelFlag::new(),
            progress: None,
            discovered: AtomicUsize::new(0),
            warnings: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn with_fs(repo: &'a ProjectRepository, fs: Box<dyn FsRead>) -> Self {
        Self {
            repo,
            fs,
            options: ScanOptions::default(),
            cancel: CancelFlag::new(),
            progress: None,
            discovered: AtomicUsize::new(0),
            warnings: AtomicUsize::new(0),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scan `root` into a folder tree.
    ///
    /// Returns `Ok(None)` when the root does not exist and
    /// `Err(Error::ScanCancelled)` when the cancel flag was raised mid-scan.
    /// The root folder itself is always materialized, even when nothing was
    /// found beneath it.
    pub fn scan(&self, root: &Path) -> Result<Option<FolderNode>> {
        if !self.fs.dir_exists(root) {
            return Ok(None);
        }
        let patterns = compile_patterns(&self.options.ignore)?;
        self.discovered.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        let tree = self.scan_dir(root, &patterns)?;
        Ok(Some(tree.unwrap_or_else(|| FolderNode::empty(root))))
    }

    /// Number of directories skipped as unreadable during the last scan.
    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    fn scan_dir(&self, dir: &Path, patterns: &[Pattern]) -> Result<Option<FolderNode>> {
        if self.cancel.is_cancelled() {
            return Err(Error::ScanCancelled);
        }

        let manifests = match self.fs.list_manifests(dir) {
            Ok(manifests) => manifests,
            Err(err) => {
                log::warn!("skipping unreadable directory {}: {}", dir.display(), err);
                self.warnings.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
        };
        let mut projects = Vec::with_capacity(manifests.len());
        for manifest in &manifests {
            projects.push(self.repo.register(manifest)?);
        }
        if !projects.is_empty() {
            let total =
                self.discovered.fetch_add(projects.len(), Ordering::Relaxed) + projects.len();
            if let Some(progress) = &self.progress {
                progress(total);
            }
        }

        let subdirs = match self.fs.list_subdirs(dir) {
            Ok(subdirs) => subdirs,
            Err(err) => {
                log::warn!("skipping unreadable directory {}: {}", dir.display(), err);
                self.warnings.fetch_add(1, Ordering::Relaxed);
                Vec::new()
            }
        };
        let children: Vec<Option<FolderNode>> = subdirs
            .par_iter()
            .filter(|subdir| !is_ignored(subdir, patterns))
            .map(|subdir| self.scan_dir(subdir, patterns))
            .collect::<Result<_>>()?;

        let mut node = FolderNode::empty(dir);
        node.projects = projects;
        node.folders = children.into_iter().flatten().collect();
        if self.options.simplify {
            node.simplify();
        }
        node.sort();

        if node.is_empty() {
            return Ok(None);
        }
        Ok(Some(node))
    }
}

fn is_ignored(dir: &Path, patterns: &[Pattern]) -> bool {
    let name = match dir.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(&name, options))
}

/// Register every manifest under `root` without building a tree.
///
/// Honors the same ignore patterns as `Scanner::scan`. Unreadable entries
/// are logged and skipped. Returns the number of manifests encountered.
pub fn discover(root: &Path, options: &ScanOptions, repo: &ProjectRepository) -> Result<usize> {
    let patterns = compile_patterns(&options.ignore)?;
    let mut count = 0;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir() && is_ignored(entry.path(), &patterns))
        });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && fsio::is_manifest(entry.path()) {
            repo.register(entry.path())?;
            count += 1;
        }
    }
    Ok(count)
}
