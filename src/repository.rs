//! # Project Repository
//!
//! This module provides the `ProjectRepository`, the single source of truth
//! for every project manifest known to the application. Scanners register
//! paths as they walk the tree; assemblers and commands look projects up by
//! path or name. The repository is explicitly constructed by its caller and
//! passed by reference wherever project identity matters, so two components
//! holding the same repository are guaranteed to agree on which `Project` a
//! path maps to.
//!
//! ## Design
//!
//! Every project moves through a two-phase lifecycle:
//!
//! 1. **Registered**: `register` creates a placeholder entry keyed by the
//!    case-insensitive normalized path. Registration is cheap and happens
//!    during tree walks; no file contents are read. Concurrent registrations
//!    of the same path yield the same `Arc<Project>`.
//!
//! 2. **Loaded**: `load_all` parses every pending manifest in parallel.
//!    Parsing happens at most once per project regardless of how many
//!    threads race into it; a failed parse is recorded in that project's
//!    `load_errors` and is terminal. Loading never aborts the batch.
//!
//! After loading, `resolve_broken_references` marks the project references
//! whose target path was never registered, which is how dangling references
//! in large trees are surfaced without touching the filesystem again.
//!
//! All file access goes through the `FsRead` seam so tests can drive the
//! repository against an in-memory tree.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::fsio::FsRead;
use crate::manifest::{self, ProjectData};
use crate::path::normalize_key;

/// A single known project: its manifest path plus lazily loaded contents.
#[derive(Debug)]
pub struct Project {
    path: PathBuf,
    name: String,
    data: OnceLock<ProjectData>,
    load_errors: OnceLock<Vec<String>>,
    broken_references: OnceLock<Vec<PathBuf>>,
}

impl Project {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            data: OnceLock::new(),
            load_errors: OnceLock::new(),
            broken_references: OnceLock::new(),
        }
    }

    /// The manifest path as it was first registered.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manifest file stem. Available before the manifest is parsed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Preferred display name: the assembly name once loaded, the file stem
    /// until then (and forever, for projects that failed to load).
    pub fn display_name(&self) -> &str {
        self.data
            .get()
            .map(|data| data.assembly_name.as_str())
            .unwrap_or(&self.name)
    }

    /// Whether a load has been attempted, successfully or not.
    pub fn is_loaded(&self) -> bool {
        self.load_errors.get().is_some()
    }

    /// Parsed manifest contents. `None` until loaded, and `None` forever for
    /// a project whose manifest failed to parse.
    pub fn data(&self) -> Option<&ProjectData> {
        self.data.get()
    }

    /// Errors recorded while loading this project. Empty for placeholders
    /// and for successfully loaded projects.
    pub fn load_errors(&self) -> &[String] {
        self.load_errors.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Project references whose target is not registered in the repository.
    /// Empty until `resolve_broken_references` has run.
    pub fn broken_references(&self) -> &[PathBuf] {
        self.broken_references
            .get()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parse the manifest unless a load has already been attempted.
    ///
    /// Exactly one caller performs the parse; concurrent callers block until
    /// the outcome is decided. A failed parse is terminal: the error stays
    /// recorded and later calls do not retry.
    fn ensure_loaded(&self, fs: &dyn FsRead) {
        self.load_errors.get_or_init(|| {
            let parsed = fs
                .read_to_string(&self.path)
                .and_then(|xml| manifest::parse(&self.path, &xml));
            match parsed {
                Ok(data) => {
                    let _ = self.data.set(data);
                    Vec::new()
                }
                Err(err) => {
                    log::debug!("failed to load {}: {}", self.path.display(), err);
                    vec![err.to_string()]
                }
            }
        });
    }
}

/// Keyed store of every known project.
pub struct ProjectRepository {
    projects: Mutex<HashMap<String, Arc<Project>>>,
}

impl ProjectRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            projects: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<Project>>>> {
        self.projects.lock().map_err(|_| Error::LockPoisoned {
            context: "project repository".to_string(),
        })
    }

    /// Register a manifest path, returning the canonical handle for it.
    ///
    /// Keys are case-insensitive and separator-normalized, so every spelling
    /// of the same path maps to one `Project`. The insert-if-absent happens
    /// under a single lock acquisition; concurrent callers racing on a new
    /// path observe the same placeholder.
    pub fn register(&self, path: &Path) -> Result<Arc<Project>> {
        let key = normalize_key(path);
        let mut projects = self.lock()?;
        let project = projects
            .entry(key)
            .or_insert_with(|| Arc::new(Project::new(path.to_path_buf())));
        Ok(Arc::clone(project))
    }

    /// Look up a path without registering it.
    pub fn get(&self, path: &Path) -> Result<Option<Arc<Project>>> {
        let projects = self.lock()?;
        Ok(projects.get(&normalize_key(path)).cloned())
    }

    /// Whether a path is registered.
    pub fn contains(&self, path: &Path) -> Result<bool> {
        let projects = self.lock()?;
        Ok(projects.contains_key(&normalize_key(path)))
    }

    /// Number of registered projects.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether no projects are registered.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Snapshot of every registered project, sorted by path so iteration
    /// order is deterministic.
    pub fn projects(&self) -> Result<Vec<Arc<Project>>> {
        let projects = self.lock()?;
        let mut all: Vec<Arc<Project>> = projects.values().cloned().collect();
        drop(projects);
        all.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(all)
    }

    /// Parse every manifest that has not been loaded yet, in parallel.
    ///
    /// Per-project failures are recorded on the project rather than aborting
    /// the batch. Calling this again is a no-op for already loaded entries.
    pub fn load_all(&self, fs: &dyn FsRead) -> Result<()> {
        let pending: Vec<Arc<Project>> = self
            .projects()?
            .into_iter()
            .filter(|project| !project.is_loaded())
            .collect();
        log::debug!("loading {} pending manifests", pending.len());
        pending
            .par_iter()
            .for_each(|project| project.ensure_loaded(fs));
        Ok(())
    }

    /// Mark which project references point outside the repository.
    ///
    /// Run once after all registration and loading is complete. Each loaded
    /// project's `broken_references` becomes the subset of its references
    /// whose normalized path is not a registered key.
    pub fn resolve_broken_references(&self) -> Result<()> {
        let keys: HashSet<String> = self.lock()?.keys().cloned().collect();
        for project in self.projects()? {
            let broken = match project.data() {
                Some(data) => data
                    .project_references
                    .iter()
                    .filter(|target| !keys.contains(&normalize_key(target)))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            let _ = project.broken_references.set(broken);
        }
        Ok(())
    }

    /// Resolve a user-supplied selector to matching projects.
    ///
    /// A selector is tried as a path first: absolute, or relative to `root`.
    /// Failing that, it matches any project whose file stem or assembly name
    /// equals it case-insensitively. All matches are returned; the caller
    /// decides how to treat none or several.
    pub fn find(&self, root: &Path, selector: &str) -> Result<Vec<Arc<Project>>> {
        let normalized = selector.replace('\\', "/");
        let as_path = if Path::new(&normalized).is_absolute() {
            PathBuf::from(&normalized)
        } else {
            root.join(&normalized)
        };
        if let Some(project) = self.get(&as_path)? {
            return Ok(vec![project]);
        }

        let needle = selector.to_lowercase();
        Ok(self
            .projects()?
            .into_iter()
            .filter(|project| {
                project.name().to_lowercase() == needle
                    || project.display_name().to_lowercase() == needle
            })
            .collect())
    }
}

impl Default for ProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}
