//! # Filesystem Access Seam
//!
//! The tree scanner and project repository never touch `std::fs` directly;
//! they go through the `FsRead` trait defined here. This keeps directory
//! enumeration and manifest reads behind a narrow interface that tests can
//! replace with in-memory fakes, enabling the simulation of unreadable
//! directories, slow trees, and cancellation mid-walk without touching the
//! real filesystem.
//!
//! The production implementation is `DiskFs`, a thin wrapper over `std::fs`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::MANIFEST_EXTENSIONS;
use crate::error::Result;

/// Trait for directory reads - allows mocking in tests
pub trait FsRead: Send + Sync {
    /// Whether `path` exists and is a directory.
    fn dir_exists(&self, path: &Path) -> bool;

    /// Immediate subdirectories of `dir`, in directory order (unsorted).
    fn list_subdirs(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Project manifests directly inside `dir` (non-recursive).
    fn list_manifests(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Full contents of the file at `path`.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Whether `path` carries one of the recognized manifest extensions.
///
/// The comparison is case-insensitive (`Lib.CSPROJ` is a manifest).
pub fn is_manifest(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            MANIFEST_EXTENSIONS.iter().any(|known| *known == ext)
        }
        None => false,
    }
}

/// The default `FsRead` implementation backed by the host filesystem.
pub struct DiskFs;

impl FsRead for DiskFs {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_subdirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                subdirs.push(entry.path());
            }
        }
        Ok(subdirs)
    }

    fn list_manifests(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut manifests = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && is_manifest(&path) {
                manifests.push(path);
            }
        }
        Ok(manifests)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}
