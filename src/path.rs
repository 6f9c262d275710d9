//! Path manipulation utilities for slnforge
//!
//! Project manifests reference each other with Windows-style relative paths
//! (`..\Lib\Lib.csproj`), and solution files expect the same flavor back.
//! Everything here is lexical: no function in this module touches the
//! filesystem, so unresolvable `..` chains and case differences are handled
//! deterministically.

use std::path::{Component, Path, PathBuf};

use glob::Pattern;

use crate::error::{Error, Result};

/// Build the repository key for a manifest path.
///
/// Keys are separator-normalized and lowercased so that `Lib\Lib.csproj` and
/// `lib/lib.csproj` identify the same project regardless of how a reference
/// spelled them.
pub fn normalize_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// A `..` that would climb above the root of an absolute path is dropped;
/// on a relative path it is preserved.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a manifest `Include` value against the directory containing the
/// manifest.
///
/// Includes are backslash-tolerant and resolved lexically, so a reference to
/// a file that does not exist still yields a well-formed path (it will later
/// surface as a broken reference rather than an error here).
pub fn resolve_relative(base_dir: &Path, include: &str) -> PathBuf {
    let include = include.replace('\\', "/");
    normalize_lexically(&base_dir.join(include))
}

/// Render `target` relative to `base_dir` using backslash separators.
///
/// Components are compared case-insensitively. The result never carries a
/// leading `.\`; a target outside `base_dir` is reached through `..`
/// components, and a target sharing no prefix at all falls back to the full
/// target path with backslashes.
pub fn windows_relative(target: &Path, base_dir: &Path) -> String {
    let target = normalize_lexically(target);
    let base = normalize_lexically(base_dir);
    let target_parts: Vec<String> = target
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let base_parts: Vec<String> = base
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let mut common = 0;
    while common < target_parts.len() && common < base_parts.len() {
        if target_parts[common].to_lowercase() != base_parts[common].to_lowercase() {
            break;
        }
        common += 1;
    }
    if common == 0 {
        return target.to_string_lossy().replace('/', "\\");
    }

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..base_parts.len() {
        parts.push("..");
    }
    for part in &target_parts[common..] {
        parts.push(part);
    }
    if parts.is_empty() {
        return ".".to_string();
    }
    parts.join("\\")
}

/// Directory component names between `root` and the manifest at
/// `manifest_path`.
///
/// Returns `None` when the manifest does not live under `root`; an empty
/// vector means the manifest sits directly in `root`.
pub fn folder_chain(root: &Path, manifest_path: &Path) -> Option<Vec<String>> {
    let root = normalize_lexically(root);
    let dir = normalize_lexically(manifest_path.parent()?);
    let rel = dir.strip_prefix(&root).ok()?;
    Some(
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect(),
    )
}

/// Compile a set of glob patterns, surfacing the first invalid one.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Error::Glob))
        .collect()
}
