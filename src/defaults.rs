//! Default values for slnforge configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// File name of the per-tree settings file.
pub const DEFAULT_CONFIG_FILENAME: &str = ".slnforge.yaml";

/// Environment variable that points at an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "SLNFORGE_CONFIG";

/// File extensions recognized as project manifests.
///
/// The set is fixed rather than configurable: the parser only understands the
/// MSBuild 2003 dialect these three share.
pub const MANIFEST_EXTENSIONS: [&str; 3] = ["csproj", "vbproj", "fsproj"];

/// Directory names skipped during scans unless overridden in settings.
pub const DEFAULT_IGNORE_DIRS: [&str; 5] = [".git", ".vs", ".svn", "bin", "obj"];

/// How many reference hops are followed when pulling transitive references
/// into a solution.
pub const DEFAULT_REFERENCE_DEPTH: usize = 6;

/// Name of the synthetic top-level solution folder holding pulled references.
pub const REFERENCES_FOLDER: &str = "references";

/// Returns the user-level settings file location.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/slnforge/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/slnforge/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\slnforge\config.yaml`
///
/// Falls back to `.slnforge.yaml` in the current directory if the platform
/// config directory cannot be determined.
///
/// A settings file in the scan root, or one named by the `--config` flag or
/// the `SLNFORGE_CONFIG` environment variable, takes precedence.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("slnforge").join("config.yaml"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}
