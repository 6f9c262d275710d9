//! # Configuration Schema and Parsing
//!
//! This module defines the `.slnforge.yaml` settings file and the logic for
//! locating and parsing it. The file is optional; every key has a default,
//! and an absent file simply means defaults everywhere.
//!
//! ## Keys
//!
//! - **`ignore`**: directory name globs skipped while scanning.
//! - **`simplify`**: whether scan output collapses single-project folders
//!   and skips pass-through folders.
//! - **`reference-depth`**: how many reference hops `new` follows from each
//!   requested project.
//! - **`include-references`**: whether referenced projects are pulled into
//!   assembled solutions at all.
//!
//! ## Resolution
//!
//! `resolve` looks for settings in this order: an explicit `--config` path,
//! the `SLNFORGE_CONFIG` environment variable, `.slnforge.yaml` in the scan
//! root, the platform config directory, and finally built-in defaults. An
//! explicitly named file that fails to load is a hard error; the fallback
//! locations are only consulted when the earlier ones are absent.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::defaults::{self, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILENAME};
use crate::error::{Error, Result};
use crate::scanner::ScanOptions;
use crate::solution::AssembleOptions;

/// Settings loaded from `.slnforge.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory name globs to skip while scanning.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Whether to collapse and skip noise folders in scan output.
    #[serde(default = "default_simplify")]
    pub simplify: bool,

    /// How many reference hops to follow when assembling a solution.
    #[serde(default = "default_reference_depth", rename = "reference-depth")]
    pub reference_depth: usize,

    /// Whether referenced projects are pulled into assembled solutions.
    #[serde(default = "default_include_references", rename = "include-references")]
    pub include_references: bool,
}

impl Settings {
    /// Scan options carrying these settings.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            ignore: self.ignore.clone(),
            simplify: self.simplify,
        }
    }

    /// Assembly options carrying these settings, mirrored against `root`.
    pub fn assemble_options(&self, root: &Path) -> AssembleOptions {
        let mut options = AssembleOptions::new(root);
        options.include_references = self.include_references;
        options.reference_depth = self.reference_depth;
        options
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
            simplify: default_simplify(),
            reference_depth: default_reference_depth(),
            include_references: default_include_references(),
        }
    }
}

fn default_ignore() -> Vec<String> {
    defaults::DEFAULT_IGNORE_DIRS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_simplify() -> bool {
    true
}

/// Get the default reference depth for solution assembly
///
/// # Examples
///
/// ```
/// use slnforge::config::default_reference_depth;
///
/// assert_eq!(default_reference_depth(), 6);
/// ```
pub fn default_reference_depth() -> usize {
    defaults::DEFAULT_REFERENCE_DEPTH
}

fn default_include_references() -> bool {
    true
}

/// Parses a YAML string into `Settings`.
///
/// An empty or whitespace-only document yields the defaults. Unknown keys or
/// mistyped values are reported with a hint listing the valid keys.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    if yaml_content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|err| Error::ConfigParse {
        message: err.to_string(),
        hint: Some(
            "valid keys: ignore, simplify, reference-depth, include-references".to_string(),
        ),
    })
}

/// Parse `Settings` from a YAML file path
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Locate and load settings for a scan rooted at `root`.
pub fn resolve(explicit: Option<&Path>, root: &Path) -> Result<Settings> {
    if let Some(path) = explicit {
        return from_file(path);
    }
    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            return from_file(Path::new(&env_path));
        }
    }
    let local = root.join(DEFAULT_CONFIG_FILENAME);
    if local.is_file() {
        return from_file(&local);
    }
    let global = defaults::default_config_path();
    if global.is_file() {
        return from_file(&global);
    }
    Ok(Settings::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_empty_yields_defaults() {
        let settings = parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.simplify);
        assert!(settings.include_references);
        assert_eq!(settings.reference_depth, 6);
        assert!(settings.ignore.iter().any(|p| p == "bin"));
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
ignore:
  - node_modules
  - "packages*"
simplify: false
reference-depth: 2
include-references: false
"#;
        let settings = parse(yaml).unwrap();
        assert_eq!(settings.ignore, vec!["node_modules", "packages*"]);
        assert!(!settings.simplify);
        assert_eq!(settings.reference_depth, 2);
        assert!(!settings.include_references);
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let settings = parse("reference-depth: 3\n").unwrap();
        assert_eq!(settings.reference_depth, 3);
        assert!(settings.simplify);
        assert!(settings.include_references);
        assert_eq!(settings.ignore, Settings::default().ignore);
    }

    #[test]
    fn test_parse_bad_value_reports_hint() {
        let err = parse("simplify: sideways\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Configuration parsing error"));
        assert!(message.contains("hint:"));
        assert!(message.contains("reference-depth"));
    }

    #[test]
    fn test_parse_unknown_key_is_rejected() {
        let err = parse("depth: 3\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("depth"));
        assert!(message.contains("hint:"));
    }

    #[test]
    fn test_from_file_nonexistent() {
        let result = from_file("nonexistent_file.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_options_carry_settings() {
        let yaml = "ignore: [vendor]\nsimplify: false\n";
        let settings = parse(yaml).unwrap();
        let options = settings.scan_options();
        assert_eq!(options.ignore, vec!["vendor"]);
        assert!(!options.simplify);
    }

    #[test]
    fn test_assemble_options_carry_settings() {
        let settings = parse("reference-depth: 1\ninclude-references: false\n").unwrap();
        let options = settings.assemble_options(Path::new("/work"));
        assert_eq!(options.root, Path::new("/work"));
        assert_eq!(options.reference_depth, 1);
        assert!(!options.include_references);
    }

    #[test]
    #[serial]
    fn test_resolve_prefers_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let explicit = temp.path().join("custom.yaml");
        std::fs::write(&explicit, "reference-depth: 9\n").unwrap();
        std::fs::write(temp.path().join(DEFAULT_CONFIG_FILENAME), "reference-depth: 1\n").unwrap();

        let settings = resolve(Some(&explicit), temp.path()).unwrap();
        assert_eq!(settings.reference_depth, 9);
    }

    #[test]
    #[serial]
    fn test_resolve_explicit_missing_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let result = resolve(Some(Path::new("/no/such/file.yaml")), temp.path());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_reads_env_var() {
        let temp = tempfile::tempdir().unwrap();
        let env_config = temp.path().join("from-env.yaml");
        std::fs::write(&env_config, "simplify: false\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, &env_config);
        let settings = resolve(None, temp.path());
        std::env::remove_var(CONFIG_ENV_VAR);

        assert!(!settings.unwrap().simplify);
    }

    #[test]
    #[serial]
    fn test_resolve_finds_root_local_file() {
        let temp = tempfile::tempdir().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        std::fs::write(
            temp.path().join(DEFAULT_CONFIG_FILENAME),
            "reference-depth: 4\n",
        )
        .unwrap();

        let settings = resolve(None, temp.path()).unwrap();
        assert_eq!(settings.reference_depth, 4);
    }

    #[test]
    #[serial]
    fn test_resolve_falls_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);
        let settings = resolve(None, temp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
