//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest("App/App.csproj", manifests::GUID_APP, &[]);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest fixtures for testing.
#[allow(dead_code)]
pub mod manifests {
    pub const GUID_APP: &str = "AAAAAAAA-0000-0000-0000-000000000001";
    pub const GUID_LIB: &str = "BBBBBBBB-0000-0000-0000-000000000002";
    pub const GUID_CORE: &str = "CCCCCCCC-0000-0000-0000-000000000003";

    /// Manifest body that fails XML parsing.
    pub const MALFORMED: &str = "<Project><PropertyGroup>";

    /// Render a valid project manifest.
    ///
    /// `references` are written verbatim into `ProjectReference` items, so
    /// pass them with backslashes the way real manifests carry them.
    pub fn csproj(guid: &str, assembly: &str, references: &[&str]) -> String {
        let reference_items: String = references
            .iter()
            .map(|target| format!("    <ProjectReference Include=\"{target}\" />\n"))
            .collect();
        format!(
            r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <ProjectGuid>{{{guid}}}</ProjectGuid>
    <OutputType>Library</OutputType>
    <AssemblyName>{assembly}</AssemblyName>
  </PropertyGroup>
  <ItemGroup>
{reference_items}  </ItemGroup>
</Project>"#
        )
    }
}

/// A test fixture that provides a temporary project tree.
///
/// This struct simplifies the common pattern of creating a temp directory
/// and populating it with project manifests and a `.slnforge.yaml` settings
/// file.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest("libs/Lib/Lib.csproj", manifests::GUID_LIB, &[])
///     .with_settings("simplify: false");
///
/// fixture.command().arg("scan").arg(".").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.slnforge.yaml` settings file with the given content.
    #[allow(dead_code)]
    pub fn with_settings(self, content: &str) -> Self {
        self.temp_dir
            .child(".slnforge.yaml")
            .write_str(content)
            .expect("Failed to write settings file");
        self
    }

    /// Add a valid project manifest at the given relative path.
    ///
    /// The assembly name is the manifest's file stem.
    pub fn with_manifest(self, path: &str, guid: &str, references: &[&str]) -> Self {
        let assembly = Path::new(path)
            .file_stem()
            .expect("manifest path has a file stem")
            .to_string_lossy()
            .into_owned();
        let content = manifests::csproj(guid, &assembly, references);
        self.with_file(path, &content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the settings file.
    #[allow(dead_code)]
    pub fn settings_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".slnforge.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("slnforge").expect("binary builds");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_settings() {
        let fixture = TestFixture::new().with_settings("simplify: false");
        assert!(fixture.settings_path().exists());
    }

    #[test]
    fn test_fixture_manifests_parse() {
        let fixture = TestFixture::new().with_manifest(
            "libs/Lib/Lib.csproj",
            manifests::GUID_LIB,
            &["..\\Core\\Core.csproj"],
        );

        let path = fixture.path().join("libs/Lib/Lib.csproj");
        let content = std::fs::read_to_string(&path).unwrap();
        let data = slnforge::manifest::parse(&path, &content).unwrap();
        assert_eq!(data.assembly_name, "Lib");
        assert_eq!(data.project_references.len(), 1);
    }

    #[test]
    fn test_malformed_manifest_fails_to_parse() {
        let result =
            slnforge::manifest::parse(Path::new("/x/Bad.csproj"), manifests::MALFORMED);
        assert!(result.is_err());
    }
}
