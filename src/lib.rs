//! # slnforge Library
//!
//! This library provides the core functionality for assembling ad-hoc Visual
//! Studio solutions out of large project trees. It is designed to be used by
//! the `slnforge` command-line tool but can also be integrated into other
//! applications that need to discover MSBuild-dialect projects and stitch
//! them into `.sln` files.
//!
//! ## Quick Example
//!
//! ```
//! use slnforge::manifest;
//! use slnforge::solution::{render, Solution};
//! use std::path::Path;
//!
//! // Parse a project manifest
//! let xml = r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
//!   <PropertyGroup>
//!     <ProjectGuid>{9A19103F-16F7-4668-BE54-9A1E7A4F7556}</ProjectGuid>
//!     <AssemblyName>CoreLib</AssemblyName>
//!   </PropertyGroup>
//! </Project>"#;
//! let path = Path::new("/work/CoreLib/CoreLib.csproj");
//! let data = manifest::parse(path, xml).unwrap();
//! assert_eq!(data.assembly_name, "CoreLib");
//!
//! // Build a solution and render it as .sln text
//! let mut solution = Solution::new();
//! let root = solution.root();
//! solution.insert_project(root, data.id, &data.assembly_name, path).unwrap();
//! let text = render(Path::new("/work/ad-hoc.sln"), &solution);
//! assert!(text.contains("CoreLib\\CoreLib.csproj"));
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Manifest Parsing (`manifest`)**: Reads the MSBuild-dialect XML of a
//!   single `.csproj`/`.vbproj`/`.fsproj` file into `ProjectData` without
//!   evaluating any build logic.
//! - **Project Repository (`repository`)**: The single source of truth for
//!   every known project, keyed by normalized path, with a two-phase
//!   register-then-load lifecycle safe under parallel scanning.
//! - **Tree Scanning (`scanner`)**: Walks a directory tree in parallel,
//!   registers every manifest it finds, and produces a simplified folder
//!   tree for browsing.
//! - **Solution Assembly (`solution`)**: An arena-backed solution tree that
//!   grows by adding projects plus their bounded transitive references, and
//!   serializes deterministically into `.sln` text.
//! - **Configuration (`config`)**: The optional `.slnforge.yaml` settings
//!   file controlling ignore patterns, simplification, and reference depth.
//!
//! ## Execution Flow
//!
//! A typical assembly run executes the following high-level steps:
//!
//! 1.  **Discovery**: Walk the scan root and register every manifest path.
//! 2.  **Loading**: Parse all registered manifests in parallel; per-project
//!     failures are recorded, never fatal.
//! 3.  **Resolution**: Mark project references whose target was never
//!     registered as broken.
//! 4.  **Assembly**: Add the requested projects to a solution, pulling their
//!     transitive references underneath a synthetic `references` folder.
//! 5.  **Writing**: Serialize the solution to disk as a `.sln` file with
//!     byte-identical output across repeated runs.
//!
//! By separating discovery, loading, and assembly, the library keeps tree
//! walking cheap and defers XML parsing until a command actually needs
//! project contents.

pub mod config;
pub mod defaults;
pub mod error;
pub mod fsio;
pub mod manifest;
pub mod output;
pub mod path;
pub mod repository;
pub mod scanner;
pub mod solution;
pub mod suggestions;

#[cfg(test)]
mod path_proptest;
