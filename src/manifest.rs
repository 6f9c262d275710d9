//! # Project Manifest Parsing
//!
//! This module parses MSBuild-dialect project manifests (`.csproj`,
//! `.vbproj`, `.fsproj`) into `ProjectData`. Parsing is a pure function of
//! the file contents: the parser never touches the filesystem, so reference
//! paths are resolved lexically and targets that do not exist surface later
//! as broken references instead of parse errors.
//!
//! ## Key Components
//!
//! - **`ProjectData`**: Everything the rest of the application needs from a
//!   manifest: the project identifier, assembly name, output kind and
//!   computed artifact path, source-control binding, and both kinds of
//!   references.
//!
//! - **`OutputKind`**: Whether the project builds an executable or a
//!   library, which also decides the artifact extension.
//!
//! - **`parse`**: The entry point. Walks the document once with a streaming
//!   XML reader, capturing the first occurrence of each scalar field at any
//!   nesting depth and enumerating every reference element.
//!
//! ## Tolerance
//!
//! Manifests in the wild are written by several generations of tooling, so
//! the parser is deliberately lenient: scalar fields may appear anywhere,
//! unknown elements are ignored, reference `Include` paths may use either
//! separator, and `ProjectGuid` values may be braced or bare. The two hard
//! requirements are a `Project` root carrying the MSBuild 2003 namespace
//! and a parseable `ProjectGuid`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::path::resolve_relative;

/// The XML namespace a recognized manifest must declare on its root element.
pub const MSBUILD_XMLNS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// What a project builds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A library (`.dll`). The default for every `OutputType` except `WinExe`.
    Library,
    /// A windowed executable (`.exe`). Only `OutputType` `WinExe` maps here;
    /// console `Exe` projects are treated as libraries for artifact purposes.
    Executable,
}

impl OutputKind {
    /// File extension of the built artifact.
    pub fn extension(self) -> &'static str {
        match self {
            OutputKind::Library => "dll",
            OutputKind::Executable => "exe",
        }
    }
}

/// Everything extracted from a single project manifest.
#[derive(Debug, Clone)]
pub struct ProjectData {
    /// The `ProjectGuid` declared by the manifest.
    pub id: Uuid,
    /// `AssemblyName`, falling back to the manifest file stem when the
    /// element is absent or blank.
    pub assembly_name: String,
    /// Executable or library.
    pub output_kind: OutputKind,
    /// Computed build artifact: `{manifest dir}/{OutputPath}/{assembly
    /// name}.{ext}`. `None` when the manifest declares no `OutputPath`.
    pub output_file: Option<PathBuf>,
    /// Whether the manifest carries a non-empty `SccProjectName`.
    pub scc_bound: bool,
    /// `ProjectReference` targets resolved against the manifest directory.
    pub project_references: Vec<PathBuf>,
    /// Assembly `Reference` names: the `Include` truncated at the first
    /// comma and lowercased. The set keeps them deduplicated and ordered.
    pub external_references: BTreeSet<String>,
}

/// Scalar manifest fields captured on first occurrence.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    AssemblyName,
    ProjectGuid,
    OutputPath,
    OutputType,
    SccProjectName,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Field> {
        match tag {
            b"AssemblyName" => Some(Field::AssemblyName),
            b"ProjectGuid" => Some(Field::ProjectGuid),
            b"OutputPath" => Some(Field::OutputPath),
            b"OutputType" => Some(Field::OutputType),
            b"SccProjectName" => Some(Field::SccProjectName),
            _ => None,
        }
    }

    fn tag(self) -> &'static [u8] {
        match self {
            Field::AssemblyName => b"AssemblyName",
            Field::ProjectGuid => b"ProjectGuid",
            Field::OutputPath => b"OutputPath",
            Field::OutputType => b"OutputType",
            Field::SccProjectName => b"SccProjectName",
        }
    }
}

#[derive(Default)]
struct Scalars {
    assembly_name: Option<String>,
    project_guid: Option<String>,
    output_path: Option<String>,
    output_type: Option<String>,
    scc_project_name: Option<String>,
}

impl Scalars {
    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::AssemblyName => &mut self.assembly_name,
            Field::ProjectGuid => &mut self.project_guid,
            Field::OutputPath => &mut self.output_path,
            Field::OutputType => &mut self.output_type,
            Field::SccProjectName => &mut self.scc_project_name,
        }
    }

    /// Claim a field for capture. Returns false when an earlier occurrence
    /// already owns it, including an earlier empty element.
    fn claim(&mut self, field: Field) -> bool {
        let slot = self.slot_mut(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(String::new());
        true
    }

    fn append(&mut self, field: Field, text: &str) {
        if let Some(value) = self.slot_mut(field).as_mut() {
            value.push_str(text);
        }
    }
}

/// Parses manifest XML into `ProjectData`.
///
/// `path` is the manifest's location; it anchors relative reference
/// resolution and provides the fallback assembly name, and is echoed into
/// every error this function produces.
pub fn parse(path: &Path, xml: &str) -> Result<ProjectData> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;
    config.expand_empty_elements = true;

    let manifest_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut scalars = Scalars::default();
    let mut project_references: Vec<PathBuf> = Vec::new();
    let mut external_references: BTreeSet<String> = BTreeSet::new();
    let mut saw_root = false;
    let mut capturing: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if !saw_root {
                    saw_root = true;
                    check_root(path, &e)?;
                    continue;
                }
                match e.local_name().as_ref() {
                    b"ProjectReference" => {
                        if let Some(include) = include_attr(path, &e)? {
                            let include = include.trim();
                            if !include.is_empty() {
                                project_references.push(resolve_relative(&manifest_dir, include));
                            }
                        }
                    }
                    b"Reference" => {
                        if let Some(include) = include_attr(path, &e)? {
                            let name = include
                                .split(',')
                                .next()
                                .unwrap_or_default()
                                .trim()
                                .to_lowercase();
                            if !name.is_empty() {
                                external_references.insert(name);
                            }
                        }
                    }
                    tag => {
                        if capturing.is_none() {
                            if let Some(field) = Field::from_tag(tag) {
                                if scalars.claim(field) {
                                    capturing = Some(field);
                                }
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(field) = capturing {
                    let text = t.unescape().map_err(|err| xml_error(path, err))?;
                    scalars.append(field, &text);
                }
            }
            Ok(Event::End(e)) => {
                if let Some(field) = capturing {
                    if e.local_name().as_ref() == field.tag() {
                        capturing = None;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(xml_error(path, err)),
        }
    }

    if !saw_root {
        return Err(Error::ManifestFormat {
            path: path.to_path_buf(),
            message: "document has no root element".to_string(),
        });
    }

    let raw_guid = scalars.project_guid.ok_or_else(|| Error::InvalidProjectId {
        path: path.to_path_buf(),
        message: "missing ProjectGuid element".to_string(),
    })?;
    let id = Uuid::parse_str(raw_guid.trim()).map_err(|err| Error::InvalidProjectId {
        path: path.to_path_buf(),
        message: format!("'{}' is not a valid GUID: {}", raw_guid.trim(), err),
    })?;

    let assembly_name = match &scalars.assembly_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let output_kind = match &scalars.output_type {
        Some(kind) if kind.trim().eq_ignore_ascii_case("WinExe") => OutputKind::Executable,
        _ => OutputKind::Library,
    };

    let output_file = scalars.output_path.as_ref().map(|raw| {
        resolve_relative(&manifest_dir, raw.trim())
            .join(format!("{}.{}", assembly_name, output_kind.extension()))
    });

    let scc_bound = scalars
        .scc_project_name
        .as_ref()
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false);

    Ok(ProjectData {
        id,
        assembly_name,
        output_kind,
        output_file,
        scc_bound,
        project_references,
        external_references,
    })
}

/// Validate the document root: must be `Project` in the MSBuild namespace.
fn check_root(path: &Path, e: &BytesStart) -> Result<()> {
    if e.local_name().as_ref() != b"Project" {
        return Err(Error::ManifestFormat {
            path: path.to_path_buf(),
            message: format!(
                "root element is '{}', expected 'Project'",
                String::from_utf8_lossy(e.name().as_ref())
            ),
        });
    }
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error(path, err))?;
        if attr.key.as_ref() == b"xmlns" {
            let value = attr.unescape_value().map_err(|err| xml_error(path, err))?;
            if value == MSBUILD_XMLNS {
                return Ok(());
            }
            return Err(Error::ManifestFormat {
                path: path.to_path_buf(),
                message: format!("unrecognized project namespace '{}'", value),
            });
        }
    }
    Err(Error::ManifestFormat {
        path: path.to_path_buf(),
        message: "missing MSBuild project namespace".to_string(),
    })
}

/// The `Include` attribute of a reference element, if present.
fn include_attr(path: &Path, e: &BytesStart) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error(path, err))?;
        if attr.key.as_ref() == b"Include" {
            let value = attr.unescape_value().map_err(|err| xml_error(path, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn xml_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::ManifestXml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
