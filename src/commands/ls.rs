//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which lists every project
//! manifest found under a root directory as a flat listing.
//!
//! ## Functionality
//!
//! - **Project Listing**: Shows every project with its manifest path
//! - **Name Filtering**: Supports regular expressions to filter the output
//! - **Detailed Output**: Optional long format showing output kind and reference counts
//! - **Sorting**: Projects can be sorted by name, path, or reference count
//! - **Machine Output**: `--format json` emits the listing as JSON
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::{Args, ValueEnum};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use slnforge::config;
use slnforge::fsio::DiskFs;
use slnforge::manifest::OutputKind;
use slnforge::output::OutputConfig;
use slnforge::repository::ProjectRepository;
use slnforge::scanner;
use slnforge::suggestions;

/// List every project under a root directory
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Root directory to search.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Path to the .slnforge.yaml settings file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only list projects whose name matches this regular expression.
    #[arg(short, long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Use long listing format showing output kind and reference count.
    #[arg(short, long)]
    pub long: bool,

    /// Sort order for the project listing.
    #[arg(short, long, value_enum, default_value = "name")]
    pub sort: SortOrder,

    /// Show only the total count of projects.
    #[arg(long)]
    pub count: bool,

    /// Reverse the sort order.
    #[arg(short, long)]
    pub reverse: bool,

    /// Output format for the listing.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Sort order options for the project listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortOrder {
    /// Sort alphabetically by project name
    #[default]
    Name,
    /// Sort by manifest path
    Path,
    /// Sort by number of project references
    Refs,
}

/// Output format options for the project listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON, one object per project
    Json,
}

/// Execute the `ls` command.
///
/// This function handles the logic for the `ls` subcommand. It discovers every
/// manifest under the root, parses them all, and prints a flat listing.
pub fn execute(args: LsArgs, _output: &OutputConfig) -> Result<()> {
    if !args.root.is_dir() {
        return Err(suggestions::root_not_found(&args.root));
    }
    if let Some(config_path) = &args.config {
        if !config_path.exists() {
            return Err(suggestions::config_not_found(config_path));
        }
    }

    let settings = config::resolve(args.config.as_deref(), &args.root)?;

    let filter = match &args.filter {
        Some(pattern) => Some(
            Regex::new(pattern).map_err(|e| suggestions::invalid_regex(pattern, &e))?,
        ),
        None => None,
    };

    let repo = ProjectRepository::new();
    scanner::discover(&args.root, &settings.scan_options(), &repo)?;
    repo.load_all(&DiskFs)?;
    repo.resolve_broken_references()?;

    // Collect projects with their metadata
    let mut rows: Vec<ProjectRow> = repo
        .projects()?
        .iter()
        .map(|project| ProjectRow {
            name: project.display_name().to_string(),
            path: relative_display(project.path(), &args.root),
            kind: kind_label(project.data().map(|data| data.output_kind)).to_string(),
            references: project
                .data()
                .map(|data| data.project_references.len())
                .unwrap_or(0),
            broken_references: project.broken_references().len(),
            load_errors: project.load_errors().to_vec(),
        })
        .collect();

    // Apply name filter if specified
    if let Some(regex) = &filter {
        rows.retain(|row| regex.is_match(&row.name));
    }

    // Sort projects
    match args.sort {
        SortOrder::Name => {
            rows.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        SortOrder::Path => {
            rows.sort_by(|a, b| a.path.cmp(&b.path));
        }
        SortOrder::Refs => {
            rows.sort_by_key(|row| row.references);
        }
    }

    // Reverse if requested
    if args.reverse {
        rows.reverse();
    }

    // Output
    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    if args.long {
        // Long format: kind references path
        for row in &rows {
            println!("{:<11} {:>4} {}", row.kind, row.references, row.path);
        }
    } else {
        // Simple format: just paths
        for row in &rows {
            println!("{}", row.path);
        }
    }

    // Summary
    println!();
    println!("{} project(s)", rows.len());

    Ok(())
}

/// One project in the listing
#[derive(Debug, Serialize)]
struct ProjectRow {
    name: String,
    path: String,
    kind: String,
    references: usize,
    broken_references: usize,
    load_errors: Vec<String>,
}

/// Manifest path relative to the root, for display.
fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn kind_label(kind: Option<OutputKind>) -> &'static str {
    match kind {
        Some(OutputKind::Library) => "library",
        Some(OutputKind::Executable) => "executable",
        None => "unknown",
    }
}
