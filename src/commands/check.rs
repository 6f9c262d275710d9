//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, which parses every project
//! manifest under a root directory and reports the problems it finds.
//!
//! ## Functionality
//!
//! - **Manifest Validation**: Every manifest is parsed; unreadable or malformed
//!   manifests are reported with the parser's message.
//!
//! - **Reference Validation**: Project references that point at manifests
//!   outside the scanned tree are reported as broken. These are the references
//!   `new` silently skips, so `check` is the way to see them.
//!
//! The command exits non-zero when any problem is found, which makes it usable
//! as a CI gate for project-tree hygiene.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use slnforge::config;
use slnforge::fsio::DiskFs;
use slnforge::output::{emoji, OutputConfig};
use slnforge::repository::ProjectRepository;
use slnforge::scanner;
use slnforge::suggestions;

/// Parse every manifest and report problems
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Root directory to check.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Path to the .slnforge.yaml settings file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format options for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report object
    Json,
}

/// One problematic project in the report
#[derive(Debug, Serialize)]
struct Problem {
    path: String,
    load_errors: Vec<String>,
    broken_references: Vec<String>,
}

/// The full report, as serialized in JSON mode
#[derive(Debug, Serialize)]
struct Report {
    checked: usize,
    problems: Vec<Problem>,
}

/// Execute the `check` command.
///
/// This function handles the logic for the `check` subcommand. It discovers
/// and parses every manifest under the root, resolves references, and reports
/// every project with parse errors or broken references.
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    if !args.root.is_dir() {
        return Err(suggestions::root_not_found(&args.root));
    }
    if let Some(config_path) = &args.config {
        if !config_path.exists() {
            return Err(suggestions::config_not_found(config_path));
        }
    }

    let settings = config::resolve(args.config.as_deref(), &args.root)?;

    let repo = ProjectRepository::new();
    scanner::discover(&args.root, &settings.scan_options(), &repo)?;
    repo.load_all(&DiskFs)?;
    repo.resolve_broken_references()?;

    let checked = repo.len()?;
    let problems: Vec<Problem> = repo
        .projects()?
        .iter()
        .filter(|project| {
            !project.load_errors().is_empty() || !project.broken_references().is_empty()
        })
        .map(|project| Problem {
            path: relative_display(project.path(), &args.root),
            load_errors: project.load_errors().to_vec(),
            broken_references: project
                .broken_references()
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        })
        .collect();

    match args.format {
        OutputFormat::Json => {
            let report = Report { checked, problems };
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.problems.is_empty() {
                anyhow::bail!(
                    "{} of {} project(s) have problems",
                    report.problems.len(),
                    checked
                );
            }
        }
        OutputFormat::Text => {
            println!("Checking {} project(s) under {}", checked, args.root.display());

            if problems.is_empty() {
                println!(
                    "{} All {} project(s) parsed cleanly",
                    emoji(output, "✅", "[OK]"),
                    checked
                );
                return Ok(());
            }

            println!();
            for problem in &problems {
                println!("{} {}", emoji(output, "❌", "[FAIL]"), problem.path);
                for error in &problem.load_errors {
                    println!("   error: {}", error);
                }
                for reference in &problem.broken_references {
                    println!("   broken reference: {}", reference);
                }
            }
            println!();
            anyhow::bail!("{} of {} project(s) have problems", problems.len(), checked);
        }
    }

    Ok(())
}

/// Manifest path relative to the root, for display.
fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
