//! # Scan Command Implementation
//!
//! This module implements the `scan` subcommand, which walks a directory tree,
//! collects every project manifest in it, and displays the resulting folder
//! hierarchy.
//!
//! ## Functionality
//!
//! - **Tree Visualization**: Displays the folder/project hierarchy with ptree
//! - **Simplification**: Noise folders are collapsed unless `--no-simplify` is given
//! - **Filtering**: `--filter` narrows the display to matching project names
//! - **Depth Control**: Supports `--depth` flag to limit the displayed depth
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;
use ptree::{print_tree, TreeItem};
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

use slnforge::config;
use slnforge::output::{emoji, OutputConfig};
use slnforge::repository::ProjectRepository;
use slnforge::scanner::{FolderNode, Scanner};
use slnforge::suggestions;

/// Display the project tree under a root directory
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory to scan.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Path to the .slnforge.yaml settings file.
    ///
    /// If not provided, the settings are looked up next to the scan root,
    /// then in the per-user configuration directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show the tree exactly as it is on disk, without simplification.
    #[arg(long)]
    pub no_simplify: bool,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree.
    /// Use 0 to show only the root level, 1 to show one level of folders, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,

    /// Only display projects whose name matches this regular expression.
    #[arg(short, long, value_name = "REGEX")]
    pub filter: Option<String>,
}

/// Execute the `scan` command.
///
/// This function handles the logic for the `scan` subcommand. It scans the
/// root directory for project manifests, builds the folder tree, and displays
/// it in a hierarchical format with a summary line.
pub fn execute(args: ScanArgs, output: &OutputConfig) -> Result<()> {
    if !args.root.is_dir() {
        return Err(suggestions::root_not_found(&args.root));
    }
    if let Some(config_path) = &args.config {
        if !config_path.exists() {
            return Err(suggestions::config_not_found(config_path));
        }
    }

    let settings = config::resolve(args.config.as_deref(), &args.root)?;
    let mut options = settings.scan_options();
    if args.no_simplify {
        options.simplify = false;
    }

    let filter = match &args.filter {
        Some(pattern) => Some(
            Regex::new(pattern).map_err(|e| suggestions::invalid_regex(pattern, &e))?,
        ),
        None => None,
    };

    println!(
        "{} Scanning {}",
        emoji(output, "🔍", "[SCAN]"),
        args.root.display()
    );

    let repo = ProjectRepository::new();
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    let progress = spinner.clone();
    let scanner = Scanner::new(&repo)
        .with_options(options)
        .with_progress(Box::new(move |count| {
            progress.set_message(format!("{count} project(s) discovered"));
        }));

    let tree = scanner.scan(&args.root)?;
    spinner.finish_and_clear();

    let tree = match tree {
        Some(tree) => tree,
        None => return Err(suggestions::root_not_found(&args.root)),
    };

    let tree_root = build_display_node(&tree, filter.as_ref(), args.depth.unwrap_or(usize::MAX), 0)
        .unwrap_or_else(|| TreeNode {
            label: format!("{}/", tree.name),
            children: vec![],
        });
    print_tree(&tree_root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    let total = tree.project_count();
    println!();
    match &filter {
        Some(regex) => {
            let matched = count_matches(&tree, regex);
            println!(
                "{} {} of {} project(s) match",
                emoji(output, "✅", "[OK]"),
                matched,
                total
            );
        }
        None => {
            println!(
                "{} {} project(s) in {} folder(s)",
                emoji(output, "✅", "[OK]"),
                total,
                tree.folder_count()
            );
        }
    }
    if scanner.warnings() > 0 {
        println!(
            "{} skipped {} unreadable folder(s)",
            emoji(output, "⚠️", "[WARN]"),
            scanner.warnings()
        );
    }

    Ok(())
}

/// Build a display node from a scanned folder.
///
/// Returns `None` for folders that end up with nothing to show under an
/// active filter; the root is always kept.
fn build_display_node(
    folder: &FolderNode,
    filter: Option<&Regex>,
    max_depth: usize,
    current_depth: usize,
) -> Option<TreeNode> {
    let mut children = Vec::new();
    if current_depth < max_depth {
        for sub in &folder.folders {
            if let Some(node) = build_display_node(sub, filter, max_depth, current_depth + 1) {
                children.push(node);
            }
        }
        for project in &folder.projects {
            let name = project.display_name();
            if filter.map_or(true, |regex| regex.is_match(name)) {
                children.push(TreeNode {
                    label: name.to_string(),
                    children: vec![],
                });
            }
        }
    }

    if filter.is_some() && current_depth > 0 && children.is_empty() {
        return None;
    }
    Some(TreeNode {
        label: format!("{}/", folder.name),
        children,
    })
}

/// Count projects whose display name matches the filter.
fn count_matches(folder: &FolderNode, regex: &Regex) -> usize {
    folder
        .projects
        .iter()
        .filter(|project| regex.is_match(project.display_name()))
        .count()
        + folder
            .folders
            .iter()
            .map(|sub| count_matches(sub, regex))
            .sum::<usize>()
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
