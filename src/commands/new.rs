//! # New Command Implementation
//!
//! This module implements the `new` subcommand, which assembles the selected
//! projects (and their transitive references) into a Visual Studio solution
//! file.
//!
//! ## Functionality
//!
//! - **Project Selection**: `-p` picks projects by name, assembly name, or
//!   manifest path, repeatable
//! - **Reference Closure**: Referenced projects are pulled in automatically,
//!   up to the configured hop depth, and grouped under a `references` folder
//! - **Overwrite Guard**: An existing output file needs `--force` or an
//!   interactive confirmation
//! - **Preview**: The assembled solution layout is printed as a tree

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use ptree::{print_tree, TreeItem};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use slnforge::config;
use slnforge::fsio::DiskFs;
use slnforge::output::{emoji, OutputConfig};
use slnforge::path::normalize_lexically;
use slnforge::repository::{Project, ProjectRepository};
use slnforge::scanner;
use slnforge::solution::{self, NodeId, Solution};
use slnforge::suggestions;

/// Assemble selected projects into a .sln file
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Root directory containing the projects.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Project to include, by name, assembly name, or manifest path.
    ///
    /// Repeat the flag to include several projects.
    #[arg(
        short = 'p',
        long = "project",
        value_name = "NAME_OR_PATH",
        required = true
    )]
    pub projects: Vec<String>,

    /// Where to write the solution file.
    #[arg(short, long, value_name = "FILE", default_value = "ad-hoc.sln")]
    pub output: PathBuf,

    /// Path to the .slnforge.yaml settings file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum reference hops to follow from each selected project.
    ///
    /// Use 0 to pull no references at all. Overrides the settings file.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,

    /// Do not pull referenced projects into the solution.
    #[arg(long)]
    pub no_references: bool,

    /// Overwrite the output file without asking.
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `new` command.
///
/// This function handles the logic for the `new` subcommand. It discovers and
/// parses every manifest under the root, resolves each selector to exactly one
/// project, assembles the solution, and writes the .sln file.
pub fn execute(args: NewArgs, output: &OutputConfig) -> Result<()> {
    if !args.root.is_dir() {
        return Err(suggestions::root_not_found(&args.root));
    }
    if let Some(config_path) = &args.config {
        if !config_path.exists() {
            return Err(suggestions::config_not_found(config_path));
        }
    }

    let root = absolutize(&args.root)?;
    let output_path = absolutize(&args.output)?;

    let settings = config::resolve(args.config.as_deref(), &root)?;
    let mut options = settings.assemble_options(&root);
    if let Some(depth) = args.depth {
        options.reference_depth = depth;
    }
    if args.no_references {
        options.include_references = false;
    }

    if !confirm_overwrite(&output_path, args.force)? {
        println!("Aborted.");
        return Ok(());
    }

    let repo = ProjectRepository::new();
    let found = scanner::discover(&root, &settings.scan_options(), &repo)?;
    if found == 0 {
        anyhow::bail!("No project manifests found under {}", root.display());
    }
    repo.load_all(&DiskFs)?;
    repo.resolve_broken_references()?;

    let selected = resolve_selectors(&repo, &root, &args.projects)?;

    println!(
        "{} Assembling solution from {} selected project(s)",
        emoji(output, "📦", "[SLN]"),
        selected.len()
    );

    let mut sln = Solution::new();
    for project in &selected {
        sln.add_project(project, &repo, &options)?;
    }

    let tree_root = build_solution_node_root(&sln, &output_path);
    print_tree(&tree_root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    solution::write(&output_path, &sln)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", output_path.display(), e))?;

    println!(
        "{} Wrote {} ({} project(s), {} folder(s))",
        emoji(output, "✅", "[OK]"),
        output_path.display(),
        sln.project_count(),
        sln.folder_count()
    );
    if sln.scc_bound() {
        println!(
            "{} Some projects are bound to a source control provider",
            emoji(output, "💡", "[NOTE]")
        );
    }

    Ok(())
}

/// Resolve every selector to exactly one project.
///
/// A selector that matches nothing or matches several projects aborts the
/// whole command; so does one that matched a manifest that failed to parse.
fn resolve_selectors(
    repo: &ProjectRepository,
    root: &Path,
    selectors: &[String],
) -> Result<Vec<Arc<Project>>> {
    let mut selected = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let mut matches = repo.find(root, selector)?;
        if matches.is_empty() {
            let known: Vec<String> = repo
                .projects()?
                .iter()
                .map(|project| project.display_name().to_string())
                .collect();
            return Err(suggestions::project_not_found(selector, &known));
        }
        if matches.len() > 1 {
            let paths: Vec<&Path> = matches.iter().map(|project| project.path()).collect();
            return Err(suggestions::ambiguous_project(selector, &paths));
        }
        if let Some(project) = matches.pop() {
            if !project.load_errors().is_empty() {
                anyhow::bail!(
                    "Cannot include {}: {}",
                    project.path().display(),
                    project.load_errors().join("; ")
                );
            }
            selected.push(project);
        }
    }
    Ok(selected)
}

/// Ask before clobbering an existing output file.
///
/// `--force` skips the question; without a terminal the answer is a hard
/// error so scripts never hang on a prompt.
fn confirm_overwrite(path: &Path, force: bool) -> Result<bool> {
    if force || !path.exists() {
        return Ok(true);
    }
    if !console::user_attended() {
        return Err(suggestions::output_exists(path));
    }

    let theme = ColorfulTheme::default();
    let overwrite = Confirm::with_theme(&theme)
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()?;
    Ok(overwrite)
}

/// Make a path absolute against the current directory, lexically normalized.
fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize_lexically(&absolute))
}

/// Build the display tree for an assembled solution.
///
/// The solution's own root is nameless, so the output file name stands in
/// for it.
fn build_solution_node_root(sln: &Solution, output_path: &Path) -> TreeNode {
    let label = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "solution".to_string());
    TreeNode {
        label,
        children: sln
            .children(sln.root())
            .iter()
            .map(|&child| build_solution_node(sln, child))
            .collect(),
    }
}

fn build_solution_node(sln: &Solution, id: NodeId) -> TreeNode {
    let item = sln.item(id);
    let label = if item.is_folder() {
        format!("{}/", item.name())
    } else {
        item.name().to_string()
    };
    TreeNode {
        label,
        children: sln
            .children(id)
            .iter()
            .map(|&child| build_solution_node(sln, child))
            .collect(),
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, relative: &str, guid: &str, references: &[&str]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        let reference_items: String = references
            .iter()
            .map(|target| format!("    <ProjectReference Include=\"{target}\" />\n"))
            .collect();
        fs::write(
            &path,
            format!(
                r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <ProjectGuid>{{{guid}}}</ProjectGuid>
    <OutputType>Library</OutputType>
    <AssemblyName>{stem}</AssemblyName>
  </PropertyGroup>
  <ItemGroup>
{reference_items}  </ItemGroup>
</Project>"#
            ),
        )
        .unwrap();
    }

    fn default_args(root: &Path, selector: &str, output: &Path) -> NewArgs {
        NewArgs {
            root: root.to_path_buf(),
            projects: vec![selector.to_string()],
            output: output.to_path_buf(),
            config: None,
            depth: None,
            no_references: false,
            force: false,
        }
    }

    #[test]
    fn test_execute_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let args = default_args(
            Path::new("/nonexistent/tree"),
            "App",
            &temp_dir.path().join("out.sln"),
        );

        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Scan root not found"));
    }

    #[test]
    fn test_execute_writes_solution_with_references() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "libs/Lib/Lib.csproj",
            "11111111-1111-1111-1111-111111111111",
            &[],
        );
        write_manifest(
            temp_dir.path(),
            "apps/App/App.csproj",
            "22222222-2222-2222-2222-222222222222",
            &["..\\..\\libs\\Lib\\Lib.csproj"],
        );
        let output_path = temp_dir.path().join("out/adhoc.sln");

        let args = default_args(temp_dir.path(), "App", &output_path);
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_ok());

        let content = fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("App.csproj"));
        assert!(content.contains("Lib.csproj"));
        assert!(content.contains("references"));
        assert!(content.contains("GlobalSection(NestedProjects)"));
    }

    #[test]
    fn test_execute_without_references() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "Lib/Lib.csproj",
            "11111111-1111-1111-1111-111111111111",
            &[],
        );
        write_manifest(
            temp_dir.path(),
            "App/App.csproj",
            "22222222-2222-2222-2222-222222222222",
            &["..\\Lib\\Lib.csproj"],
        );
        let output_path = temp_dir.path().join("out.sln");

        let mut args = default_args(temp_dir.path(), "App", &output_path);
        args.no_references = true;
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_ok());

        let content = fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("App.csproj"));
        assert!(!content.contains("Lib.csproj"));
    }

    #[test]
    fn test_execute_depth_zero_pulls_no_references() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "Lib/Lib.csproj",
            "11111111-1111-1111-1111-111111111111",
            &[],
        );
        write_manifest(
            temp_dir.path(),
            "App/App.csproj",
            "22222222-2222-2222-2222-222222222222",
            &["..\\Lib\\Lib.csproj"],
        );
        let output_path = temp_dir.path().join("out.sln");

        let mut args = default_args(temp_dir.path(), "App", &output_path);
        args.depth = Some(0);
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_ok());

        let content = fs::read_to_string(&output_path).unwrap();
        assert!(!content.contains("Lib.csproj"));
    }

    #[test]
    fn test_execute_selector_by_path() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "App/App.csproj",
            "22222222-2222-2222-2222-222222222222",
            &[],
        );
        let output_path = temp_dir.path().join("out.sln");

        let args = default_args(temp_dir.path(), "App/App.csproj", &output_path);
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_ok());
        assert!(output_path.is_file());
    }

    #[test]
    fn test_execute_unknown_selector() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "App/App.csproj",
            "22222222-2222-2222-2222-222222222222",
            &[],
        );

        let args = default_args(temp_dir.path(), "Nope", &temp_dir.path().join("out.sln"));
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Project not found"));
    }

    #[test]
    fn test_execute_ambiguous_selector() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "a/Dup.csproj",
            "11111111-1111-1111-1111-111111111111",
            &[],
        );
        write_manifest(
            temp_dir.path(),
            "b/Dup.csproj",
            "22222222-2222-2222-2222-222222222222",
            &[],
        );

        let args = default_args(temp_dir.path(), "Dup", &temp_dir.path().join("out.sln"));
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is ambiguous"));
    }

    #[test]
    fn test_execute_rejects_unparseable_selection() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Bad")).unwrap();
        fs::write(temp_dir.path().join("Bad/Bad.csproj"), "not xml").unwrap();

        let args = default_args(temp_dir.path(), "Bad", &temp_dir.path().join("out.sln"));
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Cannot include"));
    }

    #[test]
    fn test_execute_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let args = default_args(temp_dir.path(), "App", &temp_dir.path().join("out.sln"));

        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No project manifests found"));
    }

    #[test]
    fn test_execute_force_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "App/App.csproj",
            "22222222-2222-2222-2222-222222222222",
            &[],
        );
        let output_path = temp_dir.path().join("out.sln");
        fs::write(&output_path, "stale").unwrap();

        let mut args = default_args(temp_dir.path(), "App", &output_path);
        args.force = true;
        let result = execute(args, &OutputConfig::without_color());
        assert!(result.is_ok());

        let content = fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("App.csproj"));
    }

    #[test]
    fn test_confirm_overwrite_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fresh.sln");
        assert!(confirm_overwrite(&path, false).unwrap());
    }

    #[test]
    fn test_confirm_overwrite_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.sln");
        fs::write(&path, "stale").unwrap();
        assert!(confirm_overwrite(&path, true).unwrap());
    }

    #[test]
    fn test_absolutize_relative_path() {
        let absolute = absolutize(Path::new("some/dir/../file.sln")).unwrap();
        assert!(absolute.is_absolute());
        assert!(absolute.ends_with("some/file.sln"));
    }
}
