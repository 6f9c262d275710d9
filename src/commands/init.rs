//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which creates a
//! `.slnforge.yaml` settings file with every key spelled out at its default
//! value.
//!
//! ## Functionality
//!
//! - **Annotated Defaults**: The generated file documents every key inline
//! - **Force Mode**: Overwrites an existing settings file when specified
//! - **Round-trip Safe**: The generated file parses back to the built-in defaults

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use slnforge::defaults::DEFAULT_CONFIG_FILENAME;
use slnforge::output::{emoji, OutputConfig};

/// Create a .slnforge.yaml settings file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to place the settings file in.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing settings file.
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `init` command.
///
/// This function handles the logic for the `init` subcommand, creating a
/// `.slnforge.yaml` file with the default settings written out.
pub fn execute(args: InitArgs, output: &OutputConfig) -> Result<()> {
    let settings_path = args.dir.join(DEFAULT_CONFIG_FILENAME);

    // Check if the settings file already exists
    if settings_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Settings file {} already exists. Use --force to overwrite.",
            settings_path.display()
        ));
    }

    println!(
        "{} Initializing slnforge settings...",
        emoji(output, "🎯", "[INIT]")
    );

    fs::write(&settings_path, default_settings_file())?;
    println!(
        "{} Created {}",
        emoji(output, "✅", "[OK]"),
        settings_path.display()
    );
    println!(
        "{} Run `slnforge scan <ROOT>` to browse a project tree",
        emoji(output, "💡", "[TIP]")
    );

    Ok(())
}

/// Generate the default settings file content.
///
/// Every key carries its default value, so the file is a no-op until edited.
fn default_settings_file() -> String {
    r#"# slnforge settings
# Every key is optional; the values below are the defaults.

# Directory names skipped while scanning. Glob patterns, matched
# case-insensitively against each directory name.
ignore:
  - .git
  - .vs
  - .svn
  - bin
  - obj

# Collapse single-project folders and skip pass-through folders in the
# scanned tree.
simplify: true

# How many reference hops `new` follows from each selected project.
# 0 pulls no references at all.
reference-depth: 6

# Whether `new` pulls referenced projects into the solution.
include-references: true
"#
    .to_string()
}
