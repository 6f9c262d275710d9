//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use slnforge::output::OutputConfig;

/// slnforge - Assemble throwaway Visual Studio solutions from big project trees
#[derive(Parser, Debug)]
#[command(name = "slnforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display the project tree under a root directory
    Scan(commands::scan::ScanArgs),
    /// List every project under a root directory
    Ls(commands::ls::LsArgs),
    /// Parse every manifest and report problems
    Check(commands::check::CheckArgs),
    /// Assemble selected projects into a .sln file
    New(commands::new::NewArgs),
    /// Create a .slnforge.yaml settings file
    Init(commands::init::InitArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Scan(args) => commands::scan::execute(args, &output),
            Commands::Ls(args) => commands::ls::execute(args, &output),
            Commands::Check(args) => commands::check::execute(args, &output),
            Commands::New(args) => commands::new::execute(args, &output),
            Commands::Init(args) => commands::init::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialize env_logger with the flag as the default filter.
///
/// `RUST_LOG` still wins when set, so `RUST_LOG=slnforge=trace` works
/// without touching the flag.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
