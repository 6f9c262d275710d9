//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `slnforge`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The `execute` function is the main entry point for the command and is
//! responsible for orchestrating the necessary operations, calling into the
//! `slnforge` library to perform the core logic.

pub mod check;
pub mod completions;
pub mod init;
pub mod ls;
pub mod new;
pub mod scan;
