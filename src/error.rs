//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `slnforge` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! The `Error` enum covers:
//!
//! - Configuration parsing errors.
//! - Project manifests that are not in the recognized MSBuild dialect.
//! - Malformed XML in project manifests.
//! - Missing or malformed project identifiers.
//! - Scan cancellation.
//! - Filesystem operations.
//! - I/O errors.
//! - YAML parsing errors.
//! - Regex errors.
//! - Glob pattern errors.
//! - Lock poisoning.
//!
//! Parse failures for individual manifests are recorded on the affected
//! project rather than aborting whole-tree operations; the variants carrying
//! a `path` make the offending file visible wherever they surface.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for slnforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the `.slnforge.yaml` settings file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A manifest file is not in the recognized MSBuild dialect.
    ///
    /// Raised when the document root is not a `Project` element carrying the
    /// MSBuild 2003 namespace.
    #[error("Unrecognized project manifest {}: {message}", path.display())]
    ManifestFormat { path: PathBuf, message: String },

    /// A manifest file contains malformed XML.
    #[error("Malformed XML in {}: {message}", path.display())]
    ManifestXml { path: PathBuf, message: String },

    /// A manifest is missing its `ProjectGuid`, or the value does not parse
    /// as a UUID.
    #[error("Invalid project identifier in {}: {message}", path.display())]
    InvalidProjectId { path: PathBuf, message: String },

    /// A tree scan was cancelled before it completed.
    #[error("Scan cancelled")]
    ScanCancelled,

    /// An error occurred with a filesystem operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
