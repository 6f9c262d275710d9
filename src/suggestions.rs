//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Project not found: {}", selector);
//!
//! // Use:
//! return Err(suggestions::project_not_found(selector, &known_names));
//! ```

use std::path::Path;

/// Generate an error for when the scan root does not exist.
///
/// Includes hints about:
/// - Checking the spelling of the path
/// - Passing an absolute path
pub fn root_not_found(root: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Scan root not found: {root}\n\n\
         hint: Check the path for typos\n\
         hint: Pass an absolute path if the working directory is not what you expect",
        root = root.display()
    )
}

/// Generate an error for when an explicitly named configuration file is not
/// found.
///
/// Includes hints about:
/// - Creating a new config file with `slnforge init`
/// - Using the -c/--config flag
/// - Using the SLNFORGE_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Run 'slnforge init' to create a .slnforge.yaml in your tree root\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set SLNFORGE_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a project selector that matched nothing.
///
/// Includes a did-you-mean suggestion when a known project name is close,
/// plus hints for widening the search.
pub fn project_not_found(selector: &str, known: &[String]) -> anyhow::Error {
    let candidates: Vec<&str> = known.iter().map(String::as_str).collect();
    let suggestion = find_similar(selector, &candidates);
    let did_you_mean = suggestion
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Project not found: {selector}{did_you_mean}\n\n\
         hint: Run 'slnforge ls <ROOT>' to list every project in the tree\n\
         hint: Selectors match the manifest file stem, the assembly name, or a path"
    )
}

/// Generate an error for a project selector that matched several projects.
///
/// Lists every matching manifest so the user can pick one by path.
pub fn ambiguous_project(selector: &str, matches: &[&Path]) -> anyhow::Error {
    let listing: String = matches
        .iter()
        .map(|path| format!("  {}\n", path.display()))
        .collect();
    anyhow::anyhow!(
        "Project selector '{selector}' is ambiguous; it matches:\n{listing}\n\
         hint: Pass the manifest path (relative to the scan root) instead of the name"
    )
}

/// Generate an error for an invalid regex pattern.
///
/// Includes hints about common regex mistakes and validation.
pub fn invalid_regex(pattern: &str, error: &regex::Error) -> anyhow::Error {
    let hint = match error {
        regex::Error::Syntax(msg) if msg.contains("unclosed") => {
            "hint: Check for unclosed brackets, parentheses, or braces"
        }
        regex::Error::Syntax(msg) if msg.contains("repetition") => {
            "hint: Repetition operators (+, *, ?) must follow a pattern"
        }
        _ => "hint: Filters are regular expressions, not globs",
    };

    anyhow::anyhow!(
        "Invalid filter pattern: {pattern}\n\
         error: {error}\n\n\
         {hint}\n\
         hint: Test patterns at https://regex101.com (select Rust flavor)"
    )
}

/// Generate an error for an output file that already exists.
///
/// Includes the hint to pass --force.
pub fn output_exists(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Output file already exists: {path}\n\n\
         hint: Use --force to overwrite it\n\
         hint: Use -o/--output to write somewhere else",
        path = path.display()
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
/// Comparison is case-insensitive so `cstestproject1` still suggests
/// `CsTestProject1`.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let needle = input.to_lowercase();
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(&needle, &candidate.to_lowercase());
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}
