//! # Solution Writer
//!
//! Serializes a [`Solution`] into Visual Studio `.sln` text. The format is
//! line oriented with CRLF endings: a two-line header, one
//! `Project`/`EndProject` pair per item, and a `Global` block carrying the
//! solution properties plus the folder nesting map. Output is a pure
//! function of the solution and the target path, so writing the same
//! solution twice produces byte-identical files.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use uuid::Uuid;

use crate::error::Result;
use crate::path::windows_relative;

use super::{Solution, SolutionItem};

/// Project type identifier for C# projects.
pub const PROJECT_TYPE_CSHARP: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";
/// Project type identifier for solution folders.
pub const PROJECT_TYPE_FOLDER: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

const HEADER: &str =
    "Microsoft Visual Studio Solution File, Format Version 12.00\r\n# Visual Studio Version 16\r\n";

/// Write the solution to `target`, creating or truncating it.
pub fn write(target: &Path, solution: &Solution) -> Result<()> {
    let mut file = File::create(target)?;
    file.write_all(render(target, solution).as_bytes())?;
    Ok(())
}

/// Render the `.sln` text for a solution that will live at `target`.
///
/// Project paths are relative to the target's directory, with backslash
/// separators and no leading `.\`. Projects are listed first, then folders,
/// each flattened depth-first in stored child order. The `NestedProjects`
/// section is omitted entirely when the solution has no folders.
pub fn render(target: &Path, solution: &Solution) -> String {
    let base_dir = target.parent().unwrap_or_else(|| Path::new(""));
    let order = solution.walk();
    let mut out = String::from(HEADER);

    for id in &order {
        if let SolutionItem::Project { id: uuid, name, path } = solution.item(*id) {
            out.push_str(&format!(
                "Project(\"{}\") = \"{}\", \"{}\", \"{}\"\r\nEndProject\r\n",
                PROJECT_TYPE_CSHARP,
                name,
                windows_relative(path, base_dir),
                braced(*uuid),
            ));
        }
    }
    for id in &order {
        if let SolutionItem::Folder { id: uuid, name } = solution.item(*id) {
            out.push_str(&format!(
                "Project(\"{}\") = \"{}\", \"{}\", \"{}\"\r\nEndProject\r\n",
                PROJECT_TYPE_FOLDER,
                name,
                name,
                braced(*uuid),
            ));
        }
    }

    out.push_str("Global\r\n");
    out.push_str("\tGlobalSection(SolutionProperties) = preSolution\r\n");
    out.push_str("\t\tHideSolutionNode = FALSE\r\n");
    out.push_str("\tEndGlobalSection\r\n");
    if solution.folder_count() > 0 {
        out.push_str("\tGlobalSection(NestedProjects) = preSolution\r\n");
        for id in &order {
            if let Some(parent) = solution.parent(*id) {
                if parent != solution.root() {
                    out.push_str(&format!(
                        "\t\t{} = {}\r\n",
                        braced(solution.item(*id).id()),
                        braced(solution.item(parent).id()),
                    ));
                }
            }
        }
        out.push_str("\tEndGlobalSection\r\n");
    }
    out.push_str("EndGlobal\r\n");
    out
}

fn braced(id: Uuid) -> String {
    format!("{{{}}}", id.to_string().to_uppercase())
}
