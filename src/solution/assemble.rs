//! # Solution Assembly
//!
//! Grows a [`Solution`] from repository projects. Directly requested
//! projects become top-level items; everything they reference (up to a
//! configurable number of hops) is pulled in underneath a synthetic
//! `references` folder whose subfolders mirror where the referenced
//! manifests really live relative to the scan root. A project reached both
//! directly and through references appears exactly once, as a direct item:
//! adding it directly promotes the transitive occurrence and sweeps up any
//! reference folders left empty behind it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::defaults::{DEFAULT_REFERENCE_DEPTH, REFERENCES_FOLDER};
use crate::error::Result;
use crate::path::folder_chain;
use crate::repository::{Project, ProjectRepository};

use super::{NodeId, Solution};

/// Options controlling how projects are added to a solution.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Scan root the reference folder layout is mirrored against.
    pub root: PathBuf,
    /// Whether referenced projects are pulled in at all.
    pub include_references: bool,
    /// How many reference hops to follow from each directly added project.
    /// Zero pulls nothing.
    pub reference_depth: usize,
}

impl AssembleOptions {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            include_references: true,
            reference_depth: DEFAULT_REFERENCE_DEPTH,
        }
    }
}

impl Solution {
    /// Add a project as a direct (top-level) item.
    ///
    /// Projects that never loaded are skipped with a warning. If the project
    /// is already a direct item this is a no-op; if it is present as a
    /// pulled reference it is promoted: the old occurrence is removed along
    /// with every reference folder that ends up empty, the `references`
    /// root included, and the project is re-inserted at the top level.
    ///
    /// With `include_references` on, the project's transitive references are
    /// then pulled in up to `reference_depth` hops. The hop budget restarts
    /// with every `add_project` call. References that never registered,
    /// never loaded, or are already present anywhere in the solution are
    /// skipped.
    pub fn add_project(
        &mut self,
        project: &Arc<Project>,
        repo: &ProjectRepository,
        options: &AssembleOptions,
    ) -> Result<()> {
        let data = match project.data() {
            Some(data) => data,
            None => {
                log::warn!(
                    "skipping project without loaded manifest: {}",
                    project.path().display()
                );
                return Ok(());
            }
        };

        if let Some(existing) = self.project_node(data.id) {
            if self.parent(existing) == Some(self.root()) {
                return Ok(());
            }
            let mut cursor = self.parent(existing);
            self.remove_item(existing);
            while let Some(folder) = cursor {
                if folder == self.root() || !self.children(folder).is_empty() {
                    break;
                }
                cursor = self.parent(folder);
                self.remove_item(folder);
            }
        }

        let root = self.root();
        let _ = self.insert_project(root, data.id, project.display_name(), project.path());
        if data.scc_bound {
            self.scc_bound = true;
        }

        if options.include_references {
            self.pull_references(project, repo, options, 1)?;
        }
        Ok(())
    }

    fn pull_references(
        &mut self,
        project: &Arc<Project>,
        repo: &ProjectRepository,
        options: &AssembleOptions,
        hop: usize,
    ) -> Result<()> {
        if hop > options.reference_depth {
            return Ok(());
        }
        let data = match project.data() {
            Some(data) => data,
            None => return Ok(()),
        };
        for target_path in &data.project_references {
            let target = match repo.get(target_path)? {
                Some(target) => target,
                None => {
                    log::debug!("skipping unresolved reference {}", target_path.display());
                    continue;
                }
            };
            let target_data = match target.data() {
                Some(data) => data,
                None => {
                    log::debug!("skipping unloaded reference {}", target.path().display());
                    continue;
                }
            };
            if self.contains_project(target_data.id) {
                continue;
            }

            let parent = self.reference_parent(target.path(), &options.root);
            let _ = self.insert_project(parent, target_data.id, target.display_name(), target.path());
            if target_data.scc_bound {
                self.scc_bound = true;
            }
            self.pull_references(&target, repo, options, hop + 1)?;
        }
        Ok(())
    }

    /// Mirror the manifest's real location under the top-level `references`
    /// folder. Folders are reused by exact name within their parent, so
    /// repeated chains share identity.
    fn reference_parent(&mut self, manifest_path: &Path, root: &Path) -> NodeId {
        let solution_root = self.root();
        let refs_root = match self.find_child_folder(solution_root, REFERENCES_FOLDER) {
            Some(id) => id,
            None => self.add_folder(solution_root, REFERENCES_FOLDER),
        };
        let chain = match folder_chain(root, manifest_path) {
            Some(chain) => chain,
            None => return refs_root,
        };
        let mut parent = refs_root;
        for segment in &chain {
            parent = match self.find_child_folder(parent, segment) {
                Some(id) => id,
                None => self.add_folder(parent, segment),
            };
        }
        parent
    }
}
