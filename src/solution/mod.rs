//! # Solution Model
//!
//! An in-memory Visual Studio solution: a tree of folders and projects that
//! commands assemble piecewise and finally serialize with [`write`]. The
//! submodules split the work:
//!
//! - `assemble` grows a solution from repository projects, pulling bounded
//!   transitive references under a synthetic `references` folder.
//! - `write` serializes the tree into `.sln` text.
//!
//! ## Arena
//!
//! Nodes live in a flat arena (`Vec<Node>`) addressed by `NodeId` handles,
//! with parent links stored as ids. Nodes are never reallocated or reused:
//! removing an item detaches it from its parent so it drops out of the
//! reachable tree, but its slot stays put and every previously handed-out
//! `NodeId` remains valid. The root is a nameless folder that is never
//! rendered; top-level items are its children.
//!
//! A `Uuid → NodeId` index tracks every project in the tree, which is what
//! keeps a project from ever appearing twice no matter how many reference
//! chains lead to it. Children are kept in display order at all times:
//! folders before projects, case-insensitive name order, exact name as the
//! tie-break.

mod assemble;
mod write;

pub use assemble::AssembleOptions;
pub use write::{render, write, PROJECT_TYPE_CSHARP, PROJECT_TYPE_FOLDER};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Handle to a node in the solution arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node holds: a synthetic folder or a concrete project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionItem {
    Folder { id: Uuid, name: String },
    Project { id: Uuid, name: String, path: PathBuf },
}

impl SolutionItem {
    pub fn id(&self) -> Uuid {
        match self {
            SolutionItem::Folder { id, .. } => *id,
            SolutionItem::Project { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SolutionItem::Folder { name, .. } => name,
            SolutionItem::Project { name, .. } => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, SolutionItem::Folder { .. })
    }
}

struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    item: SolutionItem,
}

/// A solution under construction.
pub struct Solution {
    nodes: Vec<Node>,
    root: NodeId,
    index: HashMap<Uuid, NodeId>,
    scc_bound: bool,
}

impl Solution {
    /// An empty solution: just the unrendered root folder.
    pub fn new() -> Self {
        let root_node = Node {
            parent: None,
            children: Vec::new(),
            item: SolutionItem::Folder {
                id: Uuid::new_v4(),
                name: String::new(),
            },
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
            index: HashMap::new(),
            scc_bound: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn item(&self, id: NodeId) -> &SolutionItem {
        &self.nodes[id.0].item
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Whether any constituent project was source-control bound when added.
    /// Set once; rebuilding the solution is the only way back to `false`.
    pub fn scc_bound(&self) -> bool {
        self.scc_bound
    }

    /// Whether a project with this identifier is anywhere in the tree.
    pub fn contains_project(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    /// Node currently holding the project with this identifier.
    pub fn project_node(&self, id: Uuid) -> Option<NodeId> {
        self.index.get(&id).copied()
    }

    /// Reachable nodes in depth-first pre-order, root excluded.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        self.walk_into(self.root, &mut order);
        order
    }

    fn walk_into(&self, id: NodeId, order: &mut Vec<NodeId>) {
        for &child in &self.nodes[id.0].children {
            order.push(child);
            self.walk_into(child, order);
        }
    }

    /// Number of projects reachable from the root.
    pub fn project_count(&self) -> usize {
        self.walk()
            .iter()
            .filter(|id| !self.item(**id).is_folder())
            .count()
    }

    /// Number of folders reachable from the root, root excluded.
    pub fn folder_count(&self) -> usize {
        self.walk()
            .iter()
            .filter(|id| self.item(**id).is_folder())
            .count()
    }

    /// Create a folder under `parent`.
    pub fn add_folder(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.push_node(
            parent,
            SolutionItem::Folder {
                id: Uuid::new_v4(),
                name: name.to_string(),
            },
        );
        self.reorder_children(parent);
        id
    }

    /// Insert a project under `parent`.
    ///
    /// Returns `None` without touching the tree when a project with the same
    /// identifier is already present anywhere in the solution.
    pub fn insert_project(
        &mut self,
        parent: NodeId,
        id: Uuid,
        name: &str,
        path: &Path,
    ) -> Option<NodeId> {
        if self.index.contains_key(&id) {
            return None;
        }
        let node = self.push_node(
            parent,
            SolutionItem::Project {
                id,
                name: name.to_string(),
                path: path.to_path_buf(),
            },
        );
        self.index.insert(id, node);
        self.reorder_children(parent);
        Some(node)
    }

    /// Detach an item from its parent. The subtree drops out of the
    /// reachable tree and its project identifiers leave the index; nothing
    /// else is touched, in particular the parent folder survives even when
    /// emptied.
    pub fn remove_item(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        self.purge_index(id);
        self.detach(id);
    }

    /// First direct child folder of `parent` with exactly this name.
    pub fn find_child_folder(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| match self.item(*child) {
                SolutionItem::Folder { name: n, .. } => n == name,
                SolutionItem::Project { .. } => false,
            })
    }

    fn push_node(&mut self, parent: NodeId, item: SolutionItem) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            item,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
        self.nodes[id.0].parent = None;
    }

    fn purge_index(&mut self, id: NodeId) {
        if let SolutionItem::Project { id: uuid, .. } = &self.nodes[id.0].item {
            self.index.remove(uuid);
        }
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.purge_index(child);
        }
    }

    /// Restore the display order of `parent`'s children: folders before
    /// projects, case-insensitive name, exact name as the tie-break.
    fn reorder_children(&mut self, parent: NodeId) {
        let mut children = std::mem::take(&mut self.nodes[parent.0].children);
        children.sort_by(|a, b| {
            Self::order_key(&self.nodes[a.0].item).cmp(&Self::order_key(&self.nodes[b.0].item))
        });
        self.nodes[parent.0].children = children;
    }

    fn order_key(item: &SolutionItem) -> (u8, String, String) {
        let rank = if item.is_folder() { 0 } else { 1 };
        (rank, item.name().to_lowercase(), item.name().to_string())
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}
