//! Immutable symbol index
//!
//! `SymbolIndex` holds every declaration of a project together with the
//! bound references between them. It is built once per analysis pass by
//! `SymbolIndexBuilder` and shared read-only as `Arc<SymbolIndex>`.

mod builder;
mod catalog;
mod handle;
mod table;

pub use builder::SymbolIndexBuilder;
pub use catalog::LibraryCatalog;
pub use handle::IndexHandle;
pub use table::DeclarationTable;

use liteworkspace_api::models::{DeclId, Declaration, Reference, ReferenceKind};
use liteworkspace_api::{ApiError, ApiResult, CompilationUnit, SymbolGraph};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A declaration and its outgoing references in source order.
#[derive(Debug, Clone)]
pub struct IndexNode {
    pub decl: Arc<Declaration>,
    pub references: Vec<Reference>,
}

/// Text and declarations of a single source file.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub unit: CompilationUnit,
    pub nodes: Vec<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct SymbolIndex {
    pub(crate) root: PathBuf,
    pub(crate) topology: StableDiGraph<IndexNode, ReferenceKind>,
    pub(crate) fqn_index: HashMap<DeclId, NodeIndex>,
    pub(crate) children: HashMap<DeclId, Vec<NodeIndex>>,
    pub(crate) file_index: HashMap<PathBuf, FileEntry>,
}

impl SymbolIndex {
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        SymbolIndexBuilder::new(root).build()
    }

    pub fn builder(root: impl Into<PathBuf>) -> SymbolIndexBuilder {
        SymbolIndexBuilder::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    pub fn file_count(&self) -> usize {
        self.file_index.len()
    }

    pub fn find_node(&self, fqn: &str) -> Option<NodeIndex> {
        self.fqn_index.get(fqn).copied()
    }

    pub fn get(&self, fqn: &str) -> Option<&Arc<Declaration>> {
        self.find_node(fqn)
            .and_then(|idx| self.topology.node_weight(idx))
            .map(|node| &node.decl)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Arc<Declaration>> {
        self.topology.node_weights().map(|node| &node.decl)
    }

    /// Declarations that reference `id`, with the kind of each edge.
    pub fn referrers(&self, id: &str) -> Vec<(Arc<Declaration>, ReferenceKind)> {
        let Some(idx) = self.find_node(id) else {
            return Vec::new();
        };
        let mut result: Vec<_> = self
            .topology
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| {
                self.topology
                    .node_weight(edge.source())
                    .map(|node| (node.decl.clone(), *edge.weight()))
            })
            .collect();
        result.sort_by(|a, b| a.0.id.cmp(&b.0.id).then(a.1.cmp(&b.1)));
        result
    }

    /// Indexed files in path order.
    pub fn files(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.file_index.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }

    /// Exact path first, then relative to the project root, then by suffix.
    fn file_entry(&self, path: &Path) -> Option<&FileEntry> {
        if let Some(entry) = self.file_index.get(path) {
            return Some(entry);
        }
        if path.is_relative() {
            if let Some(entry) = self.file_index.get(&self.root.join(path)) {
                return Some(entry);
            }
            let mut matches = self.file_index.iter().filter(|(p, _)| p.ends_with(path));
            if let (Some((_, entry)), None) = (matches.next(), matches.next()) {
                return Some(entry);
            }
        }
        None
    }

    fn node(&self, id: &str) -> Option<&IndexNode> {
        self.find_node(id).and_then(|idx| self.topology.node_weight(idx))
    }
}

impl SymbolGraph for SymbolIndex {
    fn resolve(&self, qualified_name: &str) -> ApiResult<Arc<Declaration>> {
        self.get(qualified_name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(qualified_name.to_string()))
    }

    fn resolve_site(&self, path: &Path, line: usize, col: usize) -> ApiResult<Arc<Declaration>> {
        let entry = self
            .file_entry(path)
            .ok_or_else(|| ApiError::NotFound(path.display().to_string()))?;

        let mut best: Option<&Arc<Declaration>> = None;
        let mut min_size = usize::MAX;
        for &idx in &entry.nodes {
            let Some(node) = self.topology.node_weight(idx) else {
                continue;
            };
            let Some(location) = &node.decl.location else {
                continue;
            };
            if location.range.contains(line, col) {
                let size = location.shape.span.len();
                if size < min_size {
                    min_size = size;
                    best = Some(&node.decl);
                }
            }
        }
        best.cloned().ok_or_else(|| {
            ApiError::NotFound(format!("{}:{}:{}", path.display(), line + 1, col + 1))
        })
    }

    fn direct_references(&self, id: &DeclId) -> Vec<Reference> {
        self.node(id.as_str())
            .map(|node| node.references.clone())
            .unwrap_or_default()
    }

    fn source_text(&self, id: &DeclId) -> Option<String> {
        let decl = &self.node(id.as_str())?.decl;
        let location = decl.location.as_ref()?;
        let entry = self.file_index.get(&location.path)?;
        let text = &entry.unit.text;
        let mut out = location.shape.span.slice(text)?.to_string();
        for overload in &location.shape.overloads {
            if let Some(more) = overload.span.slice(text) {
                out.push('\n');
                out.push_str(more);
            }
        }
        Some(out)
    }

    fn compilation_unit(&self, path: &Path) -> Option<CompilationUnit> {
        self.file_entry(path).map(|entry| entry.unit.clone())
    }

    fn children(&self, id: &DeclId) -> Vec<Arc<Declaration>> {
        self.children
            .get(id)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter_map(|&idx| self.topology.node_weight(idx))
                    .map(|node| node.decl.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
