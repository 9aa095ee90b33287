//! Mutable builder for `SymbolIndex`
//!
//! Declarations are added first, references afterwards so that every edge
//! can find its endpoints.

use super::{FileEntry, IndexNode, SymbolIndex};
use liteworkspace_api::CompilationUnit;
use liteworkspace_api::models::{DeclId, Declaration, Reference, ReferenceKind};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub struct SymbolIndexBuilder {
    inner: SymbolIndex,
}

impl SymbolIndexBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            inner: SymbolIndex {
                root: root.into(),
                topology: StableDiGraph::new(),
                fqn_index: HashMap::new(),
                children: HashMap::new(),
                file_index: HashMap::new(),
            },
        }
    }

    /// Register the text of a file. Declarations located in it are attached as they are added.
    pub fn add_unit(&mut self, unit: CompilationUnit) {
        self.inner
            .file_index
            .entry(unit.path.clone())
            .and_modify(|e| e.unit = unit.clone())
            .or_insert(FileEntry {
                unit,
                nodes: Vec::new(),
            });
    }

    /// Add a declaration; an existing one with the same id is kept.
    pub fn add_declaration(&mut self, decl: impl Into<Arc<Declaration>>) -> NodeIndex {
        let decl = decl.into();
        if let Some(&idx) = self.inner.fqn_index.get(&decl.id) {
            return idx;
        }

        let id = decl.id.clone();
        let parent = decl.parent.clone();
        let path = decl.path().map(|p| p.to_path_buf());

        let idx = self.inner.topology.add_node(IndexNode {
            decl,
            references: Vec::new(),
        });
        self.inner.fqn_index.insert(id, idx);

        if let Some(parent) = parent {
            self.inner.children.entry(parent).or_default().push(idx);
        }
        if let Some(path) = path {
            self.inner
                .file_index
                .entry(path.clone())
                .or_insert_with(|| FileEntry {
                    unit: CompilationUnit {
                        path,
                        package: None,
                        text: Arc::from(""),
                        top_level: Vec::new(),
                    },
                    nodes: Vec::new(),
                })
                .nodes
                .push(idx);
        }
        idx
    }

    /// Replace the outgoing references of `source`.
    ///
    /// Edges are added for targets already present; references to
    /// unknown targets are kept on the node but produce no edge.
    pub fn set_references(&mut self, source: &DeclId, references: Vec<Reference>) {
        let Some(&from) = self.inner.fqn_index.get(source) else {
            debug!("Dropping references of unknown declaration {}", source);
            return;
        };
        for reference in &references {
            let Some(target) = &reference.target else {
                continue;
            };
            if let Some(&to) = self.inner.fqn_index.get(target) {
                self.add_edge(from, to, reference.kind);
            }
        }
        if let Some(node) = self.inner.topology.node_weight_mut(from) {
            node.references = references;
        }
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: ReferenceKind) {
        let already_exists = self
            .inner
            .topology
            .edges_connecting(from, to)
            .any(|e| *e.weight() == kind);

        if !already_exists {
            self.inner.topology.add_edge(from, to, kind);
        }
    }

    pub fn build(self) -> SymbolIndex {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liteworkspace_api::SymbolGraph;
    use liteworkspace_api::models::{
        ByteSpan, DeclKind, DeclOrigin, DeclShape, LibraryCoordinate, Range, SourceLocation,
        SourceScope,
    };
    use std::path::Path;

    fn project_decl(id: &str, kind: DeclKind, parent: Option<&str>, path: &str, span: ByteSpan) -> Declaration {
        let id = DeclId::new(id);
        Declaration {
            name: id.simple_name().to_string(),
            id,
            kind,
            origin: DeclOrigin::Project { module: "app".into() },
            scope: SourceScope::Main,
            parent: parent.map(DeclId::new),
            location: Some(SourceLocation {
                path: PathBuf::from(path),
                range: Range {
                    start_line: 0,
                    start_col: span.start,
                    end_line: 0,
                    end_col: span.end,
                },
                shape: DeclShape {
                    span,
                    ..Default::default()
                },
            }),
        }
    }

    #[test]
    fn builds_lookup_children_and_edges() {
        let text = "class A { void f() {} }";
        let mut builder = SymbolIndexBuilder::new("/p");
        builder.add_unit(CompilationUnit {
            path: PathBuf::from("/p/A.java"),
            package: None,
            text: Arc::from(text),
            top_level: vec![DeclId::new("A")],
        });
        builder.add_declaration(project_decl("A", DeclKind::Class, None, "/p/A.java", ByteSpan::new(0, 23)));
        builder.add_declaration(project_decl("A.f", DeclKind::Method, Some("A"), "/p/A.java", ByteSpan::new(10, 21)));
        builder.add_declaration(Declaration::library(
            DeclId::new("java.lang.String"),
            LibraryCoordinate::jdk(),
        ));

        let f = DeclId::new("A.f");
        let to_string = Reference::resolved(
            f.clone(),
            DeclId::new("java.lang.String"),
            ReferenceKind::Type,
            "String",
        );
        builder.set_references(&f, vec![to_string.clone(), to_string.clone()]);
        let index = builder.build();

        assert_eq!(index.node_count(), 3);
        assert_eq!(index.edge_count(), 1);
        assert_eq!(index.direct_references(&f).len(), 2);
        assert_eq!(index.source_text(&f).as_deref(), Some("void f() {}"));
        assert_eq!(index.children(&DeclId::new("A"))[0].id, f);
        assert!(index.source_text(&DeclId::new("java.lang.String")).is_none());
        assert_eq!(index.referrers("java.lang.String")[0].0.id, f);
    }

    #[test]
    fn resolve_site_picks_innermost_declaration() {
        let mut builder = SymbolIndexBuilder::new("/p");
        builder.add_declaration(project_decl("A", DeclKind::Class, None, "/p/A.java", ByteSpan::new(0, 23)));
        builder.add_declaration(project_decl("A.f", DeclKind::Method, Some("A"), "/p/A.java", ByteSpan::new(10, 21)));
        let index = builder.build();

        assert_eq!(index.resolve_site(Path::new("/p/A.java"), 0, 12).unwrap().id.as_str(), "A.f");
        assert_eq!(index.resolve_site(Path::new("A.java"), 0, 2).unwrap().id.as_str(), "A");
        assert!(index.resolve_site(Path::new("B.java"), 0, 2).is_err());
        assert!(index.resolve("A.g").is_err());
    }
}
