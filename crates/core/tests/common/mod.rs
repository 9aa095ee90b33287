use liteworkspace_api::CompilationUnit;
use liteworkspace_api::models::{
    ByteSpan, DeclId, DeclKind, DeclOrigin, DeclShape, Declaration, LibraryCoordinate, Range,
    Reference, ReferenceKind, SourceLocation, SourceScope,
};
use liteworkspace_core::SymbolIndex;
use liteworkspace_plugin::{RenderMode, RenderNode, SourceRenderer, StubBodyStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ROOT: &str = "/proj";

/// Builds a small in-memory index without parsing anything.
///
/// Every top-level type gets its own file; each declaration occupies one
/// line `decl <id>` of that file so spans and source text are real.
#[derive(Default)]
pub struct Fixture {
    decls: Vec<Declaration>,
    libraries: Vec<Declaration>,
    references: Vec<(DeclId, Reference)>,
    finals: Vec<DeclId>,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, id: &str) -> Self {
        self.decls.push(project(id, DeclKind::Class, None, SourceScope::Main));
        self
    }

    pub fn test_class(mut self, id: &str) -> Self {
        self.decls.push(project(id, DeclKind::Class, None, SourceScope::Test));
        self
    }

    pub fn method(mut self, id: &str) -> Self {
        let owner = DeclId::new(id).qualifier().map(str::to_string);
        let scope = self
            .decls
            .iter()
            .find(|d| Some(d.id.as_str()) == owner.as_deref())
            .map(|d| d.scope)
            .unwrap_or_default();
        self.decls
            .push(project(id, DeclKind::Method, owner.as_deref(), scope));
        self
    }

    pub fn field(mut self, id: &str) -> Self {
        let owner = DeclId::new(id).qualifier().map(str::to_string);
        self.decls
            .push(project(id, DeclKind::Field, owner.as_deref(), SourceScope::Main));
        self
    }

    /// A `final` field declared without a value.
    pub fn blank_final(mut self, id: &str) -> Self {
        self = self.field(id);
        self.finals.push(DeclId::new(id));
        self
    }

    pub fn constructor(mut self, owner: &str) -> Self {
        let id = DeclId::constructor(&DeclId::new(owner));
        self.decls.push(project(
            id.as_str(),
            DeclKind::Constructor,
            Some(owner),
            SourceScope::Main,
        ));
        self
    }

    pub fn library(mut self, id: &str, coordinate: &str) -> Self {
        let coordinate: LibraryCoordinate = coordinate.parse().unwrap();
        self.libraries
            .push(Declaration::library(DeclId::new(id), coordinate));
        self
    }

    pub fn reference(mut self, from: &str, to: &str, kind: ReferenceKind) -> Self {
        let target = DeclId::new(to);
        let name = target.simple_name().to_string();
        self.references.push((
            DeclId::new(from),
            Reference::resolved(DeclId::new(from), target, kind, name),
        ));
        self
    }

    pub fn unresolved(mut self, from: &str, name: &str) -> Self {
        self.references
            .push((DeclId::new(from), Reference::unresolved(DeclId::new(from), name)));
        self
    }

    pub fn build(self) -> SymbolIndex {
        let mut decls = self.decls;
        let finals = self.finals;
        let mut builder = SymbolIndex::builder(ROOT);

        let top_level: Vec<DeclId> = decls
            .iter()
            .filter(|d| d.parent.is_none())
            .map(|d| d.id.clone())
            .collect();

        for top in &top_level {
            let path = file_of(top);
            let mut text = String::new();
            let members: Vec<usize> = decls
                .iter()
                .enumerate()
                .filter(|(_, d)| d.id == *top || d.id.as_str().starts_with(&format!("{}.", top)))
                .map(|(i, _)| i)
                .collect();
            for &i in &members {
                let start = text.len();
                text.push_str(&format!("decl {}\n", decls[i].id));
                let line = text.lines().count() - 1;
                set_location(&mut decls[i], &path, ByteSpan::new(start, text.len() - 1), line);
                if finals.contains(&decls[i].id) {
                    if let Some(location) = decls[i].location.as_mut() {
                        location.shape.modifiers = vec!["final".to_string()];
                    }
                }
            }
            // The type spans its whole file.
            if let Some(i) = decls.iter().position(|d| d.id == *top) {
                let last_line = text.lines().count().saturating_sub(1);
                if let Some(location) = decls[i].location.as_mut() {
                    location.shape.span = ByteSpan::new(0, text.len());
                    location.range.end_line = last_line;
                    location.range.end_col = 200;
                }
            }
            builder.add_unit(CompilationUnit {
                path: path.clone(),
                package: DeclId::new(top.as_str()).qualifier().map(str::to_string),
                text: Arc::from(text.as_str()),
                top_level: vec![top.clone()],
            });
        }

        for decl in decls {
            builder.add_declaration(decl);
        }
        for lib in self.libraries {
            builder.add_declaration(lib);
        }

        let mut grouped: Vec<(DeclId, Vec<Reference>)> = Vec::new();
        for (from, reference) in self.references {
            match grouped.iter_mut().find(|(id, _)| *id == from) {
                Some((_, refs)) => refs.push(reference),
                None => grouped.push((from, vec![reference])),
            }
        }
        for (from, refs) in grouped {
            builder.set_references(&from, refs);
        }
        builder.build()
    }
}

fn project(id: &str, kind: DeclKind, parent: Option<&str>, scope: SourceScope) -> Declaration {
    let id = DeclId::new(id);
    Declaration {
        name: id.simple_name().to_string(),
        id,
        kind,
        origin: DeclOrigin::Project {
            module: "app".to_string(),
        },
        scope,
        parent: parent.map(DeclId::new),
        location: None,
    }
}

fn set_location(decl: &mut Declaration, path: &Path, span: ByteSpan, line: usize) {
    decl.location = Some(SourceLocation {
        path: path.to_path_buf(),
        range: Range {
            start_line: line,
            start_col: 0,
            end_line: line,
            end_col: span.len(),
        },
        shape: DeclShape {
            span,
            ..Default::default()
        },
    });
}

pub fn file_of(top: &DeclId) -> PathBuf {
    Path::new(ROOT).join(format!("{}.java", top.as_str().replace('.', "/")))
}

/// Renders one line per planned declaration: `<mode> <id>`, children indented.
pub struct OutlineRenderer;

impl OutlineRenderer {
    fn write(node: &RenderNode, depth: usize, out: &mut String) {
        let mode = match node.mode {
            RenderMode::Full => "full",
            RenderMode::Stub => "stub",
            RenderMode::Shell => "shell",
        };
        out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), mode, node.decl.id));
        for child in &node.children {
            Self::write(child, depth + 1, out);
        }
    }
}

impl SourceRenderer for OutlineRenderer {
    fn relative_path(&self, unit: &CompilationUnit) -> PathBuf {
        unit.path.strip_prefix(ROOT).unwrap_or(&unit.path).to_path_buf()
    }

    fn render(&self, _unit: &CompilationUnit, plan: &[RenderNode], _style: StubBodyStyle) -> String {
        let mut out = String::new();
        for node in plan {
            Self::write(node, 0, &mut out);
        }
        out
    }
}
