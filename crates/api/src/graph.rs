use crate::error::ApiResult;
use crate::models::{DeclId, Declaration, Reference};
use std::path::Path;
use std::sync::Arc;

/// Text of one source file as indexed.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub path: std::path::PathBuf,
    pub package: Option<String>,
    pub text: Arc<str>,
    /// Top-level type declarations in source order.
    pub top_level: Vec<DeclId>,
}

/// Read-only view of a project's symbol graph.
///
/// Implementations are shared between concurrent resolutions, so every
/// method takes `&self` and must be safe to call from several threads.
pub trait SymbolGraph: Send + Sync {
    /// Look up a declaration by qualified name.
    fn resolve(&self, qualified_name: &str) -> ApiResult<Arc<Declaration>>;

    /// Innermost declaration enclosing a zero-based position in a file.
    fn resolve_site(&self, path: &Path, line: usize, col: usize) -> ApiResult<Arc<Declaration>>;

    /// Outgoing references of a declaration in source order, unresolved ones included.
    fn direct_references(&self, id: &DeclId) -> Vec<Reference>;

    /// Own source text of a project declaration; `None` for library declarations.
    fn source_text(&self, id: &DeclId) -> Option<String>;

    /// Indexed text of the file that defines `path`.
    fn compilation_unit(&self, path: &Path) -> Option<CompilationUnit>;

    /// Directly enclosed declarations, in source order.
    fn children(&self, id: &DeclId) -> Vec<Arc<Declaration>>;
}
