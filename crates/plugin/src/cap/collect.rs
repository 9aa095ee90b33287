use crate::model::{ImportContext, ParsedDeclaration};
use liteworkspace_api::models::{DeclId, Declaration, LibraryCoordinate, Reference};
use std::sync::Arc;

/// Project-wide declaration lookup available while binding references.
pub trait SymbolTable: Send + Sync {
    /// Project declaration with this qualified name.
    fn declaration(&self, qualified_name: &str) -> Option<Arc<Declaration>>;

    /// Imports of the file that declares `id`.
    fn imports_of(&self, id: &DeclId) -> Option<Arc<ImportContext>>;

    /// Supertype names of a project type, as written in its header.
    fn supertypes_of(&self, id: &DeclId) -> Vec<String>;

    /// Project methods with this simple name, in index order.
    fn methods_named(&self, name: &str) -> Vec<DeclId>;

    /// Whether any project file declares this package.
    fn is_project_package(&self, package: &str) -> bool;

    /// Configured library owning a foreign package, if any.
    fn library_for_package(&self, package: &str) -> Option<LibraryCoordinate>;
}

/// Bound references of one declaration.
#[derive(Debug, Clone, Default)]
pub struct CollectedReferences {
    pub references: Vec<Reference>,
    /// Library declarations targeted by `references`, in first-use order.
    pub libraries: Vec<Declaration>,
}

/// Binds raw use sites to declarations.
///
/// Never fails: a site that cannot be bound becomes an `Unresolved` reference.
pub trait ReferenceCollector: Send + Sync {
    fn collect(
        &self,
        parsed: &ParsedDeclaration,
        imports: &ImportContext,
        table: &dyn SymbolTable,
    ) -> CollectedReferences;
}
