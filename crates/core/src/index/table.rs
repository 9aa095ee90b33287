use super::catalog::LibraryCatalog;
use liteworkspace_api::models::{DeclId, DeclKind, Declaration, LibraryCoordinate};
use liteworkspace_plugin::{ImportContext, ParsedUnit, SymbolTable};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Declarations of every parsed file, available while references are bound.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    decls: HashMap<DeclId, Arc<Declaration>>,
    imports: HashMap<DeclId, Arc<ImportContext>>,
    supertypes: HashMap<DeclId, Vec<String>>,
    methods: HashMap<String, Vec<DeclId>>,
    packages: HashSet<String>,
    catalog: LibraryCatalog,
}

impl DeclarationTable {
    pub fn new(catalog: LibraryCatalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn build(units: &[ParsedUnit], catalog: LibraryCatalog) -> Self {
        let mut table = Self::new(catalog);
        for unit in units {
            table.add_unit(unit);
        }
        table
    }

    pub fn add_unit(&mut self, unit: &ParsedUnit) {
        if let Some(package) = unit.package() {
            self.packages.insert(package.to_string());
        }
        for parsed in &unit.declarations {
            let decl = &parsed.decl;
            if self.decls.contains_key(&decl.id) {
                continue;
            }
            if decl.kind == DeclKind::Method {
                self.methods
                    .entry(decl.name.clone())
                    .or_default()
                    .push(decl.id.clone());
            }
            if !parsed.supertypes.is_empty() {
                self.supertypes.insert(decl.id.clone(), parsed.supertypes.clone());
            }
            self.imports.insert(decl.id.clone(), unit.imports.clone());
            self.decls.insert(decl.id.clone(), Arc::new(decl.clone()));
        }
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Shared handle to a project declaration, for building the index.
    pub fn shared(&self, id: &DeclId) -> Option<Arc<Declaration>> {
        self.decls.get(id).cloned()
    }
}

impl SymbolTable for DeclarationTable {
    fn declaration(&self, qualified_name: &str) -> Option<Arc<Declaration>> {
        self.decls.get(qualified_name).cloned()
    }

    fn imports_of(&self, id: &DeclId) -> Option<Arc<ImportContext>> {
        self.imports.get(id).cloned()
    }

    fn supertypes_of(&self, id: &DeclId) -> Vec<String> {
        self.supertypes.get(id).cloned().unwrap_or_default()
    }

    fn methods_named(&self, name: &str) -> Vec<DeclId> {
        self.methods.get(name).cloned().unwrap_or_default()
    }

    fn is_project_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    fn library_for_package(&self, package: &str) -> Option<LibraryCoordinate> {
        self.catalog.lookup(package)
    }
}
