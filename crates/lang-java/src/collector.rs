//! Binds raw use sites to project or library declarations.

use crate::parser::method_alias;
use crate::lang::{OBJECT_METHODS, is_array_type, is_java_lang, is_primitive, split_package, strip_generics};
use indexmap::IndexMap;
use liteworkspace_api::models::{
    DeclId, DeclKind, Declaration, LibraryCoordinate, Reference, dedup_references,
};
use liteworkspace_plugin::{
    CollectedReferences, ImportContext, MemberSite, ParsedDeclaration, RawReceiver, RawReference,
    RawTarget, ReferenceCollector, SymbolTable,
};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct JavaCollector;

impl ReferenceCollector for JavaCollector {
    fn collect(
        &self,
        parsed: &ParsedDeclaration,
        imports: &ImportContext,
        table: &dyn SymbolTable,
    ) -> CollectedReferences {
        let mut binder = Binder::new(&parsed.decl, imports, table);
        for raw in &parsed.references {
            binder.bind(raw);
        }
        binder.finish()
    }
}

/// A type as seen from a use site.
#[derive(Debug, Clone)]
enum TypeTarget {
    Project(Arc<Declaration>),
    Library(DeclId, LibraryCoordinate),
    Unknown,
}

/// Outcome of looking up a member on a type and its supertypes.
#[derive(Debug, Clone)]
enum MemberLookup {
    Found(Arc<Declaration>),
    /// Inherited from a library supertype.
    Library(DeclId, LibraryCoordinate),
    Missing,
}

/// What a receiver expression evaluates to.
#[derive(Debug, Clone)]
enum ReceiverType {
    Known(TypeTarget),
    /// Arrays and members of library types: nothing to bind.
    Foreign,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Method,
    Field,
}

impl MemberKind {
    fn matches(self, kind: DeclKind) -> bool {
        match self {
            MemberKind::Method => kind == DeclKind::Method,
            MemberKind::Field => kind == DeclKind::Field,
        }
    }
}

struct Binder<'a> {
    source: &'a Declaration,
    imports: &'a ImportContext,
    table: &'a dyn SymbolTable,
    /// Enclosing types, innermost first.
    chain: Vec<Arc<Declaration>>,
    references: Vec<Reference>,
    libraries: IndexMap<DeclId, Declaration>,
}

impl<'a> Binder<'a> {
    fn new(source: &'a Declaration, imports: &'a ImportContext, table: &'a dyn SymbolTable) -> Self {
        let start = if source.kind.is_type() {
            Some(source.id.clone())
        } else {
            source.parent.clone()
        };
        let chain = enclosing_chain(table, start);
        Self {
            source,
            imports,
            table,
            chain,
            references: Vec::new(),
            libraries: IndexMap::new(),
        }
    }

    fn finish(self) -> CollectedReferences {
        CollectedReferences {
            references: dedup_references(self.references),
            libraries: self.libraries.into_values().collect(),
        }
    }

    fn push_project(&mut self, raw: &RawReference, target: &DeclId, name: &str) {
        // A type carries its members already.
        if self.source.kind.is_type() && is_within(target, &self.source.id) {
            return;
        }
        if *target == self.source.id {
            return;
        }
        self.push(raw, Reference::resolved(self.source.id.clone(), target.clone(), raw.kind, name));
    }

    fn push_library(&mut self, raw: &RawReference, id: DeclId, coordinate: LibraryCoordinate, name: &str) {
        self.libraries
            .entry(id.clone())
            .or_insert_with(|| Declaration::library(id.clone(), coordinate));
        self.push(raw, Reference::resolved(self.source.id.clone(), id, raw.kind, name));
    }

    fn push_unresolved(&mut self, raw: &RawReference, name: &str) {
        self.push(raw, Reference::unresolved(self.source.id.clone(), name));
    }

    fn push(&mut self, raw: &RawReference, reference: Reference) {
        let reference = match raw.range {
            Some(range) => reference.with_range(range),
            None => reference,
        };
        self.references.push(reference);
    }

    fn bind(&mut self, raw: &RawReference) {
        match &raw.target {
            RawTarget::Type(name) => self.bind_type(raw, name),
            RawTarget::Call(site) => self.bind_member(raw, site, MemberKind::Method),
            RawTarget::Field(site) => self.bind_member(raw, site, MemberKind::Field),
            RawTarget::ImplicitField(name) => match self.implicit_member(name, MemberKind::Field) {
                Some(found) => self.push_lookup(raw, found, name),
                None => self.unknown_identifier(raw, name),
            },
        }
    }

    fn bind_type(&mut self, raw: &RawReference, name: &str) {
        match self.resolve_type(name, self.imports, &self.chain) {
            TypeTarget::Project(decl) => self.push_project(raw, &decl.id, name),
            TypeTarget::Library(id, coordinate) => self.push_library(raw, id, coordinate, name),
            TypeTarget::Unknown => self.push_unresolved(raw, name),
        }
    }

    fn push_lookup(&mut self, raw: &RawReference, lookup: MemberLookup, name: &str) {
        match lookup {
            MemberLookup::Found(decl) => self.push_project(raw, &decl.id, name),
            MemberLookup::Library(id, coordinate) => self.push_library(raw, id, coordinate, name),
            MemberLookup::Missing => {}
        }
    }

    fn bind_member(&mut self, raw: &RawReference, site: &MemberSite, kind: MemberKind) {
        let name = site.name.as_str();
        if site.receiver == RawReceiver::Implicit {
            match self.implicit_member(name, kind) {
                Some(found) => self.push_lookup(raw, found, name),
                None => self.unbound_member(raw, site, kind),
            }
            return;
        }
        match self.receiver_type(&site.receiver) {
            ReceiverType::Known(TypeTarget::Project(owner)) => {
                match self.member_or_fallback(&owner, name, kind) {
                    MemberLookup::Missing => self.unbound_member(raw, site, kind),
                    found => self.push_lookup(raw, found, name),
                }
            }
            ReceiverType::Known(TypeTarget::Library(id, coordinate)) => {
                self.push_library(raw, id, coordinate, name)
            }
            ReceiverType::Known(TypeTarget::Unknown) | ReceiverType::Unknown => {
                self.unbound_member(raw, site, kind)
            }
            ReceiverType::Foreign => {}
        }
    }

    /// Last resort for a member with no bound receiver.
    fn unbound_member(&mut self, raw: &RawReference, site: &MemberSite, kind: MemberKind) {
        let name = site.name.as_str();
        if kind == MemberKind::Method && OBJECT_METHODS.contains(&name) {
            return;
        }
        // `Missing.call()` or `Missing.FIELD` on a type name nobody declares.
        if let RawReceiver::Name(receiver) = &site.receiver {
            let is_field = matches!(self.field_in_chain(receiver), Some(MemberLookup::Found(_)));
            if looks_like_type(receiver) && !is_field {
                self.push_unresolved(raw, receiver);
                return;
            }
        }
        if kind == MemberKind::Field {
            return;
        }
        let candidates = self.table.methods_named(name);
        match candidates.as_slice() {
            [only] => {
                let only = only.clone();
                self.push_project(raw, &only, name);
            }
            _ => self.push_unresolved(raw, &display_site(site)),
        }
    }

    /// A bare identifier that is neither a local nor a visible field. Only
    /// class-like names that no type lookup resolves are reported; constant
    /// names are left alone since they may be enum labels of a `switch`.
    fn unknown_identifier(&mut self, raw: &RawReference, name: &str) {
        if !looks_like_class(name) {
            return;
        }
        if let TypeTarget::Unknown = self.resolve_type(name, self.imports, &self.chain) {
            self.push_unresolved(raw, name);
        }
    }

    /// Receiver-less member: enclosing types, then static imports.
    fn implicit_member(&self, name: &str, kind: MemberKind) -> Option<MemberLookup> {
        for ty in &self.chain {
            match self.member_or_fallback(ty, name, kind) {
                MemberLookup::Missing => continue,
                found => return Some(found),
            }
        }
        if let Some(owner) = self.imports.static_owner(name) {
            match self.resolve_type(owner, self.imports, &[]) {
                TypeTarget::Project(owner) => {
                    if let MemberLookup::Found(decl) = self.find_member(&owner, name, kind) {
                        return Some(MemberLookup::Found(decl));
                    }
                }
                TypeTarget::Library(id, coordinate) => {
                    return Some(MemberLookup::Library(id, coordinate));
                }
                TypeTarget::Unknown => {}
            }
        }
        let mut library_owner = None;
        for owner in &self.imports.static_on_demand {
            match self.resolve_type(owner, self.imports, &[]) {
                TypeTarget::Project(owner) => {
                    if let MemberLookup::Found(decl) = self.find_member(&owner, name, kind) {
                        return Some(MemberLookup::Found(decl));
                    }
                }
                TypeTarget::Library(id, coordinate) => {
                    library_owner.get_or_insert(MemberLookup::Library(id, coordinate));
                }
                TypeTarget::Unknown => {}
            }
        }
        library_owner
    }

    fn field_in_chain(&self, name: &str) -> Option<MemberLookup> {
        self.chain
            .iter()
            .map(|ty| self.find_member(ty, name, MemberKind::Field))
            .find(|found| !matches!(found, MemberLookup::Missing))
    }

    /// `find_member`, then the members every enum and record has implicitly.
    fn member_or_fallback(&self, owner: &Arc<Declaration>, name: &str, kind: MemberKind) -> MemberLookup {
        match self.find_member(owner, name, kind) {
            MemberLookup::Missing => {}
            found => return found,
        }
        let nested = self
            .table
            .declaration(&format!("{}.{}", owner.id, name))
            .filter(|d| d.kind.is_type());
        if let Some(nested) = nested {
            return MemberLookup::Found(nested);
        }
        if kind == MemberKind::Method
            && matches!(owner.kind, DeclKind::Enum | DeclKind::Record)
            && !OBJECT_METHODS.contains(&name)
        {
            return MemberLookup::Found(owner.clone());
        }
        MemberLookup::Missing
    }

    /// Member declared on `owner` or inherited from its supertypes.
    fn find_member(&self, owner: &Arc<Declaration>, name: &str, kind: MemberKind) -> MemberLookup {
        let mut visited = HashSet::new();
        self.find_member_in(owner, name, kind, &mut visited)
    }

    fn find_member_in(
        &self,
        owner: &Arc<Declaration>,
        name: &str,
        kind: MemberKind,
        visited: &mut HashSet<DeclId>,
    ) -> MemberLookup {
        if !visited.insert(owner.id.clone()) {
            return MemberLookup::Missing;
        }
        if let Some(member) = self.declared_member(&owner.id, name, kind) {
            return MemberLookup::Found(member);
        }
        let mut library = None;
        for supertype in self.table.supertypes_of(&owner.id) {
            match self.resolve_in_context_of(&supertype, owner) {
                TypeTarget::Project(parent) => match self.find_member_in(&parent, name, kind, visited) {
                    MemberLookup::Missing => {}
                    found => return found,
                },
                TypeTarget::Library(id, coordinate) => {
                    library.get_or_insert(MemberLookup::Library(id, coordinate));
                }
                TypeTarget::Unknown => {}
            }
        }
        library.unwrap_or(MemberLookup::Missing)
    }

    /// Member declared directly on `owner`. A method sharing its name with
    /// a field is indexed as `name()`.
    fn declared_member(&self, owner: &DeclId, name: &str, kind: MemberKind) -> Option<Arc<Declaration>> {
        let plain = DeclId::new(format!("{}.{}", owner, name));
        let found = self.table.declaration(plain.as_str()).filter(|d| kind.matches(d.kind));
        match (found, kind) {
            (Some(member), _) => Some(member),
            (None, MemberKind::Method) => self
                .table
                .declaration(method_alias(&plain).as_str())
                .filter(|d| kind.matches(d.kind)),
            (None, MemberKind::Field) => None,
        }
    }

    /// Resolves a type name as written in the file that declares `anchor`.
    fn resolve_in_context_of(&self, name: &str, anchor: &Arc<Declaration>) -> TypeTarget {
        let imports = self.table.imports_of(&anchor.id);
        let chain = if anchor.kind.is_type() {
            enclosing_chain(self.table, Some(anchor.id.clone()))
        } else {
            enclosing_chain(self.table, anchor.parent.clone())
        };
        match imports {
            Some(imports) => self.resolve_type(name, &imports, &chain),
            None => self.resolve_type(name, self.imports, &chain),
        }
    }

    fn receiver_type(&self, receiver: &RawReceiver) -> ReceiverType {
        match receiver {
            RawReceiver::Implicit => self
                .chain
                .first()
                .map_or(ReceiverType::Unknown, |t| ReceiverType::Known(TypeTarget::Project(t.clone()))),
            RawReceiver::Super => {
                let Some(current) = self.chain.first() else {
                    return ReceiverType::Unknown;
                };
                self.table
                    .supertypes_of(&current.id)
                    .iter()
                    .map(|s| self.resolve_in_context_of(s, current))
                    .find(|t| !matches!(t, TypeTarget::Unknown))
                    .map_or(ReceiverType::Unknown, ReceiverType::Known)
            }
            RawReceiver::Typed(ty) | RawReceiver::New(ty) => self.typed(ty, None),
            RawReceiver::Name(name) => {
                let field = self.field_in_chain(name);
                if let Some(MemberLookup::Found(field)) = &field {
                    return self.declared_type_of(field);
                }
                match self.resolve_type(name, self.imports, &self.chain) {
                    TypeTarget::Unknown if field.is_some() => ReceiverType::Foreign,
                    TypeTarget::Unknown => ReceiverType::Unknown,
                    known => ReceiverType::Known(known),
                }
            }
            RawReceiver::Call(site) | RawReceiver::Field(site) => {
                let kind = match receiver {
                    RawReceiver::Call(_) => MemberKind::Method,
                    _ => MemberKind::Field,
                };
                let lookup = match &site.receiver {
                    RawReceiver::Implicit => self
                        .implicit_member(&site.name, kind)
                        .unwrap_or(MemberLookup::Missing),
                    inner => match self.receiver_type(inner) {
                        ReceiverType::Known(TypeTarget::Project(owner)) => {
                            self.member_or_fallback(&owner, &site.name, kind)
                        }
                        ReceiverType::Known(TypeTarget::Library(..)) | ReceiverType::Foreign => {
                            return ReceiverType::Foreign;
                        }
                        _ => return ReceiverType::Unknown,
                    },
                };
                match lookup {
                    MemberLookup::Found(member) if member.kind.is_type() => {
                        // `Outer.Inner` read as a field access, or `Enum.valueOf(..)`.
                        if kind == MemberKind::Field || member.kind == DeclKind::Enum {
                            ReceiverType::Known(TypeTarget::Project(member))
                        } else {
                            ReceiverType::Unknown
                        }
                    }
                    MemberLookup::Found(member) => self.declared_type_of(&member),
                    MemberLookup::Library(..) => ReceiverType::Foreign,
                    MemberLookup::Missing => ReceiverType::Unknown,
                }
            }
            RawReceiver::Unknown => ReceiverType::Unknown,
        }
    }

    fn typed(&self, ty: &str, anchor: Option<&Arc<Declaration>>) -> ReceiverType {
        if is_array_type(ty) {
            return ReceiverType::Foreign;
        }
        let target = match anchor {
            Some(anchor) => self.resolve_in_context_of(ty, anchor),
            None => self.resolve_type(ty, self.imports, &self.chain),
        };
        match target {
            TypeTarget::Unknown => ReceiverType::Unknown,
            known => ReceiverType::Known(known),
        }
    }

    /// Return type of a method or type of a field, resolved where it is declared.
    fn declared_type_of(&self, member: &Arc<Declaration>) -> ReceiverType {
        match member.shape().and_then(|s| s.type_text.as_deref()) {
            Some(ty) if !is_primitive(ty.trim()) => self.typed(ty, Some(member)),
            Some(_) => ReceiverType::Foreign,
            None => ReceiverType::Unknown,
        }
    }

    fn resolve_type(&self, raw: &str, imports: &ImportContext, chain: &[Arc<Declaration>]) -> TypeTarget {
        let name = strip_generics(raw);
        if name.is_empty() {
            return TypeTarget::Unknown;
        }
        if !name.contains('.') {
            return self.resolve_simple(&name, imports, chain);
        }
        match split_package(&name) {
            (Some(package), rest) => self.resolve_in_package(&package, &rest),
            (None, rest) => {
                let (head, tail) = rest.split_once('.').unwrap_or((rest.as_str(), ""));
                if !head.starts_with(char::is_uppercase) {
                    return TypeTarget::Unknown;
                }
                match self.resolve_simple(head, imports, chain) {
                    TypeTarget::Project(outer) => self
                        .table
                        .declaration(&format!("{}.{}", outer.id, tail))
                        .map_or(TypeTarget::Unknown, TypeTarget::Project),
                    other => other,
                }
            }
        }
    }

    /// `pkg` + `Outer.Inner`.
    fn resolve_in_package(&self, package: &str, rest: &str) -> TypeTarget {
        if let Some(decl) = self.table.declaration(&format!("{}.{}", package, rest)) {
            return TypeTarget::Project(decl);
        }
        if self.table.is_project_package(package) {
            return TypeTarget::Unknown;
        }
        let outer = rest.split('.').next().unwrap_or(rest);
        TypeTarget::Library(
            DeclId::new(format!("{}.{}", package, outer)),
            self.coordinate_for(package),
        )
    }

    fn resolve_simple(&self, name: &str, imports: &ImportContext, chain: &[Arc<Declaration>]) -> TypeTarget {
        for ty in chain {
            if ty.name == name {
                return TypeTarget::Project(ty.clone());
            }
            let nested = self
                .table
                .declaration(&format!("{}.{}", ty.id, name))
                .filter(|d| d.kind.is_type());
            if let Some(nested) = nested {
                return TypeTarget::Project(nested);
            }
        }
        if let Some(qualified) = imports.single_import(name) {
            return match split_package(qualified) {
                (Some(package), rest) => self.resolve_in_package(&package, &rest),
                (None, _) => TypeTarget::Unknown,
            };
        }
        let same_package = match &imports.package {
            Some(package) => format!("{}.{}", package, name),
            None => name.to_string(),
        };
        if let Some(decl) = self.table.declaration(&same_package) {
            return TypeTarget::Project(decl);
        }
        if is_java_lang(name) {
            return TypeTarget::Library(
                DeclId::new(format!("java.lang.{}", name)),
                LibraryCoordinate::jdk(),
            );
        }
        for package in &imports.on_demand {
            if let Some(decl) = self.table.declaration(&format!("{}.{}", package, name)) {
                return TypeTarget::Project(decl);
            }
        }
        // No project type matches: the first foreign wildcard import claims it.
        imports
            .on_demand
            .iter()
            .find(|p| !self.table.is_project_package(p))
            .map_or(TypeTarget::Unknown, |package| {
                TypeTarget::Library(
                    DeclId::new(format!("{}.{}", package, name)),
                    self.coordinate_for(package),
                )
            })
    }

    fn coordinate_for(&self, package: &str) -> LibraryCoordinate {
        self.table
            .library_for_package(package)
            .unwrap_or_else(|| LibraryCoordinate::inferred(package))
    }
}

/// `start` and its enclosing types, innermost first.
fn enclosing_chain(table: &dyn SymbolTable, start: Option<DeclId>) -> Vec<Arc<Declaration>> {
    let mut chain = Vec::new();
    let mut next = start;
    while let Some(id) = next {
        let Some(decl) = table.declaration(id.as_str()) else {
            break;
        };
        next = decl.parent.clone();
        if decl.kind.is_type() {
            chain.push(decl);
        }
    }
    chain
}

fn is_within(id: &DeclId, ancestor: &DeclId) -> bool {
    id.as_str()
        .strip_prefix(ancestor.as_str())
        .is_some_and(|rest| rest.starts_with('.'))
}

fn looks_like_type(name: &str) -> bool {
    name.starts_with(char::is_uppercase)
}

/// `LegacyHelper`, not `LIMIT`.
fn looks_like_class(name: &str) -> bool {
    looks_like_type(name) && name.chars().any(char::is_lowercase)
}

fn display_site(site: &MemberSite) -> String {
    match &site.receiver {
        RawReceiver::Name(receiver) => format!("{}.{}", receiver, site.name),
        RawReceiver::Typed(ty) | RawReceiver::New(ty) => {
            format!("{}.{}", strip_generics(ty), site.name)
        }
        _ => site.name.clone(),
    }
}
