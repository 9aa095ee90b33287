use super::refs::RefWalker;
use crate::lang::strip_generics;
use liteworkspace_api::models::{
    ByteSpan, DeclId, DeclKind, DeclOrigin, DeclShape, Declaration, ReferenceKind, SourceLocation,
};
use liteworkspace_plugin::utils::{node_text, range_from_ts, span_from_ts};
use liteworkspace_plugin::{ParsedDeclaration, RawReference, UnitContext};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use tree_sitter::Node;

/// An enclosing type declaration while its body is walked.
struct TypeFrame {
    id: DeclId,
    index: usize,
    kind: DeclKind,
    /// References of the type's own header.
    header: Vec<RawReference>,
    type_params: Vec<String>,
}

/// Collects the declarations of one compilation unit.
pub(crate) struct UnitWalker<'a> {
    source: &'a str,
    path: &'a Path,
    ctx: &'a UnitContext,
    package: Option<String>,
    stack: Vec<TypeFrame>,
    decls: Vec<ParsedDeclaration>,
    index_of: HashMap<DeclId, usize>,
    top_level: Vec<DeclId>,
}

fn type_kind(node_kind: &str) -> Option<DeclKind> {
    match node_kind {
        "class_declaration" => Some(DeclKind::Class),
        "interface_declaration" => Some(DeclKind::Interface),
        "enum_declaration" => Some(DeclKind::Enum),
        "record_declaration" => Some(DeclKind::Record),
        "annotation_type_declaration" => Some(DeclKind::Annotation),
        _ => None,
    }
}

fn modifier_keywords(node: Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let Some(modifiers) = node
        .named_children(&mut cursor)
        .find(|n| n.kind() == "modifiers")
    else {
        return Vec::new();
    };
    let mut inner = modifiers.walk();
    modifiers
        .children(&mut inner)
        .filter(|c| !matches!(c.kind(), "marker_annotation" | "annotation"))
        .map(|c| node_text(c, source).to_string())
        .collect()
}

fn type_param_names(node: Node, source: &str) -> Vec<String> {
    let Some(params) = node.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|p| {
            let mut inner = p.walk();
            let name = p
                .named_children(&mut inner)
                .find(|c| matches!(c.kind(), "type_identifier" | "identifier"));
            name.map(|n| node_text(n, source).to_string())
        })
        .collect()
}

impl<'a> UnitWalker<'a> {
    pub fn new(source: &'a str, path: &'a Path, ctx: &'a UnitContext, package: Option<String>) -> Self {
        Self {
            source,
            path,
            ctx,
            package,
            stack: Vec::new(),
            decls: Vec::new(),
            index_of: HashMap::new(),
            top_level: Vec::new(),
        }
    }

    pub fn finish(self) -> (Vec<DeclId>, Vec<ParsedDeclaration>) {
        debug!(
            "{}: {} declarations in {} top-level types",
            self.path.display(),
            self.decls.len(),
            self.top_level.len()
        );
        (self.top_level, self.decls)
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    pub fn walk_program(&mut self, root: Node) {
        let mut cursor = root.walk();
        let types: Vec<Node> = root
            .named_children(&mut cursor)
            .filter(|n| type_kind(n.kind()).is_some())
            .collect();
        for node in types {
            self.type_declaration(node);
        }
    }

    fn type_params_in_scope(&self) -> Vec<String> {
        self.stack
            .iter()
            .flat_map(|f| f.type_params.iter().cloned())
            .collect()
    }

    fn inherited_header(&self) -> Vec<RawReference> {
        self.stack.iter().flat_map(|f| f.header.iter().cloned()).collect()
    }

    fn walker(&self, extra_params: Vec<String>) -> RefWalker<'a> {
        let mut params = self.type_params_in_scope();
        params.extend(extra_params);
        RefWalker::new(self.source, params)
    }

    fn location(&self, node: Node, shape: DeclShape) -> SourceLocation {
        SourceLocation {
            path: self.path.to_path_buf(),
            range: range_from_ts(node),
            shape,
        }
    }

    fn declaration(&self, id: DeclId, name: &str, kind: DeclKind, node: Node, shape: DeclShape) -> Declaration {
        Declaration {
            id,
            name: name.to_string(),
            kind,
            origin: DeclOrigin::Project {
                module: self.ctx.module.clone(),
            },
            scope: self.ctx.scope,
            parent: self.stack.last().map(|f| f.id.clone()),
            location: Some(self.location(node, shape)),
        }
    }

    /// Own references also count for every enclosing type, since a type
    /// emitted in full carries its members.
    fn propagate(&mut self, refs: &[RawReference]) {
        for frame in &self.stack {
            self.decls[frame.index].references.extend(refs.iter().cloned());
        }
    }

    /// Adds a member, merging overloads that share an id.
    fn add_member(&mut self, mut decl: Declaration, own: Vec<RawReference>) {
        self.propagate(&own);
        // A field and a method may share a name; the method then takes `name()`.
        if let Some(&index) = self.index_of.get(&decl.id) {
            let existing = self.decls[index].decl.kind;
            if existing != decl.kind && decl.kind == DeclKind::Method {
                decl.id = method_alias(&decl.id);
            } else if existing != decl.kind && existing == DeclKind::Method {
                let alias = method_alias(&decl.id);
                self.index_of.remove(&decl.id);
                self.decls[index].decl.id = alias.clone();
                self.index_of.insert(alias, index);
            }
        }
        if let Some(&index) = self.index_of.get(&decl.id) {
            let existing = &mut self.decls[index];
            if existing.decl.kind != decl.kind {
                debug!("Skipping {} {}: the id is taken", decl.kind, decl.id);
                return;
            }
            if let (Some(location), Some(shape)) = (existing.decl.location.as_mut(), decl.shape()) {
                location.shape.overloads.push(shape.clone());
            }
            existing.references.extend(own);
            return;
        }
        let mut references = self.inherited_header();
        references.extend(own);
        self.index_of.insert(decl.id.clone(), self.decls.len());
        self.decls.push(ParsedDeclaration {
            decl,
            supertypes: Vec::new(),
            references,
        });
    }

    fn type_declaration(&mut self, node: Node) {
        let Some(kind) = type_kind(node.kind()) else {
            return;
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node);
        let id = match (self.stack.last(), &self.package) {
            (Some(outer), _) => DeclId::member(&outer.id, name),
            (None, Some(pkg)) => DeclId::new(format!("{}.{}", pkg, name)),
            (None, None) => DeclId::new(name),
        };
        if self.index_of.contains_key(&id) {
            debug!("Skipping duplicate type {}", id);
            return;
        }

        let own_params = type_param_names(node, self.source);
        let mut header = self.walker(own_params.clone());
        header.modifier_annotations(node);
        if let Some(params) = node.child_by_field_name("type_parameters") {
            header.type_parameters(params);
        }
        let mut supertypes = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "superclass" | "super_interfaces" | "extends_interfaces" => {
                    let mut inner = child.walk();
                    for ty in child.named_children(&mut inner) {
                        let listed: Vec<Node> = if ty.kind() == "type_list" {
                            let mut list = ty.walk();
                            ty.named_children(&mut list).collect()
                        } else {
                            vec![ty]
                        };
                        for ty in listed {
                            header.type_refs(ty, ReferenceKind::Supertype);
                            supertypes.push(strip_generics(self.text(ty)));
                        }
                    }
                }
                "formal_parameters" => header.parameters(child),
                _ => {}
            }
        }
        let header = header.finish();

        let body = node.child_by_field_name("body");
        let shape = DeclShape {
            span: span_from_ts(node),
            body: body.map(span_from_ts),
            enum_constants: body.and_then(enum_constant_span),
            modifiers: modifier_keywords(node, self.source),
            ..Default::default()
        };
        let decl = self.declaration(id.clone(), name, kind, node, shape);

        self.propagate(&header);
        let mut references = self.inherited_header();
        references.extend(header.iter().cloned());
        let index = self.decls.len();
        self.index_of.insert(id.clone(), index);
        self.decls.push(ParsedDeclaration {
            decl,
            supertypes,
            references,
        });
        if self.stack.is_empty() {
            self.top_level.push(id.clone());
        }

        self.stack.push(TypeFrame {
            id,
            index,
            kind,
            header,
            type_params: own_params,
        });
        if let Some(body) = body {
            self.type_body(body);
        }
        self.stack.pop();
    }

    fn type_body(&mut self, body: Node) {
        let mut cursor = body.walk();
        let members: Vec<Node> = body.named_children(&mut cursor).collect();
        for member in members {
            match member.kind() {
                "method_declaration" | "annotation_type_element_declaration" => {
                    self.method(member, DeclKind::Method)
                }
                "constructor_declaration" | "compact_constructor_declaration" => {
                    self.method(member, DeclKind::Constructor)
                }
                "field_declaration" | "constant_declaration" => self.field(member),
                "enum_constant" => self.enum_constant(member),
                // Members after the constant list of an enum.
                "enum_body_declarations" => self.type_body(member),
                "static_initializer" | "block" => {
                    let mut walker = self.walker(Vec::new());
                    walker.visit(member);
                    let refs = walker.finish();
                    self.propagate(&refs);
                }
                kind if type_kind(kind).is_some() => self.type_declaration(member),
                _ => {}
            }
        }
    }

    fn method(&mut self, node: Node, kind: DeclKind) {
        let Some(owner) = self.stack.last() else {
            return;
        };
        let (id, name) = if kind == DeclKind::Constructor {
            (DeclId::constructor(&owner.id), owner.id.simple_name().to_string())
        } else {
            let Some(name) = node.child_by_field_name("name") else {
                return;
            };
            let name = self.text(name).to_string();
            (DeclId::member(&owner.id, &name), name)
        };

        let mut walker = self.walker(type_param_names(node, self.source));
        walker.modifier_annotations(node);
        if let Some(params) = node.child_by_field_name("type_parameters") {
            walker.type_parameters(params);
        }
        let return_type = node.child_by_field_name("type");
        if let Some(ty) = return_type {
            walker.type_refs(ty, ReferenceKind::Type);
        }
        if let Some(params) = node.child_by_field_name("parameters") {
            walker.parameters(params);
        }
        let mut cursor = node.walk();
        let throws = node
            .named_children(&mut cursor)
            .find(|n| n.kind() == "throws");
        if let Some(throws) = throws {
            let mut inner = throws.walk();
            for ty in throws.named_children(&mut inner) {
                walker.type_refs(ty, ReferenceKind::Throws);
            }
        }
        let body = node.child_by_field_name("body");
        if let Some(body) = body {
            walker.visit(body);
        }
        if let Some(default) = node.child_by_field_name("value") {
            walker.visit(default);
        }
        let refs = walker.finish();

        let constructor_call = body.and_then(|b| {
            let mut cursor = b.walk();
            let first = b.named_children(&mut cursor).next();
            first
                .filter(|n| n.kind() == "explicit_constructor_invocation")
                .map(span_from_ts)
        });
        let shape = DeclShape {
            span: span_from_ts(node),
            body: body.map(span_from_ts),
            constructor_call,
            modifiers: modifier_keywords(node, self.source),
            type_text: return_type.map(|t| self.text(t).to_string()),
            ..Default::default()
        };
        let decl = self.declaration(id, &name, kind, node, shape);
        self.add_member(decl, refs);
    }

    fn field(&mut self, node: Node) {
        let Some(owner) = self.stack.last() else {
            return;
        };
        let owner = owner.id.clone();
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        let ty = node.child_by_field_name("type");
        let modifiers = modifier_keywords(node, self.source);

        for declarator in &declarators {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let name = self.text(name_node);

            let mut walker = self.walker(Vec::new());
            walker.modifier_annotations(node);
            if let Some(ty) = ty {
                walker.type_refs(ty, ReferenceKind::Type);
            }
            let value = declarator.child_by_field_name("value");
            if let Some(value) = value {
                walker.visit(value);
            }
            let refs = walker.finish();

            let initializer = match (declarators.len(), value) {
                (1, Some(value)) => {
                    let name_end = declarator
                        .child_by_field_name("dimensions")
                        .unwrap_or(name_node)
                        .end_byte();
                    Some(ByteSpan::new(name_end, value.end_byte()))
                }
                _ => None,
            };
            let shape = DeclShape {
                span: span_from_ts(node),
                initializer,
                modifiers: modifiers.clone(),
                type_text: ty.map(|t| self.text(t).to_string()),
                declarators: declarators.len(),
                ..Default::default()
            };
            let decl = self.declaration(DeclId::member(&owner, name), name, DeclKind::Field, node, shape);
            self.add_member(decl, refs);
        }
    }

    fn enum_constant(&mut self, node: Node) {
        let Some(owner) = self.stack.last() else {
            return;
        };
        if owner.kind != DeclKind::Enum {
            return;
        }
        let owner = owner.id.clone();
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node);

        let mut walker = self.walker(Vec::new());
        walker.modifier_annotations(node);
        if let Some(args) = node.child_by_field_name("arguments") {
            walker.visit(args);
        }
        if let Some(body) = node.child_by_field_name("body") {
            walker.visit(body);
        }
        let refs = walker.finish();

        let shape = DeclShape {
            span: span_from_ts(node),
            modifiers: vec!["public".into(), "static".into(), "final".into()],
            type_text: Some(owner.simple_name().to_string()),
            declarators: 1,
            ..Default::default()
        };
        let decl = self.declaration(DeclId::member(&owner, name), name, DeclKind::Field, node, shape);
        self.add_member(decl, refs);
    }
}

/// Id of a method whose plain id belongs to a field.
pub(crate) fn method_alias(id: &DeclId) -> DeclId {
    DeclId::new(format!("{}()", id))
}

/// From the first to the last constant of an enum body.
fn enum_constant_span(body: Node) -> Option<ByteSpan> {
    if body.kind() != "enum_body" {
        return None;
    }
    let mut cursor = body.walk();
    let constants: Vec<Node> = body
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "enum_constant")
        .collect();
    match (constants.first(), constants.last()) {
        (Some(first), Some(last)) => Some(ByteSpan::new(first.start_byte(), last.end_byte())),
        _ => None,
    }
}
