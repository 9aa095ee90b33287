//! Use-site extraction from declaration headers and bodies.

use crate::lang::{is_primitive, strip_generics};
use liteworkspace_api::models::ReferenceKind;
use liteworkspace_plugin::utils::{node_text, range_from_ts};
use liteworkspace_plugin::{MemberSite, RawReceiver, RawReference, RawTarget};
use std::collections::{HashMap, HashSet};
use tree_sitter::Node;

/// Walks syntax below one declaration and records raw use sites.
///
/// Locals and parameters are tracked in a scope stack so that an
/// identifier receiver can be told apart from a field or a type name.
pub(crate) struct RefWalker<'a> {
    source: &'a str,
    skip_types: HashSet<String>,
    scopes: Vec<HashMap<String, Option<String>>>,
    out: Vec<RawReference>,
}

impl<'a> RefWalker<'a> {
    pub fn new(source: &'a str, type_params: impl IntoIterator<Item = String>) -> Self {
        Self {
            source,
            skip_types: type_params.into_iter().collect(),
            scopes: vec![HashMap::new()],
            out: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<RawReference> {
        self.out
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    pub fn declare(&mut self, name: &str, type_text: Option<String>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), type_text);
        }
    }

    fn local(&self, name: &str) -> Option<&Option<String>> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(HashMap::new());
        f(self);
        self.scopes.pop();
    }

    fn push_type(&mut self, kind: ReferenceKind, node: Node) {
        let name = strip_generics(self.text(node));
        if name.is_empty() || name == "var" || is_primitive(&name) {
            return;
        }
        let head = name.split('.').next().unwrap_or(&name);
        if self.skip_types.contains(head) {
            return;
        }
        self.out
            .push(RawReference::ty(kind, name, Some(range_from_ts(node))));
    }

    /// Type mentions inside a type node. `kind` applies to the outer type;
    /// generic arguments and bounds are always `Type`.
    pub fn type_refs(&mut self, node: Node, kind: ReferenceKind) {
        match node.kind() {
            "type_identifier" | "scoped_type_identifier" => self.push_type(kind, node),
            "generic_type" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "type_arguments" => self.type_refs(child, ReferenceKind::Type),
                        _ => self.type_refs(child, kind),
                    }
                }
            }
            "array_type" => {
                if let Some(element) = node.child_by_field_name("element") {
                    self.type_refs(element, kind);
                }
            }
            "annotated_type" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.type_refs(child, kind);
                }
            }
            "marker_annotation" | "annotation" => self.annotation(node),
            "type_arguments" | "wildcard" | "type_list" | "type_bound" | "catch_type" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.type_refs(child, ReferenceKind::Type);
                }
            }
            _ => {}
        }
    }

    pub fn annotation(&mut self, node: Node) {
        if let Some(name) = node.child_by_field_name("name") {
            self.out.push(RawReference::ty(
                ReferenceKind::Annotation,
                self.text(name),
                Some(range_from_ts(name)),
            ));
        }
    }

    /// Annotations among the modifiers of a declaration.
    pub fn modifier_annotations(&mut self, decl: Node) {
        let mut cursor = decl.walk();
        let Some(modifiers) = decl
            .named_children(&mut cursor)
            .find(|n| n.kind() == "modifiers")
        else {
            return;
        };
        let mut inner = modifiers.walk();
        for child in modifiers.named_children(&mut inner) {
            if matches!(child.kind(), "marker_annotation" | "annotation") {
                self.annotation(child);
            }
        }
    }

    /// Bounds of `<T extends A & B>`; the parameter names themselves are skipped.
    pub fn type_parameters(&mut self, node: Node) {
        let mut cursor = node.walk();
        for param in node.named_children(&mut cursor) {
            let mut inner = param.walk();
            for child in param.named_children(&mut inner) {
                match child.kind() {
                    "type_bound" => self.type_refs(child, ReferenceKind::Type),
                    "marker_annotation" | "annotation" => self.annotation(child),
                    _ => {}
                }
            }
        }
    }

    /// Parameters of a method, constructor or record header.
    pub fn parameters(&mut self, node: Node) {
        let mut cursor = node.walk();
        for param in node.named_children(&mut cursor) {
            self.visit(param);
        }
    }

    pub fn visit(&mut self, node: Node) {
        match node.kind() {
            "method_invocation" => self.method_invocation(node),
            "field_access" => {
                let object = node.child_by_field_name("object");
                if let Some(field) = node.child_by_field_name("field") {
                    let receiver = object.map_or(RawReceiver::Implicit, |o| self.receiver(o));
                    self.out.push(RawReference::field(
                        MemberSite::new(self.text(field), receiver),
                        Some(range_from_ts(field)),
                    ));
                }
                if let Some(object) = object {
                    self.visit(object);
                }
            }
            "object_creation_expression" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.visit(object);
                }
                if let Some(ty) = node.child_by_field_name("type") {
                    self.type_refs(ty, ReferenceKind::Instantiation);
                }
                if let Some(args) = node.child_by_field_name("type_arguments") {
                    self.type_refs(args, ReferenceKind::Type);
                }
                if let Some(args) = node.child_by_field_name("arguments") {
                    self.visit(args);
                }
                let mut cursor = node.walk();
                let body = node
                    .named_children(&mut cursor)
                    .find(|n| n.kind() == "class_body");
                if let Some(body) = body {
                    self.scoped(|w| w.walk_children(body));
                }
            }
            "method_reference" => self.method_reference(node),
            "identifier" => {
                let name = self.text(node);
                if self.local(name).is_none() {
                    self.out.push(RawReference {
                        kind: ReferenceKind::Field,
                        target: RawTarget::ImplicitField(name.to_string()),
                        range: Some(range_from_ts(node)),
                    });
                }
            }
            "local_variable_declaration" | "field_declaration" | "constant_declaration" => {
                self.modifier_annotations(node);
                let ty = node.child_by_field_name("type");
                if let Some(ty) = ty {
                    self.type_refs(ty, ReferenceKind::Type);
                }
                let declared = ty.map(|t| self.text(t).to_string());
                let mut cursor = node.walk();
                let declarators: Vec<Node> =
                    node.children_by_field_name("declarator", &mut cursor).collect();
                for declarator in declarators {
                    self.variable_declarator(declarator, declared.clone());
                }
            }
            "variable_declarator" => self.variable_declarator(node, None),
            "formal_parameter" | "catch_formal_parameter" | "spread_parameter" => {
                self.modifier_annotations(node);
                let mut declared = None;
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "modifiers" | "identifier" | "dimensions" => {}
                        "variable_declarator" => self.variable_declarator(child, declared.clone()),
                        _ => {
                            self.type_refs(child, ReferenceKind::Type);
                            if declared.is_none() {
                                declared = Some(self.text(child).to_string());
                            }
                        }
                    }
                }
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(self.text(name), declared);
                }
            }
            "lambda_expression" => self.scoped(|w| {
                if let Some(params) = node.child_by_field_name("parameters") {
                    match params.kind() {
                        "identifier" => w.declare(w.text(params), None),
                        "inferred_parameters" => {
                            let mut cursor = params.walk();
                            for p in params.named_children(&mut cursor) {
                                w.declare(w.text(p), None);
                            }
                        }
                        _ => w.parameters(params),
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    w.visit(body);
                }
            }),
            "enhanced_for_statement" => self.scoped(|w| {
                let ty = node.child_by_field_name("type");
                if let Some(ty) = ty {
                    w.type_refs(ty, ReferenceKind::Type);
                }
                if let Some(value) = node.child_by_field_name("value") {
                    w.visit(value);
                }
                if let Some(name) = node.child_by_field_name("name") {
                    let declared = ty.map(|t| w.text(t).to_string());
                    w.declare(w.text(name), declared);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    w.visit(body);
                }
            }),
            "resource" => match node.child_by_field_name("type") {
                Some(ty) => {
                    self.type_refs(ty, ReferenceKind::Type);
                    if let Some(value) = node.child_by_field_name("value") {
                        self.visit(value);
                    }
                    if let Some(name) = node.child_by_field_name("name") {
                        self.declare(self.text(name), Some(self.text(ty).to_string()));
                    }
                }
                None => self.walk_children(node),
            },
            "instanceof_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.visit(left);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.type_refs(right, ReferenceKind::Type);
                    if let Some(name) = node.child_by_field_name("name") {
                        self.declare(self.text(name), Some(self.text(right).to_string()));
                    }
                }
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.walk_children(pattern);
                }
            }
            "cast_expression" => {
                let mut cursor = node.walk();
                let types: Vec<Node> = node.children_by_field_name("type", &mut cursor).collect();
                for ty in types {
                    self.type_refs(ty, ReferenceKind::Type);
                }
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit(value);
                }
            }
            "class_literal" => {
                let mut cursor = node.walk();
                let ty = node.named_children(&mut cursor).next();
                if let Some(ty) = ty {
                    self.type_refs(ty, ReferenceKind::Type);
                }
            }
            "array_creation_expression" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.type_refs(ty, ReferenceKind::Type);
                }
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if matches!(child.kind(), "dimensions_expr" | "array_initializer") {
                        self.visit(child);
                    }
                }
            }
            "marker_annotation" | "annotation" => self.annotation(node),
            "labeled_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.kind() != "identifier" {
                        self.visit(child);
                    }
                }
            }
            "explicit_constructor_invocation" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.visit(object);
                }
                if let Some(args) = node.child_by_field_name("arguments") {
                    self.visit(args);
                }
            }
            "type_identifier" | "scoped_type_identifier" | "generic_type" | "array_type"
            | "annotated_type" | "type_arguments" => self.type_refs(node, ReferenceKind::Type),
            "type_parameters" => self.type_parameters(node),
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "record_declaration" => {
                // Local and anonymous-body types have no declaration of their own.
                if let Some(name) = node.child_by_field_name("name") {
                    self.skip_types.insert(self.text(name).to_string());
                }
                self.scoped(|w| w.walk_children(node));
            }
            "block" | "constructor_body" | "switch_block" | "switch_block_statement_group"
            | "for_statement" | "catch_clause" | "try_with_resources_statement"
            | "method_declaration" | "constructor_declaration" | "class_body" => {
                self.scoped(|w| w.walk_children(node))
            }
            "break_statement" | "continue_statement" | "this" | "super" | "line_comment"
            | "block_comment" | "scoped_identifier" | "modifiers" => {}
            kind if kind.ends_with("_literal") => {}
            _ => self.walk_children(node),
        }
    }

    /// Visits named children, skipping a declared `name`.
    pub fn walk_children(&mut self, node: Node) {
        let name = node.child_by_field_name("name");
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            if Some(child) != name {
                self.visit(child);
            }
        }
    }

    fn variable_declarator(&mut self, node: Node, declared: Option<String>) {
        let value = node.child_by_field_name("value");
        if let Some(value) = value {
            self.visit(value);
        }
        let declared = match declared.as_deref() {
            Some("var") | None => value.and_then(|v| self.created_type(v)),
            Some(_) => declared,
        };
        if let Some(name) = node.child_by_field_name("name") {
            self.declare(self.text(name), declared);
        }
    }

    /// `T` of a `new T(...)` initializer, for `var` declarations.
    fn created_type(&self, value: Node) -> Option<String> {
        (value.kind() == "object_creation_expression")
            .then(|| value.child_by_field_name("type"))
            .flatten()
            .map(|t| self.text(t).to_string())
    }

    fn method_invocation(&mut self, node: Node) {
        let object = node.child_by_field_name("object");
        if let Some(name) = node.child_by_field_name("name") {
            let receiver = object.map_or(RawReceiver::Implicit, |o| self.receiver(o));
            self.out.push(RawReference::call(
                MemberSite::new(self.text(name), receiver),
                Some(range_from_ts(name)),
            ));
        }
        if let Some(object) = object {
            self.visit(object);
        }
        if let Some(args) = node.child_by_field_name("type_arguments") {
            self.type_refs(args, ReferenceKind::Type);
        }
        if let Some(args) = node.child_by_field_name("arguments") {
            self.visit(args);
        }
    }

    fn method_reference(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        let Some(&qualifier) = children.iter().find(|n| n.is_named()) else {
            return;
        };
        let Some(&last) = children.last() else {
            return;
        };
        if last.kind() == "new" {
            self.type_refs(qualifier, ReferenceKind::Instantiation);
            return;
        }
        if last.kind() != "identifier" {
            return;
        }
        let receiver = match qualifier.kind() {
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                RawReceiver::Name(strip_generics(self.text(qualifier)))
            }
            "array_type" => RawReceiver::Unknown,
            _ => self.receiver(qualifier),
        };
        self.out.push(RawReference::call(
            MemberSite::new(self.text(last), receiver),
            Some(range_from_ts(last)),
        ));
        self.visit(qualifier);
    }

    /// What a receiver expression denotes, as far as syntax tells.
    fn receiver(&self, node: Node) -> RawReceiver {
        match node.kind() {
            "this" => RawReceiver::Implicit,
            "super" => RawReceiver::Super,
            "identifier" => {
                let name = self.text(node);
                match self.local(name) {
                    Some(Some(ty)) => RawReceiver::Typed(ty.clone()),
                    Some(None) => RawReceiver::Unknown,
                    None => RawReceiver::Name(name.to_string()),
                }
            }
            "field_access" => match node.child_by_field_name("field") {
                Some(field) => {
                    let object = node
                        .child_by_field_name("object")
                        .map_or(RawReceiver::Implicit, |o| self.receiver(o));
                    RawReceiver::Field(Box::new(MemberSite::new(self.text(field), object)))
                }
                None => RawReceiver::Unknown,
            },
            "method_invocation" => match node.child_by_field_name("name") {
                Some(name) => {
                    let object = node
                        .child_by_field_name("object")
                        .map_or(RawReceiver::Implicit, |o| self.receiver(o));
                    RawReceiver::Call(Box::new(MemberSite::new(self.text(name), object)))
                }
                None => RawReceiver::Unknown,
            },
            "object_creation_expression" => match node.child_by_field_name("type") {
                Some(ty) => RawReceiver::New(strip_generics(self.text(ty))),
                None => RawReceiver::Unknown,
            },
            "parenthesized_expression" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                inner.map_or(RawReceiver::Unknown, |n| self.receiver(n))
            }
            "cast_expression" => match node.child_by_field_name("type") {
                Some(ty) => RawReceiver::Typed(self.text(ty).to_string()),
                None => RawReceiver::Unknown,
            },
            "string_literal" => RawReceiver::Typed("String".to_string()),
            _ => RawReceiver::Unknown,
        }
    }
}
