//! Java source emission for materialized workspaces.

use crate::lang::default_value;
use crate::parser::{JavaParser, prelude_end};
use liteworkspace_api::CompilationUnit;
use liteworkspace_api::models::{ByteSpan, DeclKind, DeclShape};
use liteworkspace_plugin::{RenderMode, RenderNode, SourceRenderer, StubBodyStyle};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::warn;

const UNSUPPORTED: &str = "throw new UnsupportedOperationException(\"stub\");";

pub struct JavaRenderer {
    parser: JavaParser,
}

impl JavaRenderer {
    pub fn new(parser: JavaParser) -> Self {
        Self { parser }
    }

    /// Package and import declarations, as written.
    fn prelude<'t>(&self, unit: &'t CompilationUnit) -> Cow<'t, str> {
        match self.parser.parse_tree(&unit.text) {
            Ok(tree) => {
                let end = prelude_end(tree.root_node());
                Cow::Borrowed(unit.text.get(..end).unwrap_or("").trim_start())
            }
            Err(e) => {
                warn!("Re-parsing {} failed: {}", unit.path.display(), e);
                Cow::Owned(
                    unit.package
                        .as_deref()
                        .map(|p| format!("package {};", p))
                        .unwrap_or_default(),
                )
            }
        }
    }
}

impl SourceRenderer for JavaRenderer {
    fn relative_path(&self, unit: &CompilationUnit) -> PathBuf {
        let mut path = PathBuf::new();
        if let Some(package) = &unit.package {
            path.extend(package.split('.'));
        }
        if let Some(file) = unit.path.file_name() {
            path.push(file);
        }
        path
    }

    fn render(&self, unit: &CompilationUnit, plan: &[RenderNode], style: StubBodyStyle) -> String {
        let text: &str = &unit.text;
        let mut out = String::new();
        let prelude = self.prelude(unit);
        if !prelude.is_empty() {
            out.push_str(&prelude);
            out.push_str("\n\n");
        }
        let emitter = Emitter { text, style };
        let types: Vec<String> = plan.iter().map(|node| emitter.node(node, None)).collect();
        out.push_str(&types.join("\n\n"));
        out.push('\n');
        out
    }
}

/// The shell a member is emitted into.
struct Enclosing<'n> {
    kind: DeclKind,
    /// Kept instance blank finals with the value a stub constructor assigns.
    blank_finals: Vec<(&'n str, &'static str)>,
}

fn field_default(shape: &DeclShape) -> &'static str {
    shape
        .type_text
        .as_deref()
        .and_then(default_value)
        .unwrap_or("null")
}

struct Emitter<'t> {
    text: &'t str,
    style: StubBodyStyle,
}

impl<'t> Emitter<'t> {
    fn slice(&self, span: ByteSpan) -> &'t str {
        span.slice(self.text).unwrap_or("")
    }

    /// Leading whitespace of the line where `offset` sits.
    fn indent_at(&self, offset: usize) -> &'t str {
        let line_start = self.text[..offset.min(self.text.len())]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let line = &self.text[line_start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    fn node(&self, node: &RenderNode, enclosing: Option<&Enclosing<'_>>) -> String {
        let Some(shape) = node.decl.shape() else {
            return String::new();
        };
        let kind = node.decl.kind;
        match node.mode {
            RenderMode::Full if kind == DeclKind::Field => {
                self.field(shape, self.slice(shape.span).to_string())
            }
            RenderMode::Full => self.with_overloads(shape, |s| self.slice(s.span).to_string()),
            RenderMode::Stub if !kind.is_type() => self.with_overloads(shape, |s| match kind {
                DeclKind::Method => self.stub_method(s),
                DeclKind::Constructor => self.stub_constructor(s, enclosing),
                _ => self.field(s, self.stub_field(s, enclosing.map(|e| e.kind))),
            }),
            RenderMode::Stub | RenderMode::Shell => self.shell(node, shape),
        }
    }

    fn with_overloads(&self, shape: &DeclShape, render: impl Fn(&DeclShape) -> String) -> String {
        let indent = self.indent_at(shape.span.start);
        std::iter::once(shape)
            .chain(shape.overloads.iter())
            .map(render)
            .collect::<Vec<_>>()
            .join(&format!("\n\n{}", indent))
    }

    /// Text from the start of the declaration up to its body.
    fn header(&self, shape: &DeclShape, body: ByteSpan) -> &'t str {
        self.slice(ByteSpan::new(shape.span.start, body.start)).trim_end()
    }

    fn stub_method(&self, shape: &DeclShape) -> String {
        let Some(body) = shape.body else {
            // Abstract, interface and native methods have nothing to replace.
            return self.slice(shape.span).to_string();
        };
        let placeholder = match self.style {
            StubBodyStyle::ThrowUnsupported => format!("{{ {} }}", UNSUPPORTED),
            StubBodyStyle::DefaultValue => {
                match shape.type_text.as_deref().and_then(default_value) {
                    Some(value) => format!("{{ return {}; }}", value),
                    None => "{ }".to_string(),
                }
            }
        };
        format!("{} {}", self.header(shape, body), placeholder)
    }

    /// Keeps the leading `super(...)`/`this(...)` call. Constructors that do
    /// not delegate to `this(...)` assign every kept blank final.
    fn stub_constructor(&self, shape: &DeclShape, enclosing: Option<&Enclosing<'_>>) -> String {
        let Some(body) = shape.body else {
            return self.slice(shape.span).to_string();
        };
        let mut statements: Vec<String> = Vec::new();
        let call = shape.constructor_call.map(|call| self.slice(call));
        if let Some(call) = call {
            statements.push(call.to_string());
        }
        if !call.is_some_and(|c| c.starts_with("this")) {
            for (name, value) in enclosing.map_or(&[][..], |e| &e.blank_finals[..]) {
                statements.push(format!("this.{} = {};", name, value));
            }
        }
        if self.style == StubBodyStyle::ThrowUnsupported {
            statements.push(UNSUPPORTED.to_string());
        }
        let placeholder = if statements.is_empty() {
            "{ }".to_string()
        } else {
            format!("{{ {} }}", statements.join(" "))
        };
        format!("{} {}", self.header(shape, body), placeholder)
    }

    /// Drops the initializer of a mutable single-declarator field.
    fn stub_field(&self, shape: &DeclShape, parent: Option<DeclKind>) -> String {
        let keeps_value = shape.has_modifier("final")
            || matches!(parent, Some(DeclKind::Interface | DeclKind::Annotation));
        match shape.initializer {
            Some(init) if !keeps_value && shape.declarators == 1 => format!(
                "{}{}",
                self.slice(ByteSpan::new(shape.span.start, init.start)),
                self.slice(ByteSpan::new(init.end, shape.span.end))
            ),
            _ => self.slice(shape.span).to_string(),
        }
    }

    /// A blank `static final` loses the static initializer that assigned it,
    /// so it gets a default value instead.
    fn field(&self, shape: &DeclShape, text: String) -> String {
        if !(shape.is_blank_final() && shape.has_modifier("static") && shape.declarators == 1) {
            return text;
        }
        match text.trim_end().strip_suffix(';') {
            Some(head) => format!("{} = {};", head.trim_end(), field_default(shape)),
            None => text,
        }
    }

    /// Original header, the planned members, closing brace.
    fn shell(&self, node: &RenderNode, shape: &DeclShape) -> String {
        let Some(body) = shape.body else {
            return self.slice(shape.span).to_string();
        };
        let outer_indent = self.indent_at(shape.span.start);
        let mut out = String::new();
        out.push_str(self.header(shape, body));
        out.push_str(" {\n");

        if let Some(constants) = shape.enum_constants {
            out.push_str(self.indent_at(constants.start));
            out.push_str(self.slice(constants));
            out.push_str(";\n");
        } else if node.decl.kind == DeclKind::Enum {
            out.push_str(outer_indent);
            out.push_str("    ;\n");
        }

        let enclosing = Enclosing {
            kind: node.decl.kind,
            blank_finals: node
                .children
                .iter()
                .filter(|child| child.decl.kind == DeclKind::Field)
                .filter_map(|child| {
                    let shape = child.decl.shape()?;
                    (shape.is_blank_final() && !shape.has_modifier("static"))
                        .then(|| (child.decl.name.as_str(), field_default(shape)))
                })
                .collect(),
        };
        let mut emitted: Vec<ByteSpan> = Vec::new();
        for child in &node.children {
            let Some(child_shape) = child.decl.shape() else {
                continue;
            };
            let span = child_shape.span;
            if shape.enum_constants.is_some_and(|c| c.encloses(&span)) || emitted.contains(&span) {
                continue;
            }
            emitted.push(span);
            out.push('\n');
            out.push_str(self.indent_at(span.start));
            out.push_str(&self.node(child, Some(&enclosing)));
            out.push('\n');
        }

        out.push_str(outer_indent);
        out.push('}');
        out
    }
}
