mod common;

use common::{index_sources, source_path};
use liteworkspace_api::SymbolGraph;
use liteworkspace_api::models::DeclKind;
use liteworkspace_core::SymbolIndex;
use liteworkspace_java::JavaRenderer;
use liteworkspace_java::parser::JavaParser;
use liteworkspace_plugin::{RenderMode, RenderNode, SourceRenderer, StubBodyStyle};
use std::path::PathBuf;

const INVOICE: &str = r#"package com.shop;

import java.util.List;

public class Invoice extends Document {
    private int number = 7;
    private final String currency = "EUR";
    private int a = 1, b = 2;

    public Invoice(int number) {
        super("invoice");
        this.number = number;
    }

    public int count() {
        return number;
    }

    public void clear() {
        number = 0;
    }

    public List<String> lines() {
        return List.of();
    }

    public abstract static class Part {
        abstract boolean valid();
    }
}
"#;

const STATUS: &str = r#"package com.shop;

public enum Status {
    OPEN("o"), CLOSED("c");

    private final String code;

    Status(String code) {
        this.code = code;
    }

    public String code() {
        return code;
    }
}
"#;

fn renderer() -> JavaRenderer {
    JavaRenderer::new(JavaParser::new().unwrap())
}

fn node(index: &SymbolIndex, id: &str, mode: RenderMode) -> RenderNode {
    RenderNode::new(index.get(id).unwrap().clone(), mode)
}

fn stub_all(index: &SymbolIndex, id: &str) -> RenderNode {
    let mut root = node(index, id, RenderMode::Stub);
    for child in index.children(&id.into()) {
        let child_node = if child.kind.is_type() {
            stub_all(index, child.id.as_str())
        } else {
            RenderNode::new(child, RenderMode::Stub)
        };
        root.children.push(child_node);
    }
    root
}

fn render(index: &SymbolIndex, relative: &str, plan: &[RenderNode], style: StubBodyStyle) -> String {
    let unit = index.compilation_unit(&source_path(relative)).unwrap();
    renderer().render(&unit, plan, style)
}

#[test]
fn stubs_keep_signatures_and_replace_bodies() {
    let index = index_sources(&[("src/main/java/com/shop/Invoice.java", INVOICE)]);
    let plan = vec![stub_all(&index, "com.shop.Invoice")];
    let text = render(
        &index,
        "src/main/java/com/shop/Invoice.java",
        &plan,
        StubBodyStyle::DefaultValue,
    );
    let expected = "package com.shop;\n\nimport java.util.List;\n\n\
public class Invoice extends Document {\n\n    \
private int number;\n\n    \
private final String currency = \"EUR\";\n\n    \
private int a = 1, b = 2;\n\n    \
public Invoice(int number) { super(\"invoice\"); }\n\n    \
public int count() { return 0; }\n\n    \
public void clear() { }\n\n    \
public List<String> lines() { return null; }\n\n    \
public abstract static class Part {\n\n        \
abstract boolean valid();\n    }\n}\n";
    assert_eq!(text, expected);
}

#[test]
fn throwing_stubs_keep_constructor_calls() {
    let index = index_sources(&[("src/main/java/com/shop/Invoice.java", INVOICE)]);
    let plan = vec![stub_all(&index, "com.shop.Invoice")];
    let text = render(
        &index,
        "src/main/java/com/shop/Invoice.java",
        &plan,
        StubBodyStyle::ThrowUnsupported,
    );
    assert!(text.contains(
        "public Invoice(int number) { super(\"invoice\"); throw new UnsupportedOperationException(\"stub\"); }"
    ));
    assert!(text.contains("public int count() { throw new UnsupportedOperationException(\"stub\"); }"));
    assert!(!text.contains("return number;"));
}

#[test]
fn shells_emit_only_planned_members() {
    let index = index_sources(&[("src/main/java/com/shop/Invoice.java", INVOICE)]);
    let mut shell = node(&index, "com.shop.Invoice", RenderMode::Shell);
    shell.children.push(node(&index, "com.shop.Invoice.count", RenderMode::Full));
    let text = render(
        &index,
        "src/main/java/com/shop/Invoice.java",
        &[shell],
        StubBodyStyle::DefaultValue,
    );
    assert!(text.contains("public class Invoice extends Document {\n\n    public int count() {\n        return number;\n    }\n}\n"));
    assert!(!text.contains("clear"));
    assert!(!text.contains("private int number"));
}

#[test]
fn enum_shells_keep_constants_and_methods_clashing_with_fields() {
    let index = index_sources(&[("src/main/java/com/shop/Status.java", STATUS)]);
    assert_eq!(index.get("com.shop.Status.code").unwrap().kind, DeclKind::Field);
    let method = index.get("com.shop.Status.code()").unwrap();
    assert_eq!(method.kind, DeclKind::Method);

    let mut shell = node(&index, "com.shop.Status", RenderMode::Stub);
    shell.children.push(node(&index, "com.shop.Status.OPEN", RenderMode::Stub));
    shell.children.push(node(&index, "com.shop.Status.code()", RenderMode::Stub));
    let text = render(
        &index,
        "src/main/java/com/shop/Status.java",
        &[shell],
        StubBodyStyle::DefaultValue,
    );
    assert_eq!(
        text,
        "package com.shop;\n\npublic enum Status {\n    OPEN(\"o\"), CLOSED(\"c\");\n\n    public String code() { return null; }\n}\n"
    );
}

#[test]
fn relative_paths_follow_the_package() {
    let index = index_sources(&[("src/main/java/com/shop/Invoice.java", INVOICE)]);
    let unit = index
        .compilation_unit(&source_path("src/main/java/com/shop/Invoice.java"))
        .unwrap();
    assert_eq!(renderer().relative_path(&unit), PathBuf::from("com/shop/Invoice.java"));
}

const LIMITS: &str = r#"package com.shop;

public class Limits {
    static final int MAX;
    private final String name;

    static {
        MAX = 10;
    }

    public Limits(String name) {
        this.name = name;
    }

    public Limits() {
        this("default");
    }
}
"#;

#[test]
fn blank_finals_stay_definitely_assigned_in_shells() {
    let index = index_sources(&[("src/main/java/com/shop/Limits.java", LIMITS)]);
    let mut shell = node(&index, "com.shop.Limits", RenderMode::Shell);
    shell.children.push(node(&index, "com.shop.Limits.MAX", RenderMode::Stub));
    shell.children.push(node(&index, "com.shop.Limits.name", RenderMode::Stub));
    shell.children.push(node(&index, "com.shop.Limits.<init>", RenderMode::Stub));
    let text = render(
        &index,
        "src/main/java/com/shop/Limits.java",
        &[shell],
        StubBodyStyle::DefaultValue,
    );
    assert_eq!(
        text,
        "package com.shop;\n\npublic class Limits {\n\n    \
static final int MAX = 0;\n\n    \
private final String name;\n\n    \
public Limits(String name) { this.name = null; }\n\n    \
public Limits() { this(\"default\"); }\n}\n"
    );
}
