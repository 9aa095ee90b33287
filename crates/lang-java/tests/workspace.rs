mod common;

use common::{index_sources, order_project};
use liteworkspace_api::models::{InclusionPolicy, LibraryCoordinate};
use liteworkspace_core::{
    ClosureResolver, Diagnostic, MaterializeOptions, Materializer, write_to_dir,
};
use liteworkspace_core::materialize::LIBRARY_MANIFEST;
use liteworkspace_java::java_caps;
use liteworkspace_plugin::StubBodyStyle;
use std::fs;
use std::path::Path;

#[test]
fn order_validate_yields_two_trimmed_files_and_the_jdk() {
    let index = order_project();
    let closure = ClosureResolver::default()
        .resolve(&index, "com.shop.Order.validate")
        .unwrap();

    assert_eq!(closure.nodes.len(), 3);
    assert_eq!(closure.get("com.shop.Order.validate").unwrap().policy, InclusionPolicy::FullSource);
    assert_eq!(closure.get("com.shop.PriceCalculator.compute").unwrap().policy, InclusionPolicy::FullSource);
    assert_eq!(
        closure.get("java.math.BigDecimal").unwrap().policy,
        InclusionPolicy::ExternalReferenceOnly
    );
    assert_eq!(closure.unresolved().count(), 0);

    let caps = java_caps().unwrap();
    let workspace = Materializer::new(&index, caps.renderer.as_ref(), MaterializeOptions::default())
        .materialize(&closure)
        .unwrap();
    assert_eq!(workspace.file_count(), 2);
    assert_eq!(workspace.libraries, vec![LibraryCoordinate::jdk()]);

    let order = &workspace.files[Path::new("src/main/java/com/shop/Order.java")];
    assert!(order.starts_with("package com.shop;\n\nimport java.math.BigDecimal;\n\npublic class Order {\n"));
    assert!(order.contains("BigDecimal total = PriceCalculator.compute(limit);"));
    assert!(!order.contains("describe"));
    assert!(!order.contains("private final String id"));

    let calculator = &workspace.files[Path::new("src/main/java/com/shop/PriceCalculator.java")];
    assert!(calculator.contains("return base.multiply(BigDecimal.TEN);"));
    assert!(!calculator.contains("unused"));
    assert!(!calculator.contains("private PriceCalculator()"));
}

const CHECKOUT: &str = r#"package com.shop;

public class Checkout {
    public void run() {
        LegacyHelper.flush();
        new Receipt().print();
    }
}
"#;

const RECEIPT: &str = r#"package com.shop;

public class Receipt {
    public void print() {}
}
"#;

#[test]
fn missing_classes_are_reported_not_fatal() {
    let index = index_sources(&[
        ("src/main/java/com/shop/Checkout.java", CHECKOUT),
        ("src/main/java/com/shop/Receipt.java", RECEIPT),
    ]);
    let closure = ClosureResolver::default()
        .resolve(&index, "com.shop.Checkout.run")
        .unwrap();
    let unresolved: Vec<&Diagnostic> = closure.unresolved().collect();
    assert_eq!(
        unresolved,
        vec![&Diagnostic::UnresolvedReference {
            from: "com.shop.Checkout.run".into(),
            name: "LegacyHelper".to_string(),
        }]
    );

    let caps = java_caps().unwrap();
    let workspace = Materializer::new(&index, caps.renderer.as_ref(), MaterializeOptions::default())
        .materialize(&closure)
        .unwrap();
    // The instantiated class is kept whole and copied as written.
    assert_eq!(
        workspace.files[Path::new("src/main/java/com/shop/Receipt.java")],
        RECEIPT
    );
    assert!(workspace.libraries.is_empty());
}

const BILLING: &str = r#"package com.shop;

public class Billing {
    public int bill(Invoice invoice) {
        return invoice.number;
    }
}
"#;

const INVOICE: &str = r#"package com.shop;

public class Invoice {
    int number = 7;

    public int twice() {
        return number * 2;
    }
}
"#;

#[test]
fn type_and_field_mentions_become_stubs() {
    let index = index_sources(&[
        ("src/main/java/com/shop/Billing.java", BILLING),
        ("src/main/java/com/shop/Invoice.java", INVOICE),
    ]);
    let closure = ClosureResolver::default()
        .resolve(&index, "com.shop.Billing.bill")
        .unwrap();
    assert_eq!(closure.get("com.shop.Invoice").unwrap().policy, InclusionPolicy::Stub);
    assert_eq!(closure.get("com.shop.Invoice.number").unwrap().policy, InclusionPolicy::Stub);

    let caps = java_caps().unwrap();
    let workspace = Materializer::new(&index, caps.renderer.as_ref(), MaterializeOptions::default())
        .materialize(&closure)
        .unwrap();
    let invoice = &workspace.files[Path::new("src/main/java/com/shop/Invoice.java")];
    assert!(invoice.contains("    int number;\n"), "{}", invoice);
    assert!(!invoice.contains("twice"), "{}", invoice);
}

#[test]
fn workspaces_are_written_with_a_library_manifest() {
    let index = order_project();
    let closure = ClosureResolver::default()
        .resolve(&index, "com.shop.Order.validate")
        .unwrap();
    let caps = java_caps().unwrap();
    let workspace = Materializer::new(&index, caps.renderer.as_ref(), MaterializeOptions::default())
        .materialize(&closure)
        .unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("workspace");
    write_to_dir(&workspace, &out).unwrap();

    let order = fs::read_to_string(out.join("src/main/java/com/shop/Order.java")).unwrap();
    assert_eq!(order, workspace.files[Path::new("src/main/java/com/shop/Order.java")]);
    let manifest = fs::read_to_string(out.join(LIBRARY_MANIFEST)).unwrap();
    assert_eq!(manifest, "jdk:java.base\n");

    // A second write into the populated directory is refused.
    assert!(write_to_dir(&workspace, &out).is_err());
}

fn render_file(index: &liteworkspace_core::SymbolIndex, root: &str, file: &str, style: StubBodyStyle) -> String {
    let closure = ClosureResolver::default().resolve(index, root).unwrap();
    let caps = java_caps().unwrap();
    let options = MaterializeOptions {
        stub_body: style,
        ..Default::default()
    };
    let workspace = Materializer::new(index, caps.renderer.as_ref(), options)
        .materialize(&closure)
        .unwrap();
    workspace.files[Path::new(file)].clone()
}

const PRINTER: &str = r#"package com.shop;

public class Printer {
    public String show(Order o) {
        return o.describe();
    }
}
"#;

#[test]
fn trimmed_class_keeps_a_constructor_for_its_blank_final() {
    let index = index_sources(&[
        ("src/main/java/com/shop/Order.java", common::ORDER),
        ("src/main/java/com/shop/PriceCalculator.java", common::PRICE_CALCULATOR),
        ("src/main/java/com/shop/Printer.java", PRINTER),
    ]);
    let order = render_file(
        &index,
        "com.shop.Printer.show",
        "src/main/java/com/shop/Order.java",
        StubBodyStyle::DefaultValue,
    );
    assert_eq!(
        order,
        "package com.shop;\n\nimport java.math.BigDecimal;\n\npublic class Order {\n\n    \
private final String id;\n\n    \
public Order(String id) { this.id = null; }\n\n    \
public String describe() {\n        return \"Order \" + id;\n    }\n}\n"
    );
}

const LEVEL: &str = r#"package com.shop;

public enum Level {
    LOW(1), HIGH(2);

    private final int weight;

    Level(int weight) {
        this.weight = weight;
    }

    public int weight() {
        return weight;
    }
}
"#;

const GAUGE: &str = r#"package com.shop;

public class Gauge {
    public int read(Level l) {
        return l.weight();
    }
}
"#;

#[test]
fn trimmed_enum_keeps_the_constructor_its_constants_call() {
    let index = index_sources(&[
        ("src/main/java/com/shop/Level.java", LEVEL),
        ("src/main/java/com/shop/Gauge.java", GAUGE),
    ]);
    let level = render_file(
        &index,
        "com.shop.Gauge.read",
        "src/main/java/com/shop/Level.java",
        StubBodyStyle::DefaultValue,
    );
    assert_eq!(
        level,
        "package com.shop;\n\npublic enum Level {\n    LOW(1), HIGH(2);\n\n    \
private final int weight;\n\n    \
Level(int weight) { this.weight = 0; }\n\n    \
public int weight() {\n        return weight;\n    }\n}\n"
    );

    let throwing = render_file(
        &index,
        "com.shop.Gauge.read",
        "src/main/java/com/shop/Level.java",
        StubBodyStyle::ThrowUnsupported,
    );
    assert!(throwing.contains(
        "Level(int weight) { this.weight = 0; throw new UnsupportedOperationException(\"stub\"); }"
    ));
}

const BASE: &str = r#"package com.shop;

public abstract class Base {
    protected Base(String name) {
    }
}
"#;

const SHELF: &str = r#"package com.shop;

public class Shelf extends Base {
    public Shelf() {
        super("shelf");
    }

    public int size() {
        return 1;
    }
}
"#;

const CLERK: &str = r#"package com.shop;

public class Clerk {
    public int count(Shelf shelf) {
        return shelf.size();
    }
}
"#;

#[test]
fn trimmed_subclass_keeps_its_super_constructor_call() {
    let index = index_sources(&[
        ("src/main/java/com/shop/Base.java", BASE),
        ("src/main/java/com/shop/Shelf.java", SHELF),
        ("src/main/java/com/shop/Clerk.java", CLERK),
    ]);
    let shelf = render_file(
        &index,
        "com.shop.Clerk.count",
        "src/main/java/com/shop/Shelf.java",
        StubBodyStyle::DefaultValue,
    );
    assert_eq!(
        shelf,
        "package com.shop;\n\npublic class Shelf extends Base {\n\n    \
public Shelf() { super(\"shelf\"); }\n\n    \
public int size() {\n        return 1;\n    }\n}\n"
    );
}
