mod common;

use common::{Fixture, OutlineRenderer};
use liteworkspace_api::models::{InclusionPolicy, ReferenceKind};
use liteworkspace_core::materialize::LIBRARY_MANIFEST;
use liteworkspace_core::report::render_markdown;
use liteworkspace_core::{
    ClosureResolver, MaterializeOptions, Materializer, SymbolIndex, write_to_dir,
};
use std::fs;
use std::path::{Path, PathBuf};

fn order_index() -> SymbolIndex {
    Fixture::new()
        .class("com.shop.Order")
        .method("com.shop.Order.validate")
        .method("com.shop.Order.total")
        .class("com.shop.PriceCalculator")
        .method("com.shop.PriceCalculator.compute")
        .library("java.math.BigDecimal", "jdk:java.base")
        .reference(
            "com.shop.Order.validate",
            "com.shop.PriceCalculator.compute",
            ReferenceKind::Call,
        )
        .reference("com.shop.Order.validate", "java.math.BigDecimal", ReferenceKind::Type)
        .build()
}

fn materialize(index: &SymbolIndex, root: &str) -> liteworkspace_core::MaterializedWorkspace {
    let closure = ClosureResolver::default().resolve(index, root).unwrap();
    Materializer::new(index, &OutlineRenderer, MaterializeOptions::default())
        .materialize(&closure)
        .unwrap()
}

#[test]
fn order_scenario_yields_two_files_and_one_library() {
    let index = order_index();
    let workspace = materialize(&index, "com.shop.Order.validate");

    let paths: Vec<&PathBuf> = workspace.files.keys().collect();
    assert_eq!(
        paths,
        vec![
            &PathBuf::from("src/main/java/com/shop/Order.java"),
            &PathBuf::from("src/main/java/com/shop/PriceCalculator.java"),
        ]
    );
    assert_eq!(workspace.libraries.len(), 1);
    assert!(workspace.libraries[0].is_jdk());

    // Order is only a shell around the root; `total` is left out.
    let order = &workspace.files[&PathBuf::from("src/main/java/com/shop/Order.java")];
    assert_eq!(order, "shell com.shop.Order\n  full com.shop.Order.validate\n");
}

#[test]
fn fully_included_file_is_copied_verbatim() {
    let index = Fixture::new()
        .class("a.Root")
        .method("a.Root.run")
        .class("a.Base")
        .method("a.Base.hook")
        .reference("a.Root.run", "a.Base", ReferenceKind::Supertype)
        .build();
    let workspace = materialize(&index, "a.Root.run");
    let base = &workspace.files[&PathBuf::from("src/main/java/a/Base.java")];
    assert_eq!(base, "decl a.Base\ndecl a.Base.hook\n");
}

#[test]
fn stub_type_keeps_only_closure_members() {
    let index = Fixture::new()
        .class("a.Root")
        .method("a.Root.run")
        .class("a.Dto")
        .field("a.Dto.id")
        .field("a.Dto.secret")
        .reference("a.Root.run", "a.Dto", ReferenceKind::Type)
        .reference("a.Root.run", "a.Dto.id", ReferenceKind::Field)
        .build();
    let workspace = materialize(&index, "a.Root.run");
    let dto = &workspace.files[&PathBuf::from("src/main/java/a/Dto.java")];
    assert_eq!(dto, "stub a.Dto\n  stub a.Dto.id\n");
}

#[test]
fn emits_one_file_per_source_file_and_k_libraries() {
    let index = Fixture::new()
        .class("n.Root")
        .method("n.Root.run")
        .class("n.Full1")
        .class("n.Full2")
        .class("n.Stub1")
        .library("org.a.X", "org.a:x")
        .library("org.a.Y", "org.a:x")
        .library("org.b.Z", "org.b:z:1.0")
        .reference("n.Root.run", "n.Full1", ReferenceKind::Instantiation)
        .reference("n.Root.run", "n.Full2", ReferenceKind::Supertype)
        .reference("n.Root.run", "n.Stub1", ReferenceKind::Annotation)
        .reference("n.Root.run", "org.a.X", ReferenceKind::Type)
        .reference("n.Root.run", "org.a.Y", ReferenceKind::Call)
        .reference("n.Root.run", "org.b.Z", ReferenceKind::Type)
        .build();
    let closure = ClosureResolver::default().resolve(&index, "n.Root.run").unwrap();
    let full = closure.count(InclusionPolicy::FullSource);
    let stub = closure.count(InclusionPolicy::Stub);
    assert_eq!((full, stub), (3, 1));

    let workspace = Materializer::new(&index, &OutlineRenderer, MaterializeOptions::default())
        .materialize(&closure)
        .unwrap();
    assert_eq!(workspace.file_count(), full + stub);
    assert_eq!(
        workspace
            .libraries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["org.a:x", "org.b:z:1.0"]
    );
}

#[test]
fn custom_source_root_prefixes_paths() {
    let index = order_index();
    let closure = ClosureResolver::default()
        .resolve(&index, "com.shop.Order.validate")
        .unwrap();
    let options = MaterializeOptions {
        source_root: PathBuf::from("src"),
        ..Default::default()
    };
    let workspace = Materializer::new(&index, &OutlineRenderer, options)
        .materialize(&closure)
        .unwrap();
    assert!(
        workspace
            .files
            .keys()
            .all(|p| p.starts_with(Path::new("src/com/shop")))
    );
}

#[test]
fn writes_workspace_atomically() {
    let index = order_index();
    let workspace = materialize(&index, "com.shop.Order.validate");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("lite");

    write_to_dir(&workspace, &out).unwrap();
    assert!(out.join("src/main/java/com/shop/Order.java").is_file());
    assert_eq!(
        fs::read_to_string(out.join(LIBRARY_MANIFEST)).unwrap(),
        "jdk:java.base\n"
    );
    // Only the target directory is left behind.
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    // A non-empty target is never replaced.
    assert!(write_to_dir(&workspace, &out).is_err());
    assert!(out.join("src/main/java/com/shop/Order.java").is_file());
}

#[test]
fn writes_into_existing_empty_directory() {
    let index = order_index();
    let workspace = materialize(&index, "com.shop.Order.validate");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty");
    fs::create_dir(&out).unwrap();

    write_to_dir(&workspace, &out).unwrap();
    assert!(out.join("src/main/java/com/shop/PriceCalculator.java").is_file());
}

#[test]
fn markdown_report_lists_levels_libraries_and_diagnostics() {
    let index = Fixture::new()
        .class("com.shop.Order")
        .method("com.shop.Order.validate")
        .library("java.math.BigDecimal", "jdk:java.base")
        .reference("com.shop.Order.validate", "java.math.BigDecimal", ReferenceKind::Type)
        .unresolved("com.shop.Order.validate", "LegacyHelper")
        .build();
    let closure = ClosureResolver::default()
        .resolve(&index, "com.shop.Order.validate")
        .unwrap();
    let report = render_markdown(&closure);

    assert!(report.starts_with("# Dependencies of `com.shop.Order.validate`"));
    assert!(report.contains("## Distance 0"));
    assert!(report.contains("- `com.shop.Order.validate` (method, **full**, app)"));
    assert!(report.contains("- `java.math.BigDecimal` (class, **external**, jdk:java.base)"));
    assert!(report.contains("- `jdk:java.base`"));
    assert!(report.contains("unresolved reference `LegacyHelper` from `com.shop.Order.validate`"));
}

#[test]
fn trimmed_type_plans_the_constructor_of_a_kept_blank_final() {
    let index = Fixture::new()
        .class("com.shop.Printer")
        .method("com.shop.Printer.show")
        .class("com.shop.Order")
        .blank_final("com.shop.Order.id")
        .constructor("com.shop.Order")
        .method("com.shop.Order.describe")
        .method("com.shop.Order.validate")
        .reference("com.shop.Printer.show", "com.shop.Order", ReferenceKind::Type)
        .reference(
            "com.shop.Printer.show",
            "com.shop.Order.describe",
            ReferenceKind::Call,
        )
        .reference("com.shop.Order.describe", "com.shop.Order.id", ReferenceKind::Field)
        .build();
    let workspace = materialize(&index, "com.shop.Printer.show");

    let order = &workspace.files[&PathBuf::from("src/main/java/com/shop/Order.java")];
    assert_eq!(
        order,
        "stub com.shop.Order\n  stub com.shop.Order.id\n  stub com.shop.Order.<init>\n  full com.shop.Order.describe\n"
    );
}
