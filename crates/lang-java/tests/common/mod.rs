use liteworkspace_api::models::{LibraryCoordinate, Reference, SourceScope};
use liteworkspace_api::{DeclId, SymbolGraph};
use liteworkspace_core::SymbolIndex;
use liteworkspace_core::index::LibraryCatalog;
use liteworkspace_core::indexing::Indexer;
use liteworkspace_core::project::scanner::SourceFile;
use liteworkspace_java::java_caps;
use liteworkspace_plugin::UnitContext;
use std::path::{Path, PathBuf};

pub const ROOT: &str = "/shop";

/// Index in-memory Java sources keyed by path relative to `ROOT`.
pub fn index_sources(sources: &[(&str, &str)]) -> SymbolIndex {
    index_with_catalog(sources, LibraryCatalog::default())
}

pub fn index_with_catalog(sources: &[(&str, &str)], catalog: LibraryCatalog) -> SymbolIndex {
    let caps = java_caps().expect("java caps");
    let files = sources
        .iter()
        .map(|(path, text)| {
            let path = Path::new(ROOT).join(path);
            let scope = if path.to_string_lossy().contains("src/test/") {
                SourceScope::Test
            } else {
                SourceScope::Main
            };
            SourceFile {
                path,
                text: text.to_string(),
                context: UnitContext {
                    module: "shop".to_string(),
                    scope,
                },
            }
        })
        .collect();
    Indexer::new(vec![caps], catalog).index_files(Path::new(ROOT), files)
}

#[allow(dead_code)]
pub fn catalog(entries: &[(&str, &str)]) -> LibraryCatalog {
    let mut catalog = LibraryCatalog::default();
    for (package, coordinate) in entries {
        let coordinate: LibraryCoordinate = coordinate.parse().expect("coordinate");
        catalog.insert(package, coordinate);
    }
    catalog
}

/// `(target, kind)` pairs of resolved references, plus `?name` for unresolved ones.
#[allow(dead_code)]
pub fn edges(index: &SymbolIndex, from: &str) -> Vec<String> {
    index
        .direct_references(&DeclId::new(from))
        .iter()
        .map(|r: &Reference| match &r.target {
            Some(target) => format!("{} {}", r.kind, target),
            None => format!("? {}", r.name),
        })
        .collect()
}

#[allow(dead_code)]
pub fn source_path(relative: &str) -> PathBuf {
    Path::new(ROOT).join(relative)
}

pub const ORDER: &str = r#"package com.shop;

import java.math.BigDecimal;

public class Order {
    private final String id;

    public Order(String id) {
        this.id = id;
    }

    public boolean validate(BigDecimal limit) {
        BigDecimal total = PriceCalculator.compute(limit);
        return total.signum() >= 0;
    }

    public String describe() {
        return "Order " + id;
    }
}
"#;

pub const PRICE_CALCULATOR: &str = r#"package com.shop;

import java.math.BigDecimal;

public final class PriceCalculator {
    private PriceCalculator() {
    }

    public static BigDecimal compute(BigDecimal base) {
        return base.multiply(BigDecimal.TEN);
    }

    public static int unused() {
        return 42;
    }
}
"#;

#[allow(dead_code)]
pub fn order_project() -> SymbolIndex {
    index_sources(&[
        ("src/main/java/com/shop/Order.java", ORDER),
        ("src/main/java/com/shop/PriceCalculator.java", PRICE_CALCULATOR),
    ])
}
