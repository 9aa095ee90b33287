use liteworkspace_plugin::ImportContext;
use liteworkspace_plugin::utils::node_text;
use tree_sitter::Node;

pub(crate) fn read_imports(root: Node, source: &str) -> ImportContext {
    let mut imports = ImportContext::default();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                imports.package = qualified_name(child, source);
            }
            "import_declaration" => {
                let Some(name) = qualified_name(child, source) else {
                    continue;
                };
                let mut inner = child.walk();
                let mut is_static = false;
                let mut on_demand = false;
                for token in child.children(&mut inner) {
                    match token.kind() {
                        "static" => is_static = true,
                        "asterisk" => on_demand = true,
                        _ => {}
                    }
                }
                let bucket = match (is_static, on_demand) {
                    (false, false) => &mut imports.single,
                    (false, true) => &mut imports.on_demand,
                    (true, false) => &mut imports.static_single,
                    (true, true) => &mut imports.static_on_demand,
                };
                bucket.push(name);
            }
            _ => {}
        }
    }
    imports
}

/// End byte of the last package or import declaration, or 0.
pub(crate) fn prelude_end(root: Node) -> usize {
    let mut cursor = root.walk();
    root.named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "package_declaration" | "import_declaration"))
        .map(|n| n.end_byte())
        .last()
        .unwrap_or(0)
}

fn qualified_name(node: Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
        .map(|n| node_text(n, source).split_whitespace().collect())
}
