use crate::resolver::{ClosureResult, ResolutionNode};
use std::fmt::Write;

/// Markdown dependency report of a closure, grouped by distance from the root.
pub fn render_markdown(closure: &ClosureResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Dependencies of `{}`", closure.root);
    let _ = writeln!(out);

    let max_distance = closure.nodes.values().map(|n| n.distance).max().unwrap_or(0);
    for distance in 0..=max_distance {
        let level: Vec<&ResolutionNode> = closure
            .nodes
            .values()
            .filter(|n| n.distance == distance)
            .collect();
        if level.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## Distance {}", distance);
        let _ = writeln!(out);
        for node in level {
            let decl = &node.declaration;
            let origin = match decl.origin.coordinate() {
                Some(coordinate) => coordinate.to_string(),
                None => decl.origin.module().unwrap_or_default().to_string(),
            };
            let _ = writeln!(
                out,
                "- `{}` ({}, **{}**, {})",
                decl.id, decl.kind, node.policy, origin
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Libraries");
    let _ = writeln!(out);
    if closure.libraries.is_empty() {
        let _ = writeln!(out, "_none_");
    }
    for library in &closure.libraries {
        let _ = writeln!(out, "- `{}`", library);
    }

    if !closure.diagnostics.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Diagnostics");
        let _ = writeln!(out);
        for diagnostic in &closure.diagnostics {
            let _ = writeln!(out, "- {}", diagnostic);
        }
    }
    out
}
