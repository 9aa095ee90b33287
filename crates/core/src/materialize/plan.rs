use liteworkspace_api::SymbolGraph;
use liteworkspace_api::models::{DeclId, Declaration, InclusionPolicy};
use liteworkspace_plugin::{RenderMode, RenderNode};
use std::collections::HashMap;
use std::sync::Arc;

/// Closure nodes of one file, keyed by id.
pub(crate) type Selection = HashMap<DeclId, InclusionPolicy>;

/// Render tree for `decl`, or `None` when neither it nor anything it
/// encloses belongs to the closure.
pub(crate) fn plan_for(
    graph: &dyn SymbolGraph,
    decl: Arc<Declaration>,
    selection: &Selection,
) -> Option<RenderNode> {
    match selection.get(&decl.id) {
        Some(InclusionPolicy::FullSource) => Some(RenderNode::new(decl, RenderMode::Full)),
        Some(InclusionPolicy::Stub) => {
            let mut node = RenderNode::new(decl.clone(), RenderMode::Stub);
            if decl.kind.is_type() {
                node.children = plan_children(graph, &decl.id, selection);
            }
            Some(node)
        }
        _ => {
            let children = plan_children(graph, &decl.id, selection);
            if children.is_empty() {
                return None;
            }
            let mut node = RenderNode::new(decl, RenderMode::Shell);
            node.children = children;
            Some(node)
        }
    }
}

fn plan_children(graph: &dyn SymbolGraph, id: &DeclId, selection: &Selection) -> Vec<RenderNode> {
    graph
        .children(id)
        .into_iter()
        .filter_map(|child| plan_for(graph, child, selection))
        .collect()
}

/// Whether the file can be copied as is: every top-level type is kept whole.
pub(crate) fn is_verbatim(top_level: &[DeclId], plan: &[RenderNode]) -> bool {
    !top_level.is_empty()
        && plan.len() == top_level.len()
        && plan.iter().all(|node| node.mode == RenderMode::Full)
}
