use liteworkspace_api::models::{ByteSpan, Range};
use tree_sitter::Node;

pub fn range_from_ts(node: Node) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range {
        start_line: start.row,
        start_col: start.column,
        end_line: end.row,
        end_col: end.column,
    }
}

pub fn span_from_ts(node: Node) -> ByteSpan {
    ByteSpan::new(node.start_byte(), node.end_byte())
}

/// Source text of `node`; empty when the node does not fall on UTF-8 boundaries.
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}
