use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Zero-based line/column range, as reported by the parser.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }

    /// Number of lines spanned; used to pick the innermost of nested ranges.
    pub fn line_span(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

/// Half-open byte span `[start, end)` into a compilation unit's text.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    pub fn encloses(&self, other: &ByteSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_respects_columns_on_boundary_lines() {
        let range = Range {
            start_line: 2,
            start_col: 4,
            end_line: 5,
            end_col: 1,
        };
        assert!(range.contains(3, 0));
        assert!(range.contains(2, 4));
        assert!(!range.contains(2, 3));
        assert!(!range.contains(5, 2));
        assert!(!range.contains(6, 0));
    }

    #[test]
    fn byte_span_slices_and_encloses() {
        let text = "class A { void f() {} }";
        let outer = ByteSpan::new(0, text.len());
        let inner = ByteSpan::new(10, 21);
        assert_eq!(inner.slice(text), Some("void f() {}"));
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
        assert_eq!(ByteSpan::new(3, 100).slice(text), None);
    }
}
