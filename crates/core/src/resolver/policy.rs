use crate::config::ResolverConfig;
use liteworkspace_api::models::ReferenceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Knobs of one closure computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverPolicy {
    /// Maximum distance from the root at which project declarations are
    /// still included. Libraries are leaves that are never expanded, so a
    /// library referenced from the deepest project node sits at
    /// `max_depth + 1`.
    pub max_depth: Option<usize>,
    /// Allow test-scope declarations other than the root.
    pub include_test_scope: bool,
    /// Reference kinds a stub satisfies.
    pub stub_kinds: BTreeSet<ReferenceKind>,
}

impl ResolverPolicy {
    pub fn default_stub_kinds() -> BTreeSet<ReferenceKind> {
        BTreeSet::from([
            ReferenceKind::Type,
            ReferenceKind::Field,
            ReferenceKind::Annotation,
            ReferenceKind::Throws,
        ])
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            include_test_scope: config.include_test_scope,
            stub_kinds: config
                .stub_kinds
                .as_ref()
                .map(|kinds| kinds.iter().copied().collect())
                .unwrap_or_else(Self::default_stub_kinds),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_test_scope(mut self, include: bool) -> Self {
        self.include_test_scope = include;
        self
    }
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_test_scope: false,
            stub_kinds: Self::default_stub_kinds(),
        }
    }
}
