use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of a declaration the minimal workspace retains.
///
/// Variants are ordered by inclusiveness, so `max` picks the dominant policy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InclusionPolicy {
    /// Library type; contributes a coordinate, never a file.
    ExternalReferenceOnly,
    /// Signature only, bodies replaced by placeholders.
    Stub,
    /// Original source text.
    FullSource,
}

impl InclusionPolicy {
    pub fn dominant(self, other: InclusionPolicy) -> InclusionPolicy {
        self.max(other)
    }

    pub fn emits_file(&self) -> bool {
        !matches!(self, InclusionPolicy::ExternalReferenceOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InclusionPolicy::ExternalReferenceOnly => "external",
            InclusionPolicy::Stub => "stub",
            InclusionPolicy::FullSource => "full",
        }
    }
}

impl fmt::Display for InclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::InclusionPolicy::*;

    #[test]
    fn most_inclusive_policy_wins() {
        assert_eq!(Stub.dominant(FullSource), FullSource);
        assert_eq!(ExternalReferenceOnly.dominant(Stub), Stub);
        assert_eq!(FullSource.dominant(ExternalReferenceOnly), FullSource);
        assert!(!ExternalReferenceOnly.emits_file());
    }
}
