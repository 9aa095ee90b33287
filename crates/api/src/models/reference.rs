use super::declaration::DeclId;
use super::symbol::Range;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How one declaration uses another.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Type mention: declared types, generic arguments, casts, literals.
    Type,
    /// Method invocation or method reference.
    Call,
    /// Field read or write.
    Field,
    /// `extends` / `implements`.
    Supertype,
    Annotation,
    Throws,
    /// `new T(...)`.
    Instantiation,
    /// The site could not be bound to any declaration.
    Unresolved,
}

impl ReferenceKind {
    /// Kinds whose target must be present with its full body.
    pub fn requires_full_source(&self) -> bool {
        matches!(
            self,
            ReferenceKind::Call | ReferenceKind::Supertype | ReferenceKind::Instantiation
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Type => "type",
            ReferenceKind::Call => "call",
            ReferenceKind::Field => "field",
            ReferenceKind::Supertype => "supertype",
            ReferenceKind::Annotation => "annotation",
            ReferenceKind::Throws => "throws",
            ReferenceKind::Instantiation => "instantiation",
            ReferenceKind::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReferenceKind {
    type Err = crate::ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "type" => Ok(ReferenceKind::Type),
            "call" => Ok(ReferenceKind::Call),
            "field" => Ok(ReferenceKind::Field),
            "supertype" => Ok(ReferenceKind::Supertype),
            "annotation" => Ok(ReferenceKind::Annotation),
            "throws" => Ok(ReferenceKind::Throws),
            "instantiation" => Ok(ReferenceKind::Instantiation),
            "unresolved" => Ok(ReferenceKind::Unresolved),
            other => Err(crate::ApiError::InvalidArgument(format!(
                "unknown reference kind '{}'",
                other
            ))),
        }
    }
}

/// A directed use edge. `target` is `None` exactly when `kind` is `Unresolved`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct Reference {
    pub source: DeclId,
    pub target: Option<DeclId>,
    pub kind: ReferenceKind,
    /// The name as written at the use site.
    pub name: String,
    #[serde(default)]
    pub range: Option<Range>,
}

impl Reference {
    pub fn resolved(source: DeclId, target: DeclId, kind: ReferenceKind, name: impl Into<String>) -> Self {
        Self {
            source,
            target: Some(target),
            kind,
            name: name.into(),
            range: None,
        }
    }

    pub fn unresolved(source: DeclId, name: impl Into<String>) -> Self {
        Self {
            source,
            target: None,
            kind: ReferenceKind::Unresolved,
            name: name.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn is_unresolved(&self) -> bool {
        self.target.is_none()
    }
}

/// Drop repeated `(source, target, kind)` triples, keeping first occurrences.
/// Unresolved entries are keyed by name instead of their (absent) target.
pub fn dedup_references(references: Vec<Reference>) -> Vec<Reference> {
    let mut seen: HashSet<(DeclId, String, ReferenceKind)> = HashSet::new();
    references
        .into_iter()
        .filter(|r| {
            let key = match &r.target {
                Some(t) => t.as_str().to_string(),
                None => format!("?{}", r.name),
            };
            seen.insert((r.source.clone(), key, r.kind))
        })
        .collect()
}
