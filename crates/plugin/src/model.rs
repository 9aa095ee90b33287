use liteworkspace_api::models::{DeclId, Declaration, Language, Range, ReferenceKind, SourceScope};
use std::path::PathBuf;
use std::sync::Arc;

/// What the indexer knows about a file before parsing it.
#[derive(Debug, Clone, Default)]
pub struct UnitContext {
    /// Build module owning the file.
    pub module: String,
    pub scope: SourceScope,
}

/// Import declarations of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportContext {
    pub package: Option<String>,
    /// `import a.b.C;`
    pub single: Vec<String>,
    /// `import a.b.*;`
    pub on_demand: Vec<String>,
    /// `import static a.b.C.m;`
    pub static_single: Vec<String>,
    /// `import static a.b.C.*;`
    pub static_on_demand: Vec<String>,
}

impl ImportContext {
    /// Qualified name brought in by a single-type import whose last segment is `name`.
    pub fn single_import(&self, name: &str) -> Option<&str> {
        self.single
            .iter()
            .find(|imp| imp.rsplit('.').next() == Some(name))
            .map(String::as_str)
    }

    /// Owning type of a statically imported member called `name`.
    pub fn static_owner(&self, name: &str) -> Option<&str> {
        self.static_single
            .iter()
            .find_map(|imp| match imp.rsplit_once('.') {
                Some((owner, member)) if member == name => Some(owner),
                _ => None,
            })
    }
}

/// Receiver of a member access, as far as syntax alone can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawReceiver {
    /// No receiver, or `this`.
    Implicit,
    Super,
    /// Declared type of a local variable or parameter.
    Typed(String),
    /// Identifier that is neither a local nor a parameter: a field or a type name.
    Name(String),
    /// Result of another invocation.
    Call(Box<MemberSite>),
    /// Value of another field access.
    Field(Box<MemberSite>),
    /// `new T(...)`.
    New(String),
    /// Anything else (literals, array access, lambdas).
    Unknown,
}

/// `receiver.name` in a call or field access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSite {
    pub name: String,
    pub receiver: RawReceiver,
}

impl MemberSite {
    pub fn new(name: impl Into<String>, receiver: RawReceiver) -> Self {
        Self {
            name: name.into(),
            receiver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTarget {
    /// A type name as written, possibly qualified (`Map.Entry`, `java.util.List`).
    Type(String),
    Call(MemberSite),
    Field(MemberSite),
    /// Bare identifier that may be an inherited or enclosing field.
    /// Left unbound silently when nothing matches.
    ImplicitField(String),
}

/// A use site extracted by the parser, not yet bound to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub kind: ReferenceKind,
    pub target: RawTarget,
    pub range: Option<Range>,
}

impl RawReference {
    pub fn ty(kind: ReferenceKind, name: impl Into<String>, range: Option<Range>) -> Self {
        Self {
            kind,
            target: RawTarget::Type(name.into()),
            range,
        }
    }

    pub fn call(site: MemberSite, range: Option<Range>) -> Self {
        Self {
            kind: ReferenceKind::Call,
            target: RawTarget::Call(site),
            range,
        }
    }

    pub fn field(site: MemberSite, range: Option<Range>) -> Self {
        Self {
            kind: ReferenceKind::Field,
            target: RawTarget::Field(site),
            range,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedDeclaration {
    pub decl: Declaration,
    /// Raw supertype names as written in the header (types only).
    pub supertypes: Vec<String>,
    /// Use sites the declaration needs to compile: its own text, the
    /// headers of its enclosing types and, for types, everything enclosed.
    pub references: Vec<RawReference>,
}

/// Parse-phase output for one file.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub path: PathBuf,
    pub language: Language,
    pub imports: Arc<ImportContext>,
    pub text: Arc<str>,
    pub top_level: Vec<DeclId>,
    /// Declarations in source order, enclosing before enclosed.
    pub declarations: Vec<ParsedDeclaration>,
}

impl ParsedUnit {
    pub fn package(&self) -> Option<&str> {
        self.imports.package.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_lookup_matches_last_segment() {
        let imports = ImportContext {
            package: Some("com.shop".into()),
            single: vec!["java.math.BigDecimal".into(), "java.util.List".into()],
            static_single: vec!["org.junit.Assert.assertEquals".into()],
            ..Default::default()
        };
        assert_eq!(imports.single_import("List"), Some("java.util.List"));
        assert_eq!(imports.single_import("Decimal"), None);
        assert_eq!(imports.static_owner("assertEquals"), Some("org.junit.Assert"));
        assert_eq!(imports.static_owner("assertTrue"), None);
    }
}
