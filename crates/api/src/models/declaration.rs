use super::library::LibraryCoordinate;
use super::symbol::{ByteSpan, Range};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Stable identity of a declaration within one analysis pass: its qualified name.
///
/// Types are `pkg.Outer.Inner`, members `pkg.Type.member`, constructors
/// `pkg.Type.<init>`. Overloaded methods share one id; a method named like
/// a field of the same type is `pkg.Type.member()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DeclId(#[schemars(with = "String")] Arc<str>);

impl DeclId {
    pub const CONSTRUCTOR: &'static str = "<init>";

    pub fn new(fqn: impl AsRef<str>) -> Self {
        Self(Arc::from(fqn.as_ref()))
    }

    pub fn member(owner: &DeclId, name: &str) -> Self {
        Self::new(format!("{}.{}", owner.0, name))
    }

    pub fn constructor(owner: &DeclId) -> Self {
        Self::member(owner, Self::CONSTRUCTOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(q, _)| q)
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DeclId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeclId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DeclId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
    Method,
    Constructor,
    Field,
}

impl DeclKind {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclKind::Class
                | DeclKind::Interface
                | DeclKind::Enum
                | DeclKind::Annotation
                | DeclKind::Record
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, DeclKind::Method | DeclKind::Constructor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
            DeclKind::Annotation => "annotation",
            DeclKind::Record => "record",
            DeclKind::Method => "method",
            DeclKind::Constructor => "constructor",
            DeclKind::Field => "field",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declaration comes from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum DeclOrigin {
    /// Defined in project source; source text is retrievable.
    Project { module: String },
    /// Compiled library; identified only by its coordinate.
    Library { coordinate: LibraryCoordinate },
}

impl DeclOrigin {
    pub fn is_library(&self) -> bool {
        matches!(self, DeclOrigin::Library { .. })
    }

    pub fn coordinate(&self) -> Option<&LibraryCoordinate> {
        match self {
            DeclOrigin::Library { coordinate } => Some(coordinate),
            DeclOrigin::Project { .. } => None,
        }
    }

    pub fn module(&self) -> Option<&str> {
        match self {
            DeclOrigin::Project { module } => Some(module),
            DeclOrigin::Library { .. } => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceScope {
    #[default]
    Main,
    Test,
}

/// Byte-level layout of a declaration inside its compilation unit.
/// Renderers use it to trim bodies without re-parsing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct DeclShape {
    /// Whole declaration, including annotations and modifiers.
    pub span: ByteSpan,
    /// `{ ... }` of a type, method or constructor.
    #[serde(default)]
    pub body: Option<ByteSpan>,
    /// For fields: from the end of the declarator name through the end of the initializer.
    #[serde(default)]
    pub initializer: Option<ByteSpan>,
    /// Leading `this(...)` / `super(...)` statement of a constructor.
    #[serde(default)]
    pub constructor_call: Option<ByteSpan>,
    /// Constant list of an enum body.
    #[serde(default)]
    pub enum_constants: Option<ByteSpan>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Declared return type (methods) or declared type (fields), as written.
    #[serde(default)]
    pub type_text: Option<String>,
    /// Number of declarators sharing this field declaration.
    #[serde(default)]
    pub declarators: usize,
    /// Further overloads sharing the same id, in source order.
    #[serde(default)]
    pub overloads: Vec<DeclShape>,
}

impl DeclShape {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// A `final` field declared without a value; a constructor or static
    /// initializer has to assign it.
    pub fn is_blank_final(&self) -> bool {
        self.has_modifier("final") && self.initializer.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub range: Range,
    pub shape: DeclShape,
}

/// A uniquely identified program entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct Declaration {
    pub id: DeclId,
    pub name: String,
    pub kind: DeclKind,
    pub origin: DeclOrigin,
    #[serde(default)]
    pub scope: SourceScope,
    /// Enclosing declaration (the owning type for members and nested types).
    #[serde(default)]
    pub parent: Option<DeclId>,
    /// `None` for library declarations.
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl Declaration {
    /// A type known only by coordinate.
    pub fn library(id: DeclId, coordinate: LibraryCoordinate) -> Self {
        Self {
            name: id.simple_name().to_string(),
            id,
            kind: DeclKind::Class,
            origin: DeclOrigin::Library { coordinate },
            scope: SourceScope::Main,
            parent: None,
            location: None,
        }
    }

    pub fn is_library(&self) -> bool {
        self.origin.is_library()
    }

    pub fn shape(&self) -> Option<&DeclShape> {
        self.location.as_ref().map(|l| &l.shape)
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        self.location.as_ref().map(|l| l.path.as_path())
    }
}
