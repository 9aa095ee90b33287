use liteworkspace_api::CompilationUnit;
use liteworkspace_api::models::Declaration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Placeholder body used for stubbed methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StubBodyStyle {
    /// `return 0;`, `return false;`, `return null;`, or empty for `void`.
    #[default]
    DefaultValue,
    /// `throw new UnsupportedOperationException("stub");`
    ThrowUnsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Original text, untouched.
    Full,
    /// Signature with a placeholder body.
    Stub,
    /// Header only; members come from `children`.
    Shell,
}

/// One declaration to emit, with the enclosed declarations to emit inside it.
#[derive(Debug, Clone)]
pub struct RenderNode {
    pub decl: Arc<Declaration>,
    pub mode: RenderMode,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn new(decl: Arc<Declaration>, mode: RenderMode) -> Self {
        Self {
            decl,
            mode,
            children: Vec::new(),
        }
    }
}

/// Emits trimmed source files.
pub trait SourceRenderer: Send + Sync {
    /// Path of the file relative to a source root (`com/shop/Order.java`).
    fn relative_path(&self, unit: &CompilationUnit) -> PathBuf;

    /// File prelude followed by `plan`, one top-level type per entry.
    fn render(&self, unit: &CompilationUnit, plan: &[RenderNode], style: StubBodyStyle) -> String;
}
