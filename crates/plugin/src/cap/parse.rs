use crate::BoxError;
use crate::model::{ParsedUnit, UnitContext};
use std::path::Path;

/// Syntax-only extraction of declarations and raw use sites from one file.
pub trait LanguageParser: Send + Sync {
    fn parse_file(&self, source: &str, path: &Path, ctx: &UnitContext) -> Result<ParsedUnit, BoxError>;
}
