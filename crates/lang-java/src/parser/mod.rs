type Result<T> = std::result::Result<T, liteworkspace_plugin::BoxError>;

mod decls;
mod imports;
mod refs;

use liteworkspace_api::models::Language;
use liteworkspace_plugin::{ParsedUnit, UnitContext};
use std::path::Path;
use std::sync::Arc;
use tree_sitter::{Parser, Tree};

pub(crate) use decls::method_alias;
pub(crate) use imports::prelude_end;

#[derive(Clone)]
pub struct JavaParser {
    pub language: tree_sitter::Language,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
        // Fails early on a grammar/runtime ABI mismatch.
        Parser::new().set_language(&language)?;
        Ok(Self { language })
    }

    pub fn parse_tree(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| "tree-sitter returned no tree for Java source".into())
    }

    pub fn parse_file(&self, source: &str, path: &Path, ctx: &UnitContext) -> Result<ParsedUnit> {
        let tree = self.parse_tree(source)?;
        let root = tree.root_node();
        let imports = imports::read_imports(root, source);

        let mut walker = decls::UnitWalker::new(source, path, ctx, imports.package.clone());
        walker.walk_program(root);
        let (top_level, declarations) = walker.finish();

        Ok(ParsedUnit {
            path: path.to_path_buf(),
            language: Language::JAVA,
            imports: Arc::new(imports),
            text: Arc::from(source),
            top_level,
            declarations,
        })
    }
}
