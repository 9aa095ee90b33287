//! Project indexing pipeline
//!
//! 1. scan the project for files a registered language accepts
//! 2. parse them in parallel into declarations and raw use sites
//! 3. build the project-wide declaration table
//! 4. bind use sites into references, in parallel
//! 5. assemble the immutable `SymbolIndex`

use crate::error::{LiteError, Result};
use crate::index::{DeclarationTable, LibraryCatalog, SymbolIndex};
use crate::project::scanner::{Scanner, SourceFile};
use liteworkspace_api::CompilationUnit;
use liteworkspace_api::models::{DeclId, Reference};
use liteworkspace_plugin::{CollectedReferences, LanguageCaps, ParsedUnit};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

pub struct Indexer {
    caps: Vec<LanguageCaps>,
    catalog: LibraryCatalog,
}

impl Indexer {
    pub fn new(caps: Vec<LanguageCaps>, catalog: LibraryCatalog) -> Self {
        Self { caps, catalog }
    }

    fn caps_for(&self, path: &Path) -> Option<&LanguageCaps> {
        self.caps.iter().find(|c| c.matcher.supports_path(path))
    }

    pub fn index_project(&self, root: &Path) -> Result<SymbolIndex> {
        if !root.is_dir() {
            return Err(LiteError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("project root {} is not a directory", root.display()),
            )));
        }
        let start = Instant::now();
        let files = Scanner::scan(root, |path| self.caps_for(path).is_some());
        let index = self.index_files(root, files);
        info!(
            "Indexed {} files into {} declarations and {} edges in {:?}",
            index.file_count(),
            index.node_count(),
            index.edge_count(),
            start.elapsed()
        );
        Ok(index)
    }

    /// Index already-read files. Files that fail to parse are skipped with a warning.
    pub fn index_files(&self, root: &Path, files: Vec<SourceFile>) -> SymbolIndex {
        let parsed: Vec<(usize, ParsedUnit)> = files
            .par_iter()
            .filter_map(|file| {
                let caps_idx = self
                    .caps
                    .iter()
                    .position(|c| c.matcher.supports_path(&file.path))?;
                match self.caps[caps_idx]
                    .parser
                    .parse_file(&file.text, &file.path, &file.context)
                {
                    Ok(unit) => Some((caps_idx, unit)),
                    Err(e) => {
                        warn!("Failed to parse {}: {}", file.path.display(), e);
                        None
                    }
                }
            })
            .collect();

        let units: Vec<ParsedUnit> = parsed.iter().map(|(_, u)| u.clone()).collect();
        let table = DeclarationTable::build(&units, self.catalog.clone());

        let bound: Vec<(DeclId, CollectedReferences)> = parsed
            .par_iter()
            .flat_map_iter(|(caps_idx, unit)| {
                let collector = &self.caps[*caps_idx].collector;
                let table = &table;
                unit.declarations.iter().map(move |parsed| {
                    (
                        parsed.decl.id.clone(),
                        collector.collect(parsed, &unit.imports, table),
                    )
                })
            })
            .collect();

        let mut builder = SymbolIndex::builder(root);
        for unit in &units {
            builder.add_unit(CompilationUnit {
                path: unit.path.clone(),
                package: unit.package().map(str::to_string),
                text: unit.text.clone(),
                top_level: unit.top_level.clone(),
            });
            for parsed in &unit.declarations {
                if let Some(shared) = table.shared(&parsed.decl.id) {
                    builder.add_declaration(shared);
                }
            }
        }
        for (_, collected) in &bound {
            for library in &collected.libraries {
                builder.add_declaration(library.clone());
            }
        }
        let mut unresolved = 0usize;
        let mut seen = HashSet::new();
        for (id, collected) in bound {
            // A duplicate id keeps the references of its first definition.
            if !seen.insert(id.clone()) {
                continue;
            }
            unresolved += collected
                .references
                .iter()
                .filter(|r: &&Reference| r.is_unresolved())
                .count();
            builder.set_references(&id, collected.references);
        }
        if unresolved > 0 {
            info!("{} references could not be bound", unresolved);
        }
        builder.build()
    }
}
