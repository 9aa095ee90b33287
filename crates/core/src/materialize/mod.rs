//! Turns a closure into the files of a minimal workspace.

mod plan;
mod writer;

pub use writer::{LIBRARY_MANIFEST, write_to_dir};

use crate::config::MaterializerConfig;
use crate::resolver::ClosureResult;
use indexmap::{IndexMap, IndexSet};
use liteworkspace_api::models::{DeclId, LibraryCoordinate};
use liteworkspace_api::{ApiError, ApiResult, SymbolGraph};
use liteworkspace_plugin::{SourceRenderer, StubBodyStyle};
use plan::Selection;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Relative path to file content, plus the libraries the files need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializedWorkspace {
    pub files: IndexMap<PathBuf, String>,
    pub libraries: Vec<LibraryCoordinate>,
}

impl MaterializedWorkspace {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    pub source_root: PathBuf,
    pub stub_body: StubBodyStyle,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self::from_config(&MaterializerConfig::default())
    }
}

impl MaterializeOptions {
    pub fn from_config(config: &MaterializerConfig) -> Self {
        Self {
            source_root: PathBuf::from(&config.source_root),
            stub_body: config.stub_body,
        }
    }
}

pub struct Materializer<'a> {
    graph: &'a dyn SymbolGraph,
    renderer: &'a dyn SourceRenderer,
    options: MaterializeOptions,
}

impl<'a> Materializer<'a> {
    pub fn new(
        graph: &'a dyn SymbolGraph,
        renderer: &'a dyn SourceRenderer,
        options: MaterializeOptions,
    ) -> Self {
        Self {
            graph,
            renderer,
            options,
        }
    }

    pub fn materialize(&self, closure: &ClosureResult) -> ApiResult<MaterializedWorkspace> {
        let mut by_file: IndexMap<PathBuf, Selection> = IndexMap::new();
        let mut libraries: IndexSet<LibraryCoordinate> = IndexSet::new();

        for (id, node) in &closure.nodes {
            if !node.policy.emits_file() {
                if let Some(coordinate) = node.declaration.origin.coordinate() {
                    libraries.insert(coordinate.clone());
                }
                continue;
            }
            let path = node.declaration.path().ok_or_else(|| {
                ApiError::Internal(format!("{} has no source location", id))
            })?;
            by_file
                .entry(path.to_path_buf())
                .or_default()
                .insert(id.clone(), node.policy);
        }

        let mut files = IndexMap::new();
        for (path, selection) in &by_file {
            let unit = self
                .graph
                .compilation_unit(path)
                .ok_or_else(|| ApiError::NotFound(path.display().to_string()))?;

            let plan: Vec<_> = unit
                .top_level
                .iter()
                .filter_map(|id: &DeclId| self.graph.resolve(id.as_str()).ok())
                .filter_map(|decl| plan::plan_for(self.graph, decl, selection))
                .collect();

            let content = if plan::is_verbatim(&unit.top_level, &plan) {
                debug!("Copying {} verbatim", path.display());
                unit.text.to_string()
            } else {
                debug!("Rendering {} ({} closure nodes)", path.display(), selection.len());
                self.renderer.render(&unit, &plan, self.options.stub_body)
            };
            let relative = self.options.source_root.join(self.renderer.relative_path(&unit));
            files.insert(relative, content);
        }

        let workspace = MaterializedWorkspace {
            files,
            libraries: libraries.into_iter().collect(),
        };
        info!(
            "Materialized {} files and {} libraries for {}",
            workspace.files.len(),
            workspace.libraries.len(),
            closure.root
        );
        Ok(workspace)
    }
}
