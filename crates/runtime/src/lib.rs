use liteworkspace_api::SymbolGraph;
use liteworkspace_api::models::Declaration;
use liteworkspace_core::index::LibraryCatalog;
use liteworkspace_core::indexing::Indexer;
use liteworkspace_core::{
    ClosureResolver, ClosureResult, IndexHandle, LiteConfig, LiteError, MaterializeOptions,
    MaterializedWorkspace, Materializer, ResolverPolicy, Result, SymbolIndex,
};
use liteworkspace_java::{CompileReport, Javac};
use liteworkspace_plugin::{LanguageCaps, SourceRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Every language this build supports.
pub fn default_caps() -> Vec<LanguageCaps> {
    let mut caps = Vec::new();
    match liteworkspace_java::java_caps() {
        Ok(java) => caps.push(java),
        Err(e) => tracing::error!("Failed to load Java support: {}", e),
    }
    caps
}

/// An indexed project together with the services configured for it.
///
/// This is the central factory of the runtime: it assembles the indexer
/// from the default language caps and the configured library catalog, and
/// hands out resolvers and materializers that follow the configuration.
pub struct Workbench {
    project: PathBuf,
    config: LiteConfig,
    indexer: Arc<Indexer>,
    index: IndexHandle,
    renderer: Arc<dyn SourceRenderer>,
}

impl Workbench {
    pub async fn open(project: PathBuf, config: LiteConfig) -> Result<Self> {
        let caps = default_caps();
        let renderer = caps
            .first()
            .map(|c| c.renderer.clone())
            .ok_or_else(|| LiteError::Plugin("no language support available".into()))?;
        let catalog = LibraryCatalog::from_config(&config.libraries)?;
        let indexer = Arc::new(Indexer::new(caps, catalog));
        let index = build_index(indexer.clone(), project.clone()).await?;
        Ok(Self {
            project,
            config,
            indexer,
            index: IndexHandle::new(index),
            renderer,
        })
    }

    /// Re-reads the project and swaps in the new index.
    pub async fn reindex(&self) -> Result<Arc<SymbolIndex>> {
        let index = build_index(self.indexer.clone(), self.project.clone()).await?;
        self.index.replace(index).await;
        Ok(self.index.snapshot().await)
    }

    pub async fn snapshot(&self) -> Arc<SymbolIndex> {
        self.index.snapshot().await
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn config(&self) -> &LiteConfig {
        &self.config
    }

    pub fn resolver(&self) -> ClosureResolver {
        ClosureResolver::new(ResolverPolicy::from_config(&self.config.resolver))
    }

    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions::from_config(&self.config.materializer)
    }

    pub fn materialize(&self, index: &SymbolIndex, closure: &ClosureResult) -> Result<MaterializedWorkspace> {
        Materializer::new(index, self.renderer.as_ref(), self.materialize_options())
            .materialize(closure)
            .map_err(LiteError::from)
    }

    /// Compiles a workspace already written to `dir`. `None` when no JDK
    /// compiler is installed; compile errors come back inside the report.
    pub async fn verify(&self, dir: &Path, workspace: &MaterializedWorkspace) -> Result<Option<CompileReport>> {
        let dir = dir.to_path_buf();
        let sources: Vec<PathBuf> = workspace.files.keys().cloned().collect();
        tokio::task::spawn_blocking(move || match Javac::locate() {
            Some(javac) => javac.compile(&dir, &sources).map(Some).map_err(LiteError::from),
            None => Ok(None),
        })
        .await
        .map_err(|e| LiteError::Internal(format!("verification task failed: {}", e)))?
    }

    /// Workspace-relative path of the file declaring `decl`.
    pub fn workspace_path(&self, index: &SymbolIndex, decl: &Declaration) -> Option<PathBuf> {
        let unit = index.compilation_unit(decl.path()?)?;
        Some(
            self.materialize_options()
                .source_root
                .join(self.renderer.relative_path(&unit)),
        )
    }
}

async fn build_index(indexer: Arc<Indexer>, root: PathBuf) -> Result<SymbolIndex> {
    tokio::task::spawn_blocking(move || indexer.index_project(&root))
        .await
        .map_err(|e| LiteError::Internal(format!("indexing task failed: {}", e)))?
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(liteworkspace_core::logging::init_logging(component, to_stderr))
}
