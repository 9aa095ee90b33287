use crate::target::TargetArgs;
use anyhow::anyhow;
use liteworkspace_api::SymbolGraph;
use liteworkspace_testgen::{TargetUnit, TestFileWriter, TestGenerationBridge};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run(
    target: TargetArgs,
    write: bool,
    overwrite: bool,
    provider: Option<String>,
) -> anyhow::Result<()> {
    let mut config = target.config()?;
    if let Some(provider) = provider {
        config.llm.provider = provider.parse()?;
    }
    let bench = target.open(config).await?;
    let index = bench.snapshot().await;
    let root = target.root(&index)?;
    let closure = bench.resolver().resolve(index.as_ref(), root.id.as_str())?;
    for diagnostic in closure.unresolved() {
        warn!("{}", diagnostic);
    }
    let workspace = bench.materialize(&index, &closure)?;

    let source = root
        .path()
        .ok_or_else(|| anyhow!("{} has no source file", root.id))?;
    let file = bench
        .workspace_path(&index, &root)
        .ok_or_else(|| anyhow!("{} is not in the index", source.display()))?;
    let package = index.compilation_unit(source).and_then(|unit| unit.package);
    let unit = TargetUnit::new(&root, package, file);

    let bridge = TestGenerationBridge::from_config(&bench.config().llm)?;
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling generation");
            on_interrupt.cancel();
        }
    });

    let test = bridge.generate(&unit, &workspace, &cancel).await?;
    if write {
        let module = module_root(source, bench.project());
        let path = TestFileWriter::new(module).write(&test, overwrite)?;
        println!("Wrote {}", path.display());
    } else {
        println!("// {}", test.relative_path.display());
        print!("{}", test.source);
    }
    Ok(())
}

/// Directory holding the `src` folder the file lives in, else the project root.
fn module_root(file: &Path, project: &Path) -> PathBuf {
    file.ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == "src"))
        .and_then(Path::parent)
        .unwrap_or(project)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_root_is_the_parent_of_src() {
        let project = Path::new("/shop");
        assert_eq!(
            module_root(Path::new("/shop/billing/src/main/java/a/A.java"), project),
            PathBuf::from("/shop/billing")
        );
        assert_eq!(module_root(Path::new("/shop/A.java"), project), PathBuf::from("/shop"));
    }
}
