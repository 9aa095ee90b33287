use crate::target::TargetArgs;
use liteworkspace_core::{MaterializedWorkspace, write_to_dir};
use liteworkspace_java::CompileReport;
use liteworkspace_plugin::StubBodyStyle;
use std::path::PathBuf;
use tracing::{info, warn};

pub async fn run(
    target: TargetArgs,
    out: Option<PathBuf>,
    throwing_stubs: bool,
    verify: bool,
) -> anyhow::Result<()> {
    let mut config = target.config()?;
    if throwing_stubs {
        config.materializer.stub_body = StubBodyStyle::ThrowUnsupported;
    }
    let bench = target.open(config).await?;
    let index = bench.snapshot().await;
    let root = target.root(&index)?;
    let closure = bench.resolver().resolve(index.as_ref(), root.id.as_str())?;
    for diagnostic in closure.unresolved() {
        warn!("{}", diagnostic);
    }
    let workspace = bench.materialize(&index, &closure)?;

    match out {
        Some(dir) => {
            write_to_dir(&workspace, &dir)?;
            info!("Workspace for {} written to {}", root.id, dir.display());
            println!(
                "Wrote {} files and {} libraries to {}",
                workspace.file_count(),
                workspace.libraries.len(),
                dir.display()
            );
            if verify {
                match bench.verify(&dir, &workspace).await? {
                    Some(report) => print!("{}", verification(&report)),
                    None => warn!("No javac found on JAVA_HOME or PATH; skipping verification"),
                }
            }
        }
        None => print!("{}", summary(&workspace)),
    }
    Ok(())
}

fn summary(workspace: &MaterializedWorkspace) -> String {
    let mut out = String::new();
    for (path, text) in &workspace.files {
        out.push_str(&format!("{:>8}  {}\n", text.lines().count(), path.display()));
    }
    for library in &workspace.libraries {
        out.push_str(&format!("{:>8}  {}\n", "lib", library));
    }
    out
}

fn verification(report: &CompileReport) -> String {
    if report.success {
        return format!("javac: {} files compiled\n", report.files);
    }
    let mut out = format!("javac: {} errors\n", report.errors().count());
    for diagnostic in &report.diagnostics {
        out.push_str(&format!("  {}\n", diagnostic));
    }
    out
}
