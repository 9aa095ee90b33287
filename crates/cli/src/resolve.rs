use crate::OutputFormat;
use crate::target::TargetArgs;
use liteworkspace_core::ClosureResult;
use liteworkspace_core::report::render_markdown;
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Declaration")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Policy")]
    policy: String,
    #[tabled(rename = "Dist")]
    distance: usize,
    #[tabled(rename = "Origin")]
    origin: String,
}

pub async fn run(target: TargetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let bench = target.open(target.config()?).await?;
    let index = bench.snapshot().await;
    let root = target.root(&index)?;
    info!("Resolving {}", root.id);
    let closure = bench.resolver().resolve(index.as_ref(), root.id.as_str())?;
    print!("{}", render(&closure, format)?);
    Ok(())
}

pub(crate) fn render(closure: &ClosureResult, format: OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(closure)?;
            json.push('\n');
            json
        }
        OutputFormat::Markdown => render_markdown(closure),
        OutputFormat::Table => render_table(closure),
    };
    Ok(text)
}

fn render_table(closure: &ClosureResult) -> String {
    let rows: Vec<NodeRow> = closure
        .nodes
        .values()
        .map(|node| {
            let decl = &node.declaration;
            NodeRow {
                id: decl.id.to_string(),
                kind: decl.kind.to_string(),
                policy: node.policy.as_str().to_string(),
                distance: node.distance,
                origin: decl
                    .origin
                    .coordinate()
                    .map(|c| c.to_string())
                    .or_else(|| decl.origin.module().map(str::to_string))
                    .unwrap_or_default(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    let mut out = table.to_string();
    out.push('\n');

    let _ = writeln!(out, "\nLibraries ({}):", closure.libraries.len());
    for library in &closure.libraries {
        let _ = writeln!(out, "  {}", library);
    }
    let reported: Vec<_> = closure
        .diagnostics
        .iter()
        .filter(|d| !matches!(d, liteworkspace_core::Diagnostic::LibraryExpansionSkipped { .. }))
        .collect();
    if !reported.is_empty() {
        let _ = writeln!(out, "\nDiagnostics ({}):", reported.len());
        for diagnostic in reported {
            let _ = writeln!(out, "  {}", diagnostic);
        }
    }
    out
}
