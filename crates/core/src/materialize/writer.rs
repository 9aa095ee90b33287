use super::MaterializedWorkspace;
use crate::error::{LiteError, Result};
use std::fs;
use std::path::{Component, Path};
use tracing::info;

pub const LIBRARY_MANIFEST: &str = "libraries.txt";

/// Write a workspace to `dir` in one step.
///
/// Files go to a temporary sibling directory that is renamed into place
/// once complete. An existing non-empty `dir` is never replaced.
pub fn write_to_dir(workspace: &MaterializedWorkspace, dir: &Path) -> Result<()> {
    if dir.exists() && fs::read_dir(dir)?.next().is_some() {
        return Err(LiteError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists and is not empty", dir.display()),
        )));
    }
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    fs::create_dir_all(&parent)?;

    let staging = tempfile::Builder::new()
        .prefix(".liteworkspace-")
        .tempdir_in(&parent)?;

    for (relative, content) in &workspace.files {
        if !is_contained(relative) {
            return Err(LiteError::Internal(format!(
                "refusing to write outside the workspace: {}",
                relative.display()
            )));
        }
        let target = staging.path().join(relative);
        if let Some(p) = target.parent() {
            fs::create_dir_all(p)?;
        }
        fs::write(&target, content)?;
    }

    let manifest: String = workspace
        .libraries
        .iter()
        .map(|c| format!("{}\n", c))
        .collect();
    fs::write(staging.path().join(LIBRARY_MANIFEST), manifest)?;

    if dir.exists() {
        fs::remove_dir(dir)?;
    }
    // The staging guard's cleanup finds nothing once the rename succeeded.
    fs::rename(staging.path(), dir)?;
    info!(
        "Wrote {} files and {} libraries to {}",
        workspace.files.len(),
        workspace.libraries.len(),
        dir.display()
    );
    Ok(())
}

fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
