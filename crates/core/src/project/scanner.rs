use super::{module_of, scope_of};
use ignore::WalkBuilder;
use liteworkspace_plugin::UnitContext;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A source file read from disk, ready for parsing.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub context: UnitContext,
}

pub struct Scanner;

impl Scanner {
    /// Read every file under `root` accepted by `accept`, in path order.
    pub fn scan<F>(root: &Path, accept: F) -> Vec<SourceFile>
    where
        F: Fn(&Path) -> bool + Sync,
    {
        Self::collect_paths(root)
            .par_iter()
            .filter(|path| accept(path))
            .filter_map(|path| {
                let text = match fs::read_to_string(path) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Skipping unreadable file {}: {}", path.display(), e);
                        return None;
                    }
                };
                Some(SourceFile {
                    path: path.clone(),
                    text,
                    context: UnitContext {
                        module: module_of(root, path),
                        scope: scope_of(path),
                    },
                })
            })
            .collect()
    }

    pub(crate) fn collect_paths(root: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkBuilder::new(root)
            .build()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                if path.is_file() {
                    return Some(path.to_path_buf());
                }
                None
            })
            .collect();
        paths.sort();
        paths
    }
}
