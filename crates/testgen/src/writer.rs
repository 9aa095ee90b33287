use crate::error::{GenerationFailed, Result};
use crate::response::GeneratedTest;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Places generated tests under a module's `src/test/java`.
#[derive(Debug, Clone)]
pub struct TestFileWriter {
    module_root: PathBuf,
}

impl TestFileWriter {
    pub fn new(module_root: impl Into<PathBuf>) -> Self {
        Self {
            module_root: module_root.into(),
        }
    }

    pub fn target_path(&self, test: &GeneratedTest) -> PathBuf {
        self.module_root.join(&test.relative_path)
    }

    /// Writes through a temporary sibling file renamed into place. An existing
    /// test is kept unless `overwrite` is set.
    pub fn write(&self, test: &GeneratedTest, overwrite: bool) -> Result<PathBuf> {
        let target = self.target_path(test);
        if target.exists() && !overwrite {
            return Err(GenerationFailed::AlreadyExists(target));
        }
        let parent = target.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(test.source.as_bytes())?;
        staged.flush()?;
        if overwrite {
            staged.persist(&target).map_err(|e| e.error)?;
        } else {
            staged.persist_noclobber(&target).map_err(|e| {
                if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                    GenerationFailed::AlreadyExists(target.clone())
                } else {
                    GenerationFailed::Io(e.error)
                }
            })?;
        }
        info!("Wrote {}", target.display());
        Ok(target)
    }
}
