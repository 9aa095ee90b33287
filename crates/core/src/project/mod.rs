pub mod scanner;

use liteworkspace_api::models::SourceScope;
use std::path::Path;

pub const BUILD_FILES: &[&str] = &["build.gradle", "build.gradle.kts", "pom.xml"];

/// Name of the build module owning `path`: the nearest ancestor directory
/// holding a build file, or the project root.
pub fn module_of(root: &Path, path: &Path) -> String {
    let mut dir = path.parent();
    while let Some(current) = dir {
        if !current.starts_with(root) {
            break;
        }
        if current != root && BUILD_FILES.iter().any(|f| current.join(f).is_file()) {
            return dir_name(current);
        }
        if current == root {
            break;
        }
        dir = current.parent();
    }
    dir_name(root)
}

/// Files under a `src/test` tree are test scope.
pub fn scope_of(path: &Path) -> SourceScope {
    let components: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    let is_test = components
        .windows(2)
        .any(|pair| pair[0] == "src" && pair[1] == "test");
    if is_test {
        SourceScope::Test
    } else {
        SourceScope::Main
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}
