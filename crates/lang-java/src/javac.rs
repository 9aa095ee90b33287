//! Compiles a written workspace with the local JDK to confirm it stands alone.

use liteworkspace_plugin::BoxError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

static DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(.+\.java):(\d+): )?(error|warning): (.*)$").expect("diagnostic pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    /// Relative to the compiled workspace; `None` for command-line errors.
    pub path: Option<PathBuf>,
    pub line: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(path), Some(line)) = (&self.path, self.line) {
            write!(f, "{}:{}: ", path.display(), line)?;
        }
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", severity, self.message)
    }
}

/// Outcome of one `javac` run. A failed compilation is a report, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub success: bool,
    pub files: usize,
    pub diagnostics: Vec<CompileDiagnostic>,
}

impl CompileReport {
    pub fn errors(&self) -> impl Iterator<Item = &CompileDiagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }
}

/// A `javac` executable and the classpath to compile against.
#[derive(Debug, Clone)]
pub struct Javac {
    program: PathBuf,
    classpath: Vec<PathBuf>,
}

impl Javac {
    /// `$JAVA_HOME/bin/javac`, then `javac` on the `PATH` if it runs.
    pub fn locate() -> Option<Self> {
        if let Ok(home) = std::env::var("JAVA_HOME") {
            let candidate = Path::new(&home).join("bin").join(executable());
            if candidate.is_file() {
                return Some(Self::at(candidate));
            }
        }
        let on_path = Self::at(PathBuf::from(executable()));
        on_path.version().map(|version| {
            debug!("Using {} from PATH", version);
            on_path
        })
    }

    pub fn at(program: PathBuf) -> Self {
        Self {
            program,
            classpath: Vec::new(),
        }
    }

    pub fn with_classpath(mut self, classpath: Vec<PathBuf>) -> Self {
        self.classpath = classpath;
        self
    }

    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.program).arg("-version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        // JDK 8 prints the version on stderr.
        let text = if output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        Some(String::from_utf8_lossy(text).trim().to_string())
    }

    /// Compiles the `.java` entries of `sources`, given relative to `dir`.
    /// Class files go to a scratch directory that is removed afterwards.
    pub fn compile(&self, dir: &Path, sources: &[PathBuf]) -> Result<CompileReport, BoxError> {
        let java: Vec<&PathBuf> = sources
            .iter()
            .filter(|p| p.extension().is_some_and(|e| e == "java"))
            .collect();
        if java.is_empty() {
            return Ok(CompileReport {
                success: true,
                ..Default::default()
            });
        }

        let scratch = tempfile::Builder::new().prefix(".liteworkspace-javac-").tempdir()?;
        let classes = scratch.path().join("classes");
        fs::create_dir_all(&classes)?;
        let argfile = scratch.path().join("sources.txt");
        let listed: Vec<String> = java.iter().map(|p| quote(p)).collect();
        fs::write(&argfile, listed.join("\n"))?;

        let mut command = Command::new(&self.program);
        command
            .current_dir(dir)
            .args(["-encoding", "UTF-8", "-proc:none", "-Xmaxerrs", "1000", "-d"])
            .arg(&classes);
        if !self.classpath.is_empty() {
            command.arg("-cp").arg(std::env::join_paths(&self.classpath)?);
        }
        command.arg(format!("@{}", argfile.display()));

        debug!("Running {:?}", command);
        let output = command.output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut diagnostics = parse_diagnostics(&stderr);
        let success = output.status.success();
        if !success && diagnostics.is_empty() {
            diagnostics.push(CompileDiagnostic {
                path: None,
                line: None,
                severity: Severity::Error,
                message: stderr.trim().to_string(),
            });
        }

        let report = CompileReport {
            success,
            files: java.len(),
            diagnostics,
        };
        if report.success {
            info!("javac compiled {} files in {}", report.files, dir.display());
        } else {
            warn!(
                "javac reported {} errors in {}",
                report.errors().count(),
                dir.display()
            );
        }
        Ok(report)
    }
}

fn executable() -> &'static str {
    if cfg!(windows) { "javac.exe" } else { "javac" }
}

fn quote(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", text)
}

/// First lines of `javac` messages; source excerpts and carets are skipped.
pub fn parse_diagnostics(stderr: &str) -> Vec<CompileDiagnostic> {
    stderr
        .lines()
        .filter_map(|line| DIAGNOSTIC.captures(line))
        .map(|caps| CompileDiagnostic {
            path: caps.get(1).map(|m| PathBuf::from(m.as_str())),
            line: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            severity: if &caps[3] == "error" {
                Severity::Error
            } else {
                Severity::Warning
            },
            message: caps[4].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_keep_location_and_drop_excerpts() {
        let stderr = "src/main/java/com/shop/Order.java:7: error: cannot find symbol\n        \
                      return Missing.LIMIT;\n               ^\n  symbol:   variable Missing\n\
                      error: invalid flag: -Xbogus\n1 error\n";
        let diagnostics = parse_diagnostics(stderr);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].path.as_deref(),
            Some(Path::new("src/main/java/com/shop/Order.java"))
        );
        assert_eq!(diagnostics[0].line, Some(7));
        assert_eq!(
            diagnostics[0].to_string(),
            "src/main/java/com/shop/Order.java:7: error: cannot find symbol"
        );
        assert_eq!(diagnostics[1].path, None);
        assert_eq!(diagnostics[1].to_string(), "error: invalid flag: -Xbogus");
    }

    #[test]
    fn nothing_to_compile_is_a_success() {
        let report = Javac::at(PathBuf::from("javac-that-does-not-exist"))
            .compile(Path::new("."), &[PathBuf::from("libraries.txt")])
            .unwrap();
        assert!(report.success);
        assert_eq!(report.files, 0);
    }
}
