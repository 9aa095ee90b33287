//! Extracts a Java test class from a model answer.

use crate::error::{GenerationFailed, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[ \t]*([A-Za-z0-9_+-]*)[^\n]*\n(.*?)```").expect("fence pattern")
});

static CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:public|final|abstract)\s+)*class\s+([A-Za-z_$][\w$]*)")
        .expect("class pattern")
});

static PACKAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("package pattern"));

/// A test class proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedTest {
    pub package: Option<String>,
    pub class_name: String,
    pub source: String,
    /// `src/test/java/<package path>/<Class>.java`
    pub relative_path: PathBuf,
}

/// First fenced `java` block, else the first fenced block, else the raw
/// answer when it declares a class.
pub fn parse_response(answer: &str) -> Result<GeneratedTest> {
    let blocks: Vec<(&str, &str)> = FENCE
        .captures_iter(answer)
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect();
    let code = blocks
        .iter()
        .find(|(lang, _)| lang.eq_ignore_ascii_case("java"))
        .or_else(|| blocks.first())
        .map(|(_, code)| *code)
        .unwrap_or(answer)
        .trim();

    let class_name = CLASS
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| GenerationFailed::MalformedResponse("no Java class in the answer".into()))?;
    let package = PACKAGE
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let mut relative_path = PathBuf::from("src/test/java");
    if let Some(package) = &package {
        relative_path.extend(package.split('.'));
    }
    relative_path.push(format!("{}.java", class_name));

    let mut source = code.to_string();
    source.push('\n');
    Ok(GeneratedTest {
        package,
        class_name,
        source,
        relative_path,
    })
}
