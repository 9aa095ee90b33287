//! Prompt assembly for one generation request.

use crate::error::{GenerationFailed, Result};
use indexmap::IndexMap;
use liteworkspace_api::models::{DeclId, DeclKind, Declaration, LibraryCoordinate};
use liteworkspace_core::MaterializedWorkspace;
use liteworkspace_core::config::{JunitFlavor, LlmConfig};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// The unit a test is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUnit {
    pub id: DeclId,
    pub kind: DeclKind,
    pub package: Option<String>,
    /// Simple name of the class under test.
    pub class_name: String,
    /// Set when the unit is a method.
    pub method_name: Option<String>,
    /// Workspace-relative path of the file declaring the unit.
    pub file: PathBuf,
}

impl TargetUnit {
    pub fn new(decl: &Declaration, package: Option<String>, file: PathBuf) -> Self {
        let (class_name, method_name) = if decl.kind.is_type() {
            (decl.name.clone(), None)
        } else {
            let owner = decl
                .parent
                .as_ref()
                .map(|p| p.simple_name().to_string())
                .unwrap_or_default();
            let method = (decl.kind == DeclKind::Method).then(|| decl.name.clone());
            (owner, method)
        };
        Self {
            id: decl.id.clone(),
            kind: decl.kind,
            package,
            class_name,
            method_name,
            file,
        }
    }

    /// `OrderTest` for `Order`.
    pub fn test_class_name(&self) -> String {
        format!("{}Test", self.class_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSettings {
    pub junit: JunitFlavor,
    pub max_prompt_chars: usize,
}

impl PromptSettings {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            junit: config.junit,
            max_prompt_chars: config.max_prompt_chars,
        }
    }
}

/// Everything sent to the model for one attempt.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub target_unit: TargetUnit,
    pub workspace_files: IndexMap<PathBuf, String>,
    pub libraries: Vec<LibraryCoordinate>,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(
        target: &TargetUnit,
        workspace: &MaterializedWorkspace,
        settings: &PromptSettings,
    ) -> Result<Self> {
        let prompt = format_prompt(target, workspace, settings)?;
        Ok(Self {
            target_unit: target.clone(),
            workspace_files: workspace.files.clone(),
            libraries: workspace.libraries.clone(),
            prompt,
        })
    }
}

fn junit_label(flavor: JunitFlavor) -> &'static str {
    match flavor {
        JunitFlavor::Junit4 => "JUnit 4",
        JunitFlavor::Junit5 => "JUnit 5 (Jupiter)",
    }
}

/// Instructions, the target, the libraries, then every workspace file
/// with the target's own file first.
pub fn format_prompt(
    target: &TargetUnit,
    workspace: &MaterializedWorkspace,
    settings: &PromptSettings,
) -> Result<String> {
    let mut prompt = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(
        prompt,
        "Write a {} unit test for the {} `{}`.",
        junit_label(settings.junit),
        target.kind,
        target.id
    );
    let _ = writeln!(
        prompt,
        "Name the test class `{}`{}. Answer with the complete test class in one ```java block.",
        target.test_class_name(),
        target
            .package
            .as_deref()
            .map(|p| format!(" in package `{}`", p))
            .unwrap_or_default()
    );
    prompt.push_str("Only the sources below and the listed libraries are on the classpath.\n\n");

    prompt.push_str("Libraries:\n");
    if workspace.libraries.is_empty() {
        prompt.push_str("- none\n");
    }
    for library in &workspace.libraries {
        let _ = writeln!(prompt, "- {}", library);
    }

    prompt.push_str("\nSources:\n");
    let own = workspace.files.get_key_value(target.file.as_path());
    let others = workspace
        .files
        .iter()
        .filter(|(path, _)| path.as_path() != target.file.as_path());
    for (path, text) in own.into_iter().chain(others) {
        push_file(&mut prompt, path, text);
    }

    let size = prompt.chars().count();
    if size > settings.max_prompt_chars {
        return Err(GenerationFailed::PromptTooLarge {
            size,
            limit: settings.max_prompt_chars,
        });
    }
    Ok(prompt)
}

fn push_file(prompt: &mut String, path: &Path, text: &str) {
    let _ = writeln!(prompt, "\n// File: {}", path.display());
    prompt.push_str("```java\n");
    prompt.push_str(text);
    if !text.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n");
}
