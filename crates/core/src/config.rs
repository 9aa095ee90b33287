//! Configuration for resolution, materialization and test generation.
//!
//! Looked up in `<project>/liteworkspace.toml`, then
//! `~/.liteworkspace/config.toml`; environment variables override both.

use crate::error::{LiteError, Result};
use liteworkspace_api::models::{LibraryCoordinate, ReferenceKind};
use liteworkspace_plugin::StubBodyStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = "liteworkspace.toml";
pub const ENV_API_KEY: &str = "LITEWORKSPACE_API_KEY";
pub const ENV_API_URL: &str = "LITEWORKSPACE_API_URL";
pub const ENV_MODEL: &str = "LITEWORKSPACE_MODEL";
pub const ENV_PROVIDER: &str = "LITEWORKSPACE_PROVIDER";

/// `~/.liteworkspace`, or `./.liteworkspace` when no home directory is known.
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".liteworkspace")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiteConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub materializer: MaterializerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    /// Package-prefix catalog used to attribute foreign types to libraries.
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub include_test_scope: bool,
    /// Reference kinds a stub satisfies; the built-in set when absent.
    #[serde(default)]
    pub stub_kinds: Option<Vec<ReferenceKind>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializerConfig {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default)]
    pub stub_body: StubBodyStyle,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            stub_body: StubBodyStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Dify,
    OpenAi,
    Template,
}

impl std::str::FromStr for ProviderKind {
    type Err = LiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dify" => Ok(ProviderKind::Dify),
            "openai" => Ok(ProviderKind::OpenAi),
            "template" => Ok(ProviderKind::Template),
            other => Err(LiteError::Config(format!("unknown provider '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JunitFlavor {
    Junit4,
    #[default]
    Junit5,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub junit: JunitFlavor,
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
    /// End-user identifier sent to chat services that require one.
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            junit: JunitFlavor::default(),
            max_prompt_chars: default_max_prompt_chars(),
            user: default_user(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// `group:artifact[:version]`
    pub coordinate: String,
    /// Package prefixes provided by this library.
    #[serde(default)]
    pub packages: Vec<String>,
}

impl LibraryEntry {
    pub fn parsed_coordinate(&self) -> Result<LibraryCoordinate> {
        self.coordinate.parse::<LibraryCoordinate>().map_err(LiteError::from)
    }
}

fn default_source_root() -> String {
    "src/main/java".to_string()
}

fn default_api_url() -> String {
    "http://localhost/v1/chat-messages".to_string()
}

fn default_model() -> String {
    "local".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_prompt_chars() -> usize {
    200_000
}

fn default_user() -> String {
    "liteworkspace".to_string()
}

impl LiteConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LiteError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Project file, then user file, then defaults; environment applied last.
    pub fn load_for_project(project_root: &Path) -> Result<Self> {
        let project_file = project_root.join(PROJECT_CONFIG_FILE);
        let user_file = home_dir().join("config.toml");
        let mut config = if project_file.is_file() {
            Self::load(&project_file)?
        } else if user_file.is_file() {
            Self::load(&user_file)?
        } else {
            LiteConfig::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.llm.api_url = url;
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.is_empty()) {
            self.llm.model = model;
        }
        if let Some(provider) = lookup(ENV_PROVIDER).filter(|v| !v.is_empty()) {
            self.llm.provider = provider.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for entry in &self.libraries {
            entry.parsed_coordinate()?;
            if entry.packages.is_empty() {
                return Err(LiteError::Config(format!(
                    "library '{}' lists no packages",
                    entry.coordinate
                )));
            }
        }
        if self.llm.timeout_secs == 0 {
            return Err(LiteError::Config("llm.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
