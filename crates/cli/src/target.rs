use anyhow::{Context, bail};
use clap::Args;
use liteworkspace_api::SymbolGraph;
use liteworkspace_api::models::Declaration;
use liteworkspace_core::{LiteConfig, SymbolIndex};
use liteworkspace_runtime::Workbench;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Project and unit selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Path to the project root directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project: PathBuf,

    /// Fully qualified class or method, e.g. com.shop.Order.validate
    #[arg(long, value_name = "FQN", conflicts_with = "at", required_unless_present = "at")]
    pub target: Option<String>,

    /// Source position inside the unit, 1-based
    #[arg(long, value_name = "FILE:LINE:COL")]
    pub at: Option<SourceSite>,

    /// Stop following project declarations past this distance from the root
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Allow test-scope declarations in the closure
    #[arg(long)]
    pub include_tests: bool,
}

/// `FILE:LINE:COL` with 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSite {
    pub file: PathBuf,
    pub line: usize,
    pub col: usize,
}

impl FromStr for SourceSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(col), Some(line), Some(file)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected FILE:LINE:COL, got '{}'", s));
        };
        let number = |text: &str, what: &str| -> Result<usize, String> {
            match text.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("{} must be a positive number, got '{}'", what, text)),
            }
        };
        Ok(Self {
            file: PathBuf::from(file),
            line: number(line, "line")?,
            col: number(col, "column")?,
        })
    }
}

impl TargetArgs {
    /// Project configuration with the command-line overrides applied.
    pub fn config(&self) -> anyhow::Result<LiteConfig> {
        let mut config = LiteConfig::load_for_project(&self.project)?;
        if let Some(depth) = self.max_depth {
            config.resolver.max_depth = Some(depth);
        }
        if self.include_tests {
            config.resolver.include_test_scope = true;
        }
        Ok(config)
    }

    pub async fn open(&self, config: LiteConfig) -> anyhow::Result<Workbench> {
        Workbench::open(self.project.clone(), config)
            .await
            .with_context(|| format!("failed to index {}", self.project.display()))
    }

    pub fn root(&self, index: &SymbolIndex) -> anyhow::Result<Arc<Declaration>> {
        match (&self.target, &self.at) {
            (Some(fqn), _) => Ok(index.resolve(fqn)?),
            (None, Some(site)) => {
                let path = if site.file.is_absolute() {
                    site.file.clone()
                } else {
                    self.project.join(&site.file)
                };
                Ok(index.resolve_site(&path, site.line - 1, site.col - 1)?)
            }
            (None, None) => bail!("either --target or --at is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn parses_source_sites() {
        let site: SourceSite = "src/main/java/com/shop/Order.java:12:5".parse().unwrap();
        assert_eq!(site.file, PathBuf::from("src/main/java/com/shop/Order.java"));
        assert_eq!((site.line, site.col), (12, 5));

        assert!("Order.java:0:1".parse::<SourceSite>().is_err());
        assert!("Order.java:3".parse::<SourceSite>().is_err());
        assert!("Order.java:x:1".parse::<SourceSite>().is_err());
    }

    #[test]
    fn a_target_or_a_site_is_required() {
        assert!(Cli::try_parse_from(["liteworkspace", "resolve", "/shop"]).is_err());
        assert!(
            Cli::try_parse_from([
                "liteworkspace",
                "resolve",
                "/shop",
                "--target",
                "a.B",
                "--at",
                "B.java:1:1"
            ])
            .is_err()
        );

        let cli = Cli::try_parse_from([
            "liteworkspace",
            "materialize",
            "/shop",
            "--at",
            "B.java:3:7",
            "--max-depth",
            "2",
            "--out",
            "/tmp/lite",
        ])
        .unwrap();
        match cli.command {
            Commands::Materialize { target, out, .. } => {
                assert_eq!(target.at.unwrap().line, 3);
                assert_eq!(target.max_depth, Some(2));
                assert_eq!(out, Some(PathBuf::from("/tmp/lite")));
            }
            _ => panic!("expected materialize"),
        }
    }

    #[test]
    fn verify_needs_an_output_directory() {
        let base = ["liteworkspace", "materialize", "/shop", "--target", "a.B", "--verify"];
        assert!(Cli::try_parse_from(base).is_err());

        let cli = Cli::try_parse_from(base.iter().copied().chain(["--out", "/tmp/lite"])).unwrap();
        match cli.command {
            Commands::Materialize { verify, out, .. } => {
                assert!(verify);
                assert_eq!(out, Some(PathBuf::from("/tmp/lite")));
            }
            _ => panic!("expected materialize"),
        }
    }
}
