mod generate;
mod materialize;
mod resolve;
mod target;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
pub use target::{SourceSite, TargetArgs};

#[derive(Parser)]
#[command(
    name = "liteworkspace",
    version,
    about = "Carve the minimal compilable workspace out of a Java project",
    long_about = "LiteWorkspace computes the source files and libraries a single class or method needs \
                  to compile in isolation, writes that trimmed workspace, and can ask a language model \
                  for a unit test against it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the dependency closure of a class or method
    Resolve {
        #[command(flatten)]
        target: TargetArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Write the minimal workspace of a class or method
    #[command(
        long_about = "Resolves the target and renders the trimmed source files. With --out, the files and a \
                      libraries.txt manifest are written to a new directory; otherwise the file list is printed."
    )]
    Materialize {
        #[command(flatten)]
        target: TargetArgs,
        /// Directory to create; must not exist or be empty
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Replace stub bodies with `throw new UnsupportedOperationException()`
        #[arg(long)]
        throwing_stubs: bool,
        /// Compile the written workspace with the local javac and report errors
        #[arg(long, requires = "out")]
        verify: bool,
    },
    /// Ask a language model for a unit test of a class or method
    Generate {
        #[command(flatten)]
        target: TargetArgs,
        /// Write the proposed test under the project's src/test/java
        #[arg(long)]
        write: bool,
        /// Replace an existing test file
        #[arg(long, requires = "write")]
        overwrite: bool,
        /// Provider override (dify, openai, template)
        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Resolve { .. } => "resolve",
        Commands::Materialize { .. } => "materialize",
        Commands::Generate { .. } => "generate",
    };
    let _guard = liteworkspace_runtime::init_logging(component, true);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Resolve { target, format } => rt.block_on(resolve::run(target, format)),
        Commands::Materialize {
            target,
            out,
            throwing_stubs,
            verify,
        } => rt.block_on(materialize::run(target, out, throwing_stubs, verify)),
        Commands::Generate {
            target,
            write,
            overwrite,
            provider,
        } => rt.block_on(generate::run(target, write, overwrite, provider)),
    }
}
