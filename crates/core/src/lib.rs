pub mod config;
pub mod error;
pub mod index;
pub mod indexing;
pub mod logging;
pub mod materialize;
pub mod project;
pub mod report;
pub mod resolver;

pub use config::LiteConfig;
pub use error::{LiteError, Result};
pub use index::{IndexHandle, SymbolIndex};
pub use materialize::{MaterializeOptions, MaterializedWorkspace, Materializer, write_to_dir};
pub use resolver::{ClosureResolver, ClosureResult, Diagnostic, ResolutionNode, ResolverPolicy};
