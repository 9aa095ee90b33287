pub mod error;
pub mod graph;
pub mod models;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use graph::{CompilationUnit, SymbolGraph};
pub use models::*;
