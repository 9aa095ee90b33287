pub mod cap;
pub mod model;
pub mod registration;
pub mod utils;

pub use cap::*;
pub use model::*;
pub use registration::LanguageCaps;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
