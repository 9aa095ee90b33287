pub mod collect;
pub mod matcher;
pub mod parse;
pub mod render;

pub use collect::*;
pub use matcher::*;
pub use parse::*;
pub use render::*;
