pub mod declaration;
pub mod language;
pub mod library;
pub mod policy;
pub mod reference;
pub mod symbol;

pub use declaration::*;
pub use language::*;
pub use library::*;
pub use policy::*;
pub use reference::*;
pub use symbol::*;
