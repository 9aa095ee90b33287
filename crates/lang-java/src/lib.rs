pub mod cap;
pub mod collector;
pub mod javac;
pub mod lang;
pub mod parser;
pub mod render;

pub use cap::registration::java_caps;
pub use collector::JavaCollector;
pub use javac::{CompileReport, Javac};
pub use render::JavaRenderer;

use liteworkspace_plugin::BoxError;

pub struct JavaPlugin {
    parser: parser::JavaParser,
}

impl JavaPlugin {
    pub fn new() -> std::result::Result<Self, BoxError> {
        Ok(Self {
            parser: parser::JavaParser::new()?,
        })
    }
}
