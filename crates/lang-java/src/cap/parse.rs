use crate::JavaPlugin;
use liteworkspace_plugin::{BoxError, LanguageParser, ParsedUnit, UnitContext};
use std::path::Path;

impl LanguageParser for JavaPlugin {
    fn parse_file(
        &self,
        source: &str,
        path: &Path,
        ctx: &UnitContext,
    ) -> std::result::Result<ParsedUnit, BoxError> {
        self.parser.parse_file(source, path, ctx)
    }
}
