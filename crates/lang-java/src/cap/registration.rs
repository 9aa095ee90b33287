use crate::JavaPlugin;
use crate::collector::JavaCollector;
use crate::render::JavaRenderer;
use liteworkspace_api::models::Language;
use liteworkspace_plugin::{BoxError, LanguageCaps};
use std::sync::Arc;

pub fn java_caps() -> std::result::Result<LanguageCaps, BoxError> {
    let plugin = Arc::new(JavaPlugin::new()?);
    let renderer = JavaRenderer::new(plugin.parser.clone());
    Ok(LanguageCaps {
        language: Language::JAVA,
        matcher: plugin.clone(),
        parser: plugin,
        collector: Arc::new(JavaCollector),
        renderer: Arc::new(renderer),
    })
}
