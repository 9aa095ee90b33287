use crate::cap::{FileMatcherCap, LanguageParser, ReferenceCollector, SourceRenderer};
use liteworkspace_api::models::Language;
use std::sync::Arc;

#[derive(Clone)]
pub struct LanguageCaps {
    pub language: Language,
    pub matcher: Arc<dyn FileMatcherCap>,
    pub parser: Arc<dyn LanguageParser>,
    pub collector: Arc<dyn ReferenceCollector>,
    pub renderer: Arc<dyn SourceRenderer>,
}

impl std::fmt::Debug for LanguageCaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageCaps")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
