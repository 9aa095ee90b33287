//! Language-model backends.

mod dify;
mod openai;
mod template;

pub use dify::DifyProvider;
pub use openai::OpenAiProvider;
pub use template::TemplateProvider;

use crate::error::{GenerationFailed, Result};
use crate::prompt::GenerationRequest;
use async_trait::async_trait;
use liteworkspace_core::config::{LlmConfig, ProviderKind};
use reqwest::StatusCode;
use std::sync::Arc;

/// Answers one generation request with raw model text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}

pub fn provider_for(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Dify => Arc::new(DifyProvider::new(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        ProviderKind::Template => Arc::new(TemplateProvider::new(config.junit)),
    };
    Ok(provider)
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("liteworkspace/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GenerationFailed::Config(e.to_string()))
}

/// Maps a non-success status to the failure it stands for.
pub(crate) fn status_error(status: StatusCode, body: &str) -> GenerationFailed {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationFailed::Auth {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => GenerationFailed::Quota,
        _ => GenerationFailed::Http {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        },
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}
