use crate::error::{GenerationFailed, Result};
use crate::prompt::{GenerationRequest, PromptSettings, TargetUnit};
use crate::provider::{LlmProvider, provider_for};
use crate::response::{GeneratedTest, parse_response};
use liteworkspace_core::MaterializedWorkspace;
use liteworkspace_core::config::LlmConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One bounded, cancellable model call per request. Never touches disk.
pub struct TestGenerationBridge {
    provider: Arc<dyn LlmProvider>,
    settings: PromptSettings,
    timeout: Duration,
}

impl TestGenerationBridge {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: PromptSettings, timeout: Duration) -> Self {
        Self {
            provider,
            settings,
            timeout,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Ok(Self::new(
            provider_for(config)?,
            PromptSettings::from_config(config),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn generate(
        &self,
        target: &TargetUnit,
        workspace: &MaterializedWorkspace,
        cancel: &CancellationToken,
    ) -> Result<GeneratedTest> {
        let request = GenerationRequest::new(target, workspace, &self.settings)?;
        info!(
            "Requesting a test for {} from {} ({} files, {} prompt chars)",
            target.id,
            self.provider.name(),
            request.workspace_files.len(),
            request.prompt.len()
        );

        let start = Instant::now();
        let call = tokio::time::timeout(self.timeout, self.provider.complete(&request));
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GenerationFailed::Cancelled),
            answer = call => answer.unwrap_or(Err(GenerationFailed::Timeout(self.timeout))),
        };

        let answer = match outcome {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Generation for {} failed after {:?}: {}", target.id, start.elapsed(), e);
                return Err(e);
            }
        };
        let test = parse_response(&answer)?;
        info!(
            "Model proposed {} in {:?}",
            test.relative_path.display(),
            start.elapsed()
        );
        Ok(test)
    }
}
