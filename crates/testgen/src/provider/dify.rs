use super::{LlmProvider, check_status, http_client};
use crate::error::{GenerationFailed, Result};
use crate::prompt::GenerationRequest;
use async_trait::async_trait;
use liteworkspace_core::config::LlmConfig;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Chat-messages endpoint answering with server-sent events.
pub struct DifyProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    user: String,
}

#[derive(Debug, Deserialize)]
struct DifyEvent {
    #[serde(default)]
    event: String,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

impl DifyProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            user: config.user.clone(),
        })
    }
}

#[async_trait]
impl LlmProvider for DifyProvider {
    fn name(&self) -> &str {
        "dify"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let body = json!({
            "inputs": {},
            "query": request.prompt,
            "response_mode": "streaming",
            "conversation_id": "",
            "user": self.user,
        });
        let mut call = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }
        let response = check_status(call.send().await?).await?;
        let text = response.text().await?;
        debug!("Dify answered {} bytes", text.len());
        parse_stream(&text)
    }
}

/// Concatenates the answers of an event stream up to `message_end`.
pub(crate) fn parse_stream(body: &str) -> Result<String> {
    let mut answer = String::new();
    for line in body.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }
        let event: DifyEvent = match serde_json::from_str(data) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping unreadable event: {}", e);
                continue;
            }
        };
        match event.event.as_str() {
            "agent_message" | "message" => {
                if let Some(part) = event.answer {
                    answer.push_str(&part);
                }
            }
            "message_end" => break,
            "error" => {
                return Err(GenerationFailed::Http {
                    status: event.status.unwrap_or(500),
                    message: event.message.unwrap_or_default(),
                });
            }
            _ => {}
        }
    }
    if answer.is_empty() {
        // Blocking-mode services answer with a single JSON object.
        if let Ok(event) = serde_json::from_str::<DifyEvent>(body.trim()) {
            if let Some(whole) = event.answer.filter(|a| !a.is_empty()) {
                return Ok(whole);
            }
        }
        return Err(GenerationFailed::MalformedResponse(
            "event stream carried no answer".into(),
        ));
    }
    Ok(answer)
}
