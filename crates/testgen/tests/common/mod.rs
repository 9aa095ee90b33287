use async_trait::async_trait;
use indexmap::IndexMap;
use liteworkspace_api::models::{DeclId, DeclKind, LibraryCoordinate};
use liteworkspace_core::MaterializedWorkspace;
use liteworkspace_core::config::JunitFlavor;
use liteworkspace_testgen::{GenerationFailed, GenerationRequest, LlmProvider, PromptSettings, TargetUnit};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub enum Reply {
    Text(String),
    Fail(fn() -> GenerationFailed),
    Hang,
}

/// Scripted provider that records the prompts it receives.
pub struct MockProvider {
    reply: Reply,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationFailed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(make) => Err(make()),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }
}

pub fn settings() -> PromptSettings {
    PromptSettings {
        junit: JunitFlavor::Junit5,
        max_prompt_chars: 50_000,
    }
}

pub fn target() -> TargetUnit {
    TargetUnit {
        id: DeclId::new("com.shop.Order.validate"),
        kind: DeclKind::Method,
        package: Some("com.shop".to_string()),
        class_name: "Order".to_string(),
        method_name: Some("validate".to_string()),
        file: PathBuf::from("src/main/java/com/shop/Order.java"),
    }
}

pub fn workspace() -> MaterializedWorkspace {
    let mut files = IndexMap::new();
    files.insert(
        PathBuf::from("src/main/java/com/shop/PriceCalculator.java"),
        "package com.shop;\n\npublic final class PriceCalculator {}\n".to_string(),
    );
    files.insert(
        PathBuf::from("src/main/java/com/shop/Order.java"),
        "package com.shop;\n\npublic class Order {}\n".to_string(),
    );
    MaterializedWorkspace {
        files,
        libraries: vec![LibraryCoordinate::jdk()],
    }
}
