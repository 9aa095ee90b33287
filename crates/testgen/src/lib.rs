//! Sends a materialized workspace to a language model and turns the answer
//! into a JUnit test file.

pub mod bridge;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod response;
pub mod writer;

pub use bridge::TestGenerationBridge;
pub use error::{GenerationFailed, Result};
pub use prompt::{GenerationRequest, PromptSettings, TargetUnit, format_prompt};
pub use provider::{LlmProvider, provider_for};
pub use response::{GeneratedTest, parse_response};
pub use writer::TestFileWriter;
