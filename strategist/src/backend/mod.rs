//! LLM Backend abstraction layer.
//!
//! Provides a trait-based interface over chat-completion backends:
//! - OpenAI-compatible (OpenAI, vLLM, Ollama, etc.)
//! - Mock backend for testing

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockBackend;
pub use openai::{OpenAiBackend, OPENAI_BASE_URL};
pub use traits::{
    CompletionRequest, CompletionResponse, FinishReason, LlmBackend, LlmError, Message,
    MessageRole, ResponseFormat, Usage,
};
