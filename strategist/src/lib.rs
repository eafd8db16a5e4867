//! Strategist - Marketing Strategy Generation
//!
//! Turns a completed business record into a [`StrategyResult`](questionnaire::StrategyResult):
//! - Trait-based LLM backends (OpenAI-compatible, mock)
//! - Prompt assembly from the record
//! - Canned fallback whenever the model cannot be used
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Strategist                 │
//! │   (implements StrategySource)           │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ LlmBackend  │       │  Fallback   │
//! │ (OpenAI/    │       │  strategy   │
//! │  Mock)      │       │             │
//! └─────────────┘       └─────────────┘
//! ```

pub mod backend;
pub mod prompt;
pub mod service;
pub mod types;

// Re-export main types for convenience
pub use backend::traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
pub use backend::{MockBackend, OpenAiBackend, OPENAI_BASE_URL};
pub use prompt::PromptAssembler;
pub use service::{StrategistConfig, Strategist, StrategyError};
pub use types::*;
