//! Common types for the strategist crate.

use chrono::{DateTime, Utc};
use questionnaire::StrategyResult;
use serde::Serialize;
use uuid::Uuid;

/// Where a strategy came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyOrigin {
    /// Parsed from a model response
    Model { backend: String },
    /// Canned fallback after a failure
    Fallback { reason: String },
}

impl StrategyOrigin {
    /// Whether the canned fallback was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Cost of one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationCost {
    /// Number of input tokens processed
    pub input_tokens: u32,
    /// Number of output tokens generated
    pub output_tokens: u32,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}

/// A strategy plus provenance.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedStrategy {
    /// Request identifier (appears in logs)
    pub request_id: Uuid,
    /// The strategy document
    pub strategy: StrategyResult,
    /// Model or fallback
    pub origin: StrategyOrigin,
    /// Tokens and time spent
    pub cost: GenerationCost,
    /// When generation finished
    pub generated_at: DateTime<Utc>,
}
