//! Strategist - the strategy source backed by LLM backends.
//!
//! Tries each backend in order and parses the first usable response. When
//! nothing usable comes back the canned strategy is returned instead, so
//! callers always receive a complete document.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use questionnaire::{BusinessRecord, StrategyResult, StrategySource};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::traits::{LlmBackend, LlmError};
use crate::prompt::PromptAssembler;
use crate::types::{GeneratedStrategy, GenerationCost, StrategyOrigin};

/// Error types for strategy generation.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// No backend configured (e.g. no API key)
    #[error("No LLM backend configured")]
    NoBackend,

    /// Backend error
    #[error("Backend error: {0}")]
    Backend(#[from] LlmError),

    /// The model returned no content
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The content was not a complete strategy
    #[error("Invalid strategy payload: {0}")]
    InvalidPayload(String),

    /// The record could not be encoded for the prompt
    #[error("Failed to encode business info: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Configuration for the Strategist.
#[derive(Debug, Clone)]
pub struct StrategistConfig {
    /// Completion token limit
    pub max_tokens: u32,
    /// Sampling temperature; backend default when unset
    pub temperature: Option<f32>,
}

impl Default for StrategistConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: None,
        }
    }
}

/// Strategy source over a list of LLM backends.
pub struct Strategist {
    /// Configuration
    config: StrategistConfig,
    /// Backends, tried in order
    backends: Vec<Arc<dyn LlmBackend>>,
}

impl Strategist {
    /// Create a strategist with the given backends.
    pub fn new(backends: Vec<Arc<dyn LlmBackend>>) -> Self {
        Self {
            config: StrategistConfig::default(),
            backends,
        }
    }

    /// A strategist that always uses the canned strategy.
    pub fn offline() -> Self {
        Self::new(Vec::new())
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: StrategistConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of configured backends.
    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    /// Ask the backends for a strategy, without falling back.
    ///
    /// Returns the error from the last backend tried when all of them fail.
    pub async fn try_generate(
        &self,
        record: &BusinessRecord,
    ) -> Result<GeneratedStrategy, StrategyError> {
        let request_id = Uuid::new_v4();
        let mut last_error = StrategyError::NoBackend;

        for backend in &self.backends {
            match self.generate_with(backend.as_ref(), record, request_id).await {
                Ok(generated) => return Ok(generated),
                Err(e) => {
                    warn!(
                        request_id = %request_id,
                        backend = backend.id(),
                        error = %e,
                        "Backend failed to produce a strategy"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Generate a strategy, falling back to the canned one on any failure.
    pub async fn generate_detailed(&self, record: &BusinessRecord) -> GeneratedStrategy {
        match self.try_generate(record).await {
            Ok(generated) => generated,
            Err(e) => {
                warn!(error = %e, "Using fallback strategy");
                GeneratedStrategy {
                    request_id: Uuid::new_v4(),
                    strategy: StrategyResult::fallback(record),
                    origin: StrategyOrigin::Fallback {
                        reason: e.to_string(),
                    },
                    cost: GenerationCost::default(),
                    generated_at: Utc::now(),
                }
            }
        }
    }

    /// One attempt against one backend.
    async fn generate_with(
        &self,
        backend: &dyn LlmBackend,
        record: &BusinessRecord,
        request_id: Uuid,
    ) -> Result<GeneratedStrategy, StrategyError> {
        let start = Instant::now();

        let request =
            PromptAssembler::build_request(record, self.config.max_tokens, self.config.temperature)?;

        info!(request_id = %request_id, backend = backend.id(), "Requesting strategy");
        let completion = backend.complete(request).await?;

        let content = completion.content.trim();
        if content.is_empty() {
            return Err(StrategyError::EmptyResponse(backend.id().to_string()));
        }

        let strategy = StrategyResult::from_json(content)
            .map_err(|e| StrategyError::InvalidPayload(e.to_string()))?;

        let cost = GenerationCost {
            input_tokens: completion.usage.prompt_tokens,
            output_tokens: completion.usage.completion_tokens,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            request_id = %request_id,
            tokens = completion.usage.total(),
            elapsed_ms = cost.processing_time_ms,
            "Strategy parsed"
        );

        Ok(GeneratedStrategy {
            request_id,
            strategy,
            origin: StrategyOrigin::Model {
                backend: backend.id().to_string(),
            },
            cost,
            generated_at: Utc::now(),
        })
    }
}

#[async_trait]
impl StrategySource for Strategist {
    async fn generate(&self, record: &BusinessRecord) -> StrategyResult {
        self.generate_detailed(record).await.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use questionnaire::Catalog;

    fn record(name: &str) -> BusinessRecord {
        let mut record = BusinessRecord::empty(&Catalog::marketing());
        record.set("name", name).unwrap();
        record.set("industry", "Retail").unwrap();
        record
    }

    fn model_strategy() -> StrategyResult {
        let mut strategy = StrategyResult::fallback(&record("Model Co"));
        strategy.market_positioning = "Model-written positioning".to_string();
        strategy
    }

    fn model_json() -> String {
        serde_json::to_string(&model_strategy()).unwrap()
    }

    #[tokio::test]
    async fn test_no_backends_falls_back() {
        let strategist = Strategist::offline();
        let subject = record("Acme");

        assert!(matches!(
            strategist.try_generate(&subject).await,
            Err(StrategyError::NoBackend)
        ));

        let generated = strategist.generate_detailed(&subject).await;
        assert!(generated.origin.is_fallback());
        assert_eq!(generated.strategy, StrategyResult::fallback(&subject));
    }

    #[tokio::test]
    async fn test_model_response_is_used() {
        let backend = Arc::new(MockBackend::new("mock-gpt").with_response(model_json()));
        let strategist = Strategist::new(vec![backend.clone()]);

        let generated = strategist.generate_detailed(&record("Acme")).await;
        assert_eq!(
            generated.origin,
            StrategyOrigin::Model {
                backend: "mock-gpt".to_string()
            }
        );
        assert_eq!(generated.strategy, model_strategy());
        assert_eq!(backend.call_count(), 1);

        let request = backend.last_request().unwrap();
        assert_eq!(request.max_tokens, Some(2000));
        assert!(request.messages[0].content.contains("\"name\": \"Acme\""));
    }

    #[tokio::test]
    async fn test_second_backend_used_when_first_fails() {
        let down = Arc::new(MockBackend::new("down").with_available(false));
        let up = Arc::new(MockBackend::new("up").with_response(model_json()));
        let strategist = Strategist::new(vec![down.clone(), up.clone()]);

        let generated = strategist.try_generate(&record("Acme")).await.unwrap();
        assert_eq!(
            generated.origin,
            StrategyOrigin::Model {
                backend: "up".to_string()
            }
        );
        assert_eq!(down.call_count(), 1);
        assert_eq!(up.call_count(), 1);
    }

    #[tokio::test]
    async fn test_numeric_amounts_keep_model_strategy() {
        let mut value = serde_json::to_value(model_strategy()).unwrap();
        value["budgetBreakdown"][0]["amount"] = 400.into();
        value["kpis"][0]["target"] = 0.03.into();

        let backend = Arc::new(MockBackend::new("mock-gpt").with_response(value.to_string()));
        let strategist = Strategist::new(vec![backend]);

        let generated = strategist.generate_detailed(&record("Acme")).await;
        assert!(!generated.origin.is_fallback());
        assert_eq!(generated.strategy.market_positioning, "Model-written positioning");
        assert_eq!(generated.strategy.budget_breakdown[0].amount, "400");
        assert_eq!(generated.strategy.kpis[0].target, "0.03");
    }

    #[tokio::test]
    async fn test_bad_payloads_fall_back() {
        let partial = {
            let mut value = serde_json::to_value(model_strategy()).unwrap();
            value.as_object_mut().unwrap().remove("kpis");
            value.to_string()
        };

        for content in ["", "   ", "not json", partial.as_str()] {
            let backend = Arc::new(MockBackend::default().with_response(content));
            let strategist = Strategist::new(vec![backend]);
            let subject = record("Acme");

            let err = strategist.try_generate(&subject).await.unwrap_err();
            assert!(matches!(
                err,
                StrategyError::EmptyResponse(_) | StrategyError::InvalidPayload(_)
            ));

            let strategy = strategist.generate(&subject).await;
            assert_eq!(strategy, StrategyResult::fallback(&subject));
        }
    }

    #[tokio::test]
    async fn test_temperature_is_forwarded() {
        let backend = Arc::new(MockBackend::default().with_response(model_json()));
        let strategist = Strategist::new(vec![backend.clone()]).with_config(StrategistConfig {
            max_tokens: 500,
            temperature: Some(0.4),
        });

        strategist.generate(&record("Acme")).await;
        let request = backend.last_request().unwrap();
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.temperature, Some(0.4));
    }
}
