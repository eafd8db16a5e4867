//! Strategist against a mock OpenAI-compatible server

use std::sync::Arc;
use std::time::Duration;

use questionnaire::{BusinessRecord, Catalog, StrategyResult, StrategySource};
use serde_json::json;
use strategist::{OpenAiBackend, StrategyOrigin, Strategist};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn spa_record() -> BusinessRecord {
    BusinessRecord::from_json(
        &Catalog::marketing(),
        &json!({
            "name": "Test Spa",
            "industry": "Health & Wellness",
            "targetAudience": "Affluent professionals",
            "audienceAgeRange": "35-44",
            "audienceIncomeLevel": "$150k-$200k",
            "budget": 2000
        }),
    )
    .expect("valid record")
}

fn strategist_for(server: &MockServer) -> Strategist {
    let backend = OpenAiBackend::new(
        server.uri(),
        "gpt-4o",
        Some("sk-test".to_string()),
        Duration::from_secs(5),
    )
    .expect("client builds");
    Strategist::new(vec![Arc::new(backend)])
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 400, "completion_tokens": 900 }
    })
}

#[tokio::test]
async fn test_strategy_parsed_from_completion() {
    let server = MockServer::start().await;
    let mut expected = StrategyResult::fallback(&spa_record());
    expected.market_positioning = "The calm corner of Denver".to_string();
    let content = serde_json::to_string(&expected).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 2000,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let generated = strategist_for(&server)
        .try_generate(&spa_record())
        .await
        .expect("model strategy");

    assert_eq!(generated.strategy, expected);
    assert_eq!(
        generated.origin,
        StrategyOrigin::Model {
            backend: "gpt-4o".to_string()
        }
    );
    assert_eq!(generated.cost.input_tokens, 400);
    assert_eq!(generated.cost.output_tokens, 900);
}

#[tokio::test]
async fn test_user_prompt_carries_record() {
    let server = MockServer::start().await;
    let content = serde_json::to_string(&StrategyResult::fallback(&spa_record())).unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&content)))
        .mount(&server)
        .await;

    strategist_for(&server).generate(&spa_record()).await;

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    let user = messages[1]["content"].as_str().unwrap();
    assert!(user.starts_with("Business Info: {"));
    assert!(user.contains("\"budget\": \"2000\""));
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let generated = strategist_for(&server).generate_detailed(&spa_record()).await;

    assert!(generated.origin.is_fallback());
    let strategy = generated.strategy;
    assert_eq!(
        strategy.market_positioning,
        "Positioning Test Spa as a premium Health & Wellness provider..."
    );
    assert_eq!(
        strategy.audience_personas,
        vec!["Primary: 35-44 Affluent professionals with $150k-$200k income".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_content_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"{"marketPositioning": "only this"}"#)),
        )
        .mount(&server)
        .await;

    let record = spa_record();
    let strategy = strategist_for(&server).generate(&record).await;
    assert_eq!(strategy, StrategyResult::fallback(&record));
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    let server = MockServer::start().await;
    let strategist = strategist_for(&server);
    drop(server);

    let generated = strategist.generate_detailed(&spa_record()).await;
    assert!(generated.origin.is_fallback());
}
