//! Tests for the primary agent's bounded tool-calling loop.

mod common;

use common::{no_retry, MockProvider};
use pretty_assertions::assert_eq;
use wayfare::agent::{AgentOptionsUpdate, ChatHistory, TravelAgent};
use wayfare::config::AppConfig;
use wayfare::error::WayfareError;
use wayfare::tools::travel::travel_registry;
use wayfare::types::{ContentPart, Role};

fn agent_with(provider: &MockProvider) -> TravelAgent {
    TravelAgent::with_provider(Box::new(provider.clone()), travel_registry(None))
        .with_retry_policy(no_retry())
}

fn tool_result_texts(request: &wayfare::provider::ProviderRequest) -> Vec<String> {
    request
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .flat_map(|m| m.content.iter())
        .filter_map(|part| match part {
            ContentPart::ToolResult(tr) => Some(tr.result.to_string()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn answers_without_tools() {
    let provider = MockProvider::new("test-model");
    provider.queue_response("Paris is lovely in spring.");

    let agent = agent_with(&provider);
    let reply = agent
        .invoke("Tell me about Paris", &ChatHistory::new())
        .await
        .unwrap();

    assert_eq!(reply.text, "Paris is lovely in spring.");
    assert_eq!(reply.steps, 1);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn resolves_tool_calls_then_answers() {
    let provider = MockProvider::new("test-model");
    provider.queue_tool_call(
        "call_1",
        "travel_cost_calculator",
        serde_json::json!({
            "origin": "New York",
            "destination": "Paris",
            "travel_class": "Economy"
        }),
    );
    provider.queue_response("A flight will run you about $350.");

    let agent = agent_with(&provider);
    let reply = agent
        .invoke("How much to fly to Paris?", &ChatHistory::new())
        .await
        .unwrap();

    assert_eq!(reply.text, "A flight will run you about $350.");
    assert_eq!(reply.steps, 2);

    // Second round saw the tool result.
    let results = tool_result_texts(&provider.request(1));
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("Estimated Economy class travel from New York to Paris"));
}

#[tokio::test]
async fn unknown_tool_reports_error_and_continues() {
    let provider = MockProvider::new("test-model");
    provider.queue_tool_call("call_1", "teleporter", serde_json::json!({}));
    provider.queue_response("I couldn't use that tool, sorry.");

    let agent = agent_with(&provider);
    let reply = agent.invoke("Teleport me", &ChatHistory::new()).await.unwrap();

    assert_eq!(reply.text, "I couldn't use that tool, sorry.");
    let results = tool_result_texts(&provider.request(1));
    assert!(results[0].contains("Tool 'teleporter' not found"));
}

#[tokio::test]
async fn malformed_arguments_get_corrective_feedback() {
    let provider = MockProvider::new("test-model");
    // Arguments that failed to decode arrive as a raw string.
    provider.queue_tool_call(
        "call_1",
        "weather_lookup",
        serde_json::Value::String("{city: Paris".to_string()),
    );
    provider.queue_response("Let me try that differently.");

    let agent = agent_with(&provider);
    let reply = agent
        .invoke("Weather in Paris?", &ChatHistory::new())
        .await
        .unwrap();

    assert_eq!(reply.text, "Let me try that differently.");
    let results = tool_result_texts(&provider.request(1));
    assert!(results[0].contains("Could not parse arguments for tool 'weather_lookup'"));
}

#[tokio::test]
async fn failing_tool_surfaces_as_error_result() {
    let provider = MockProvider::new("test-model");
    provider.queue_tool_call("call_1", "weather_lookup", serde_json::json!({"city": ""}));
    provider.queue_response("Weather lookup failed, try a city name.");

    let agent = agent_with(&provider);
    let reply = agent
        .invoke("Weather in ?", &ChatHistory::new())
        .await
        .unwrap();

    assert_eq!(reply.text, "Weather lookup failed, try a city name.");
    let results = tool_result_texts(&provider.request(1));
    assert!(results[0].contains("city must not be empty"));
}

#[tokio::test]
async fn step_bound_triggers_toolless_closing_round() {
    let provider = MockProvider::new("test-model");
    provider.queue_tool_call("call_1", "weather_lookup", serde_json::json!({"city": "Rome"}));
    provider.queue_tool_call("call_2", "weather_lookup", serde_json::json!({"city": "Oslo"}));
    provider.queue_response("Rome is warmer than Oslo right now.");

    let agent = agent_with(&provider).with_max_steps(2);
    let reply = agent
        .invoke("Compare weather in Rome and Oslo", &ChatHistory::new())
        .await
        .unwrap();

    assert_eq!(reply.text, "Rome is warmer than Oslo right now.");
    assert_eq!(reply.steps, 3);
    assert_eq!(provider.request_count(), 3);

    // Rounds inside the loop offer tools; the closing round withholds them.
    assert!(provider.request(0).tools.is_some());
    assert!(provider.request(1).tools.is_some());
    assert!(provider.request(2).tools.is_none());
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let provider = MockProvider::new("test-model");
    let agent = agent_with(&provider);

    let err = agent
        .invoke("   ", &ChatHistory::new())
        .await
        .expect_err("empty query");
    assert!(matches!(err, WayfareError::InvalidArgument(_)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn provider_error_propagates() {
    let provider = MockProvider::new("test-model");
    provider.queue_error(WayfareError::Authentication("bad key".into()));

    let agent = agent_with(&provider);
    let err = agent
        .invoke("Weather in Paris?", &ChatHistory::new())
        .await
        .expect_err("auth failure");
    assert!(matches!(err, WayfareError::Authentication(_)));
}

#[tokio::test]
async fn history_is_sent_in_order() {
    let provider = MockProvider::new("test-model");
    provider.queue_response("As I said, Rome.");

    let mut history = ChatHistory::new();
    history.record_turn("Where should I go?", "Rome is a great choice.");

    let agent = agent_with(&provider);
    agent.invoke("Remind me where?", &history).await.unwrap();

    let request = provider.request(0);
    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
    assert_eq!(request.messages[1].text(), "Where should I go?");
    assert_eq!(request.messages[3].text(), "Remind me where?");
}

#[tokio::test]
async fn settings_carry_agent_options() {
    let provider = MockProvider::new("test-model");
    provider.queue_response("ok");

    let agent = agent_with(&provider);
    agent.invoke("hi", &ChatHistory::new()).await.unwrap();

    let settings = provider.request(0).settings;
    assert_eq!(settings.temperature, Some(0.7));
    assert_eq!(settings.max_tokens, Some(1024));
}

#[test]
fn update_config_adjusts_knobs_without_credentials() {
    let provider = MockProvider::new("test-model");
    let mut agent = agent_with(&provider);

    agent
        .update_config(AgentOptionsUpdate {
            temperature: Some(0.2),
            max_tokens: Some(256),
            verbose: Some(true),
            ..Default::default()
        })
        .unwrap();

    let options = agent.config();
    assert_eq!(options.temperature, 0.2);
    assert_eq!(options.max_tokens, 256);
    assert!(options.verbose);
}

#[test]
fn update_config_model_change_needs_credentials() {
    let provider = MockProvider::new("test-model");
    let mut agent = agent_with(&provider);

    let err = agent
        .update_config(AgentOptionsUpdate {
            model: Some("other-model".into()),
            ..Default::default()
        })
        .expect_err("no credentials to rebind with");
    assert!(matches!(err, WayfareError::InvalidState(_)));
    // Failed update leaves options untouched.
    assert_eq!(agent.config().model, "test-model");
}

#[test]
fn update_config_rebinds_model_with_credentials() {
    let config = AppConfig {
        groq_api_key: "gsk-test".into(),
        trace_api_key: "tr-test".into(),
        weather_api_key: None,
        default_model: "llama3-70b-8192".into(),
        fallback_model: "llama3-8b-8192".into(),
        groq_base_url: None,
    };
    let mut agent = TravelAgent::new(&config);
    assert_eq!(agent.config().model, "llama3-70b-8192");

    agent
        .update_config(AgentOptionsUpdate {
            model: Some("llama3-8b-8192".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(agent.config().model, "llama3-8b-8192");
}

#[test]
fn agent_exposes_tool_names() {
    let provider = MockProvider::new("test-model");
    let agent = agent_with(&provider);
    assert_eq!(
        agent.tool_names(),
        vec![
            "weather_lookup",
            "travel_cost_calculator",
            "destination_recommendations"
        ]
    );
}
