//! Tests for the session driver's programmatic entry points.

mod common;

use common::{no_retry, MockProvider};
use wayfare::agent::{FallbackController, TravelAgent, FALLBACK_PREFIX};
use wayfare::app::TravelApp;
use wayfare::config::AppConfig;
use wayfare::error::WayfareError;
use wayfare::tools::travel::travel_registry;

fn app_with(primary: &MockProvider, fallback: &MockProvider) -> TravelApp {
    let agent = TravelAgent::with_provider(Box::new(primary.clone()), travel_registry(None))
        .with_retry_policy(no_retry());
    TravelApp::with_controller(FallbackController::with_parts(
        agent,
        Box::new(fallback.clone()),
    ))
}

fn valid_config() -> AppConfig {
    AppConfig {
        groq_api_key: "gsk-test".into(),
        trace_api_key: "tr-test".into(),
        weather_api_key: None,
        default_model: "llama3-70b-8192".into(),
        fallback_model: "llama3-8b-8192".into(),
        groq_base_url: None,
    }
}

#[tokio::test]
async fn single_query_returns_response_text() {
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    primary.queue_response("Barcelona has great tapas.");

    let mut app = app_with(&primary, &fallback);
    let result = app.run_single_query("Where to eat in Barcelona?").await;
    assert_eq!(result, "Barcelona has great tapas.");
}

#[tokio::test]
async fn batch_results_align_positionally() {
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    primary.queue_response("Answer one.");
    primary.queue_error(WayfareError::Timeout(60_000));
    primary.queue_response("Answer three.");
    fallback.queue_response("Degraded answer two.");

    let queries = vec![
        "first question".to_string(),
        "second question".to_string(),
        "third question".to_string(),
    ];

    let mut app = app_with(&primary, &fallback);
    let results = app.run_batch_queries(&queries).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0], "Answer one.");
    assert_eq!(results[1], format!("{FALLBACK_PREFIX}Degraded answer two."));
    assert_eq!(results[2], "Answer three.");
}

#[tokio::test]
async fn batch_over_empty_input_is_empty() {
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    let mut app = app_with(&primary, &fallback);
    assert!(app.run_batch_queries(&[]).await.is_empty());
}

#[test]
fn workflow_echoes_input() {
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    let app = app_with(&primary, &fallback);

    let result = app.run_structured_workflow("plan my honeymoon");
    assert_eq!(result.final_summary, "Workflow received: plan my honeymoon");
}

#[tokio::test]
async fn successful_turns_are_recorded_in_history() {
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    primary.queue_response("Rome in May.");

    let mut app = app_with(&primary, &fallback);
    app.run_single_query("Best time for Rome?").await;

    assert_eq!(app.history().turns(), 1);
    assert_eq!(app.history().messages()[0].text(), "Best time for Rome?");
    assert_eq!(app.history().messages()[1].text(), "Rome in May.");
}

#[tokio::test]
async fn double_failure_turn_is_not_recorded() {
    let primary = MockProvider::new("primary");
    let fallback = MockProvider::new("fallback");
    primary.queue_error(WayfareError::api(500, "down"));
    fallback.queue_error(WayfareError::api(503, "also down"));
    primary.queue_response("Back to normal.");

    let mut app = app_with(&primary, &fallback);
    let first = app.run_single_query("anything").await;
    assert!(first.contains("technical difficulties"));
    assert_eq!(app.history().turns(), 0);

    // The session keeps working after a failed turn.
    let second = app.run_single_query("still there?").await;
    assert_eq!(second, "Back to normal.");
    assert_eq!(app.history().turns(), 1);
}

#[test]
fn construction_fails_before_agents_on_missing_credential() {
    let mut config = valid_config();
    config.groq_api_key = String::new();

    let err = TravelApp::new(&config).expect_err("missing credential");
    assert!(matches!(err, WayfareError::Configuration(_)));
    assert!(err.to_string().contains("GROQ_API_KEY"));
}

#[test]
fn construction_succeeds_with_valid_config() {
    assert!(TravelApp::new(&valid_config()).is_ok());
}
