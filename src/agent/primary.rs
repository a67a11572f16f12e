//! The tool-calling travel agent.
//!
//! Each invocation runs a bounded loop: the model either answers or requests
//! tool invocations, whose results are fed back for the next round. Hitting
//! the step bound triggers one tool-less closing round.

use std::time::Duration;

use bon::Builder;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::WayfareError;
use crate::provider::{GroqProvider, ModelProvider, ProviderRequest, ProviderResponse, ToolDefinition};
use crate::tools::{travel::travel_registry, ToolArguments, ToolRegistry};
use crate::types::*;
use crate::util::{with_timeout, RetryPolicy};

/// Reasoning/tool-call rounds per invocation.
const DEFAULT_MAX_STEPS: usize = 5;
/// Per-round network timeout for the primary model.
const CALL_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "\
You are a helpful travel planning assistant. You can help users with:
1. Weather information for destinations
2. Travel cost calculations
3. Destination recommendations (attractions, restaurants, hotels)

Instructions:
- Be friendly and provide comprehensive travel advice
- Use the available tools to get accurate information
- If you encounter errors, acknowledge them and suggest alternatives
- Ask for clarification if the user's request is ambiguous
- Provide context and helpful additional information
- Keep responses concise but informative

Available tools:
- weather_lookup: Get current weather for any city
- travel_cost_calculator: Calculate travel costs between cities
- destination_recommendations: Get recommendations for attractions, restaurants, or hotels";

/// Mutable agent knobs. Changing any of them rebuilds the model binding.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub verbose: bool,
}

/// Partial update applied by [`TravelAgent::update_config`].
#[derive(Debug, Clone, Default, Builder)]
pub struct AgentOptionsUpdate {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub verbose: Option<bool>,
}

/// Result of one successful agent invocation.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub usage: Usage,
    /// Provider rounds consumed, closing round included.
    pub steps: usize,
}

/// Credentials kept for rebuilding the provider binding.
#[derive(Clone)]
struct GroqCredentials {
    api_key: String,
    base_url: Option<String>,
}

/// What a single provider round resolved to.
enum StepOutcome {
    Answer(String),
    InvokeTools {
        text: String,
        calls: Vec<AgentToolCall>,
    },
}

pub struct TravelAgent {
    options: AgentOptions,
    provider: Box<dyn ModelProvider>,
    credentials: Option<GroqCredentials>,
    registry: ToolRegistry,
    max_steps: usize,
    retry: RetryPolicy,
}

impl TravelAgent {
    /// Build a Groq-backed agent from validated configuration.
    pub fn new(config: &AppConfig) -> Self {
        let options = AgentOptions {
            model: config.default_model.clone(),
            temperature: 0.7,
            max_tokens: 1024,
            verbose: false,
        };
        let credentials = GroqCredentials {
            api_key: config.groq_api_key.clone(),
            base_url: config.groq_base_url.clone(),
        };
        let provider = Box::new(GroqProvider::new(
            options.model.as_str(),
            credentials.api_key.as_str(),
            credentials.base_url.clone(),
        ));
        Self {
            options,
            provider,
            credentials: Some(credentials),
            registry: travel_registry(config.weather_api_key.clone()),
            max_steps: DEFAULT_MAX_STEPS,
            retry: RetryPolicy::default(),
        }
    }

    /// Build an agent around an arbitrary provider and tool set.
    pub fn with_provider(provider: Box<dyn ModelProvider>, registry: ToolRegistry) -> Self {
        Self {
            options: AgentOptions {
                model: provider.model_id().to_string(),
                temperature: 0.7,
                max_tokens: 1024,
                verbose: false,
            },
            provider,
            credentials: None,
            registry,
            max_steps: DEFAULT_MAX_STEPS,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the step bound.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Override the retry policy for provider rounds.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Current agent knobs.
    pub fn config(&self) -> &AgentOptions {
        &self.options
    }

    /// Registered tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Apply a partial options update.
    ///
    /// The new model binding is constructed first; current state is replaced
    /// only once construction succeeded.
    pub fn update_config(&mut self, update: AgentOptionsUpdate) -> Result<(), WayfareError> {
        let mut next = self.options.clone();
        if let Some(model) = update.model {
            next.model = model;
        }
        if let Some(temperature) = update.temperature {
            next.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            next.max_tokens = max_tokens;
        }
        if let Some(verbose) = update.verbose {
            next.verbose = verbose;
        }

        if next.model != self.options.model {
            let creds = self.credentials.as_ref().ok_or_else(|| {
                WayfareError::InvalidState(
                    "cannot rebind model on an agent without credentials".into(),
                )
            })?;
            let provider = Box::new(GroqProvider::new(
                next.model.as_str(),
                creds.api_key.as_str(),
                creds.base_url.clone(),
            ));
            self.provider = provider;
        }
        self.options = next;
        Ok(())
    }

    /// Answer a query, consulting tools as the model requests.
    pub async fn invoke(
        &self,
        query: &str,
        history: &super::history::ChatHistory,
    ) -> Result<AgentReply, WayfareError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WayfareError::InvalidArgument("query must not be empty".into()));
        }

        let mut messages = Vec::with_capacity(history.messages().len() + 2);
        messages.push(ModelMessage::system(SYSTEM_PROMPT));
        messages.extend(history.messages().iter().cloned());
        messages.push(ModelMessage::user(query));

        let tool_defs = if self.registry.is_empty() {
            None
        } else {
            Some(self.registry.definitions())
        };

        let mut total_usage = Usage::default();
        let mut last_text = String::new();

        for step in 0..self.max_steps {
            let response = self.call_model(&messages, tool_defs.clone()).await?;
            total_usage.merge(&response.usage);

            if self.options.verbose {
                info!(step, tool_calls = response.tool_calls.len(), "agent round");
            } else {
                debug!(step, tool_calls = response.tool_calls.len(), "agent round");
            }

            match classify(response) {
                StepOutcome::Answer(text) => {
                    if text.is_empty() {
                        return Err(WayfareError::InvalidState(
                            "model returned an empty response".into(),
                        ));
                    }
                    return Ok(AgentReply {
                        text,
                        usage: total_usage,
                        steps: step + 1,
                    });
                }
                StepOutcome::InvokeTools { text, calls } => {
                    if !text.is_empty() {
                        last_text = text.clone();
                    }
                    self.run_tools(&text, &calls, &mut messages).await;
                }
            }
        }

        // Step bound reached: one closing round, tools withheld.
        messages.push(ModelMessage::user(
            "Provide your best final answer from the information gathered so far. \
             Do not request any more tools.",
        ));
        match self.call_model(&messages, None).await {
            Ok(response) => {
                total_usage.merge(&response.usage);
                let text = if response.text.is_empty() {
                    last_text
                } else {
                    response.text
                };
                if text.is_empty() {
                    return Err(WayfareError::InvalidState(
                        "no answer produced within the step bound".into(),
                    ));
                }
                Ok(AgentReply {
                    text,
                    usage: total_usage,
                    steps: self.max_steps + 1,
                })
            }
            Err(e) if !last_text.is_empty() => {
                warn!(error = %e, "closing round failed, returning partial answer");
                Ok(AgentReply {
                    text: last_text,
                    usage: total_usage,
                    steps: self.max_steps + 1,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// One provider round with per-call timeout and retry.
    async fn call_model(
        &self,
        messages: &[ModelMessage],
        tools: Option<Vec<ToolDefinition>>,
    ) -> Result<ProviderResponse, WayfareError> {
        let request = ProviderRequest {
            messages: messages.to_vec(),
            settings: GenerationSettings::builder()
                .temperature(self.options.temperature)
                .max_tokens(self.options.max_tokens)
                .build(),
            tools,
        };

        self.retry
            .execute(|| with_timeout(CALL_TIMEOUT, self.provider.generate_text(&request)))
            .await
    }

    /// Execute tool calls, appending the assistant round and each result.
    async fn run_tools(
        &self,
        text: &str,
        calls: &[AgentToolCall],
        messages: &mut Vec<ModelMessage>,
    ) {
        let mut assistant_content = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            assistant_content.push(ContentPart::Text {
                text: text.to_string(),
            });
        }
        for tc in calls {
            assistant_content.push(ContentPart::ToolCall(tc.clone()));
        }
        messages.push(ModelMessage {
            role: Role::Assistant,
            content: assistant_content,
            timestamp: Some(chrono::Utc::now()),
        });

        for tc in calls {
            let result = self.run_tool(tc).await;
            messages.push(ModelMessage::tool_result(
                result.tool_call_id.clone(),
                result.result,
                result.is_error,
            ));
        }
    }

    async fn run_tool(&self, tc: &AgentToolCall) -> AgentToolResult {
        // Undecodable argument payloads arrive as a raw string; send a
        // corrective result instead of aborting the invocation.
        if !tc.arguments.is_object() {
            warn!(tool = tc.name, "malformed tool arguments");
            return AgentToolResult {
                tool_call_id: tc.id.clone(),
                result: serde_json::json!({
                    "error": format!(
                        "Could not parse arguments for tool '{}'. \
                         Provide a JSON object matching the tool's schema.",
                        tc.name
                    )
                }),
                is_error: true,
            };
        }

        match self.registry.get(&tc.name) {
            Some(tool) => {
                let args = ToolArguments::new(tc.arguments.clone());
                match tool.execute(&args).await {
                    Ok(val) => AgentToolResult {
                        tool_call_id: tc.id.clone(),
                        result: val,
                        is_error: false,
                    },
                    Err(e) => {
                        warn!(tool = tc.name, error = %e, "Tool execution failed");
                        AgentToolResult {
                            tool_call_id: tc.id.clone(),
                            result: serde_json::json!({"error": e.to_string()}),
                            is_error: true,
                        }
                    }
                }
            }
            None => {
                warn!(tool = tc.name, "Tool not found");
                AgentToolResult {
                    tool_call_id: tc.id.clone(),
                    result: serde_json::json!({
                        "error": format!("Tool '{}' not found", tc.name)
                    }),
                    is_error: true,
                }
            }
        }
    }
}

fn classify(response: ProviderResponse) -> StepOutcome {
    if response.tool_calls.is_empty() {
        StepOutcome::Answer(response.text)
    } else {
        StepOutcome::InvokeTools {
            text: response.text,
            calls: response.tool_calls,
        }
    }
}
