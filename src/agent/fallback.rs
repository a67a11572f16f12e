//! Fallback controller: degrade to a tool-less model when the primary fails.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::{ErrorCategory, WayfareError};
use crate::provider::{GroqProvider, ModelProvider, ProviderRequest};
use crate::types::{GenerationSettings, ModelMessage};
use crate::util::with_timeout;

use super::history::ChatHistory;
use super::primary::TravelAgent;

/// Marker prepended to degraded responses.
pub const FALLBACK_PREFIX: &str = "[Fallback Mode] ";

/// Shorter leash for the fallback model: one attempt, 30 s.
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

const PROBE_PROMPT: &str = "Say 'Connection successful' if you can read this.";
const PROBE_MARKER: &str = "successful";

/// Which path produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Primary,
    Fallback,
    /// Both tiers failed; the text is the apology message.
    FallbackFailure,
}

/// Final text surfaced to the user, tagged by provenance.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub text: String,
    pub provenance: Provenance,
}

impl AgentResponse {
    pub fn is_degraded(&self) -> bool {
        self.provenance != Provenance::Primary
    }
}

/// Wraps the primary agent; any failure re-issues the query to a simpler
/// tool-less model and labels the response as degraded.
pub struct FallbackController {
    primary: TravelAgent,
    fallback: Box<dyn ModelProvider>,
    fallback_settings: GenerationSettings,
}

impl FallbackController {
    /// Build from validated configuration.
    pub fn new(config: &AppConfig) -> Self {
        let fallback = Box::new(GroqProvider::new(
            config.fallback_model.as_str(),
            config.groq_api_key.as_str(),
            config.groq_base_url.clone(),
        ));
        Self::with_parts(TravelAgent::new(config), fallback)
    }

    /// Build from explicit parts.
    pub fn with_parts(primary: TravelAgent, fallback: Box<dyn ModelProvider>) -> Self {
        Self {
            primary,
            fallback,
            fallback_settings: GenerationSettings::builder()
                .temperature(0.3)
                .max_tokens(512)
                .build(),
        }
    }

    /// The wrapped primary agent.
    pub fn primary(&self) -> &TravelAgent {
        &self.primary
    }

    /// Mutable access, e.g. for reconfiguration.
    pub fn primary_mut(&mut self) -> &mut TravelAgent {
        &mut self.primary
    }

    /// Answer a query; never fails.
    ///
    /// The primary path is tried first. Any error, regardless of kind,
    /// degrades to the fallback model; a fallback failure yields a fixed
    /// apology carrying the error text.
    pub async fn run_with_fallback(&self, query: &str, history: &ChatHistory) -> AgentResponse {
        match self.primary.invoke(query, history).await {
            Ok(reply) => {
                info!(steps = reply.steps, tokens = reply.usage.total_tokens, "primary agent answered");
                AgentResponse {
                    text: reply.text,
                    provenance: Provenance::Primary,
                }
            }
            Err(e) => {
                match e.category() {
                    ErrorCategory::Authentication | ErrorCategory::Configuration => {
                        error!(error = %e, "primary agent failed; check credentials")
                    }
                    _ => warn!(error = %e, "primary agent failed, switching to fallback"),
                }
                self.degrade(query).await
            }
        }
    }

    async fn degrade(&self, query: &str) -> AgentResponse {
        let prompt = format!(
            "You are a helpful travel assistant. I'm experiencing technical difficulties \
             with my travel planning tools, but I can still provide general travel advice.\n\n\
             User question: {query}\n\n\
             Please provide a helpful response about travel planning. Be concise but \
             informative. If the question requires specific real-time data (like current \
             weather or exact prices), acknowledge that you cannot provide that information \
             due to technical issues, but offer general guidance instead."
        );

        match self.ask_fallback(&prompt).await {
            Ok(text) => AgentResponse {
                text: format!("{FALLBACK_PREFIX}{text}"),
                provenance: Provenance::Fallback,
            },
            Err(e) => AgentResponse {
                text: format!(
                    "I apologize, but I'm currently experiencing technical difficulties \
                     with both my tools and fallback systems. Please try again later. \
                     Error: {e}"
                ),
                provenance: Provenance::FallbackFailure,
            },
        }
    }

    /// Probe the fallback model. Failures are swallowed, never raised.
    pub async fn test_connection(&self) -> bool {
        match self.ask_fallback(PROBE_PROMPT).await {
            Ok(text) => text.to_lowercase().contains(PROBE_MARKER),
            Err(e) => {
                warn!(error = %e, "connection probe failed");
                false
            }
        }
    }

    /// One tool-less call to the fallback model. No retries.
    async fn ask_fallback(&self, prompt: &str) -> Result<String, WayfareError> {
        let request = ProviderRequest {
            messages: vec![ModelMessage::user(prompt)],
            settings: self.fallback_settings.clone(),
            tools: None,
        };
        let response =
            with_timeout(FALLBACK_TIMEOUT, self.fallback.generate_text(&request)).await?;
        Ok(response.text)
    }
}
