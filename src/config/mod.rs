//! Process configuration, loaded once from the environment.

use crate::error::WayfareError;

/// Default model for the tool-calling agent.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
/// Faster model used for fallback responses.
pub const FALLBACK_MODEL: &str = "llama3-8b-8192";

/// Immutable application settings.
///
/// Built once at startup and passed by reference into every component.
/// Required credentials are validated before any agent is constructed.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Groq API credential (required).
    pub groq_api_key: String,
    /// Observability-platform credential (required).
    pub trace_api_key: String,
    /// OpenWeatherMap credential; absent means the weather tool stays mocked.
    pub weather_api_key: Option<String>,
    /// Model identifier for the primary agent.
    pub default_model: String,
    /// Model identifier for the fallback path.
    pub fallback_model: String,
    /// Base URL override for the Groq API.
    pub groq_base_url: Option<String>,
}

impl AppConfig {
    /// Load from environment variables (reads `.env` if present).
    pub fn from_env() -> Result<Self, WayfareError> {
        let _ = dotenvy::dotenv();

        let config = Self {
            groq_api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            trace_api_key: std::env::var("TRACE_API_KEY").unwrap_or_default(),
            weather_api_key: std::env::var("WEATHER_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            default_model: std::env::var("WAYFARE_DEFAULT_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            fallback_model: std::env::var("WAYFARE_FALLBACK_MODEL")
                .unwrap_or_else(|_| FALLBACK_MODEL.to_string()),
            groq_base_url: std::env::var("GROQ_BASE_URL").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that all required credentials are present.
    pub fn validate(&self) -> Result<(), WayfareError> {
        if self.groq_api_key.is_empty() {
            return Err(WayfareError::Configuration(
                "GROQ_API_KEY is required. Get it from https://console.groq.com/keys".into(),
            ));
        }
        if self.trace_api_key.is_empty() {
            return Err(WayfareError::Configuration(
                "TRACE_API_KEY is required for request tracing".into(),
            ));
        }
        Ok(())
    }
}
