//! Session driver: owns the interactive loop and the programmatic entry points.

use std::io::{BufRead, Write};

use tracing::info;

use crate::agent::{AgentResponse, ChatHistory, FallbackController, Provenance};
use crate::config::AppConfig;
use crate::error::WayfareError;
use crate::workflow::{TravelPlanningWorkflow, WorkflowContext, WorkflowResult};

const HELP_TEXT: &str = "\
Available commands:
- 'quit' or 'exit': Exit the application
- 'help': Show this help message

Example queries:
- \"What's the weather like in Paris?\"
- \"How much does it cost to fly from New York to London?\"
- \"What are the top attractions in Tokyo?\"
- \"Plan a trip to Rome with weather, costs, and recommendations\"
- \"I need restaurant recommendations for Barcelona\"

The agent can combine multiple requests in one query!";

/// The travel planning application.
///
/// One query is fully resolved, fallback included, before the next is read.
pub struct TravelApp {
    controller: FallbackController,
    workflow: TravelPlanningWorkflow,
    history: ChatHistory,
}

impl std::fmt::Debug for TravelApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelApp")
            .field("workflow", &self.workflow)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl TravelApp {
    /// Construct from configuration. Fails before any agent is built if a
    /// required credential is missing.
    pub fn new(config: &AppConfig) -> Result<Self, WayfareError> {
        config.validate()?;
        Ok(Self {
            controller: FallbackController::new(config),
            workflow: TravelPlanningWorkflow::new(),
            history: ChatHistory::new(),
        })
    }

    /// Build around an explicit controller (used by tests).
    pub fn with_controller(controller: FallbackController) -> Self {
        Self {
            controller,
            workflow: TravelPlanningWorkflow::new(),
            history: ChatHistory::new(),
        }
    }

    /// Probe service health and report it. A failed probe does not abort.
    pub async fn startup_check(&self) {
        if self.controller.test_connection().await {
            println!("Connection successful!");
        } else {
            println!("Connection test failed, but continuing...");
        }
    }

    /// Interactive read loop over stdin.
    pub async fn run_interactive(&mut self) -> Result<(), WayfareError> {
        println!("\nWelcome to the Travel Planning Assistant!");
        println!("I can help you with weather, costs, and recommendations for your trip.");
        println!("Type 'quit' to exit, 'help' for commands.\n");

        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            print!("User: ");
            std::io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }
            let input = line.trim();

            if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "bye") {
                println!("Travel Agent: Safe travels! Goodbye!");
                break;
            }
            if input.eq_ignore_ascii_case("help") {
                println!("{HELP_TEXT}\n");
                continue;
            }
            if input.is_empty() {
                continue;
            }

            let response = self.dispatch(input).await;
            println!("Travel Agent: {}\n", response.text);
        }

        Ok(())
    }

    /// Run a single query and return its response text.
    pub async fn run_single_query(&mut self, query: &str) -> String {
        info!(%query, "single query");
        let response = self.dispatch(query).await;
        println!("Response: {}\n", response.text);
        response.text
    }

    /// Run queries strictly in order; results are positionally aligned.
    pub async fn run_batch_queries(&mut self, queries: &[String]) -> Vec<String> {
        let mut results = Vec::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            info!(index = i + 1, total = queries.len(), "batch query");
            let response = self.dispatch(query).await;
            results.push(response.text);
        }
        results
    }

    /// Run the structured workflow over raw input.
    pub fn run_structured_workflow(&self, user_input: &str) -> WorkflowResult {
        self.workflow.run(&WorkflowContext::new(user_input))
    }

    /// Recorded conversation history.
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Mutable access to the primary agent, e.g. for reconfiguration.
    pub fn primary_mut(&mut self) -> &mut crate::agent::TravelAgent {
        self.controller.primary_mut()
    }

    /// Dispatch one query and record the turn.
    ///
    /// Turns that ended in a double failure are not recorded, so a broken
    /// turn never feeds later context.
    async fn dispatch(&mut self, query: &str) -> AgentResponse {
        let response = self.controller.run_with_fallback(query, &self.history).await;
        if response.provenance != Provenance::FallbackFailure {
            self.history.record_turn(query, response.text.clone());
        }
        response
    }
}
