//! Structured travel-planning workflow.
//!
//! Placeholder stage: the workflow currently echoes its input back as the
//! final summary. Kept as a stable contract for callers while multi-step
//! planning is absent.

/// Input context for a workflow run.
#[derive(Debug, Clone, Default)]
pub struct WorkflowContext {
    pub user_input: String,
}

impl WorkflowContext {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
        }
    }
}

/// Result of a workflow run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub final_summary: String,
}

/// Coordinates travel planning tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelPlanningWorkflow;

impl TravelPlanningWorkflow {
    pub fn new() -> Self {
        Self
    }

    /// Run the workflow over the provided context.
    pub fn run(&self, context: &WorkflowContext) -> WorkflowResult {
        WorkflowResult {
            final_summary: format!("Workflow received: {}", context.user_input),
        }
    }
}
