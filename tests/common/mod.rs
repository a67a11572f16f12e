//! Shared test helpers and mock provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wayfare::error::WayfareError;
use wayfare::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use wayfare::types::*;
use wayfare::util::RetryPolicy;

enum Queued {
    Response(ProviderResponse),
    Error(WayfareError),
}

struct MockInner {
    model_id: String,
    queue: Mutex<VecDeque<Queued>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

/// A mock provider that returns queued responses in FIFO order and records
/// every request it sees. Clones share the same queue.
#[derive(Clone)]
pub struct MockProvider {
    inner: Arc<MockInner>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            inner: Arc::new(MockInner {
                model_id: model_id.to_string(),
                queue: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.inner
            .queue
            .lock()
            .unwrap()
            .push_back(Queued::Response(ProviderResponse {
                text: text.to_string(),
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                    total_tokens: 30,
                },
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
            }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.inner
            .queue
            .lock()
            .unwrap()
            .push_back(Queued::Response(ProviderResponse {
                text: String::new(),
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                    total_tokens: 15,
                },
                tool_calls: vec![AgentToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: args,
                }],
                finish_reason: Some(FinishReason::ToolCalls),
            }));
    }

    /// Queue an error.
    pub fn queue_error(&self, error: WayfareError) {
        self.inner
            .queue
            .lock()
            .unwrap()
            .push_back(Queued::Error(error));
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> ProviderRequest {
        self.inner.requests.lock().unwrap()[index].clone()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.inner.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn model_id(&self) -> &str {
        &self.inner.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, WayfareError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        match self.inner.queue.lock().unwrap().pop_front() {
            Some(Queued::Response(response)) => Ok(response),
            Some(Queued::Error(error)) => Err(error),
            None => Ok(ProviderResponse {
                text: "Mock response".to_string(),
                usage: Usage::default(),
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
            }),
        }
    }
}

/// Retry policy that never retries; keeps queued errors deterministic.
pub fn no_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 1,
        ..RetryPolicy::default()
    }
}
