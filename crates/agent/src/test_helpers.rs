//! Mock providers shared by the agent tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use orim_core::error::ProviderError;
use orim_core::message::{Message, MessageToolCall};
use orim_core::provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
use tokio::sync::mpsc;

/// Returns scripted responses in order, then empty text replies.
///
/// Every request is recorded.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(mut responses: Vec<ProviderResponse>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop();
        Ok(next.unwrap_or_else(|| turn("", vec![])))
    }
}

/// Streams a fixed chunk list on every call, optionally ending in an error.
pub struct ChunkedProvider {
    chunks: Vec<StreamChunk>,
    trailing_error: Option<ProviderError>,
}

impl ChunkedProvider {
    pub fn new(chunks: Vec<StreamChunk>) -> Self {
        Self { chunks, trailing_error: None }
    }

    pub fn failing_after(chunks: Vec<StreamChunk>, error: ProviderError) -> Self {
        Self { chunks, trailing_error: Some(error) }
    }
}

#[async_trait]
impl Provider for ChunkedProvider {
    fn name(&self) -> &str {
        "chunked_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::NotConfigured("chunked mock only streams".into()))
    }

    async fn stream(
        &self,
        _request: ProviderRequest,
    ) -> Result<mpsc::Receiver<Result<StreamChunk, ProviderError>>, ProviderError> {
        let (tx, rx) = mpsc::channel(self.chunks.len() + 1);
        for chunk in &self.chunks {
            let _ = tx.send(Ok(chunk.clone())).await;
        }
        if let Some(e) = &self.trailing_error {
            let _ = tx.send(Err(e.clone())).await;
        }
        Ok(rx)
    }
}

/// Fails every call before any output.
pub struct FailingProvider {
    error: ProviderError,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(self.error.clone())
    }
}

/// Always asks for `per_turn` more calls of the same tool.
pub struct EndlessToolProvider {
    tool: String,
    arguments: serde_json::Value,
    per_turn: usize,
    calls: AtomicUsize,
}

impl EndlessToolProvider {
    pub fn new(tool: &str, arguments: serde_json::Value, per_turn: usize) -> Self {
        Self {
            tool: tool.into(),
            arguments,
            per_turn,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for EndlessToolProvider {
    fn name(&self) -> &str {
        "endless_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let calls = (0..self.per_turn)
            .map(|i| tool_call(&format!("toolu_{n}_{i}"), &self.tool, self.arguments.clone()))
            .collect();
        Ok(turn("", calls))
    }
}

/// An assistant turn with optional tool calls.
pub fn turn(text: &str, tool_calls: Vec<MessageToolCall>) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant_with_tools(text, tool_calls),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.into(),
        name: name.into(),
        arguments,
    }
}
