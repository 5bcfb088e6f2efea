//! Model client adapter.
//!
//! Turns the conversation and catalog into one streaming provider call and
//! exposes the reply as an ordered sequence of text and tool-call fragments.

use std::collections::VecDeque;
use std::sync::Arc;

use orim_core::error::ProviderError;
use orim_core::provider::{Provider, ProviderRequest, StreamChunk};
use orim_core::{Conversation, ToolCallProposal, ToolCatalog};
use tokio::sync::mpsc;
use tracing::debug;

/// One piece of a model reply, in generation order.
#[derive(Debug, Clone)]
pub enum ModelFragment {
    Text(String),
    ToolCall(ToolCallProposal),
}

/// Fragments of a single model call.
pub struct FragmentStream {
    rx: mpsc::Receiver<Result<StreamChunk, ProviderError>>,
    pending: VecDeque<ModelFragment>,
    done: bool,
}

impl FragmentStream {
    fn new(rx: mpsc::Receiver<Result<StreamChunk, ProviderError>>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// The next fragment, or `None` once the reply is complete.
    pub async fn next(&mut self) -> Option<Result<ModelFragment, ProviderError>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(Ok(fragment));
            }
            if self.done {
                return None;
            }
            match self.rx.recv().await? {
                Ok(chunk) => self.absorb(chunk),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }

    fn absorb(&mut self, chunk: StreamChunk) {
        if let Some(text) = chunk.content.filter(|t| !t.is_empty()) {
            self.pending.push_back(ModelFragment::Text(text));
        }
        for call in chunk.tool_calls {
            let arguments = match call.arguments {
                obj @ serde_json::Value::Object(_) => obj,
                _ => serde_json::Value::Object(serde_json::Map::new()),
            };
            self.pending.push_back(ModelFragment::ToolCall(ToolCallProposal {
                id: call.id,
                name: call.name,
                arguments,
            }));
        }
        if chunk.done {
            self.done = true;
        }
    }
}

/// Issues model calls with fixed system instructions and sampling settings.
#[derive(Clone)]
pub struct ModelAdapter {
    provider: Arc<dyn Provider>,
    model: String,
    system: String,
    max_tokens: u32,
    temperature: f32,
}

impl ModelAdapter {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system: system.into(),
            max_tokens: 4096,
            temperature: 0.0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Start one model call. No retry happens here.
    pub async fn propose(
        &self,
        conversation: &Conversation,
        catalog: &ToolCatalog,
    ) -> Result<FragmentStream, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            system: Some(self.system.clone()),
            messages: conversation.transcript(),
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            tools: catalog.definitions(),
            stream: true,
        };
        debug!(
            provider = self.provider.name(),
            model = %self.model,
            messages = request.messages.len(),
            "Requesting model turn"
        );
        let rx = self.provider.stream(request).await?;
        Ok(FragmentStream::new(rx))
    }
}

impl std::fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
