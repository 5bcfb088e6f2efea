//! The agent execution loop.
//!
//! Each iteration asks the model for a turn, forwards text as it arrives and
//! invokes every proposed tool before pulling the next fragment. The loop
//! stops when the model proposes nothing, when a ceiling is reached, on the
//! first failure, or when the caller goes away.

use std::sync::Arc;

use orim_core::message::{Message, MessageToolCall};
use orim_core::{Conversation, ToolCallProposal, ToolCatalog};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::adapter::{ModelAdapter, ModelFragment};
use crate::stream_event::AgentEvent;

/// Maximum model calls per request.
pub const MAX_ITERATIONS: usize = 10;

/// Maximum tool invocations per request.
pub const MAX_TOOL_CALLS: usize = 10;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The model answered without proposing tools.
    Completed,
    IterationLimit,
    ToolCallLimit,
    /// An error event was emitted.
    Failed,
    /// The event receiver was dropped.
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running { iteration: usize },
    Finished(FinishReason),
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub reason: FinishReason,
    pub iterations: usize,
    /// Names of the tools invoked, in order.
    pub tool_names: Vec<String>,
}

/// A run in progress.
pub struct AgentRun {
    pub events: mpsc::Receiver<AgentEvent>,
    pub handle: JoinHandle<LoopSummary>,
}

/// Drives one chat request against a board's tool catalog.
pub struct CanvasAgent {
    adapter: ModelAdapter,
    catalog: Arc<ToolCatalog>,
    max_iterations: usize,
    max_tool_calls: usize,
}

/// Mutable per-run bookkeeping.
struct RunState {
    conversation: Conversation,
    tool_names: Vec<String>,
}

impl CanvasAgent {
    pub fn new(adapter: ModelAdapter, catalog: ToolCatalog) -> Self {
        Self {
            adapter,
            catalog: Arc::new(catalog),
            max_iterations: MAX_ITERATIONS,
            max_tool_calls: MAX_TOOL_CALLS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_tool_calls(mut self, max: usize) -> Self {
        self.max_tool_calls = max;
        self
    }

    /// Run in a background task.
    ///
    /// The channel holds a single event, so the loop never gets ahead of the
    /// consumer. The loop never sends `finish`; that is the encoder's job.
    pub fn run_stream(self, conversation: Conversation) -> AgentRun {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move { self.run(conversation, &tx).await });
        AgentRun { events: rx, handle }
    }

    /// Run to completion, sending events to `tx`.
    pub async fn run(&self, conversation: Conversation, tx: &mpsc::Sender<AgentEvent>) -> LoopSummary {
        let mut run = RunState {
            conversation,
            tool_names: Vec::new(),
        };
        let mut state = LoopState::Running { iteration: 0 };
        let mut iterations = 0;

        let reason = loop {
            match state {
                LoopState::Finished(reason) => break reason,
                LoopState::Running { iteration } => {
                    iterations = iteration + 1;
                    state = self.step(&mut run, iteration, tx).await;
                }
            }
        };

        info!(
            ?reason,
            iterations,
            tool_calls = run.tool_names.len(),
            "Agent run finished"
        );
        LoopSummary {
            reason,
            iterations,
            tool_names: run.tool_names,
        }
    }

    /// One model call plus the tool calls it proposes.
    async fn step(&self, run: &mut RunState, iteration: usize, tx: &mpsc::Sender<AgentEvent>) -> LoopState {
        debug!(iteration, "Agent loop iteration");

        let mut fragments = match self.adapter.propose(&run.conversation, &self.catalog).await {
            Ok(f) => f,
            Err(e) => return fail(tx, e.to_string()).await,
        };

        let mut text = String::new();
        let mut calls: Vec<MessageToolCall> = Vec::new();
        let mut results: Vec<Message> = Vec::new();
        let mut ceiling_hit = false;

        while let Some(fragment) = fragments.next().await {
            match fragment {
                Err(e) => return fail(tx, e.to_string()).await,
                Ok(ModelFragment::Text(chunk)) => {
                    text.push_str(&chunk);
                    if tx.send(AgentEvent::Text { content: chunk }).await.is_err() {
                        return disconnected();
                    }
                }
                Ok(ModelFragment::ToolCall(proposal)) => {
                    if run.tool_names.len() >= self.max_tool_calls {
                        warn!(tool = %proposal.name, limit = self.max_tool_calls, "Tool call ceiling reached, dropping proposal");
                        ceiling_hit = true;
                        break;
                    }
                    let event = match self.invoke(&proposal).await {
                        Ok(output) => {
                            run.tool_names.push(proposal.name.clone());
                            results.push(Message::tool_result(&proposal.id, output.to_string()));
                            let event = AgentEvent::ToolCall {
                                id: uuid::Uuid::new_v4().to_string(),
                                name: proposal.name.clone(),
                                args: proposal.arguments.clone(),
                                output,
                            };
                            calls.push(MessageToolCall {
                                id: proposal.id,
                                name: proposal.name,
                                arguments: proposal.arguments,
                            });
                            event
                        }
                        Err(message) => return fail(tx, message).await,
                    };
                    if tx.send(event).await.is_err() {
                        return disconnected();
                    }
                }
            }
        }

        if calls.is_empty() {
            return if ceiling_hit {
                LoopState::Finished(FinishReason::ToolCallLimit)
            } else {
                LoopState::Finished(FinishReason::Completed)
            };
        }

        run.conversation.push_scratch(Message::assistant_with_tools(text, calls));
        for result in results {
            run.conversation.push_scratch(result);
        }

        if ceiling_hit || run.tool_names.len() >= self.max_tool_calls {
            return LoopState::Finished(FinishReason::ToolCallLimit);
        }
        if iteration + 1 >= self.max_iterations {
            warn!(limit = self.max_iterations, "Iteration ceiling reached");
            return LoopState::Finished(FinishReason::IterationLimit);
        }
        LoopState::Running { iteration: iteration + 1 }
    }

    async fn invoke(&self, proposal: &ToolCallProposal) -> Result<serde_json::Value, String> {
        debug!(tool = %proposal.name, args = %proposal.arguments, "Invoking tool");
        self.catalog
            .invoke(proposal)
            .await
            .map(|output| output.to_json())
            .map_err(|e| e.to_string())
    }
}

async fn fail(tx: &mpsc::Sender<AgentEvent>, message: String) -> LoopState {
    error!(error = %message, "Agent run aborted");
    let _ = tx.send(AgentEvent::Error { error: message }).await;
    LoopState::Finished(FinishReason::Failed)
}

fn disconnected() -> LoopState {
    debug!("Event receiver dropped, stopping");
    LoopState::Finished(FinishReason::Disconnected)
}
