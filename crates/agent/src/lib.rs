//! # Orim Agent
//!
//! Answers one chat request against a whiteboard:
//!
//! 1. **Classify**: label the request for telemetry ([`classify`])
//! 2. **Propose**: stream a model turn ([`adapter`])
//! 3. **Act**: invoke each proposed canvas tool ([`loop_runner`])
//! 4. **Encode**: frame events as NDJSON lines ([`encoder`])
//!
//! [`session::ChatService`] wires the steps together per request.

pub mod adapter;
pub mod classify;
pub mod encoder;
pub mod loop_runner;
pub mod prompt;
pub mod session;
pub mod stream_event;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use adapter::{FragmentStream, ModelAdapter, ModelFragment};
pub use classify::{CommandType, classify};
pub use loop_runner::{AgentRun, CanvasAgent, FinishReason, LoopState, LoopSummary, MAX_ITERATIONS, MAX_TOOL_CALLS};
pub use prompt::build_system_prompt;
pub use session::{ChatMessage, ChatRequest, ChatService, ChatStream};
pub use stream_event::AgentEvent;
