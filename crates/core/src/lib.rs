//! # Orim Core
//!
//! Domain types, traits, and error definitions for the Orim canvas agent.
//! Every other crate in the workspace depends inward on this one.
//!
//! ## Layout
//!
//! - [`message`]: conversation turns and the per-request conversation state
//! - [`provider`]: the language-model abstraction
//! - [`tool`]: canvas tools, their results, and the bound catalog
//! - [`canvas`]: board objects and the persistence store abstraction

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;
pub mod canvas;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Conversation, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolDefinition};
pub use tool::{ActionKind, Tool, ToolCallProposal, ToolCatalog, ToolContext, ToolOutput};
pub use canvas::{CanvasObject, CanvasStore, ObjectSize, ObjectSummary, StoredObject};
