//! Tool trait: the abstraction over canvas actions.
//!
//! Tools turn a model's tool-call proposal into a structured [`ToolOutput`]
//! that the client applies to the board. A [`ToolCatalog`] is built per
//! request and bound to one board through its [`ToolContext`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::canvas::{CanvasObject, CanvasStore, ObjectSummary};
use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A model-proposed tool invocation. The arguments are untrusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallProposal {
    /// The model's own call ID, echoed back in the tool-result turn
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// What a tool does to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    BatchUpdate,
    Read,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::BatchUpdate => "batch_update",
            Self::Read => "read",
        }
    }
}

/// One entry of a batch update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: String,
    pub updates: serde_json::Map<String, serde_json::Value>,
}

/// The result of a tool invocation.
///
/// Malformed input and unknown tool names are returned as
/// [`ToolOutput::Rejected`] so the model can see the reason and recover;
/// neither aborts the agent loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Create {
        object: CanvasObject,
        title_label: Option<CanvasObject>,
    },
    Update {
        id: String,
        updates: serde_json::Map<String, serde_json::Value>,
    },
    Delete {
        id: String,
    },
    BatchUpdate {
        batch_updates: Vec<BatchEntry>,
    },
    Read {
        objects: Vec<ObjectSummary>,
        count: usize,
        error: Option<String>,
    },
    /// `action` is `None` when the proposal named no known tool.
    Rejected {
        action: Option<ActionKind>,
        error: String,
    },
}

impl ToolOutput {
    pub fn action(&self) -> Option<ActionKind> {
        match self {
            Self::Create { .. } => Some(ActionKind::Create),
            Self::Update { .. } => Some(ActionKind::Update),
            Self::Delete { .. } => Some(ActionKind::Delete),
            Self::BatchUpdate { .. } => Some(ActionKind::BatchUpdate),
            Self::Read { .. } => Some(ActionKind::Read),
            Self::Rejected { action, .. } => *action,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The output as a JSON value, as it appears on the wire.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for ToolOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(action) = self.action() {
            map.serialize_entry("action", action.as_str())?;
        }
        match self {
            Self::Create { object, title_label } => {
                map.serialize_entry("object", object)?;
                if let Some(label) = title_label {
                    map.serialize_entry("titleLabel", label)?;
                }
            }
            Self::Update { id, updates } => {
                map.serialize_entry("id", id)?;
                map.serialize_entry("updates", updates)?;
            }
            Self::Delete { id } => map.serialize_entry("id", id)?,
            Self::BatchUpdate { batch_updates } => {
                map.serialize_entry("batchUpdates", batch_updates)?;
            }
            Self::Read { objects, count, error } => {
                if let Some(error) = error {
                    map.serialize_entry("error", error)?;
                }
                map.serialize_entry("objects", objects)?;
                map.serialize_entry("count", count)?;
            }
            Self::Rejected { error, .. } => map.serialize_entry("error", error)?,
        }
        map.end()
    }
}

/// Per-request context every tool invocation receives.
#[derive(Clone)]
pub struct ToolContext {
    /// The board this request operates on
    pub canvas_id: String,

    /// Shared read access to persisted objects
    pub store: Arc<dyn CanvasStore>,
}

impl ToolContext {
    pub fn new(canvas_id: impl Into<String>, store: Arc<dyn CanvasStore>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            store,
        }
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("canvas_id", &self.canvas_id)
            .field("store", &self.store.name())
            .finish()
    }
}

/// The core Tool trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique, stable name of this tool (e.g., "createStickyNote").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// The kind of result this tool produces. Used to label rejections.
    fn action(&self) -> ActionKind;

    /// Execute the tool against the given context.
    async fn execute(
        &self,
        ctx: &ToolContext,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolOutput, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Deserialize tool arguments, mapping failures to [`ToolError::InvalidArguments`].
pub fn parse_arguments<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// An ordered set of tools bound to one board.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the model
/// 2. Look up and invoke tools when the model requests them
pub struct ToolCatalog {
    tools: Vec<Box<dyn Tool>>,
    ctx: ToolContext,
}

impl ToolCatalog {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            tools: Vec::new(),
            ctx,
        }
    }

    /// Register a tool. Replaces any existing tool with the same name in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// All tool definitions in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// All registered tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a proposed tool call.
    ///
    /// Invalid arguments become a [`ToolOutput::Rejected`] carrying the
    /// tool's action kind. An unknown name becomes one listing the valid tools.
    pub async fn invoke(&self, call: &ToolCallProposal) -> std::result::Result<ToolOutput, ToolError> {
        let Some(tool) = self.get(&call.name) else {
            tracing::warn!(tool = %call.name, "Model proposed an unknown tool");
            return Ok(ToolOutput::Rejected {
                action: None,
                error: format!(
                    "{} is not a valid tool, try one of [{}].",
                    call.name,
                    self.names().join(", ")
                ),
            });
        };
        match tool.execute(&self.ctx, call.arguments.clone()).await {
            Err(ToolError::InvalidArguments(reason)) => {
                tracing::debug!(tool = %call.name, %reason, "Tool rejected arguments");
                Ok(ToolOutput::Rejected {
                    action: Some(tool.action()),
                    error: reason,
                })
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tools", &self.names())
            .field("ctx", &self.ctx)
            .finish()
    }
}
