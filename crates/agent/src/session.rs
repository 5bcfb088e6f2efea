//! Chat request orchestration.
//!
//! Ties one inbound chat request to the classifier, the telemetry trace, a
//! board-bound tool catalog and the agent loop, and hands back the encoded
//! line stream.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{BoxStream, StreamExt};
use orim_config::AppConfig;
use orim_core::{CanvasStore, Conversation, Provider, Role, ToolContext};
use orim_telemetry::{ScoreSummary, TelemetryRecorder};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};

use crate::adapter::ModelAdapter;
use crate::classify::classify;
use crate::encoder::encode;
use crate::loop_runner::CanvasAgent;
use crate::prompt::build_system_prompt;

/// A chat message as sent by the client.
///
/// `role` stays a string so unknown roles can be skipped instead of
/// rejecting the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub board_id: String,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn conversation(&self) -> Conversation {
        Conversation::from_turns(self.messages.iter().filter_map(|m| {
            let role = match m.role.as_str() {
                "user" => Role::User,
                "assistant" => Role::Assistant,
                _ => return None,
            };
            Some((role, m.content.clone()))
        }))
    }
}

/// Encoded response lines plus the task that scores the trace.
pub struct ChatStream {
    pub lines: BoxStream<'static, String>,
    /// Resolves once scores were submitted. `None` when telemetry is off.
    pub scored: JoinHandle<Option<ScoreSummary>>,
}

/// Process-wide chat handler. Cheap to clone.
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn Provider>,
    store: Arc<dyn CanvasStore>,
    telemetry: TelemetryRecorder,
    default_model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatService {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn CanvasStore>,
        telemetry: TelemetryRecorder,
        config: &AppConfig,
    ) -> Self {
        Self {
            provider,
            store,
            telemetry,
            default_model: config.default_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Build the provider, store and telemetry recorder from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            orim_providers::from_config(config),
            orim_store::from_config(&config.supabase),
            TelemetryRecorder::from_config(&config.langfuse),
            config,
        )
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Start answering a request.
    ///
    /// The returned stream always ends with exactly one `finish` line, even
    /// when the loop fails or its task dies.
    pub async fn stream(&self, request: ChatRequest) -> ChatStream {
        let started = Instant::now();
        let model = request
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.default_model.clone());
        let conversation = request.conversation();
        let command = classify(&conversation.input);

        info!(
            board_id = %request.board_id,
            %command,
            %model,
            turns = request.messages.len(),
            "Chat request"
        );

        let trace = self.telemetry.begin(&request.board_id, command.as_str(), &model);

        let catalog = orim_tools::build_catalog(ToolContext::new(&request.board_id, self.store.clone()));
        let adapter = ModelAdapter::new(
            self.provider.clone(),
            model,
            build_system_prompt(&request.board_id, request.verbose),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(self.temperature);

        let run = CanvasAgent::new(adapter, catalog).run_stream(conversation);
        let lines = encode(ReceiverStream::new(run.events)).boxed();

        let telemetry = self.telemetry.clone();
        let handle = run.handle;
        // Trace submission runs beside the loop and never holds up the stream
        let scored = tokio::spawn(async move {
            if let Some(trace) = &trace {
                telemetry.publish(trace).await;
            }
            let tool_names = match handle.await {
                Ok(summary) => summary.tool_names,
                Err(e) => {
                    error!(error = %e, "Agent task failed");
                    Vec::new()
                }
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;
            telemetry.close(trace.as_ref(), &tool_names, elapsed_ms).await
        });

        ChatStream { lines, scored }
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("provider", &self.provider.name())
            .field("store", &self.store.name())
            .field("telemetry", &self.telemetry)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use orim_store::InMemoryStore;
    use orim_telemetry::{MemorySink, Score, TelemetryError, TelemetrySink, TraceHandle};
    use serde_json::json;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage { role: "user".into(), content: text.into() }],
            board_id: "board-1".into(),
            verbose: false,
            model: None,
        }
    }

    fn service(provider: Arc<dyn Provider>, sink: Option<Arc<MemorySink>>) -> ChatService {
        let telemetry = match sink {
            Some(sink) => TelemetryRecorder::new(sink),
            None => TelemetryRecorder::disabled(),
        };
        ChatService::new(provider, Arc::new(InMemoryStore::new()), telemetry, &AppConfig::default())
    }

    async fn lines(stream: ChatStream) -> (Vec<serde_json::Value>, Option<ScoreSummary>) {
        let lines: Vec<String> = stream.lines.collect().await;
        let parsed = lines
            .iter()
            .map(|l| {
                assert!(l.ends_with('\n'));
                serde_json::from_str(l.trim_end()).unwrap()
            })
            .collect();
        (parsed, stream.scored.await.unwrap())
    }

    #[test]
    fn request_defaults_and_role_filtering() {
        let req: ChatRequest = serde_json::from_value(json!({
            "messages": [
                {"role": "system", "content": "ignored"},
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "reply"},
                {"role": "user", "content": "second"}
            ],
            "board_id": "b1"
        }))
        .unwrap();
        assert!(!req.verbose);
        assert!(req.model.is_none());

        let conversation = req.conversation();
        assert_eq!(conversation.input, "second");
        assert_eq!(conversation.history.len(), 2);
        assert_eq!(conversation.history[0].content, "first");
    }

    #[tokio::test]
    async fn stream_ends_with_one_finish() {
        let provider = Arc::new(ScriptedProvider::new(vec![turn("Hello", vec![])]));
        let (lines, scored) = lines(service(provider, None).stream(request("hi")).await).await;

        assert_eq!(lines, vec![json!({"type": "text", "content": "Hello"}), json!({"type": "finish"})]);
        assert!(scored.is_none());
    }

    #[tokio::test]
    async fn provider_error_is_followed_by_finish() {
        let provider = Arc::new(FailingProvider::new(orim_core::error::ProviderError::AuthenticationFailed(
            "invalid x-api-key".into(),
        )));
        let (lines, _) = lines(service(provider, None).stream(request("hi")).await).await;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "error");
        assert_eq!(lines[0]["error"], "Authentication failed: invalid x-api-key");
        assert_eq!(lines[1], json!({"type": "finish"}));
    }

    #[tokio::test]
    async fn trace_is_tagged_and_scored() {
        let sink = Arc::new(MemorySink::new());
        let provider = Arc::new(ScriptedProvider::new(vec![
            turn("", vec![tool_call("t1", "getBoardState", json!({}))]),
            turn(
                "",
                vec![
                    tool_call("t2", "createShape", json!({"type": "circle", "x": 0, "y": 0})),
                    tool_call("t3", "createStickyNote", json!({"text": "a"})),
                ],
            ),
            turn("Done.", vec![]),
        ]));
        let svc = service(provider, Some(sink.clone()));

        let (lines, scored) = lines(svc.stream(request("add a circle and a note")).await).await;
        assert_eq!(lines.iter().filter(|l| l["type"] == "tool_call").count(), 3);

        let traces = sink.traces();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].session_id, "board:board-1");
        assert!(traces[0].tags.contains(&"command:create".to_string()));
        assert!(traces[0].tags.contains(&"model:claude-sonnet-4-5".to_string()));

        let summary = scored.unwrap();
        assert_eq!(summary.tool_call_count, 3);
        assert_eq!(summary.objects_affected, 2);
        assert!(summary.got_board_state);
        assert!(!summary.hit_step_limit);
        assert_eq!(sink.scores().len(), 6);
    }

    /// Holds every trace submission until released.
    struct GatedSink {
        gate: tokio::sync::Notify,
        inner: MemorySink,
    }

    #[async_trait::async_trait]
    impl TelemetrySink for GatedSink {
        async fn create_trace(&self, trace: &TraceHandle) -> Result<(), TelemetryError> {
            self.gate.notified().await;
            self.inner.create_trace(trace).await
        }

        async fn post_score(&self, trace_id: &str, score: &Score) -> Result<(), TelemetryError> {
            self.inner.post_score(trace_id, score).await
        }
    }

    #[tokio::test]
    async fn slow_trace_creation_does_not_delay_stream() {
        let sink = Arc::new(GatedSink { gate: tokio::sync::Notify::new(), inner: MemorySink::new() });
        let provider = Arc::new(ScriptedProvider::new(vec![turn("Hello", vec![])]));
        let svc = ChatService::new(
            provider,
            Arc::new(InMemoryStore::new()),
            TelemetryRecorder::new(sink.clone()),
            &AppConfig::default(),
        );

        let stream = svc.stream(request("hi")).await;
        let lines: Vec<String> = tokio::time::timeout(std::time::Duration::from_secs(2), stream.lines.collect())
            .await
            .expect("stream completes while the trace is pending");
        assert_eq!(lines.len(), 2);
        assert!(sink.inner.traces().is_empty());

        sink.gate.notify_one();
        let summary = stream.scored.await.unwrap();
        assert!(summary.is_some());
        assert_eq!(sink.inner.traces().len(), 1);
        assert_eq!(sink.inner.scores().len(), 6);
    }

    #[tokio::test]
    async fn request_model_overrides_default() {
        let provider = Arc::new(ScriptedProvider::new(vec![turn("ok", vec![])]));
        let mut req = request("hi");
        req.model = Some("claude-haiku-4-5".into());

        let _ = lines(service(provider.clone(), None).stream(req).await).await;
        assert_eq!(provider.last_request().unwrap().model, "claude-haiku-4-5");
    }

    #[tokio::test]
    async fn verbose_changes_system_prompt() {
        let provider = Arc::new(ScriptedProvider::new(vec![turn("ok", vec![])]));
        let mut req = request("hi");
        req.verbose = true;

        let _ = lines(service(provider.clone(), None).stream(req).await).await;
        let system = provider.last_request().unwrap().system.unwrap();
        assert!(system.contains("Board ID: board-1"));
        assert!(system.contains("explain the layout choice"));
    }
}
