//! Per-request trace lifecycle.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::langfuse::LangfuseSink;
use crate::model::{ScoreSummary, TraceHandle};
use crate::sink::TelemetrySink;

/// Opens a trace when a request starts and scores it when the stream ends.
///
/// Without a sink every call is a no-op.
#[derive(Clone, Default)]
pub struct TelemetryRecorder {
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl TelemetryRecorder {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Langfuse when both keys are configured, otherwise disabled.
    pub fn from_config(config: &orim_config::LangfuseConfig) -> Self {
        match LangfuseSink::from_config(config) {
            Some(sink) => Self::new(Arc::new(sink)),
            None => {
                debug!("Langfuse keys not set, telemetry disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Build the handle for a new trace without contacting the sink.
    pub fn begin(&self, board_id: &str, command_type: &str, model: &str) -> Option<TraceHandle> {
        self.sink.as_ref()?;
        Some(TraceHandle::new(board_id, command_type, model))
    }

    /// Submit a trace built by [`begin`](Self::begin). Failures are logged.
    pub async fn publish(&self, trace: &TraceHandle) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if let Err(e) = sink.create_trace(trace).await {
            warn!(trace_id = %trace.trace_id, error = %e, "Failed to create trace");
        }
    }

    /// Start a trace and submit it. The handle is returned even when the
    /// submission failed so scores can be attempted.
    pub async fn open(&self, board_id: &str, command_type: &str, model: &str) -> Option<TraceHandle> {
        let trace = self.begin(board_id, command_type, model)?;
        self.publish(&trace).await;
        Some(trace)
    }

    /// Submit the request's scores. Each score is sent independently and a
    /// failure of one does not stop the others.
    pub async fn close<S: AsRef<str>>(
        &self,
        trace: Option<&TraceHandle>,
        tool_names: &[S],
        elapsed_ms: u64,
    ) -> Option<ScoreSummary> {
        let (sink, trace) = (self.sink.as_ref()?, trace?);
        let summary = ScoreSummary::from_tool_names(tool_names, elapsed_ms);

        for score in summary.scores() {
            if let Err(e) = sink.post_score(&trace.trace_id, &score).await {
                warn!(trace_id = %trace.trace_id, score = %score.name, error = %e, "Failed to post score");
            }
        }

        debug!(trace_id = %trace.trace_id, ?summary, "Trace scored");
        Some(summary)
    }
}

impl std::fmt::Debug for TelemetryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryRecorder")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryError;
    use crate::model::Score;
    use crate::sink::MemorySink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn disabled_recorder_is_noop() {
        let recorder = TelemetryRecorder::disabled();
        assert!(!recorder.is_enabled());
        assert!(recorder.open("b1", "create", "m").await.is_none());
        assert!(recorder.begin("b1", "create", "m").is_none());
        assert!(recorder.close::<&str>(None, &[], 5).await.is_none());
    }

    #[tokio::test]
    async fn open_then_close_records_six_scores() {
        let sink = Arc::new(MemorySink::new());
        let recorder = TelemetryRecorder::new(sink.clone());

        let trace = recorder.open("b1", "layout", "claude-sonnet-4-5").await.unwrap();
        let summary = recorder
            .close(Some(&trace), &["getBoardState", "arrangeObjects"], 900)
            .await
            .unwrap();

        assert_eq!(summary.objects_affected, 1);
        assert_eq!(sink.traces(), vec![trace.clone()]);
        let scores = sink.scores();
        assert_eq!(scores.len(), 6);
        assert!(scores.iter().all(|(id, _)| *id == trace.trace_id));
        assert_eq!(scores[0].1, Score { name: "tool_call_count".into(), value: 2.0 });
    }

    #[tokio::test]
    async fn begin_does_not_contact_sink() {
        let sink = Arc::new(MemorySink::new());
        let recorder = TelemetryRecorder::new(sink.clone());

        let trace = recorder.begin("b1", "create", "m").unwrap();
        assert!(sink.traces().is_empty());
        recorder.publish(&trace).await;
        assert_eq!(sink.traces(), vec![trace]);
    }

    #[tokio::test]
    async fn close_without_handle_sends_nothing() {
        let sink = Arc::new(MemorySink::new());
        let recorder = TelemetryRecorder::new(sink.clone());
        assert!(recorder.close(None, &["createShape"], 1).await.is_none());
        assert!(sink.scores().is_empty());
    }

    /// Rejects every call, counting attempts.
    #[derive(Default)]
    struct FailingSink {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl TelemetrySink for FailingSink {
        async fn create_trace(&self, _trace: &TraceHandle) -> Result<(), TelemetryError> {
            Err(TelemetryError::Request("offline".into()))
        }
        async fn post_score(&self, _trace_id: &str, _score: &Score) -> Result<(), TelemetryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(TelemetryError::Rejected { status: 500, body: "boom".into() })
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed_and_every_score_attempted() {
        let sink = Arc::new(FailingSink::default());
        let recorder = TelemetryRecorder::new(sink.clone());

        let trace = recorder.open("b1", "query", "m").await;
        assert!(trace.is_some());
        let summary = recorder.close(trace.as_ref(), &["getBoardState"], 3).await;
        assert!(summary.is_some());
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 6);
    }
}
