//! NDJSON framing for agent events.
//!
//! One JSON object per line, in arrival order, with exactly one
//! `{"type":"finish"}` as the last line.

use futures::stream::{self, Stream, StreamExt};

use crate::stream_event::AgentEvent;

/// Encode one event as a `\n`-terminated JSON line.
pub fn encode_line(event: &AgentEvent) -> String {
    match serde_json::to_string(event) {
        Ok(mut line) => {
            line.push('\n');
            line
        }
        Err(e) => {
            tracing::warn!(event = event.event_type(), error = %e, "Failed to encode event");
            let fallback = AgentEvent::Error { error: e.to_string() };
            serde_json::to_string(&fallback)
                .map(|line| line + "\n")
                .unwrap_or_else(|_| "{\"type\":\"error\",\"error\":\"encoding failed\"}\n".into())
        }
    }
}

/// Frame an event stream. Upstream `finish` events are dropped and a single
/// terminal one is appended once the upstream ends.
pub fn encode<S>(events: S) -> impl Stream<Item = String> + Send
where
    S: Stream<Item = AgentEvent> + Send,
{
    events
        .filter(|event| futures::future::ready(!event.is_finish()))
        .map(|event| encode_line(&event))
        .chain(stream::once(async { encode_line(&AgentEvent::Finish) }))
}
