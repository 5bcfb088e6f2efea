//! `orim-agent chat`: run one chat turn and print the NDJSON stream.

use std::io::Write;

use futures::StreamExt;
use orim_agent::{ChatMessage, ChatRequest, ChatService};
use orim_config::AppConfig;

pub async fn run(
    board_id: String,
    message: String,
    verbose: bool,
    model: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_model_key() {
        eprintln!();
        eprintln!("  WARNING: no valid Anthropic key configured (expected sk-ant-...).");
        eprintln!("  Set ANTHROPIC_API_KEY or CLAUDE_KEY, or add it to:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
    }

    let service = ChatService::from_config(&config);
    let request = ChatRequest {
        messages: vec![ChatMessage {
            role: "user".into(),
            content: message,
        }],
        board_id,
        verbose,
        model,
    };

    let mut stream = service.stream(request).await;
    let mut stdout = std::io::stdout();
    while let Some(line) = stream.lines.next().await {
        stdout.write_all(line.as_bytes())?;
        stdout.flush()?;
    }

    // Let the trace scores go out before the process exits
    if let Err(e) = stream.scored.await {
        tracing::warn!(error = %e, "Score submission task failed");
    }

    Ok(())
}
