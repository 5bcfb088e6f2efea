//! Language-model provider implementations for Orim.
//!
//! All providers implement the `orim_core::Provider` trait.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use orim_config::AppConfig;
use orim_core::Provider;
use std::sync::Arc;

/// Build the process-wide provider from configuration.
///
/// A missing key is not fatal: the server still answers `/health`, and chat
/// requests fail with an authentication error event.
pub fn from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let api_key = config.anthropic.api_key.clone().unwrap_or_else(|| {
        tracing::warn!("No Anthropic API key configured (ANTHROPIC_API_KEY or CLAUDE_KEY)");
        String::new()
    });
    Arc::new(AnthropicProvider::new(api_key).with_base_url(config.anthropic.base_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_anthropic_provider() {
        let provider = from_config(&AppConfig::default());
        assert_eq!(provider.name(), "anthropic");
    }
}
