//! `orim-agent serve`: start the HTTP server.

use orim_config::AppConfig;

pub async fn run(port: Option<u16>, host: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port {
        config.gateway.port = port;
    }
    if let Some(host) = host {
        config.gateway.host = host;
    }

    println!("Orim agent gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.default_model);
    println!("   Store:     {}", if config.supabase.credentials().is_some() { "supabase" } else { "in-memory" });
    println!("   Langfuse:  {}", if config.langfuse.keys().is_some() { "enabled" } else { "disabled" });

    orim_gateway::start(config).await?;

    Ok(())
}
