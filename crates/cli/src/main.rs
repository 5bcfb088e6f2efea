//! Orim agent CLI, the main entry point.
//!
//! Commands:
//! - `serve`     Start the HTTP server
//! - `chat`      Run one chat turn against a board and print NDJSON
//! - `classify`  Print the command label for a message

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "orim-agent",
    about = "Orim canvas agent: natural-language whiteboard editing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Run one chat turn and print the event stream
    Chat {
        /// Board to operate on
        #[arg(short, long)]
        board: String,

        /// Ask for detailed explanations instead of one-line confirmations
        #[arg(long = "explain")]
        explain: bool,

        /// Override the model
        #[arg(short, long)]
        model: Option<String>,

        /// The message to send
        message: String,
    },

    /// Print the command label for a message
    Classify {
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so `chat` output stays pure NDJSON
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Chat {
            board,
            explain,
            model,
            message,
        } => commands::chat::run(board, message, explain, model).await?,
        Commands::Classify { text } => commands::classify::run(&text),
    }

    Ok(())
}
