use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini_coding::{assistant::Assistant, config::Config, mcp};

#[derive(Parser)]
#[command(name = "gcmcp", version)]
#[command(about = "Gemini-backed coding assistant commands over MCP")]
struct Cli {
    /// Path to a JSON config file (default: <config dir>/gemini-coding/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never read the clipboard as an input source
    #[arg(long, global = true)]
    no_clipboard: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server via stdio (default; for IDE assistant integration)
    Mcp,
    /// Start MCP server over streamable HTTP at /mcp
    Serve {
        /// Port for HTTP transport
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Print the effective configuration (API key redacted)
    Config,
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "gemini_coding=info,tower_http=info".into()),
    );

    if use_stderr {
        // stdio mode: stdout is the protocol channel
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, None | Some(Commands::Mcp));
    init_tracing(use_stderr);

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_clipboard {
        config.clipboard = false;
    }

    match cli.command {
        None | Some(Commands::Mcp) => {
            if config.api_key.is_none() {
                tracing::warn!("GEMINI_API_KEY is not set; generation commands will fail");
            }
            let assistant = Arc::new(Assistant::from_config(&config));
            mcp::run_stdio_server(assistant).await?;
        }
        Some(Commands::Serve { port }) => {
            let assistant = Arc::new(Assistant::from_config(&config));
            mcp::run_http_server(assistant, port).await?;
        }
        Some(Commands::Config) => {
            println!("{}", config.to_redacted_json()?);
        }
    }

    Ok(())
}
