mod bot_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    botwire_config::BotwireConfig,
    botwire_gateway::{LogSink, botframework_config},
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "botwire", about = "Bot Framework webhook gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true, env = "BOTWIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Serve the webhook (default when no subcommand is provided).
    Serve,
    /// Request an access token with the configured credentials.
    Token,
    /// Post a text message into a conversation.
    Send {
        /// Service URL of the channel, as seen in inbound activities.
        #[arg(long)]
        service_url: String,
        #[arg(long)]
        conversation: String,
        #[arg(short, long)]
        text: String,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<BotwireConfig> {
    match &cli.config {
        Some(path) => botwire_config::load_config(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(botwire_config::discover_and_load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "botwire starting");

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
            let port = cli.port.unwrap_or(config.server.port);
            botwire_gateway::start_gateway(&bind, port, &config, Arc::new(LogSink)).await
        },
        Some(Commands::Token) => bot_commands::check_token(&botframework_config(&config)?).await,
        Some(Commands::Send {
            service_url,
            conversation,
            text,
        }) => {
            bot_commands::send_text(
                botframework_config(&config)?,
                &service_url,
                &conversation,
                &text,
            )
            .await
        },
    }
}
