use anyhow::Result;
use clap::Parser;

use lensbot::config::Config;
use lensbot::server;

/// Twilio WhatsApp webhook bridging image questions to a vision-capable
/// chat-completion API.
#[derive(Parser)]
#[command(name = "lensbot", version)]
struct Args {
    /// Interface to bind the webhook server to.
    #[arg(long, default_value = "0.0.0.0", env = "LENSBOT_HOST")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000, env = "LENSBOT_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Deployment convention: credentials come from a .env file when present.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = Config::from_env()?;

    server::run(&config, &args.host, args.port).await
}
