use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use switchboard_server::{PresenceMode, RelayConfig, serve};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "WebRTC signaling relay: rooms, offers, answers and ICE candidates")]
struct Cli {
    /// JSON config file; flags and env vars override its values.
    #[arg(long, env = "SWITCHBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "SWITCHBOARD_HOST")]
    host: Option<IpAddr>,

    #[arg(short, long, env = "SWITCHBOARD_PORT")]
    port: Option<u16>,

    /// `arrival` or `roster`.
    #[arg(long, env = "SWITCHBOARD_PRESENCE")]
    presence: Option<PresenceMode>,

    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL", hide_env_values = true)]
    turn_credential: Option<String>,

    /// Tracing filter directive, e.g. `info` or `switchboard_server=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::from_file(path)?,
            None => RelayConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(presence) = self.presence {
            config.presence = presence;
        }
        if self.turn_url.is_some() {
            config.turn_url = self.turn_url;
        }
        if self.turn_username.is_some() {
            config.turn_username = self.turn_username;
        }
        if self.turn_credential.is_some() {
            config.turn_credential = self.turn_credential;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("Invalid log filter '{}'", directive))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    let config = cli.into_config().context("Failed to load configuration")?;
    info!(
        "Starting switchboard on {} ({} presence)",
        config.socket_addr(),
        config.presence
    );

    serve(config, shutdown_signal())
        .await
        .context("Signaling server failed")?;

    info!("Signaling server stopped");
    Ok(())
}
