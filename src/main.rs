use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use version_gateway::config::GatewayConfig;
use version_gateway::server::{AppState, router};
use version_gateway::version::resolver::VersionResolver;

#[derive(Parser)]
#[command(name = "version-gateway")]
#[command(version, about = "Redirect service for Minecraft version artifacts")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP listener to (overrides the config file)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Upstream manifest endpoint (overrides the config file)
    #[arg(long)]
    manifest_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str::<GatewayConfig>(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(manifest_url) = cli.manifest_url {
        config.manifest_url = manifest_url;
    }

    let resolver = VersionResolver::new(
        &config.manifest_url,
        Duration::from_secs(config.cache.ttl_secs),
    );
    let state = AppState::new(resolver, config.rate_limit.clone());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, upstream = %config.manifest_url, "version-gateway listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server terminated")
}
