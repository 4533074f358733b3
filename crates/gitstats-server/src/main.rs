use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gitstats_core::Config;
use gitstats_server::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gitstats")]
#[command(version, about = "GitHub repository and organization stats over HTTP", long_about = None)]
struct Cli {
    /// Config file to use instead of ./gitstats.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitstats=info,gitstats_server=info,gitstats_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if config.github_token().is_none() {
        tracing::warn!("No GitHub token configured, unauthenticated requests are limited to 60 per hour");
    }

    let state = AppState::from_config(&config).context("Failed to build GitHub client")?;
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
