use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use match_lens::api::state::AppState;
use match_lens::cache::TtlCache;
use match_lens::config::AppConfig;
use match_lens::service::MatchService;
use match_lens::upstream::{ClientConfig, UpstreamClient};

#[derive(Parser)]
#[command(name = "match-lens")]
#[command(about = "Live match lookup with per-participant league standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Look up a summoner's current match once and print it as JSON
    Lookup {
        /// Region code (e.g. "euw1")
        #[arg(long)]
        region: String,

        /// Summoner name
        #[arg(long)]
        name: String,
    },
}

fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let config = AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    } else {
        tracing::info!("No config file at {}, using defaults", path.display());
        Ok(AppConfig::default())
    }
}

fn build_service(config: &AppConfig) -> Result<MatchService> {
    let token = config.read_token()?;

    let cache = TtlCache::new(config.cache_ttl()?);
    cache.spawn_janitor(config.cache_cleanup_interval()?);

    let client_config = ClientConfig {
        hosts: config.upstream.regions.clone(),
        timeout: config.upstream_timeout(),
        retry: config.retry_policy(),
        ..Default::default()
    };
    let client = UpstreamClient::new(client_config, token, Arc::new(cache))?;
    tracing::info!(
        "Upstream regions: {}",
        client.regions().collect::<Vec<_>>().join(", ")
    );

    Ok(MatchService::with_concurrency(
        Arc::new(client),
        config.fanout.max_concurrency,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting match-lens v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.config)?;
    let service = build_service(&config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                match_service: service,
            };
            let app = match_lens::api::build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Lookup { region, name } => {
            let aggregated = service.find_current_match(&region, &name).await?;
            if !aggregated.is_complete() {
                tracing::warn!(
                    "{} of {} participants could not be enriched",
                    aggregated.dropped,
                    aggregated.participants
                );
            }
            println!("{}", serde_json::to_string_pretty(&aggregated)?);
        }
    }

    Ok(())
}
