//! cadence server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `CADENCE_*` environment variables over it, and serves the JSON API over
//! HTTP. Nested keys use a double underscore, e.g. `CADENCE_JIRA__SERVER`.

use std::path::PathBuf;

use anyhow::Context as _;
use cadence_server::{AnySource, AppState, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cadence delivery analytics server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the configured port.
  #[arg(short, long)]
  port: Option<u16>,

  /// Check the configured data source and exit.
  #[arg(long)]
  check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("CADENCE")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read configuration")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  if let Some(port) = cli.port {
    server_cfg.port = port;
  }

  let source = AnySource::from_config(&server_cfg);
  if let Err(e) = source.check() {
    if cli.check {
      return Err(e).context("data source check failed");
    }
    tracing::warn!(source = %source.kind(), error = %e, "data source is not usable; requests will fail");
  }
  if cli.check {
    println!("data source {} ok", source.kind());
    return Ok(());
  }

  tracing::info!(
    source = %source.kind(),
    seed = server_cfg.seed,
    cache_ttl_secs = server_cfg.cache_ttl_secs,
    "starting"
  );

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(source, server_cfg);
  let app = cadence_server::router(state).layer(TraceLayer::new_for_http());

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
