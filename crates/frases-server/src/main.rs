//! Frases server binary.
//!
//! Reads `frases.toml` (or the path given with `--config`), opens the
//! configured phrase store, and serves the pages, JSON API, and live feed
//! over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use frases_core::live::LiveFeed;
use frases_server::config::{Backend, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Frases phrase board server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "frases.toml")]
  config: PathBuf,

  /// Listen port; overrides the configuration.
  #[arg(short, long)]
  port: Option<u16>,
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

  let mut cfg = ServerConfig::load(&cli.config).context("failed to read configuration")?;
  if let Some(port) = cli.port {
    cfg.port = port;
  }

  let feed = LiveFeed::default();
  let app = match cfg.backend {
    Backend::File => {
      let store = frases_server::open_file_store(&cfg).await?;
      frases_server::app(Arc::new(store), feed)
    }
    Backend::Firestore => {
      let store = frases_server::open_firestore_store(&cfg.firestore).await?;
      frases_server::app(Arc::new(store), feed)
    }
  };

  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Servidor corriendo en http://{address}");

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
