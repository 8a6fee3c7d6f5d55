use anyhow::Result;
use clap::Parser;
use loqa_transcribe::upstream::WsConnector;
use loqa_transcribe::{create_router, AppState, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "loqa-transcribe", about = "Realtime transcription relay")]
struct Args {
    /// Configuration file (TOML; the extension may be omitted)
    #[arg(long, default_value = "config/loqa-transcribe")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut cfg = Config::load(&args.config)?;
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v0.1.0", cfg.service.name);
    info!("Upstream recognition service: {}", cfg.upstream.url);
    info!(
        "Audio format: PCM16 {} Hz, {} channel(s)",
        cfg.upstream.sample_rate, cfg.upstream.channels
    );
    if cfg.upstream.api_key.is_empty() {
        warn!("Upstream API key is not set; transcription sessions will fail to open");
    }

    let connector = Arc::new(WsConnector::new(&cfg.upstream));
    let bind = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);

    let state = AppState::new(cfg, connector);
    let app = create_router(state);

    let addr: SocketAddr = bind.parse()?;
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
