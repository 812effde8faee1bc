use anyhow::Result;
use axum::Router;
use clap::Parser;
use lexis_core::{EngineConfig, IdfMode, StemmerKind};
use lexis_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Documents to index (JSON/JSONL file or directory)
    #[arg(long, default_value = "./docs")]
    input: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Query cache capacity (overrides the config file)
    #[arg(long, env = "LEXIS_CACHE_SIZE")]
    cache_size: Option<usize>,
    /// JSON engine config; flags take precedence
    #[arg(long, env = "LEXIS_CONFIG")]
    config: Option<String>,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
    /// Use the Snowball English stemmer instead of the suffix table
    #[arg(long, default_value_t = false)]
    porter: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(n) = args.cache_size { config.cache_capacity = n; }
    if args.smoothed_idf { config.idf = IdfMode::Smoothed; }
    if args.porter { config.stemmer = StemmerKind::Porter; }
    let app: Router = build_app(&args.input, &config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
