use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use recoverd::consts::{
    DEFAULT_ENGINE_PROGRAM, DEFAULT_MAX_CONCURRENT, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    default_engine_args,
};
use recoverd::engine::process::{EngineConfig, ProcessEngine};
use recoverd::server::{self, AppState};

#[derive(Parser)]
#[command(
    name = "recoverd",
    version,
    about = "HTTP front-end for a line-oriented wallet recovery engine."
)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Recovery engine program
    #[arg(long, default_value = DEFAULT_ENGINE_PROGRAM)]
    engine: PathBuf,

    /// Argument passed to the engine (repeatable; the recovery input
    /// itself is delivered over stdin, not the argument list)
    #[arg(long = "engine-arg", default_values_t = default_engine_args())]
    engine_args: Vec<String>,

    /// Working directory for the engine
    #[arg(short, long)]
    work_dir: Option<PathBuf>,

    /// Engine timeout in seconds, measured from spawn
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Maximum number of concurrent engine processes
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    max_concurrent: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,tower=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let engine = ProcessEngine::new(EngineConfig {
        program: cli.engine,
        args: cli.engine_args,
        working_dir: cli.work_dir,
        timeout: Duration::from_secs(cli.timeout),
    });
    let state = Arc::new(AppState::new(Arc::new(engine), cli.max_concurrent));

    // The presentation layer is served elsewhere; allow it to call us.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);
    let app = server::routes(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cli.port)).await?;
    info!("recoverd listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
