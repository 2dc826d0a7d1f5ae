//! Filegate - file-storage gateway with per-operation credentials

use clap::Parser;
use filegate_api::{run_server_with_shutdown, GatewayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "filegate")]
#[command(about = "HTTP gateway exposing a file-storage API over an object-storage backend")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "FILEGATE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "FILEGATE_PORT")]
    port: u16,

    /// Object-storage backend base URL (e.g. http://localhost:7070)
    #[arg(long, env = "FILEGATE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Storage resource (bucket) this gateway serves
    #[arg(long, default_value = "filegate", env = "FILEGATE_RESOURCE")]
    resource: String,

    /// Shared signing secret for scoped credentials
    #[arg(long, env = "FILEGATE_CREDENTIAL_SECRET")]
    credential_secret: Option<String>,

    /// Per-request backend timeout in seconds
    #[arg(long, default_value = "30", env = "FILEGATE_BACKEND_TIMEOUT")]
    backend_timeout: u64,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, env = "FILEGATE_MEMORY_STORE")]
    memory_store: bool,

    /// Enable debug logging
    #[arg(short, long, env = "FILEGATE_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("filegate_api={},tower_http=debug", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Filegate on {}:{}", args.host, args.port);
    tracing::info!("Storage resource: {}", args.resource);

    if let Some(ref url) = args.backend_url {
        tracing::info!("Storage backend: {}", url);
    }

    if args.memory_store {
        tracing::warn!("⚠️  Using in-memory storage - data will NOT persist!");
    }

    // Build configuration
    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        backend_url: args.backend_url,
        resource: args.resource,
        credential_secret: args.credential_secret,
        backend_timeout_secs: args.backend_timeout,
        use_memory_store: args.memory_store,
        ..Default::default()
    };

    // Run the server until ctrl-c
    run_server_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
