// dataset-server main.rs
// HTTP API resolving file aliases and tags to public URLs

use dataset_core::ServiceConfig;
use dataset_server::build_router;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dataset_server=info,tower_http=info".into()),
        )
        .init();

    let mut config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    // Command line flags override the environment
    let args: Vec<String> = std::env::args().collect();
    if let Some(port) = flag_value(&args, "--port", "-p") {
        match port.parse() {
            Ok(port) => config.port = port,
            Err(e) => {
                tracing::error!("Invalid --port value {:?}: {}", port, e);
                return ExitCode::from(2);
            }
        }
    }
    if let Some(db) = flag_value(&args, "--database", "-d") {
        config.database_path = PathBuf::from(db);
    }

    tracing::info!("📁 Database: {:?}", config.database_path);
    tracing::info!("🔗 Base URL: {}", config.base_url);
    tracing::info!("📦 Max batch size: {}", config.max_batch_size);
    if !config.database_path.exists() {
        tracing::warn!(
            "Alias database {:?} does not exist yet; lookups will fail until it is created",
            config.database_path
        );
    }

    let app = build_router(&config);
    let addr = config.listen_addr();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::from(1);
        }
    };
    tracing::info!("🚀 Dataset server running at http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn flag_value<'a>(args: &'a [String], long: &str, short: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == long || a == short)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
