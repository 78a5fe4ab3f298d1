use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, ServeOptions};
use dxreport_core::config::parse_env_value;
use dxreport_core::constants::{self, env};
use dxreport_core::files::UploadDirectory;
use dxreport_core::store::SqliteSubmissionStore;
use dxreport_core::summariser::OpenAiSummariser;
use dxreport_core::{CoreConfig, SubmissionService};

/// Main entry point for the DXReport server
///
/// Resolves configuration once, opens the upload directory and the submission store, builds
/// the summariser client, and serves the REST API and browser client on one port until
/// interrupted.
///
/// # Environment Variables
/// - `PORT`: Listen port (default: 3000)
/// - `DATABASE_URL`: Submission store (default: "sqlite://submissions.db")
/// - `OPENAI_API_KEY`: Summariser credential (required)
/// - `OPENAI_BASE_URL`, `OPENAI_MODEL`, `SUMMARY_MAX_TOKENS`, `SUMMARISER_TIMEOUT_SECS`
/// - `UPLOAD_DIR`: Report file directory (default: "uploads")
/// - `FRONTEND_DIR`: Browser client directory (default: "frontend")
/// - `MAX_UPLOAD_BYTES`: Request body limit (default: 10 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a setting is missing or malformed,
/// - the upload directory or the store cannot be opened, or
/// - the listen address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dxreport_run=info".parse()?)
                .add_directive("dxreport_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_lookup(|name| std::env::var(name).ok())?;

    let port: u16 = parse_env_value(
        env::PORT,
        std::env::var(env::PORT).ok(),
        constants::DEFAULT_PORT,
    )?;
    let max_upload_bytes: usize = parse_env_value(
        env::MAX_UPLOAD_BYTES,
        std::env::var(env::MAX_UPLOAD_BYTES).ok(),
        constants::DEFAULT_MAX_UPLOAD_BYTES,
    )?;
    if max_upload_bytes == 0 {
        anyhow::bail!("{} must be greater than zero", env::MAX_UPLOAD_BYTES);
    }
    let frontend_dir = PathBuf::from(
        std::env::var(env::FRONTEND_DIR).unwrap_or_else(|_| constants::DEFAULT_FRONTEND_DIR.into()),
    );
    let frontend_dir = if frontend_dir.is_dir() {
        Some(frontend_dir)
    } else {
        tracing::warn!(
            "Frontend directory {} not found, serving the API only",
            frontend_dir.display()
        );
        None
    };

    let blobs = Arc::new(UploadDirectory::open_or_create(cfg.upload_dir())?);
    let store = Arc::new(SqliteSubmissionStore::open(cfg.database_url())?);
    let summariser = Arc::new(OpenAiSummariser::new(cfg.openai())?);
    tracing::info!(
        "Summariser model {} at {}",
        summariser.model(),
        cfg.openai().base_url()
    );

    let service = SubmissionService::with_config(&cfg, store, summariser, blobs.clone());
    let app = api_rest::router(
        AppState::new(service),
        &ServeOptions {
            upload_dir: blobs.root_directory().to_path_buf(),
            frontend_dir,
            max_upload_bytes,
        },
    );

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("++ Starting DXReport on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- DXReport stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
