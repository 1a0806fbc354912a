//! Win predictor HTTP service
//!
//! Serves the fitted pipeline loaded from an artifact directory: a small
//! web form at `/`, a health probe, and JSON predictions at `/predict`.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::prepare_features;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifact_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            artifact_dir: std::env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("artifacts")),
        }
    }
}

/// Load artifacts and serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let state = AppState::load(&config.artifact_dir).with_context(|| {
        format!(
            "Could not load model artifacts from {}",
            config.artifact_dir.display()
        )
    })?;
    info!(
        artifact_dir = %config.artifact_dir.display(),
        features = state.feature_order().len(),
        accuracy = state.metadata.test_metrics.accuracy,
        roc_auc = state.metadata.test_metrics.roc_auc,
        "Loaded model artifacts"
    );

    let app = create_router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        if std::env::var("API_PORT").is_err() {
            assert_eq!(config.port, 8000);
        }
        if std::env::var("ARTIFACT_DIR").is_err() {
            assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
        }
    }

    #[tokio::test]
    async fn test_run_server_requires_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            artifact_dir: dir.path().to_path_buf(),
        };
        let err = run_server(config).await.unwrap_err();
        assert!(format!("{:#}", err).contains("train-win-model"));
    }
}
