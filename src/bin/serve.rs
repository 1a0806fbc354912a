//! `win-predictor-service`: HTTP prediction service

use clap::Parser;
use win_predictor::cli::{cmd_serve, ServeArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "win_predictor=info".into()),
        )
        .init();

    let args = ServeArgs::parse();
    cmd_serve(&args).await
}
