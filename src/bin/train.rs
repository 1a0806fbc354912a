//! `train-win-model`: fit the pipeline and write artifacts

use clap::Parser;
use win_predictor::cli::{cmd_train, TrainArgs};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "win_predictor=info".into()),
        )
        .init();

    let args = TrainArgs::parse();
    cmd_train(&args)
}
