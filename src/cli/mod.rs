//! Command-line entry points
//!
//! Argument definitions and command bodies for the two executables:
//! `train-win-model` and `win-predictor-service`.

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::artifacts::save_artifacts;
use crate::data::load_dataset;
use crate::server::{run_server, ServerConfig};
use crate::training::{train, Penalty, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

// ─── CLI definition ────────────────────────────────────────────────────────────

/// Train the League of Legends win predictor
#[derive(Parser, Debug)]
#[command(name = "train-win-model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train a logistic-regression win predictor from match statistics")]
pub struct TrainArgs {
    /// CSV file with one row per match and a binary `win` column
    #[arg(long, default_value = "data/league_of_legends_data.csv")]
    pub dataset: PathBuf,

    /// Directory receiving the pipeline and metadata
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Fraction of rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Seed for the stratified split
    #[arg(long, default_value_t = 42)]
    pub random_state: u64,

    /// Inverse regularization strength
    #[arg(long = "C", default_value_t = 1.0)]
    pub c: f64,

    /// Solver iteration cap
    #[arg(long, default_value_t = 1000)]
    pub max_iter: usize,

    /// Regularization penalty (l2 or none)
    #[arg(long, default_value = "l2")]
    pub penalty: Penalty,

    /// Gradient tolerance for convergence
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,
}

impl TrainArgs {
    pub fn to_config(&self) -> TrainingConfig {
        TrainingConfig::new()
            .with_test_size(self.test_size)
            .with_random_state(self.random_state)
            .with_penalty(self.penalty)
            .with_c(self.c)
            .with_max_iter(self.max_iter)
            .with_tol(self.tol)
    }
}

/// Serve win predictions over HTTP
#[derive(Parser, Debug)]
#[command(name = "win-predictor-service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve win probabilities from a trained pipeline")]
pub struct ServeArgs {
    /// Directory holding lol_win_pipeline.bin and metadata.json
    #[arg(long, env = "ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Bind address
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(args: &TrainArgs) -> anyhow::Result<()> {
    section("Train");
    let config = args.to_config();
    config.validate()?;

    step_run("Loading data");
    let start = Instant::now();
    let dataset = load_dataset(&args.dataset)?;
    step_done(&format!(
        "{} rows × {} features in {:?}",
        dataset.n_rows(),
        dataset.feature_order.len(),
        start.elapsed()
    ));

    step_run(&format!("Training {}", "logistic_regression".cyan()));
    let start = Instant::now();
    let outcome = train(&dataset, &config)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run("Saving artifacts");
    save_artifacts(
        &outcome.pipeline,
        &outcome.metrics,
        &dataset.feature_order,
        &dataset.target,
        &args.artifact_dir,
    )?;
    step_done(&args.artifact_dir.display().to_string());

    println!();
    println!("Artifacts saved to {}", args.artifact_dir.display());
    println!(
        "Validation metrics: {}",
        serde_json::to_string_pretty(&outcome.metrics)?
    );
    println!();

    Ok(())
}

pub async fn cmd_serve(args: &ServeArgs) -> anyhow::Result<()> {
    section("Win Predictor Service");
    println!("  {}", kv("Artifacts", &args.artifact_dir.display().to_string()));
    println!("  {}", kv("Web UI   ", &format!("http://{}:{}", args.host, args.port)));
    println!("  {}", kv("Health   ", &format!("http://{}:{}/health", args.host, args.port)));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let config = ServerConfig {
        host: args.host.clone(),
        port: args.port,
        artifact_dir: args.artifact_dir.clone(),
    };
    run_server(config).await
}
