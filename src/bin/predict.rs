//! Market Predict batch runner
//!
//! Runs one prediction and prints the report as JSON on stdout. Logs go to
//! stderr so stdout stays machine-parseable.
//!
//! # Usage
//! ```sh
//! cargo run --bin predict -- --ticker NVDA --start 2022-01-01 --end 2024-12-31
//! cargo run --bin predict -- --ticker NVDA --start 2022-01-01 --end 2024-12-31 \
//!     --bars-csv data/nvda.csv --model linear --export-csv out/test_segment.csv
//! ```
//!
//! # Environment Variables
//! - `ALPACA_API_KEY`, `ALPACA_API_SECRET` - required unless `--bars-csv` is given
//! - `MODEL_KIND`, `FOREST_TREES`, `FOREST_SEED` - learner settings
//! - `RUST_LOG` - log filter (default: info)

use chrono::NaiveDate;
use clap::Parser;
use market_predict::application::ml::segment_export::export_segment;
use market_predict::application::system::{Application, PredictionRequest};
use market_predict::config::{Config, ModelKind, SourceMode};
use market_predict::domain::errors::{PipelineError, PipelineStage};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Next-day return prediction for one ticker", long_about = None)]
struct Args {
    /// Ticker symbol (e.g. NVDA)
    #[arg(short, long)]
    ticker: String,

    /// First calendar day of the range (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Last calendar day of the range (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Read bars from a local CSV file instead of Alpaca
    #[arg(long)]
    bars_csv: Option<PathBuf>,

    /// Learner: forest or linear (overrides MODEL_KIND)
    #[arg(long)]
    model: Option<String>,

    /// Write the test segment (date,actual,predicted) to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

fn parse_date(name: &str, raw: &str) -> Result<NaiveDate, PipelineError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        PipelineError::configuration(format!("Invalid --{} '{}': {} (expected YYYY-MM-DD)", name, raw, e))
    })
}

fn load_config(args: &Args) -> Result<Config, PipelineError> {
    let mut config =
        Config::from_env().map_err(|e| PipelineError::configuration(format!("{:#}", e)))?;

    if let Some(path) = &args.bars_csv {
        config.source = SourceMode::Csv(path.clone());
    }
    if let Some(raw) = &args.model {
        config.model.kind = raw
            .parse::<ModelKind>()
            .map_err(|e| PipelineError::configuration(e.to_string()))?;
    }
    Ok(config)
}

async fn run(args: Args) -> Result<(), PipelineError> {
    let request = PredictionRequest::new(
        &args.ticker,
        parse_date("start", &args.start)?,
        parse_date("end", &args.end)?,
    )?;
    let config = load_config(&args)?;

    let app = Application::build(config)?;
    let run = app.run(&request).await?;

    if let Some(path) = &args.export_csv {
        export_segment(path, &run.evaluation)
            .map_err(|e| PipelineError::internal(PipelineStage::Evaluation, e))?;
        info!("Test segment written to {:?}", path);
    }

    let json = serde_json::to_string_pretty(&run.report())
        .map_err(|e| PipelineError::internal(PipelineStage::Prediction, e))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error [internal]: Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("Error [{}]: {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}
