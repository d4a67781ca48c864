use chrono::NaiveDate;
use market_predict::application::ml::{DatasetAssembler, compute_features};
use market_predict::application::system::{Application, PredictionRequest};
use market_predict::config::{Config, SourceMode};
use market_predict::domain::errors::{ErrorCategory, PipelineError};
use market_predict::domain::market::BarSeries;
use market_predict::domain::ports::BarSource;
use market_predict::infrastructure::alpaca::AlpacaCredentials;
use market_predict::infrastructure::mock::MockBarSource;
use std::sync::Arc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_config() -> Config {
    Config::from_lookup(&|name| match name {
        "FOREST_TREES" => Some("40".to_string()),
        _ => None,
    })
    .expect("defaults parse")
}

fn app_with(source: &MockBarSource) -> Application {
    let source = source.clone();
    Application::build_with(test_config(), move |_| {
        Ok(Arc::new(source) as Arc<dyn BarSource>)
    })
    .expect("mock source builds")
}

#[tokio::test]
async fn test_monotone_ninety_day_series() -> anyhow::Result<()> {
    init_logging();

    let start = date(2024, 1, 1);
    let end = date(2024, 3, 30);
    let source = MockBarSource::new(MockBarSource::rising_bars(start, 90));

    // Features and dataset on their own
    let series = source.fetch("MONO", start, end).await?;
    assert_eq!(series.len(), 90);
    let extended = compute_features(&series);
    assert_eq!(extended.len(), 90);
    for row in extended.iter().skip(1) {
        assert!(row.close_return.unwrap() > 0.0);
    }
    for row in extended.iter().skip(30) {
        assert_eq!(row.rsi_14, Some(100.0));
    }
    let dataset = DatasetAssembler::default().assemble(&extended)?;
    assert_eq!(dataset.len(), 59);

    // Full run
    let app = app_with(&source);
    let request = PredictionRequest::new("mono", start, end)?;
    let run = app.run(&request).await?;

    assert_eq!(run.dataset_rows, 59);
    assert_eq!(run.evaluation.n_train, 47);
    assert_eq!(run.evaluation.n_test, 12);
    assert_eq!(run.evaluation.test_dates.len(), 12);

    let actuals = &run.evaluation.test_actuals;
    assert!(actuals.iter().all(|r| *r > 0.0));
    let mean_return = actuals.iter().map(|r| r.abs()).sum::<f64>() / actuals.len() as f64;
    assert_eq!(run.evaluation.mae_baseline, mean_return);

    // The last bar has no next day, so it is only used for the live prediction
    let report = run.report();
    assert_eq!(report.as_of_date, date(2024, 3, 30));
    assert_eq!(report.ticker, "MONO");
    assert!(report.pred_next_return.is_finite());

    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_are_identical() -> anyhow::Result<()> {
    init_logging();

    let start = date(2023, 1, 1);
    let source = MockBarSource::new(MockBarSource::random_walk_bars(start, 250, 11));
    let app = app_with(&source);
    let request = PredictionRequest::new("WALK", start, date(2023, 12, 31))?;

    let first = app.run(&request).await?;
    let second = app.run(&request).await?;

    assert_eq!(first.report(), second.report());
    assert_eq!(
        first.evaluation.test_predictions,
        second.evaluation.test_predictions
    );
    assert_eq!(source.fetch_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_short_range_reports_row_count() {
    init_logging();

    let start = date(2024, 1, 1);
    let source = MockBarSource::new(MockBarSource::rising_bars(start, 70));
    let app = app_with(&source);
    let request = PredictionRequest::new("SHORT", start, date(2024, 12, 31)).unwrap();

    let err = app.run(&request).await.unwrap_err();

    match &err {
        PipelineError::InsufficientData { actual, required } => {
            assert_eq!(*actual, 70 - 30 - 1);
            assert_eq!(*required, 50);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
    assert_eq!(err.category(), ErrorCategory::DataInsufficiency);
    assert!(err.to_string().contains("39"));
}

#[tokio::test]
async fn test_missing_credentials_never_fetch() {
    init_logging();

    let source = MockBarSource::new(MockBarSource::rising_bars(date(2024, 1, 1), 120));
    let mut config = test_config();
    config.source = SourceMode::Alpaca;

    // Same credential gate as the Alpaca source, in front of a counting source
    let gated = source.clone();
    let result = Application::build_with(config.clone(), move |config| {
        AlpacaCredentials::from_config(&config.alpaca)?;
        Ok(Arc::new(gated) as Arc<dyn BarSource>)
    });
    let err = result.err().expect("missing keys must be rejected");
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(err.to_string().contains("ALPACA_API_KEY"));
    assert_eq!(source.fetch_count(), 0);

    // The real factory rejects the same configuration
    let err = Application::build(config).err().expect("missing keys must be rejected");
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn test_empty_range_is_data_insufficiency() {
    init_logging();

    let source = MockBarSource::new(MockBarSource::rising_bars(date(2024, 1, 1), 120));
    let app = app_with(&source);
    let request = PredictionRequest::new("NVDA", date(2019, 1, 1), date(2019, 6, 1)).unwrap();

    let err = app.run(&request).await.unwrap_err();
    assert!(matches!(err, PipelineError::EmptyData { .. }));
    assert_eq!(err.category(), ErrorCategory::DataInsufficiency);
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_source_failure_is_source_error() {
    init_logging();

    let source = MockBarSource::failing("connection reset by peer");
    let app = app_with(&source);
    let request = PredictionRequest::new("NVDA", date(2024, 1, 1), date(2024, 6, 1)).unwrap();

    let err = app.run(&request).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Source);
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn test_invalid_requests_rejected_before_fetch() {
    let empty = PredictionRequest::new("", date(2024, 1, 1), date(2024, 6, 1)).unwrap_err();
    assert_eq!(empty.category(), ErrorCategory::Configuration);

    let inverted = PredictionRequest::new("NVDA", date(2024, 6, 1), date(2024, 1, 1)).unwrap_err();
    assert_eq!(inverted.category(), ErrorCategory::Configuration);
}

#[test]
fn test_series_is_sorted_and_deduplicated() {
    let start = date(2024, 1, 1);
    let mut bars = MockBarSource::rising_bars(start, 5);
    bars.reverse();
    let mut duplicate = bars[0];
    duplicate.close = 999.0;
    bars.push(duplicate);

    let series = BarSeries::new(bars);
    assert_eq!(series.len(), 5);
    assert_eq!(series.first_date(), Some(start));
    assert_eq!(series.bars()[4].close, 999.0);
}
