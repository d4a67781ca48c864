use chrono::{Duration, NaiveDate};
use market_predict::application::ml::segment_export::export_segment;
use market_predict::application::system::{Application, PredictionRequest};
use market_predict::config::{Config, ModelKind, SourceMode};
use market_predict::domain::errors::ErrorCategory;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_bars(count: usize) -> NamedTempFile {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    for i in 0..count {
        let close = 100.0 + (i as f64 * 0.4).sin() * 4.0 + i as f64 * 0.05;
        writeln!(
            file,
            "{},{:.4},{:.4},{:.4},{:.4},{}",
            start + Duration::days(i as i64),
            close - 0.2,
            close + 1.1,
            close - 1.3,
            close,
            1_000_000 + (i % 7) * 25_000
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

/// Replaces the close on line `day` (0-based, after the header)
fn with_close(file: &NamedTempFile, day: usize, close: &str) -> NamedTempFile {
    let contents = std::fs::read_to_string(file.path()).unwrap();
    let mut out = NamedTempFile::new().unwrap();
    for (i, line) in contents.lines().enumerate() {
        if i == day + 1 {
            let mut cols: Vec<&str> = line.split(',').collect();
            cols[4] = close;
            writeln!(out, "{}", cols.join(",")).unwrap();
        } else {
            writeln!(out, "{}", line).unwrap();
        }
    }
    out.flush().unwrap();
    out
}

fn csv_config(file: &NamedTempFile, kind: ModelKind) -> Config {
    let mut config = Config::from_lookup(&|name| match name {
        "FOREST_TREES" => Some("30".to_string()),
        _ => None,
    })
    .unwrap();
    config.source = SourceMode::Csv(file.path().to_path_buf());
    config.model.kind = kind;
    config
}

#[tokio::test]
async fn test_csv_run_needs_no_credentials() -> anyhow::Result<()> {
    let file = write_bars(160);
    let app = Application::build(csv_config(&file, ModelKind::Forest))?;
    assert_eq!(app.source.name(), "CSV");

    let request = PredictionRequest::new(
        "demo",
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )?;
    let run = app.run(&request).await?;
    let report = run.report();

    // 160 bars, 30 warm-up rows, one unlabelled final row
    assert_eq!(run.dataset_rows, 129);
    assert_eq!(report.n_train + report.n_test, 129);
    assert_eq!(report.n_train, 103);
    assert_eq!(
        report.as_of_date,
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Duration::days(159)
    );

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["ticker"], "DEMO");
    assert!(json["mae_model"].is_number());
    Ok(())
}

#[tokio::test]
async fn test_linear_learner_and_export() -> anyhow::Result<()> {
    let file = write_bars(120);
    let app = Application::build(csv_config(&file, ModelKind::Linear))?;
    assert_eq!(app.learner.name(), "SmartCore Linear Regression");

    let request = PredictionRequest::new(
        "DEMO",
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )?;
    let run = app.run(&request).await?;

    let dir = TempDir::new()?;
    let path = dir.path().join("segments").join("test.csv");
    export_segment(&path, &run.evaluation)?;

    let contents = std::fs::read_to_string(&path)?;
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,actual,predicted"));
    assert_eq!(lines.count(), run.evaluation.n_test);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_source_error() {
    let mut config = Config::from_lookup(&|_| None).unwrap();
    config.source = SourceMode::Csv("/nonexistent/market_predict/bars.csv".into());
    let app = Application::build(config).unwrap();

    let request = PredictionRequest::new(
        "DEMO",
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .unwrap();
    let err = app.run(&request).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Source);
}

#[tokio::test]
async fn test_nan_close_fails_instead_of_training() {
    for (day, close) in [(40, "NaN"), (150, "NaN"), (40, "-5.0")] {
        let file = with_close(&write_bars(160), day, close);
        let app = Application::build(csv_config(&file, ModelKind::Forest)).unwrap();

        let request = PredictionRequest::new(
            "DEMO",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
        .unwrap();
        let err = app.run(&request).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Source);
        assert!(format!("{:#}", err).contains("Malformed bar"));
    }
}
