use crate::domain::ml::EvaluationResult;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One test-segment day: realized vs predicted next-day return
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRecord {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

pub fn segment_records(result: &EvaluationResult) -> Vec<SegmentRecord> {
    result
        .test_dates
        .iter()
        .zip(&result.test_actuals)
        .zip(&result.test_predictions)
        .map(|((date, actual), predicted)| SegmentRecord {
            date: *date,
            actual: *actual,
            predicted: *predicted,
        })
        .collect()
}

/// Writes `date,actual,predicted` rows for the test segment
pub fn write_segment<W: Write>(writer: W, result: &EvaluationResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in segment_records(result) {
        wtr.serialize(record)
            .context("Failed to serialize test-segment record")?;
    }
    wtr.flush().context("Failed to flush test-segment CSV")?;
    Ok(())
}

pub fn export_segment(path: &Path, result: &EvaluationResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_segment(file, result)?;
    info!(
        "Exported {} test-segment rows to {:?}",
        result.test_dates.len(),
        path
    );
    Ok(())
}
