use crate::domain::errors::PipelineError;
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ports::BarSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct BarRecord {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<BarRecord> for Bar {
    fn from(record: BarRecord) -> Self {
        Bar {
            date: record.date,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        }
    }
}

/// Daily bars read from a local CSV file with a
/// `date,open,high,low,close,volume` header.
///
/// The file holds one symbol; the requested symbol is only used in messages.
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bars(&self) -> Result<Vec<Bar>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open bar file {:?}", self.path))?;
        let mut rdr = csv::Reader::from_reader(BufReader::new(file));

        let mut bars = Vec::new();
        for (line, result) in rdr.deserialize::<BarRecord>().enumerate() {
            // +2: header line and 1-based numbering
            let record = result.with_context(|| format!("Malformed bar at line {}", line + 2))?;
            let bar = Bar::from(record);
            bar.validate().with_context(|| format!("At line {}", line + 2))?;
            bars.push(bar);
        }
        Ok(bars)
    }
}

#[async_trait]
impl BarSource for CsvBarSource {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, PipelineError> {
        let bars = self.read_bars().map_err(|source| PipelineError::Source {
            symbol: symbol.to_string(),
            source,
        })?;

        let series = BarSeries::new(bars).restricted_to(start, end);
        if series.is_empty() {
            return Err(PipelineError::EmptyData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        info!(
            "CsvBarSource: Loaded {} daily bars for {} from {:?}",
            series.len(),
            symbol,
            self.path
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "CSV"
    }
}
