use crate::domain::errors::PipelineError;
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ports::BarSource;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// In-memory bar source serving the same bars for any symbol.
///
/// Counts fetch attempts so callers can assert whether the source was reached.
#[derive(Clone)]
pub struct MockBarSource {
    bars: Arc<Vec<Bar>>,
    failure: Option<String>,
    fetch_count: Arc<AtomicUsize>,
}

impl MockBarSource {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self {
            bars: Arc::new(bars),
            failure: None,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose every fetch fails as if the remote rejected the call
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(Vec::new())
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Consecutive calendar days with a strictly rising close and constant volume
    pub fn rising_bars(start: NaiveDate, count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    date: start + Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000_000.0,
                }
            })
            .collect()
    }

    /// Deterministic pseudo-random walk (-0.5% to +0.5% per day)
    pub fn random_walk_bars(start: NaiveDate, count: usize, seed: u64) -> Vec<Bar> {
        let mut close = 150.0;
        (0..count)
            .map(|i| {
                let step = (seed + i as u64).wrapping_mul(1103515245).wrapping_add(12345);
                let random_val = (((step / 65536) % 1000) as f64 / 1000.0) - 0.5;
                let open = close;
                close *= 1.0 + random_val * 0.01;
                let volume_step = (step / 7919) % 500;
                Bar {
                    date: start + Duration::days(i as i64),
                    open,
                    high: open.max(close) * 1.004,
                    low: open.min(close) * 0.996,
                    close,
                    volume: 800_000.0 + volume_step as f64 * 1_000.0,
                }
            })
            .collect()
    }
}

#[async_trait]
impl BarSource for MockBarSource {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, PipelineError> {
        let attempt = self.fetch_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!("MockBarSource: fetch #{} for {}", attempt, symbol);

        if let Some(reason) = &self.failure {
            return Err(PipelineError::Source {
                symbol: symbol.to_string(),
                source: anyhow::anyhow!("{}", reason),
            });
        }

        let series = BarSeries::new(self.bars.to_vec()).restricted_to(start, end);
        if series.is_empty() {
            return Err(PipelineError::EmptyData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(series)
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
