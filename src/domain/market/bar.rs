use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data for a single symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Rejects prices or volume that are NaN, infinite or negative
    pub fn validate(&self) -> anyhow::Result<()> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("Malformed bar on {}: {} is {}", self.date, name, value);
            }
        }
        Ok(())
    }
}

/// Date-indexed bar table.
///
/// Always sorted ascending by date with no duplicate dates. When the input
/// contains several bars for the same date the last one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps arrival order among equal dates, so the last arrival wins below.
        bars.sort_by_key(|bar| bar.date);

        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|bar| bar.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|bar| bar.date)
    }

    /// Keeps only bars dated within `[start, end]`
    pub fn restricted_to(self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            bars: self
                .bars
                .into_iter()
                .filter(|bar| bar.date >= start && bar.date <= end)
                .collect(),
        }
    }
}

impl From<Vec<Bar>> for BarSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}
