use crate::domain::market::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Causal technical indicators for one trading day.
///
/// Every field at date t is computed from bars dated t or earlier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRow {
    pub close_return: f64,
    pub vol_14: f64,
    pub sma_10: f64,
    pub sma_30: f64,
    /// Always within [0, 100]
    pub rsi_14: f64,
    pub volume_change: f64,
    pub range_pct: f64,
}

/// A bar extended with its derived columns.
///
/// `None` marks a value that is undefined at this date, either because a
/// rolling window has not warmed up yet or because a ratio had a zero
/// denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBar {
    pub bar: Bar,
    pub close_return: Option<f64>,
    pub vol_14: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_30: Option<f64>,
    pub rsi_14: Option<f64>,
    pub volume_change: Option<f64>,
    pub range_pct: Option<f64>,
    /// Next-day close-to-close return. The only column that looks ahead.
    pub target: Option<f64>,
}

impl FeatureBar {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    /// The feature row, if every feature column is defined
    pub fn features(&self) -> Option<FeatureRow> {
        Some(FeatureRow {
            close_return: self.close_return?,
            vol_14: self.vol_14?,
            sma_10: self.sma_10?,
            sma_30: self.sma_30?,
            rsi_14: self.rsi_14?,
            volume_change: self.volume_change?,
            range_pct: self.range_pct?,
        })
    }
}
