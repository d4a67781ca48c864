use crate::application::market_data::indicators::{
    PercentChange, RelativeStrengthIndex, RollingVolatility, SimpleMovingAverage, range_pct,
};
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ml::FeatureBar;

pub const VOLATILITY_PERIOD: usize = 14;
pub const SMA_FAST_PERIOD: usize = 10;
pub const SMA_SLOW_PERIOD: usize = 30;
pub const RSI_PERIOD: usize = 14;

/// Longest trailing window used by any feature
pub const LONGEST_WINDOW: usize = SMA_SLOW_PERIOD;

/// Bar-by-bar feature computation.
///
/// Bars must be fed in ascending date order. The engine keeps one sliding
/// buffer per column, so the row it returns for a bar depends on that bar
/// and the ones fed before it.
pub struct DailyFeatureEngine {
    close_change: PercentChange,
    volume_change: PercentChange,
    volatility: RollingVolatility,
    sma_fast: SimpleMovingAverage,
    sma_slow: SimpleMovingAverage,
    rsi: RelativeStrengthIndex,
}

impl DailyFeatureEngine {
    pub fn new() -> Self {
        Self {
            close_change: PercentChange::new(),
            volume_change: PercentChange::new(),
            volatility: RollingVolatility::new(VOLATILITY_PERIOD),
            sma_fast: SimpleMovingAverage::new(SMA_FAST_PERIOD),
            sma_slow: SimpleMovingAverage::new(SMA_SLOW_PERIOD),
            rsi: RelativeStrengthIndex::new(RSI_PERIOD),
        }
    }

    /// Returns the causal columns for `bar`; `target` is left undefined.
    pub fn next(&mut self, bar: &Bar) -> FeatureBar {
        let close_return = self.close_change.next(bar.close);

        FeatureBar {
            bar: *bar,
            close_return,
            vol_14: self.volatility.next(close_return),
            sma_10: self.sma_fast.next(bar.close),
            sma_30: self.sma_slow.next(bar.close),
            rsi_14: Some(self.rsi.next(bar.close)),
            volume_change: self.volume_change.next(bar.volume),
            range_pct: range_pct(bar.high, bar.low, bar.close),
            target: None,
        }
    }
}

impl Default for DailyFeatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Extends every bar with its feature columns and the next-day target.
///
/// Row count and order match the input. All feature columns are causal.
/// `target(t)` is the single look-ahead column: it equals `close_return(t+1)`
/// and is undefined for the last bar.
pub fn compute_features(series: &BarSeries) -> Vec<FeatureBar> {
    let mut engine = DailyFeatureEngine::new();
    let mut rows: Vec<FeatureBar> = series.bars().iter().map(|bar| engine.next(bar)).collect();

    let next_returns: Vec<Option<f64>> = rows.iter().skip(1).map(|row| row.close_return).collect();
    for (row, next_return) in rows.iter_mut().zip(next_returns) {
        row.target = next_return;
    }

    rows
}
