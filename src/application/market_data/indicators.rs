//! Streaming technical indicators for daily bars.
//!
//! Each indicator consumes one observation per call to `next` and only ever
//! sees observations that have already been pushed, so the value returned for
//! day t cannot depend on any later day.

use super::sliding_window::SlidingWindow;

/// Ratio guard: any non-finite result is treated as undefined
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Day-over-day relative change: `x(t) / x(t-1) - 1`
#[derive(Debug, Clone, Default)]
pub struct PercentChange {
    prev: Option<f64>,
}

impl PercentChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, value: f64) -> Option<f64> {
        let change = self.prev.and_then(|prev| finite(value / prev - 1.0));
        self.prev = Some(value);
        change
    }
}

/// Arithmetic mean over the trailing `period` values
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: SlidingWindow,
}

impl SimpleMovingAverage {
    pub fn new(period: usize) -> Self {
        Self {
            window: SlidingWindow::new(period),
        }
    }

    pub fn next(&mut self, value: f64) -> Option<f64> {
        self.window.push(Some(value));
        self.window.mean().and_then(finite)
    }
}

/// Sample standard deviation over the trailing `period` values of a series
/// that may itself be undefined on some days (e.g. returns on day one)
#[derive(Debug, Clone)]
pub struct RollingVolatility {
    window: SlidingWindow,
}

impl RollingVolatility {
    pub fn new(period: usize) -> Self {
        Self {
            window: SlidingWindow::new(period),
        }
    }

    pub fn next(&mut self, value: Option<f64>) -> Option<f64> {
        self.window.push(value);
        self.window.sample_std_dev()
    }
}

/// Relative Strength Index from simple (not Wilder-smoothed) averages of
/// gains and losses over the trailing `period` close-to-close changes.
///
/// Resolves to exactly 100 whenever the ratio is undefined: no losing day in
/// the window, or not yet `period` changes of history.
#[derive(Debug, Clone)]
pub struct RelativeStrengthIndex {
    prev_close: Option<f64>,
    gains: SlidingWindow,
    losses: SlidingWindow,
}

impl RelativeStrengthIndex {
    pub const NEUTRAL_FALLBACK: f64 = 100.0;

    pub fn new(period: usize) -> Self {
        Self {
            prev_close: None,
            gains: SlidingWindow::new(period),
            losses: SlidingWindow::new(period),
        }
    }

    pub fn next(&mut self, close: f64) -> f64 {
        if let Some(prev) = self.prev_close {
            let delta = close - prev;
            self.gains.push(Some(delta.max(0.0)));
            // Losses are stored as positive magnitudes
            self.losses.push(Some((-delta).max(0.0)));
        }
        self.prev_close = Some(close);

        match (self.gains.mean(), self.losses.mean()) {
            (Some(avg_gain), Some(avg_loss)) if avg_loss > 0.0 => {
                let rs = avg_gain / avg_loss;
                (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
            }
            _ => Self::NEUTRAL_FALLBACK,
        }
    }
}

/// Intraday range as a fraction of the close: `(high - low) / close`
pub fn range_pct(high: f64, low: f64, close: f64) -> Option<f64> {
    finite((high - low) / close)
}
