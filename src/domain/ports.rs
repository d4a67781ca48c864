use crate::domain::errors::PipelineError;
use crate::domain::market::BarSeries;
use crate::domain::ml::types::FeatureRow;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Provider of daily OHLCV bars.
///
/// Implementations return the bars for `symbol` dated within `[start, end]`,
/// and must report a transport or auth failure as `PipelineError::Source`
/// and a successful call with zero bars as `PipelineError::EmptyData`.
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, PipelineError>;

    fn name(&self) -> &str;
}

/// A fitted regression model mapping feature rows to next-day returns
pub trait ReturnModel: Send + Sync {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;
}

/// A regression algorithm that can be fitted on a feature matrix.
///
/// Fitting twice on identical data must yield models with identical predictions.
pub trait ReturnLearner: Send + Sync {
    fn fit(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<Box<dyn ReturnModel>>;

    /// Get model name/type
    fn name(&self) -> &str;
}
