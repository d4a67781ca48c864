use crate::domain::ml::types::FeatureRow;
use crate::domain::ports::ReturnModel;
use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of a walk-forward evaluation
pub struct EvaluationResult {
    pub model: Box<dyn ReturnModel>,
    pub test_dates: Vec<NaiveDate>,
    pub test_actuals: Vec<f64>,
    pub test_predictions: Vec<f64>,
    pub mae_model: f64,
    pub mae_baseline: f64,
    pub n_train: usize,
    pub n_test: usize,
}

impl EvaluationResult {
    /// True when the model beats the zero-return baseline
    pub fn is_informative(&self) -> bool {
        self.mae_model < self.mae_baseline
    }
}

impl std::fmt::Debug for EvaluationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationResult")
            .field("mae_model", &self.mae_model)
            .field("mae_baseline", &self.mae_baseline)
            .field("n_train", &self.n_train)
            .field("n_test", &self.n_test)
            .finish_non_exhaustive()
    }
}

/// Forward prediction from the most recent feature row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSnapshot {
    pub as_of_date: NaiveDate,
    pub features: FeatureRow,
    pub predicted_return: f64,
}

/// Output record of one run, shared by every surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub n_train: usize,
    pub n_test: usize,
    pub mae_model: f64,
    pub mae_baseline: f64,
    pub pred_next_return: f64,
    pub as_of_date: NaiveDate,
}
