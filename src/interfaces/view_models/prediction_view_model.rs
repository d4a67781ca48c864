use crate::application::system::PredictionRun;
use crate::domain::errors::{ErrorCategory, PipelineError};
use crate::domain::ml::PredictionReport;
use crate::domain::ml::feature_registry::named_features;
use crate::interfaces::theme::Palette;
use eframe::egui;

/// Display-ready result of a successful run
#[derive(Debug, Clone)]
pub struct PredictionViewModel {
    pub report: PredictionReport,
    /// Test segment as (day index, return) points, index 0 = first test day
    pub actual_points: Vec<[f64; 2]>,
    pub predicted_points: Vec<[f64; 2]>,
    pub first_test_date: Option<String>,
    pub last_test_date: Option<String>,
    pub features: Vec<(&'static str, f64)>,
    pub informative: bool,
    /// Percentage of dataset rows the model was trained on
    pub train_pct: usize,
}

impl PredictionViewModel {
    pub fn from_run(run: &PredictionRun, train_pct: usize) -> Self {
        let evaluation = &run.evaluation;
        let to_points = |values: &[f64]| -> Vec<[f64; 2]> {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| [i as f64, *v])
                .collect()
        };

        Self {
            report: run.report(),
            actual_points: to_points(&evaluation.test_actuals),
            predicted_points: to_points(&evaluation.test_predictions),
            first_test_date: evaluation.test_dates.first().map(|d| d.to_string()),
            last_test_date: evaluation.test_dates.last().map(|d| d.to_string()),
            features: named_features(&run.snapshot.features),
            informative: evaluation.is_informative(),
            train_pct,
        }
    }

    pub fn predicted_return_text(&self) -> String {
        format!("{:+.3}%", self.report.pred_next_return * 100.0)
    }

    pub fn predicted_return_color(&self) -> egui::Color32 {
        if self.report.pred_next_return >= 0.0 {
            Palette::GAIN
        } else {
            Palette::LOSS
        }
    }

    pub fn verdict(&self) -> (&'static str, egui::Color32) {
        if self.informative {
            ("Model beats the zero-return baseline", Palette::GAIN)
        } else {
            (
                "Model does not beat the zero-return baseline",
                Palette::CAUTION,
            )
        }
    }
}

/// A failed run, reduced to what the window shows
#[derive(Debug, Clone, PartialEq)]
pub struct FailureViewModel {
    pub category: ErrorCategory,
    pub message: String,
}

impl FailureViewModel {
    pub fn title(&self) -> String {
        format!("Error [{}]", self.category)
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self.category {
            ErrorCategory::Configuration => {
                Some("Check the ticker, the date range and your API keys.")
            }
            ErrorCategory::DataInsufficiency => Some("Try a longer date range."),
            ErrorCategory::Source | ErrorCategory::Internal => None,
        }
    }
}

impl From<&PipelineError> for FailureViewModel {
    fn from(err: &PipelineError) -> Self {
        Self {
            category: err.category(),
            message: err.to_string(),
        }
    }
}

/// How the walk-forward split and the MAE comparison work, for a given split
pub fn split_explanation(train_pct: usize) -> String {
    format!(
        "The model trains on the first {}% of days and is scored on the last {}%, \
         never shuffled. MAE is the mean absolute error of the predicted daily return. \
         The baseline always predicts 0%; the model is only useful if its MAE is lower.",
        train_pct,
        100 - train_pct.min(100)
    )
}

/// Formats a feature value for the snapshot grid
pub fn format_feature(name: &str, value: f64) -> String {
    match name {
        "sma_10" | "sma_30" => format!("{:.2}", value),
        "rsi_14" => format!("{:.1}", value),
        _ => format!("{:+.4}%", value * 100.0),
    }
}
