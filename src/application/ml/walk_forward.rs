use crate::domain::errors::{PipelineError, PipelineStage};
use crate::domain::ml::{EvaluationResult, FeatureRow};
use crate::domain::ports::ReturnLearner;
use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::info;

/// Share of rows, in percent, assigned to the training segment
pub const DEFAULT_TRAIN_PCT: usize = 80;

/// Index of the first test row for a chronological split of `n` rows
pub fn split_index(n: usize, train_pct: usize) -> usize {
    n * train_pct / 100
}

/// Mean absolute error between two aligned series
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Walk-forward evaluation: the earlier rows train, the later rows test.
///
/// Rows are never shuffled. The baseline forecasts a zero return for every
/// test day, so its error is the mean absolute test-segment return.
pub fn evaluate(
    learner: &dyn ReturnLearner,
    features: &[FeatureRow],
    targets: &[f64],
    dates: &[NaiveDate],
    train_pct: usize,
) -> Result<EvaluationResult, PipelineError> {
    let n = features.len();
    if targets.len() != n || dates.len() != n {
        return Err(PipelineError::internal(
            PipelineStage::Evaluation,
            anyhow!(
                "Misaligned inputs: {} feature rows, {} targets, {} dates",
                n,
                targets.len(),
                dates.len()
            ),
        ));
    }

    let split = split_index(n, train_pct);
    if split == 0 || split == n {
        return Err(PipelineError::internal(
            PipelineStage::Evaluation,
            anyhow!(
                "A {}% split of {} rows leaves an empty train or test segment",
                train_pct,
                n
            ),
        ));
    }

    let (x_train, x_test) = features.split_at(split);
    let (y_train, y_test) = targets.split_at(split);

    info!(
        "Training {} on {} rows, testing on {} rows",
        learner.name(),
        x_train.len(),
        x_test.len()
    );
    let model = learner
        .fit(x_train, y_train)
        .map_err(|e| PipelineError::internal(PipelineStage::Training, e))?;

    let y_pred = model
        .predict(x_test)
        .map_err(|e| PipelineError::internal(PipelineStage::Evaluation, e))?;
    if y_pred.len() != y_test.len() {
        return Err(PipelineError::internal(
            PipelineStage::Evaluation,
            anyhow!(
                "Model returned {} predictions for {} test rows",
                y_pred.len(),
                y_test.len()
            ),
        ));
    }

    let mae_model = mean_absolute_error(y_test, &y_pred);
    let y_baseline = vec![0.0; y_test.len()];
    let mae_baseline = mean_absolute_error(y_test, &y_baseline);

    info!(
        "OOS Test (n={}): MAE model={:.6}, MAE baseline={:.6}",
        y_test.len(),
        mae_model,
        mae_baseline
    );

    Ok(EvaluationResult {
        model,
        test_dates: dates[split..].to_vec(),
        test_actuals: y_test.to_vec(),
        test_predictions: y_pred,
        mae_model,
        mae_baseline,
        n_train: x_train.len(),
        n_test: x_test.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::smartcore_predictor::ForestLearner;
    use crate::domain::ports::ReturnModel;
    use chrono::Duration;

    /// Predicts a constant, for checking the metric arithmetic
    struct ConstantLearner(f64);
    struct ConstantModel(f64);

    impl ReturnModel for ConstantModel {
        fn predict(&self, rows: &[FeatureRow]) -> anyhow::Result<Vec<f64>> {
            Ok(vec![self.0; rows.len()])
        }
    }

    impl ReturnLearner for ConstantLearner {
        fn fit(&self, _rows: &[FeatureRow], _targets: &[f64]) -> anyhow::Result<Box<dyn ReturnModel>> {
            Ok(Box::new(ConstantModel(self.0)))
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    struct FailingLearner;

    impl ReturnLearner for FailingLearner {
        fn fit(&self, _rows: &[FeatureRow], _targets: &[f64]) -> anyhow::Result<Box<dyn ReturnModel>> {
            anyhow::bail!("solver diverged")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn frame(n: usize) -> (Vec<FeatureRow>, Vec<f64>, Vec<NaiveDate>) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let features = (0..n)
            .map(|i| FeatureRow {
                close_return: ((i * 7 % 11) as f64 - 5.0) / 500.0,
                rsi_14: (i * 13 % 100) as f64,
                sma_10: 100.0 + i as f64,
                ..Default::default()
            })
            .collect();
        let targets = (0..n).map(|i| ((i * 3 % 7) as f64 - 3.0) / 100.0).collect();
        let dates = (0..n).map(|i| start + Duration::days(i as i64)).collect();
        (features, targets, dates)
    }

    #[test]
    fn test_split_sizes() {
        for n in [50, 59, 61, 100, 1003] {
            assert_eq!(split_index(n, 80), (n as f64 * 0.8).floor() as usize);
        }
        assert_eq!(split_index(59, 80), 47);
    }

    #[test]
    fn test_split_is_chronological() {
        let (x, y, dates) = frame(60);
        let result = evaluate(&ConstantLearner(0.0), &x, &y, &dates, 80).unwrap();

        assert_eq!(result.n_train, 48);
        assert_eq!(result.n_test, 12);
        assert_eq!(result.test_dates, dates[48..].to_vec());
        assert_eq!(result.test_actuals, y[48..].to_vec());
    }

    #[test]
    fn test_baseline_is_mean_absolute_test_return() {
        let (x, y, dates) = frame(73);
        let result = evaluate(&ConstantLearner(0.01), &x, &y, &dates, 80).unwrap();

        let test = &y[split_index(73, 80)..];
        let expected = test.iter().map(|v| v.abs()).sum::<f64>() / test.len() as f64;
        assert_eq!(result.mae_baseline, expected);
    }

    #[test]
    fn test_zero_model_matches_baseline() {
        let (x, y, dates) = frame(55);
        let result = evaluate(&ConstantLearner(0.0), &x, &y, &dates, 80).unwrap();

        assert_eq!(result.mae_model, result.mae_baseline);
        assert!(!result.is_informative());
    }

    #[test]
    fn test_forest_evaluation_is_reproducible() {
        let (x, y, dates) = frame(90);
        let learner = ForestLearner {
            n_trees: 20,
            ..Default::default()
        };

        let first = evaluate(&learner, &x, &y, &dates, 80).unwrap();
        let second = evaluate(&learner, &x, &y, &dates, 80).unwrap();

        assert_eq!(first.mae_model, second.mae_model);
        assert_eq!(first.mae_baseline, second.mae_baseline);
        assert_eq!(first.test_predictions, second.test_predictions);
    }

    #[test]
    fn test_training_failure_is_annotated() {
        let (x, y, dates) = frame(60);
        let err = evaluate(&FailingLearner, &x, &y, &dates, 80).unwrap_err();

        match err {
            PipelineError::Internal { stage, .. } => assert_eq!(stage, PipelineStage::Training),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_misaligned_inputs_rejected() {
        let (x, y, dates) = frame(60);
        assert!(evaluate(&ConstantLearner(0.0), &x, &y[..59], &dates, 80).is_err());
    }

    #[test]
    fn test_degenerate_split_rejected() {
        let (x, y, dates) = frame(1);
        assert!(evaluate(&ConstantLearner(0.0), &x, &y, &dates, 80).is_err());
    }
}
