use crate::domain::errors::{PipelineError, PipelineStage};
use crate::domain::ml::{FeatureRow, PredictionSnapshot};
use crate::domain::ports::ReturnModel;
use anyhow::anyhow;
use chrono::NaiveDate;

/// Predicts the next-day return from the chronologically last feature row.
///
/// The last row may have no known target yet; it is the "today" row.
pub fn predict_latest(
    model: &dyn ReturnModel,
    features: &[FeatureRow],
    dates: &[NaiveDate],
) -> Result<PredictionSnapshot, PipelineError> {
    if features.len() != dates.len() {
        return Err(PipelineError::internal(
            PipelineStage::Prediction,
            anyhow!(
                "Misaligned inputs: {} feature rows, {} dates",
                features.len(),
                dates.len()
            ),
        ));
    }

    let (Some(latest), Some(as_of_date)) = (features.last(), dates.last()) else {
        return Err(PipelineError::internal(
            PipelineStage::Prediction,
            anyhow!("No feature rows available"),
        ));
    };

    let predicted_return = model
        .predict(std::slice::from_ref(latest))
        .map_err(|e| PipelineError::internal(PipelineStage::Prediction, e))?
        .first()
        .copied()
        .ok_or_else(|| {
            PipelineError::internal(PipelineStage::Prediction, anyhow!("No prediction returned"))
        })?;

    Ok(PredictionSnapshot {
        as_of_date: *as_of_date,
        features: *latest,
        predicted_return,
    })
}
