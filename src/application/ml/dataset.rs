use crate::application::ml::feature_engine::LONGEST_WINDOW;
use crate::domain::errors::PipelineError;
use crate::domain::ml::{FeatureBar, FeatureRow};
use chrono::NaiveDate;
use tracing::debug;

/// Minimum number of labelled rows required to train
pub const MIN_ROWS: usize = 50;

/// Aligned feature matrix, target vector and date index, in chronological order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub features: Vec<FeatureRow>,
    pub targets: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    /// Most recent fully-featured row whose target is not known yet
    pub live: Option<(NaiveDate, FeatureRow)>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Rows eligible for live prediction: the labelled rows followed by the
    /// trailing unlabelled row, if any.
    pub fn prediction_frame(&self) -> (Vec<FeatureRow>, Vec<NaiveDate>) {
        let mut features = self.features.clone();
        let mut dates = self.dates.clone();
        if let Some((date, row)) = self.live {
            features.push(row);
            dates.push(date);
        }
        (features, dates)
    }
}

/// Turns an extended bar table into a training dataset
#[derive(Debug, Clone, Copy)]
pub struct DatasetAssembler {
    /// Leading rows discarded as rolling-window warm-up
    pub warmup_bars: usize,
    pub min_rows: usize,
}

impl Default for DatasetAssembler {
    fn default() -> Self {
        Self {
            warmup_bars: LONGEST_WINDOW,
            min_rows: MIN_ROWS,
        }
    }
}

impl DatasetAssembler {
    pub fn new(min_rows: usize) -> Self {
        Self {
            min_rows,
            ..Default::default()
        }
    }

    /// Keeps the rows past warm-up whose features and target are all defined.
    ///
    /// Fails with `InsufficientData` when fewer than `min_rows` remain.
    pub fn assemble(&self, rows: &[FeatureBar]) -> Result<Dataset, PipelineError> {
        let mut dataset = Dataset::default();
        let mut live = None;

        for row in rows.iter().skip(self.warmup_bars) {
            let Some(features) = row.features() else {
                continue;
            };
            match row.target {
                Some(target) => {
                    dataset.features.push(features);
                    dataset.targets.push(target);
                    dataset.dates.push(row.date());
                }
                None => live = Some((row.date(), features)),
            }
        }

        let last_labelled = dataset.dates.last().copied();
        dataset.live = live.filter(|(date, _)| last_labelled.is_none_or(|last| *date > last));

        debug!(
            "DatasetAssembler: {} input rows -> {} labelled rows (live row: {})",
            rows.len(),
            dataset.len(),
            dataset.live.is_some()
        );

        if dataset.len() < self.min_rows {
            return Err(PipelineError::InsufficientData {
                actual: dataset.len(),
                required: self.min_rows,
            });
        }

        Ok(dataset)
    }
}
