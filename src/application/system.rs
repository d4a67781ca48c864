use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::ml::{DatasetAssembler, compute_features, evaluate, predict_latest};
use crate::config::Config;
use crate::domain::errors::PipelineError;
use crate::domain::ml::{EvaluationResult, PredictionReport, PredictionSnapshot};
use crate::domain::ports::{BarSource, ReturnLearner};
use crate::infrastructure::factory::ServiceFactory;

/// One validated invocation: a symbol and a calendar date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PredictionRequest {
    pub fn new(
        symbol: impl AsRef<str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, PipelineError> {
        let symbol = symbol.as_ref().trim().to_uppercase();
        if symbol.is_empty() {
            return Err(PipelineError::configuration("Ticker symbol is empty"));
        }
        if start >= end {
            return Err(PipelineError::configuration(format!(
                "Start date {} must be before end date {}",
                start, end
            )));
        }
        Ok(Self { symbol, start, end })
    }
}

/// Everything one run produced
#[derive(Debug)]
pub struct PredictionRun {
    pub request: PredictionRequest,
    pub bars_fetched: usize,
    pub dataset_rows: usize,
    pub evaluation: EvaluationResult,
    pub snapshot: PredictionSnapshot,
}

impl PredictionRun {
    pub fn report(&self) -> PredictionReport {
        PredictionReport {
            ticker: self.request.symbol.clone(),
            start: self.request.start,
            end: self.request.end,
            n_train: self.evaluation.n_train,
            n_test: self.evaluation.n_test,
            mae_model: self.evaluation.mae_model,
            mae_baseline: self.evaluation.mae_baseline,
            pred_next_return: self.snapshot.predicted_return,
            as_of_date: self.snapshot.as_of_date,
        }
    }
}

pub struct Application {
    pub config: Config,
    pub source: Arc<dyn BarSource>,
    pub learner: Arc<dyn ReturnLearner>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self, PipelineError> {
        Self::build_with(config, ServiceFactory::create_bar_source)
    }

    /// Builds the application with a custom bar source constructor.
    ///
    /// The constructor runs before any fetch, so a precondition it rejects
    /// (missing credentials) aborts with nothing sent.
    pub fn build_with<F>(config: Config, make_source: F) -> Result<Self, PipelineError>
    where
        F: FnOnce(&Config) -> Result<Arc<dyn BarSource>, PipelineError>,
    {
        info!(
            "Building Market Predict Application (source: {:?}, model: {:?})...",
            config.source, config.model.kind
        );
        let source = make_source(&config)?;
        let learner = config.model.build_learner();

        Ok(Self {
            config,
            source,
            learner,
        })
    }

    /// Fetch, features, dataset, walk-forward evaluation, latest prediction.
    pub async fn run(&self, request: &PredictionRequest) -> Result<PredictionRun, PipelineError> {
        info!(
            "Run started: {} from {} to {} via {}",
            request.symbol,
            request.start,
            request.end,
            self.source.name()
        );

        let series = self
            .source
            .fetch(&request.symbol, request.start, request.end)
            .await?;
        let bars_fetched = series.len();
        info!("Fetched {} daily bars for {}", bars_fetched, request.symbol);

        let extended = compute_features(&series);
        let dataset = DatasetAssembler::new(self.config.evaluation.min_rows).assemble(&extended)?;
        info!(
            "Dataset assembled: {} labelled rows from {} bars",
            dataset.len(),
            bars_fetched
        );

        let evaluation = evaluate(
            self.learner.as_ref(),
            &dataset.features,
            &dataset.targets,
            &dataset.dates,
            self.config.evaluation.train_pct,
        )?;
        if !evaluation.is_informative() {
            warn!(
                "Model MAE {:.6} does not beat the zero-return baseline {:.6}",
                evaluation.mae_model, evaluation.mae_baseline
            );
        }

        let (features, dates) = dataset.prediction_frame();
        let snapshot = predict_latest(evaluation.model.as_ref(), &features, &dates)?;
        info!(
            "Predicted next-day return for {} as of {}: {:+.6}",
            request.symbol, snapshot.as_of_date, snapshot.predicted_return
        );

        Ok(PredictionRun {
            request: request.clone(),
            bars_fetched,
            dataset_rows: dataset.len(),
            evaluation,
            snapshot,
        })
    }
}
