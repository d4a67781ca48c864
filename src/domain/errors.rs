use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Stage of the prediction pipeline, used to annotate internal failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetch,
    Features,
    Dataset,
    Training,
    Evaluation,
    Prediction,
    /// Runtime or worker thread hosting a run, outside the pipeline proper
    Runtime,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Fetch => write!(f, "fetch"),
            PipelineStage::Features => write!(f, "feature computation"),
            PipelineStage::Dataset => write!(f, "dataset assembly"),
            PipelineStage::Training => write!(f, "model training"),
            PipelineStage::Evaluation => write!(f, "evaluation"),
            PipelineStage::Prediction => write!(f, "latest-point prediction"),
            PipelineStage::Runtime => write!(f, "background runtime"),
        }
    }
}

/// Failure category shown to the user by every surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    DataInsufficiency,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Source => write!(f, "source"),
            ErrorCategory::DataInsufficiency => write!(f, "data-insufficiency"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Errors surfaced by a prediction run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("Market data source failed for {symbol}: {source:#}")]
    Source {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Market data source returned no bars for {symbol} between {start} and {end}")]
    EmptyData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error(
        "Need at least {required} rows after computing features, got {actual}. Try a longer date range."
    )]
    InsufficientData { actual: usize, required: usize },

    #[error("Unexpected failure during {stage}: {source:#}")]
    Internal {
        stage: PipelineStage,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        PipelineError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn internal(stage: PipelineStage, source: impl Into<anyhow::Error>) -> Self {
        PipelineError::Internal {
            stage,
            source: source.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Configuration { .. } => ErrorCategory::Configuration,
            PipelineError::Source { .. } => ErrorCategory::Source,
            PipelineError::EmptyData { .. } | PipelineError::InsufficientData { .. } => {
                ErrorCategory::DataInsufficiency
            }
            PipelineError::Internal { .. } => ErrorCategory::Internal,
        }
    }
}
