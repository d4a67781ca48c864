pub mod dataset;
pub mod feature_engine;
pub mod latest_prediction;
pub mod segment_export;
pub mod smartcore_predictor;
pub mod walk_forward;

pub use dataset::{Dataset, DatasetAssembler, MIN_ROWS};
pub use feature_engine::{DailyFeatureEngine, compute_features};
pub use latest_prediction::predict_latest;
pub use smartcore_predictor::{ForestLearner, LinearLearner};
pub use walk_forward::{DEFAULT_TRAIN_PCT, evaluate, mean_absolute_error};
