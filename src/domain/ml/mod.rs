pub mod evaluation;
pub mod feature_registry;
pub mod types;

pub use evaluation::{EvaluationResult, PredictionReport, PredictionSnapshot};
pub use types::{FeatureBar, FeatureRow};
