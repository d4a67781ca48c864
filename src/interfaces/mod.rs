pub mod metrics_card;
pub mod prediction_app;
pub mod theme;
pub mod view_models;

pub use prediction_app::PredictionApp;
