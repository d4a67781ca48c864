// Rolling-window indicator math
pub mod market_data;

// Feature engine, dataset, evaluation, learners
pub mod ml;

// Pipeline orchestrator
pub mod system;
