//! Learner configuration parsing from environment variables.

use super::{EnvLookup, parse_var};
use crate::application::ml::{ForestLearner, LinearLearner};
use crate::domain::ports::ReturnLearner;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;

/// Regression algorithm used for the next-day return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Forest,
    Linear,
}

impl FromStr for ModelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forest" | "random_forest" | "rf" => Ok(ModelKind::Forest),
            "linear" | "ols" => Ok(ModelKind::Linear),
            _ => anyhow::bail!("Invalid MODEL_KIND: {}. Must be 'forest' or 'linear'", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let forest = ForestLearner::default();
        Self {
            kind: ModelKind::Forest,
            n_trees: forest.n_trees,
            seed: forest.seed,
            max_depth: forest.max_depth,
            min_samples_split: forest.min_samples_split,
        }
    }
}

impl ModelConfig {
    pub fn from_lookup(lookup: &EnvLookup) -> Result<Self> {
        let defaults = Self::default();

        let kind = match lookup("MODEL_KIND") {
            Some(raw) => raw.parse()?,
            None => defaults.kind,
        };
        let max_depth = lookup("FOREST_MAX_DEPTH")
            .map(|raw| raw.trim().parse::<u16>())
            .transpose()
            .context("Failed to parse FOREST_MAX_DEPTH")?;

        let config = Self {
            kind,
            n_trees: parse_var(lookup, "FOREST_TREES", defaults.n_trees)?,
            seed: parse_var(lookup, "FOREST_SEED", defaults.seed)?,
            max_depth,
            min_samples_split: parse_var(lookup, "FOREST_MIN_SPLIT", defaults.min_samples_split)?,
        };

        if config.n_trees == 0 {
            anyhow::bail!("FOREST_TREES must be at least 1");
        }
        Ok(config)
    }

    pub fn build_learner(&self) -> Arc<dyn ReturnLearner> {
        match self.kind {
            ModelKind::Forest => Arc::new(ForestLearner {
                n_trees: self.n_trees,
                seed: self.seed,
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
            }),
            ModelKind::Linear => Arc::new(LinearLearner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::from_lookup(&|_| None).unwrap();
        assert_eq!(config.kind, ModelKind::Forest);
        assert_eq!(config.n_trees, 300);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("Linear".parse::<ModelKind>().unwrap(), ModelKind::Linear);
        assert_eq!("rf".parse::<ModelKind>().unwrap(), ModelKind::Forest);
        assert!("boosting".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_invalid_tree_count_names_variable() {
        let err = ModelConfig::from_lookup(&|name| {
            (name == "FOREST_TREES").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(format!("{:#}", err).contains("FOREST_TREES"));
    }

    #[test]
    fn test_build_learner_follows_kind() {
        let config = ModelConfig {
            kind: ModelKind::Linear,
            ..Default::default()
        };
        assert_eq!(config.build_learner().name(), "SmartCore Linear Regression");
        assert_eq!(
            ModelConfig::default().build_learner().name(),
            "SmartCore Random Forest"
        );
    }
}
