//! Dataset and evaluation settings parsing from environment variables.

use super::{EnvLookup, parse_var};
use crate::application::ml::{DEFAULT_TRAIN_PCT, MIN_ROWS};
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationSettings {
    /// Percentage of rows, in chronological order, used for training
    pub train_pct: usize,
    /// Minimum labelled rows required before training
    pub min_rows: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            train_pct: DEFAULT_TRAIN_PCT,
            min_rows: MIN_ROWS,
        }
    }
}

impl EvaluationSettings {
    pub fn from_lookup(lookup: &EnvLookup) -> Result<Self> {
        let defaults = Self::default();
        let settings = Self {
            train_pct: parse_var(lookup, "TRAIN_PCT", defaults.train_pct)?,
            min_rows: parse_var(lookup, "MIN_ROWS", defaults.min_rows)?,
        };

        if !(1..100).contains(&settings.train_pct) {
            anyhow::bail!(
                "TRAIN_PCT must be between 1 and 99, got {}",
                settings.train_pct
            );
        }
        Ok(settings)
    }
}
