//! Configuration module for Market Predict.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Data source, Model, and Evaluation.

mod broker_config;
mod evaluation_config;
mod model_config;

pub use broker_config::{AlpacaConfig, DEFAULT_ALPACA_DATA_URL, DEFAULT_ALPACA_FEED};
pub use evaluation_config::EvaluationSettings;
pub use model_config::{ModelConfig, ModelKind};

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Reads a configuration variable by name
pub type EnvLookup = dyn Fn(&str) -> Option<String>;

pub(crate) fn parse_var<T>(lookup: &EnvLookup, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", name)),
        None => Ok(default),
    }
}

/// Where daily bars come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    Alpaca,
    Csv(PathBuf),
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceMode,
    pub alpaca: AlpacaConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: &EnvLookup) -> Result<Self> {
        let source = match lookup("BARS_CSV").filter(|p| !p.trim().is_empty()) {
            Some(path) => SourceMode::Csv(PathBuf::from(path.trim())),
            None => SourceMode::Alpaca,
        };

        Ok(Self {
            source,
            alpaca: AlpacaConfig::from_lookup(lookup),
            model: ModelConfig::from_lookup(lookup)?,
            evaluation: EvaluationSettings::from_lookup(lookup)?,
        })
    }
}
