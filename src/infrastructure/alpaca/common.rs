use crate::domain::market::Bar;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: String,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

impl AlpacaBar {
    /// Calendar date of the bar, taken from its UTC timestamp
    pub fn date(&self) -> Result<NaiveDate> {
        let ts = DateTime::parse_from_rfc3339(&self.timestamp)
            .with_context(|| format!("Invalid bar timestamp: {}", self.timestamp))?;
        Ok(ts.naive_utc().date())
    }

    pub fn to_bar(&self) -> Result<Bar> {
        let bar = Bar {
            date: self.date()?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        };
        bar.validate()?;
        Ok(bar)
    }
}

/// Page of the multi-symbol bars endpoint
#[derive(Debug, Deserialize)]
pub struct AlpacaBarResponse {
    #[serde(default)]
    pub bars: Option<HashMap<String, Vec<AlpacaBar>>>,
    pub next_page_token: Option<String>,
}

impl AlpacaBarResponse {
    /// Bars for `symbol` only; other symbols in the page are ignored
    pub fn bars_for(&self, symbol: &str) -> &[AlpacaBar] {
        self.bars
            .as_ref()
            .and_then(|bars| bars.get(symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
