//! Market data provider configuration parsing from environment variables.

use super::EnvLookup;

pub const DEFAULT_ALPACA_DATA_URL: &str = "https://data.alpaca.markets";
pub const DEFAULT_ALPACA_FEED: &str = "iex";

/// Alpaca Market Data API configuration.
///
/// Credentials are read as-is; presence is checked when the bar source is
/// built (see `AlpacaCredentials`).
#[derive(Debug, Clone, Default)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub data_url: String,
    pub feed: String,
}

impl AlpacaConfig {
    pub fn from_lookup(lookup: &EnvLookup) -> Self {
        Self {
            api_key: lookup("ALPACA_API_KEY").unwrap_or_default(),
            api_secret: lookup("ALPACA_API_SECRET").unwrap_or_default(),
            data_url: lookup("ALPACA_DATA_URL")
                .unwrap_or_else(|| DEFAULT_ALPACA_DATA_URL.to_string()),
            feed: lookup("ALPACA_DATA_FEED").unwrap_or_else(|| DEFAULT_ALPACA_FEED.to_string()),
        }
    }
}
