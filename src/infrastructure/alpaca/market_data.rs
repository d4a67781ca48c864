use super::common::{AlpacaBar, AlpacaBarResponse};
use crate::config::AlpacaConfig;
use crate::domain::errors::PipelineError;
use crate::domain::market::BarSeries;
use crate::domain::ports::BarSource;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::fmt;
use tracing::{debug, error, info};

/// API key pair for the Alpaca Market Data API. Both halves are non-empty.
#[derive(Clone)]
pub struct AlpacaCredentials {
    api_key: String,
    api_secret: String,
}

impl AlpacaCredentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let api_key = api_key.into().trim().to_string();
        let api_secret = api_secret.into().trim().to_string();

        if api_key.is_empty() || api_secret.is_empty() {
            return Err(PipelineError::configuration(
                "Missing API keys. Set ALPACA_API_KEY and ALPACA_API_SECRET in your environment \
                 (e.g., in a .env file).",
            ));
        }
        Ok(Self {
            api_key,
            api_secret,
        })
    }

    pub fn from_config(config: &AlpacaConfig) -> Result<Self, PipelineError> {
        Self::new(config.api_key.clone(), config.api_secret.clone())
    }
}

impl fmt::Debug for AlpacaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlpacaCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Daily bars from the Alpaca Market Data API (`/v2/stocks/bars`).
///
/// One request sequence per fetch, following pagination; no caching and no retries.
pub struct AlpacaBarSource {
    client: Client,
    credentials: AlpacaCredentials,
    data_base_url: String,
    feed: String,
}

impl AlpacaBarSource {
    pub fn new(credentials: AlpacaCredentials, data_base_url: String, feed: String) -> Self {
        Self::builder(credentials)
            .data_base_url(data_base_url)
            .feed(feed)
            .build()
    }

    pub fn from_config(config: &AlpacaConfig) -> Result<Self, PipelineError> {
        let credentials = AlpacaCredentials::from_config(config)?;
        Ok(Self::new(
            credentials,
            config.data_url.clone(),
            config.feed.clone(),
        ))
    }

    pub fn builder(credentials: AlpacaCredentials) -> AlpacaBarSourceBuilder {
        AlpacaBarSourceBuilder {
            credentials,
            data_base_url: None,
            feed: None,
        }
    }

    async fn fetch_historical_bars_internal(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AlpacaBar>> {
        let url = format!(
            "{}/v2/stocks/bars",
            self.data_base_url.trim_end_matches('/')
        );
        let start_rfc = format!("{}T00:00:00Z", start);
        let end_rfc = format!("{}T23:59:59Z", end);

        let mut all_bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query_params = vec![
                ("symbols", symbol.to_string()),
                ("timeframe", "1Day".to_string()),
                ("start", start_rfc.clone()),
                ("end", end_rfc.clone()),
                ("limit", "10000".to_string()),
                ("adjustment", "raw".to_string()),
                ("feed", self.feed.clone()),
            ];
            if let Some(token) = &page_token {
                query_params.push(("page_token", token.clone()));
            }

            debug!(
                "AlpacaBarSource: Fetching daily bars from {} with params: symbol={}, start={}, end={}, page={:?}",
                url, symbol, start, end, page_token
            );

            let response = self
                .client
                .get(&url)
                .query(&query_params)
                .header("APCA-API-KEY-ID", &self.credentials.api_key)
                .header("APCA-API-SECRET-KEY", &self.credentials.api_secret)
                .send()
                .await
                .context("Failed to fetch bars from Alpaca")?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                error!(
                    "AlpacaBarSource: API error {} for {}: {}",
                    status, symbol, error_text
                );
                anyhow::bail!("Alpaca API error ({}): {}", status, error_text);
            }

            let resp_body: AlpacaBarResponse = response
                .json()
                .await
                .context("Failed to parse bars response")?;

            all_bars.extend_from_slice(resp_body.bars_for(symbol));

            page_token = resp_body.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_bars)
    }
}

pub struct AlpacaBarSourceBuilder {
    credentials: AlpacaCredentials,
    data_base_url: Option<String>,
    feed: Option<String>,
}

impl AlpacaBarSourceBuilder {
    pub fn data_base_url(mut self, data_base_url: String) -> Self {
        self.data_base_url = Some(data_base_url);
        self
    }

    pub fn feed(mut self, feed: String) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn build(self) -> AlpacaBarSource {
        AlpacaBarSource {
            client: HttpClientFactory::create_client(),
            credentials: self.credentials,
            data_base_url: self
                .data_base_url
                .unwrap_or_else(|| crate::config::DEFAULT_ALPACA_DATA_URL.to_string()),
            feed: self
                .feed
                .unwrap_or_else(|| crate::config::DEFAULT_ALPACA_FEED.to_string()),
        }
    }
}

#[async_trait]
impl BarSource for AlpacaBarSource {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, PipelineError> {
        let source_error = |source: anyhow::Error| PipelineError::Source {
            symbol: symbol.to_string(),
            source,
        };

        let raw = self
            .fetch_historical_bars_internal(symbol, start, end)
            .await
            .map_err(source_error)?;
        let bars = raw
            .iter()
            .map(AlpacaBar::to_bar)
            .collect::<Result<Vec<_>>>()
            .map_err(source_error)?;

        let series = BarSeries::new(bars).restricted_to(start, end);
        if series.is_empty() {
            return Err(PipelineError::EmptyData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        info!(
            "AlpacaBarSource: Fetched {} daily bars for {} ({:?} .. {:?})",
            series.len(),
            symbol,
            series.first_date(),
            series.last_date()
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "Alpaca"
    }
}
