use crate::config::{Config, SourceMode};
use crate::domain::errors::PipelineError;
use crate::domain::ports::BarSource;
use crate::infrastructure::alpaca::{AlpacaBarSource, AlpacaCredentials};
use crate::infrastructure::csv_bars::CsvBarSource;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    /// Builds the bar source selected by the configuration.
    ///
    /// Alpaca credentials are validated here, before any request can be made.
    pub fn create_bar_source(config: &Config) -> Result<Arc<dyn BarSource>, PipelineError> {
        match &config.source {
            SourceMode::Alpaca => {
                let credentials = AlpacaCredentials::from_config(&config.alpaca)?;
                let source = AlpacaBarSource::builder(credentials)
                    .data_base_url(config.alpaca.data_url.clone())
                    .feed(config.alpaca.feed.clone())
                    .build();
                info!(
                    "ServiceFactory: Using Alpaca bars ({}, feed={})",
                    config.alpaca.data_url, config.alpaca.feed
                );
                Ok(Arc::new(source))
            }
            SourceMode::Csv(path) => {
                info!("ServiceFactory: Using CSV bars from {:?}", path);
                Ok(Arc::new(CsvBarSource::new(path.clone())))
            }
        }
    }
}
