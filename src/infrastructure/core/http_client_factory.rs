use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client for one-shot market data requests.
    ///
    /// No retry layer: a failed request fails the run.
    pub fn create_client() -> Client {
        Client::builder()
            .pool_max_idle_per_host(1)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("market_predict/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
