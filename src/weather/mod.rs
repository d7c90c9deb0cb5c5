pub mod api;
pub mod config;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use thiserror::Error;

pub use config::WeatherConfig;

/// Итог успешного запроса погоды
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherReport {
    /// Готовый к отправке текст
    pub summary: String,
    /// Название города так, как его вернул сервис
    pub canonical_name: String,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("weather http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather response parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather api error {code} (http {status}): {message}")]
    Api { status: u16, code: i64, message: String },
    #[error("weather service answered with http {0}")]
    Status(u16),
}

/// Источник погоды для сессий.
///
/// `Ok(None)` означает, что город не найден.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Option<WeatherReport>, WeatherError>;
}

/// Клиент weatherapi.com
pub struct WeatherClient {
    config: WeatherConfig,
    client: ClientWithMiddleware,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        let retry_policy = ExponentialBackoff::builder()
            .build_with_max_retries(config.retries);

        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { config, client })
    }
}

#[async_trait]
impl WeatherLookup for WeatherClient {
    async fn lookup(&self, query: &str) -> Result<Option<WeatherReport>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.config.current_url())
            .header("Accept", "application/json")
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", query),
                ("lang", self.config.lang.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log::debug!("Weather lookup for {:?} answered with {}", query, status);

        api::interpret_response(status, &body)
    }
}
