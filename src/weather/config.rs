use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_LANG: &str = "ru";

#[derive(Clone, Debug)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub lang: String,
    pub timeout: Duration,
    pub retries: u32,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout: Duration::from_secs(10),
            retries: 1,
        }
    }

    pub fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }
}
