use super::http::{build_client, get_json, with_deadline, RetryPolicy};
use super::types::{OpenWeatherErrorResponse, OpenWeatherResponse, WeatherReading};
use super::{SourceError, WeatherSource};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for the OpenWeather current-weather endpoint, used as fail-over.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
    deadline: Duration,
}

impl OpenWeatherClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config.http_timeout)?,
            base_url: config.openweather_base_url.clone(),
            api_key: config.openweather_api_key.clone(),
            retry: RetryPolicy::default(),
            deadline: config.http_timeout,
        })
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn get_current(&self, city: &str) -> Result<OpenWeatherResponse, SourceError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let response = get_json(
            &self.client,
            &url,
            &[
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("q", city),
            ],
            self.retry,
            describe_error,
        )
        .await?;

        let current: OpenWeatherResponse = serde_json::from_value(response)?;
        Ok(current)
    }
}

fn describe_error(body: &str) -> Option<String> {
    serde_json::from_str::<OpenWeatherErrorResponse>(body)
        .ok()
        .map(|err| format!("cod {}: {}", err.cod, err.message))
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    fn name(&self) -> &'static str {
        "openweather"
    }

    async fn get_weather(&self, city: &str) -> Result<WeatherReading, SourceError> {
        let current = with_deadline(self.deadline, self.get_current(city)).await?;
        Ok(WeatherReading::from(&current))
    }
}
