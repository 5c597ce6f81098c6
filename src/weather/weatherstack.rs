use super::http::{build_client, get_json, with_deadline, RetryPolicy};
use super::types::{WeatherReading, WeatherStackErrorResponse, WeatherStackResponse};
use super::{SourceError, WeatherSource};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com";
const CURRENT_PATH: &str = "/current";

/// Client for the weatherstack current-conditions endpoint, the primary source.
pub struct WeatherStackClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
    deadline: Duration,
}

impl WeatherStackClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config.http_timeout)?,
            base_url: config.weatherstack_base_url.clone(),
            api_key: config.weatherstack_api_key.clone(),
            retry: RetryPolicy::default(),
            deadline: config.http_timeout,
        })
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn get_current(&self, city: &str) -> Result<WeatherStackResponse, SourceError> {
        let url = format!("{}{}", self.base_url, CURRENT_PATH);

        let response = get_json(
            &self.client,
            &url,
            &[
                ("access_key", self.api_key.as_str()),
                ("units", "m"),
                ("query", city),
            ],
            self.retry,
            describe_error,
        )
        .await?;

        // Failures usually arrive as 200 with "success": false
        if response.get("success") == Some(&Value::Bool(false)) {
            let err: WeatherStackErrorResponse = serde_json::from_value(response)?;
            return Err(SourceError::Provider(format_error(&err)));
        }

        let current: WeatherStackResponse = serde_json::from_value(response)?;
        Ok(current)
    }
}

fn format_error(err: &WeatherStackErrorResponse) -> String {
    format!("{} {}: {}", err.error.code, err.error.kind, err.error.info)
}

fn describe_error(body: &str) -> Option<String> {
    serde_json::from_str::<WeatherStackErrorResponse>(body)
        .ok()
        .map(|err| format_error(&err))
}

#[async_trait]
impl WeatherSource for WeatherStackClient {
    fn name(&self) -> &'static str {
        "weatherstack"
    }

    async fn get_weather(&self, city: &str) -> Result<WeatherReading, SourceError> {
        let current = with_deadline(self.deadline, self.get_current(city)).await?;
        Ok(WeatherReading::from(&current))
    }
}
