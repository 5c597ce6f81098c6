pub mod http;
pub mod openweather;
pub mod types;
pub mod weatherstack;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use types::WeatherReading;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no error body"))]
    Http {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// An upstream provider of current weather for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn get_weather(&self, city: &str) -> Result<WeatherReading, SourceError>;
}
