//! Weather retrieval with provider fail-over and a stale-data fallback.
//!
//! Each call walks a fixed priority chain: fresh cache, primary source,
//! fail-over source, stale cache. Source errors are logged and absorbed; the
//! caller only ever sees a reading or [`ServiceError::Unavailable`].

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::ExpiringValueCache;
use crate::weather::{WeatherReading, WeatherSource};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("weather data unavailable")]
    Unavailable,
}

pub struct WeatherService {
    subject: String,
    primary: Arc<dyn WeatherSource>,
    fail_over: Arc<dyn WeatherSource>,
    cache: ExpiringValueCache<WeatherReading>,
}

impl WeatherService {
    pub fn new(
        subject: impl Into<String>,
        primary: Arc<dyn WeatherSource>,
        fail_over: Arc<dyn WeatherSource>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            subject: subject.into(),
            primary,
            fail_over,
            cache: ExpiringValueCache::new(cache_ttl),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    pub async fn retrieve(&self) -> Result<WeatherReading, ServiceError> {
        if let Some(reading) = self.cache.get_fresh() {
            tracing::debug!("Serving cached weather for {}", self.subject);
            return Ok(reading);
        }

        // The cache lock is never held across these calls
        for source in [&self.primary, &self.fail_over] {
            match source.get_weather(&self.subject).await {
                Ok(reading) => {
                    self.cache.put(reading);
                    return Ok(reading);
                }
                Err(e) => {
                    tracing::warn!(
                        "Error getting weather from {} for {}: {}",
                        source.name(),
                        self.subject,
                        e
                    );
                }
            }
        }

        match self.cache.get() {
            Some(reading) if self.cache.is_fresh() => {
                tracing::debug!(
                    "All sources failed, serving weather refreshed by a concurrent request for {}",
                    self.subject
                );
                Ok(reading)
            }
            Some(reading) => {
                tracing::warn!("All sources failed, serving stale weather for {}", self.subject);
                Ok(reading)
            }
            None => {
                tracing::error!("All sources failed and no cached weather for {}", self.subject);
                Err(ServiceError::Unavailable)
            }
        }
    }
}
