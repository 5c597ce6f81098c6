use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::weather::{openweather, weatherstack};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub city: String,
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
    pub weatherstack_api_key: String,
    pub weatherstack_base_url: String,
    pub openweather_api_key: String,
    pub openweather_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_ttl_secs: u64 = parse_or(&lookup, "CACHE_TTL_SECS", 3)?;
        if cache_ttl_secs == 0 {
            anyhow::bail!("CACHE_TTL_SECS must be greater than zero");
        }

        let http_timeout_secs: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?;
        if http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            city: lookup("WEATHER_CITY").unwrap_or_else(|| "Sydney".to_string()),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            http_timeout: Duration::from_secs(http_timeout_secs),
            weatherstack_api_key: lookup("WEATHERSTACK_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("WEATHERSTACK_API_KEY not set"))?,
            weatherstack_base_url: lookup("WEATHERSTACK_BASE_URL")
                .unwrap_or_else(|| weatherstack::DEFAULT_BASE_URL.to_string()),
            openweather_api_key: lookup("OPENWEATHER_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("OPENWEATHER_API_KEY not set"))?,
            openweather_base_url: lookup("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| openweather::DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
