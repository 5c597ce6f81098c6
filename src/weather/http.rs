use super::SourceError;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Back-off settings for HTTP 429 responses.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

pub fn build_client(timeout: Duration) -> Result<Client, SourceError> {
    let client = Client::builder()
        .user_agent(concat!("sydney-weather/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Bounds a whole provider call, retries and back-off included.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    timeout(deadline, call)
        .await
        .map_err(|_| SourceError::Timeout(deadline))?
}

/// Issues a GET and returns the JSON body of a 2xx response.
///
/// 429 responses are retried with exponential back-off and jitter. Any other
/// non-success status becomes [`SourceError::Http`], with `describe_error`
/// turning the provider's error body into a detail message when it can.
pub async fn get_json<F>(
    client: &Client,
    url: &str,
    params: &[(&str, &str)],
    retry: RetryPolicy,
    describe_error: F,
) -> Result<Value, SourceError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut retry_count = 0;
    let mut delay = retry.initial_delay;

    loop {
        let response = client.get(url).query(params).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= retry.max_retries {
                return Err(SourceError::RateLimited {
                    attempts: retry_count + 1,
                });
            }

            tracing::warn!(
                "Rate limited by {}, retrying in {}ms",
                url,
                delay.as_millis()
            );

            sleep(delay).await;
            delay = delay.mul_f32(2.0 + fastrand::f32() * 0.5);
            retry_count += 1;
            continue;
        }

        let error_text = response.text().await.unwrap_or_default();
        return Err(SourceError::Http {
            status,
            detail: describe_error(&error_text),
        });
    }
}
