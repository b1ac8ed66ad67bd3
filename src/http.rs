//! Shared HTTP client for all upstream providers

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;

use crate::config::ProvidersConfig;
use crate::{Result, WeatherMapError};

/// Build a client with timeout, user agent and retry of transient failures
pub fn api_client(config: &ProvidersConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| WeatherMapError::config(format!("Failed to create HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// GET a URL and decode its JSON body.
///
/// Transport and status failures map to `Network`, an undecodable body to
/// `MalformedResponse`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    url: &str,
) -> Result<T> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(WeatherMapError::network(format!(
            "request to {url} failed with status {status}"
        )));
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            WeatherMapError::malformed(format!("invalid JSON from {url}: {e}"))
        } else {
            WeatherMapError::from(e)
        }
    })
}
