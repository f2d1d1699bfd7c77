use crate::{Config, provider::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherapi;

/// Why a fetch did not produce a payload. Only used for logging; the worker
/// collapses every variant into the same failure payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Fetch the raw current-conditions body for `query`.
    async fn current_payload(&self, query: &str) -> Result<String, FetchError>;
}

/// Construct the WeatherAPI source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.api_key()?;

    let client = WeatherApiClient::new(
        config.base_url.clone(),
        api_key.to_owned(),
        config.request_timeout(),
    )?;

    Ok(Box::new(client))
}
