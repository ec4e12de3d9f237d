use crate::{Config, WeatherSnapshot, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Why a fetch produced no snapshot.
///
/// The cause is kept for logging only; every variant is shown to the user
/// as the same generic message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Payload(String),

    /// The fetch task ended without producing a response, e.g. it panicked.
    #[error("fetch task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: set OPENWEATHER_API_KEY or run `weather configure` and enter your API key."
        )
    })?;

    let provider = match config.api_base_url.as_deref() {
        Some(base) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(Box::new(provider))
}
