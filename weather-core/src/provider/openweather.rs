use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::WeatherSnapshot;

use super::{FetchError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn current_url(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Payload("response contained no weather conditions".into()))?;

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            condition_main: condition.main,
            condition_description: condition.description,
            condition_icon_id: condition.icon,
            temperature_c: parsed.main.temp,
            wind_speed: parsed.wind.speed,
            humidity_pct: parsed.main.humidity,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let res = self
            .http
            .get(self.current_url())
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Payload(e.to_string()))?;

        WeatherSnapshot::try_from(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
