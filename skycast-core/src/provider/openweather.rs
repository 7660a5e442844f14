use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinate, ForecastSample, ForecastSet};

use super::ForecastFetcher;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeather 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the provider at a different host. Tests use this against a
    /// local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl From<OwForecastEntry> for ForecastSample {
    fn from(entry: OwForecastEntry) -> Self {
        let (condition, icon_id) = entry
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        ForecastSample {
            timestamp: entry.dt,
            temperature_c: entry.main.temp,
            condition,
            icon_id,
        }
    }
}

#[async_trait]
impl ForecastFetcher for OpenWeatherProvider {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ForecastSet> {
        let url = format!("{}/data/2.5/forecast", self.base_url);

        tracing::debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "requesting forecast"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        // Provider order is kept as-is: no re-sorting, no deduplication.
        // An empty list is a valid response.
        let place_name = parsed.city.name;
        let samples: Vec<ForecastSample> =
            parsed.list.into_iter().map(ForecastSample::from).collect();

        tracing::debug!(place = %place_name, samples = samples.len(), "forecast received");

        Ok(ForecastSet { place_name, samples })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
