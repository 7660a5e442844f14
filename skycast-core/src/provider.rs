use crate::{
    Config,
    model::{Coordinate, ForecastSet},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A remote forecast source.
///
/// One call produces one [`ForecastSet`] atomically; a failed call returns
/// an error and is never retried here. Implementations must preserve the
/// provider's sample order exactly.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn fetch(&self, coordinate: Coordinate) -> anyhow::Result<ForecastSet>;
}

/// Construct the forecast fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastFetcher>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `skycast configure` and enter your OpenWeather API key."
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())))
}
