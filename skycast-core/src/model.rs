use serde::{Deserialize, Serialize};

/// Base URL of the provider's icon assets; the display layer resolves a
/// sample's `icon_id` against this template.
const ICON_BASE: &str = "http://openweathermap.org/img/wn";

/// A single geographic position, produced by one resolution attempt and
/// consumed by the forecast fetcher. Never retained across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One timestamped reading in the provider's 3-hour-interval time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix epoch seconds; interpreted in the observer's local zone only
    /// at render time.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub condition: String,
    pub icon_id: String,
}

impl ForecastSample {
    /// Image URL for this sample's condition icon.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE}/{}@2x.png", self.icon_id)
    }
}

/// One full provider response: a place name plus the raw ordered series,
/// oldest first. A new set replaces its predecessor wholesale; samples are
/// never merged across fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSet {
    pub place_name: String,
    pub samples: Vec<ForecastSample>,
}
