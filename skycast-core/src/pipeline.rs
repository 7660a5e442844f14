//! Pipeline orchestration: location resolution and forecast fetch feeding
//! a single state object read by the display layer.

use chrono::{DateTime, Utc};

use crate::{
    error::PipelineError,
    location::{self, LocationService},
    model::{ForecastSample, ForecastSet},
    provider::ForecastFetcher,
    view,
};

/// Where the pipeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run has started yet.
    Idle,
    /// A run is in flight; the previous forecast, if any, is still held.
    Loading,
    /// The last run produced a forecast.
    Ready,
    /// The last run failed; the state carries the fixed message.
    Error,
}

/// Single source of truth for the display layer: the phase, the last error
/// message, the last fetched forecast and the daily-view visibility flag.
///
/// One instance exists per pipeline; it is written only by the pipeline
/// itself and handed out read-only. The current and daily views are never
/// stored; they are recomputed from the held [`ForecastSet`] on every
/// access.
#[derive(Debug)]
pub struct PipelineState {
    phase: Phase,
    error: Option<String>,
    forecast: Option<ForecastSet>,
    fetched_at: Option<DateTime<Utc>>,
    show_daily: bool,
}

impl PipelineState {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            error: None,
            forecast: None,
            fetched_at: None,
            show_daily: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fixed user-facing message of the last failed run, if the pipeline
    /// is in [`Phase::Error`].
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn forecast(&self) -> Option<&ForecastSet> {
        self.forecast.as_ref()
    }

    pub fn place_name(&self) -> Option<&str> {
        self.forecast.as_ref().map(|set| set.place_name.as_str())
    }

    /// When the held forecast was fetched.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn show_daily(&self) -> bool {
        self.show_daily
    }

    /// Current-conditions view over the held forecast.
    pub fn current(&self) -> Option<&ForecastSample> {
        self.forecast.as_ref().and_then(view::current_sample)
    }

    /// Daily outlook, empty while the daily view is hidden.
    pub fn daily(&self) -> Vec<&ForecastSample> {
        match &self.forecast {
            Some(set) if self.show_daily => view::daily_samples(set),
            _ => Vec::new(),
        }
    }
}

/// Runs the resolve-then-fetch sequence and owns the state.
///
/// `refresh` takes `&mut self`, so two runs can never overlap within one
/// pipeline instance; callers that share a pipeline must serialize access.
pub struct Pipeline {
    location: Box<dyn LocationService>,
    fetcher: Box<dyn ForecastFetcher>,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(location: Box<dyn LocationService>, fetcher: Box<dyn ForecastFetcher>) -> Self {
        Self {
            location,
            fetcher,
            state: PipelineState::new(),
        }
    }

    /// Read-only view of the state for the display layer.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Run the full pipeline once.
    ///
    /// Enters [`Phase::Loading`], clearing any previous error but keeping
    /// the previous forecast until the new result lands, then settles in
    /// [`Phase::Ready`] with a fresh [`ForecastSet`] or [`Phase::Error`]
    /// with the failure's fixed message. A failed stage short-circuits the
    /// run; nothing partial is stored.
    pub async fn refresh(&mut self) {
        self.state.phase = Phase::Loading;
        self.state.error = None;

        match self.run().await {
            Ok(set) => {
                tracing::info!(
                    place = %set.place_name,
                    samples = set.samples.len(),
                    "forecast updated"
                );
                self.state.forecast = Some(set);
                self.state.fetched_at = Some(Utc::now());
                self.state.phase = Phase::Ready;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "pipeline run failed");
                self.state.error = Some(err.to_string());
                self.state.phase = Phase::Error;
            }
        }
    }

    async fn run(&self) -> Result<ForecastSet, PipelineError> {
        let coordinate = location::resolve(self.location.as_ref()).await?;

        self.fetcher
            .fetch(coordinate)
            .await
            .map_err(PipelineError::ForecastFetchFailed)
    }

    /// Flip the daily-outlook visibility and return the new value. Only
    /// the flag changes; no fetch or resolution is triggered.
    pub fn toggle_daily_view(&mut self) -> bool {
        self.state.show_daily = !self.state.show_daily;
        self.state.show_daily
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Permission;
    use crate::model::Coordinate;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const THREE_HOURS: i64 = 3 * 3600;

    struct FakeLocation {
        permission: Permission,
        position: Option<Coordinate>,
    }

    #[async_trait]
    impl LocationService for FakeLocation {
        async fn request_permission(&self) -> Permission {
            self.permission
        }

        async fn current_position(&self) -> anyhow::Result<Coordinate> {
            self.position.ok_or_else(|| anyhow::anyhow!("gps offline"))
        }
    }

    fn granted() -> FakeLocation {
        FakeLocation {
            permission: Permission::Granted,
            position: Some(Coordinate { latitude: 50.4501, longitude: 30.5234 }),
        }
    }

    /// Pops one scripted response per fetch and counts every call.
    #[derive(Debug)]
    struct ScriptedFetcher {
        calls: Arc<AtomicUsize>,
        responses: Mutex<VecDeque<anyhow::Result<ForecastSet>>>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<anyhow::Result<ForecastSet>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let fetcher = Self {
                calls: Arc::clone(&calls),
                responses: Mutex::new(responses.into()),
            };
            (fetcher, calls)
        }
    }

    #[async_trait]
    impl ForecastFetcher for ScriptedFetcher {
        async fn fetch(&self, _coordinate: Coordinate) -> anyhow::Result<ForecastSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response left")))
        }
    }

    fn series(place: &str, start: i64, count: usize) -> ForecastSet {
        ForecastSet {
            place_name: place.to_string(),
            samples: (0..count as i64)
                .map(|i| ForecastSample {
                    timestamp: start + i * THREE_HOURS,
                    temperature_c: 10.0 + i as f64,
                    condition: "clear sky".to_string(),
                    icon_id: "01d".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn starts_idle_with_nothing_held() {
        let (fetcher, _) = ScriptedFetcher::new(vec![]);
        let pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.forecast().is_none());
        assert!(state.error_message().is_none());
        assert!(!state.show_daily());
    }

    #[tokio::test]
    async fn denied_permission_errors_without_fetching() {
        let location = FakeLocation { permission: Permission::Denied, position: None };
        let (fetcher, calls) = ScriptedFetcher::new(vec![Ok(series("Kyiv", 0, 40))]);
        let mut pipeline = Pipeline::new(Box::new(location), Box::new(fetcher));

        pipeline.refresh().await;

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(state.error_message(), Some("Location permission was denied"));
        assert!(state.forecast().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unavailable_position_errors_without_fetching() {
        let location = FakeLocation { permission: Permission::Granted, position: None };
        let (fetcher, calls) = ScriptedFetcher::new(vec![Ok(series("Kyiv", 0, 40))]);
        let mut pipeline = Pipeline::new(Box::new(location), Box::new(fetcher));

        pipeline.refresh().await;

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(
            state.error_message(),
            Some("Could not determine the current location")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_forecast_unset() {
        let (fetcher, calls) =
            ScriptedFetcher::new(vec![Err(anyhow::anyhow!("status 502 from provider"))]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(
            state.error_message(),
            Some("Could not retrieve the weather forecast")
        );
        assert!(state.forecast().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_run_reaches_ready_with_derived_views() {
        let start = 1_700_000_000;
        let (fetcher, _) = ScriptedFetcher::new(vec![Ok(series("Kyiv", start, 40))]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.place_name(), Some("Kyiv"));
        assert!(state.fetched_at().is_some());
        assert!(state.error_message().is_none());

        let current = state.current().expect("current view must exist");
        assert_eq!(current.timestamp, start);

        // Hidden until toggled.
        assert!(state.daily().is_empty());
    }

    #[tokio::test]
    async fn toggled_daily_view_exposes_one_sample_per_day() {
        let start = 1_700_000_000;
        let (fetcher, _) = ScriptedFetcher::new(vec![Ok(series("Kyiv", start, 40))]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;
        assert!(pipeline.toggle_daily_view());

        let daily = pipeline.state().daily();
        let got: Vec<i64> = daily.iter().map(|s| s.timestamp).collect();
        let expected: Vec<i64> =
            [8, 16, 24, 32].iter().map(|i| start + i * THREE_HOURS).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn toggling_twice_restores_flag_without_touching_forecast() {
        let (fetcher, calls) = ScriptedFetcher::new(vec![Ok(series("Kyiv", 0, 16))]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;
        let before = pipeline.state().forecast().cloned();

        assert!(pipeline.toggle_daily_view());
        assert!(!pipeline.toggle_daily_view());

        assert!(!pipeline.state().show_daily());
        assert_eq!(pipeline.state().forecast().cloned(), before);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_run_keeps_previous_forecast_but_surfaces_error() {
        let (fetcher, _) = ScriptedFetcher::new(vec![
            Ok(series("Kyiv", 0, 40)),
            Err(anyhow::anyhow!("connection reset")),
        ]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;
        assert_eq!(pipeline.state().phase(), Phase::Ready);

        pipeline.refresh().await;

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Error);
        assert_eq!(
            state.error_message(),
            Some("Could not retrieve the weather forecast")
        );
        // The stale set stays held; showing it or not is the display
        // layer's call.
        assert_eq!(state.place_name(), Some("Kyiv"));
    }

    #[tokio::test]
    async fn new_run_clears_error_and_replaces_forecast() {
        let (fetcher, _) = ScriptedFetcher::new(vec![
            Err(anyhow::anyhow!("connection reset")),
            Ok(series("Lviv", 0, 8)),
        ]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;
        assert_eq!(pipeline.state().phase(), Phase::Error);

        pipeline.refresh().await;

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.error_message().is_none());
        assert_eq!(state.place_name(), Some("Lviv"));
    }

    #[tokio::test]
    async fn empty_forecast_is_ready_with_no_current_view() {
        let (fetcher, _) = ScriptedFetcher::new(vec![Ok(series("Kyiv", 0, 0))]);
        let mut pipeline = Pipeline::new(Box::new(granted()), Box::new(fetcher));

        pipeline.refresh().await;
        pipeline.toggle_daily_view();

        let state = pipeline.state();
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.current().is_none());
        assert!(state.daily().is_empty());
    }
}
