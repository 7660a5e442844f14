use thiserror::Error;

/// Failure taxonomy for one pipeline run.
///
/// Every variant is terminal for the run that produced it: nothing is
/// retried, no partial data survives, and the process keeps running so the
/// user can trigger another run. The `Display` string of each variant is
/// the fixed user-facing message surfaced through
/// [`PipelineState`](crate::pipeline::PipelineState); underlying causes are
/// carried only for debug logging and never reach the user.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The platform refused foreground location access.
    #[error("Location permission was denied")]
    PermissionDenied,

    /// Permission was granted but no position could be read.
    #[error("Could not determine the current location")]
    LocationUnavailable(anyhow::Error),

    /// The forecast request failed in transport, status or parsing.
    #[error("Could not retrieve the weather forecast")]
    ForecastFetchFailed(anyhow::Error),
}
