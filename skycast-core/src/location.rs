use crate::{Config, error::PipelineError, model::Coordinate};
use async_trait::async_trait;

/// Outcome of a foreground location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Platform location facility, seen from the pipeline side.
///
/// `request_permission` may surface an OS-level prompt to the user; apart
/// from the network fetch it is the only side-effecting call in a run.
#[async_trait]
pub trait LocationService: Send + Sync {
    async fn request_permission(&self) -> Permission;

    /// One current-position reading. Errors cover timeouts, disabled
    /// services and missing hardware alike.
    async fn current_position(&self) -> anyhow::Result<Coordinate>;
}

/// Resolve a single fresh coordinate: permission first, then one position
/// read. Anything other than a granted permission fails without touching
/// the position API. No retries, no reuse of earlier coordinates.
pub async fn resolve(service: &dyn LocationService) -> Result<Coordinate, PipelineError> {
    if service.request_permission().await != Permission::Granted {
        return Err(PipelineError::PermissionDenied);
    }

    match service.current_position().await {
        Ok(coordinate) => {
            tracing::debug!(
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "resolved current position"
            );
            Ok(coordinate)
        }
        Err(err) => Err(PipelineError::LocationUnavailable(err)),
    }
}

/// Location service backed by configuration instead of hardware: consent
/// comes from the config's allow flag, the position from its stored
/// coordinates. Stands in for the platform service on headless hosts.
#[derive(Debug, Clone)]
pub struct StaticLocationService {
    consent: bool,
    coordinate: Option<Coordinate>,
}

impl StaticLocationService {
    pub fn new(consent: bool, coordinate: Option<Coordinate>) -> Self {
        Self { consent, coordinate }
    }

    /// Build from the config's `[location]` section.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.location.allow, config.location.coordinate())
    }
}

#[async_trait]
impl LocationService for StaticLocationService {
    async fn request_permission(&self) -> Permission {
        if self.consent {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> anyhow::Result<Coordinate> {
        self.coordinate.ok_or_else(|| {
            anyhow::anyhow!(
                "No coordinates configured.\n\
                 Hint: run `skycast configure` and enter a latitude and longitude."
            )
        })
    }
}
