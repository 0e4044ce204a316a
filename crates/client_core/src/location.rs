use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::GeoPosition;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::error::LocationError;

/// Single-shot position fix for one submission attempt.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn acquire(&self) -> Result<GeoPosition, LocationError>;
}

/// Callback-style platform position sensor.
///
/// Implementations answer each request through the [`PositionReply`] they are
/// handed. The reply is consumed on use, so a request resolves at most once;
/// dropping it unanswered counts as a failure.
pub trait PositionSensor: Send + Sync {
    fn request_position(&self, reply: PositionReply);
}

pub struct PositionReply {
    tx: oneshot::Sender<Result<GeoPosition, LocationError>>,
}

impl PositionReply {
    pub fn resolve(self, position: GeoPosition) {
        let _ = self.tx.send(Ok(position));
    }

    pub fn fail(self) {
        let _ = self.tx.send(Err(LocationError::Unavailable));
    }
}

/// Adapts a [`PositionSensor`] to [`LocationProvider`].
pub struct SensorLocationProvider {
    sensor: Option<Arc<dyn PositionSensor>>,
}

impl SensorLocationProvider {
    pub fn new(sensor: Arc<dyn PositionSensor>) -> Self {
        Self {
            sensor: Some(sensor),
        }
    }

    /// Provider for platforms without any position sensor.
    pub fn unsupported() -> Self {
        Self { sensor: None }
    }
}

#[async_trait]
impl LocationProvider for SensorLocationProvider {
    async fn acquire(&self) -> Result<GeoPosition, LocationError> {
        let Some(sensor) = &self.sensor else {
            warn!("location: no position sensor on this platform");
            return Err(LocationError::Unsupported);
        };

        let (tx, rx) = oneshot::channel();
        sensor.request_position(PositionReply { tx });
        match rx.await {
            Ok(Ok(position)) => {
                info!(lat = position.lat, lng = position.lng, "location: fix acquired");
                Ok(position)
            }
            Ok(Err(err)) => {
                warn!("location: sensor reported failure");
                Err(err)
            }
            Err(_) => {
                warn!("location: sensor dropped the request without answering");
                Err(LocationError::Unavailable)
            }
        }
    }
}

/// Sensor that always answers with a preset position, or fails when it has none.
pub struct StaticPositionSensor {
    position: Option<GeoPosition>,
}

impl StaticPositionSensor {
    pub fn new(position: Option<GeoPosition>) -> Self {
        Self { position }
    }
}

impl PositionSensor for StaticPositionSensor {
    fn request_position(&self, reply: PositionReply) {
        match self.position {
            Some(position) => reply.resolve(position),
            None => reply.fail(),
        }
    }
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
