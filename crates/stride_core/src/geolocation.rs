use std::future::Future;

use thiserror::Error;

use crate::{app::AppEvent, lat_lng::LatLng};

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("Could not get your position: {0}")]
    Unavailable(String),
}

/// Single-shot lookup of the user's position.
pub trait Geolocator {
    fn current_position(&self) -> impl Future<Output = Result<LatLng, GeolocationError>>;
}

/// Answers with a configured position, or fails when there is none.
pub struct FixedGeolocator {
    position: Option<LatLng>,
}

impl FixedGeolocator {
    pub fn new(position: Option<LatLng>) -> Self {
        Self { position }
    }
}

impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        self.position
            .ok_or_else(|| GeolocationError::Unavailable(String::from("no position configured")))
    }
}

/// Runs the lookup and turns the answer into the startup event.
pub async fn locate<G: Geolocator>(geolocator: &G) -> AppEvent {
    match geolocator.current_position().await {
        Ok(position) => AppEvent::PositionAcquired(position),
        Err(err) => AppEvent::PositionUnavailable(err.to_string()),
    }
}
