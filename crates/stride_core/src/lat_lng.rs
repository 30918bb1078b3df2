use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Arithmetic midpoint, good enough for recentering the view on short routes.
    pub fn midpoint(&self, other: &LatLng) -> LatLng {
        LatLng {
            lat: (self.lat + other.lat) * 0.5,
            lng: (self.lng + other.lng) * 0.5,
        }
    }
}

impl Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

impl From<&LatLng> for geo_types::Point {
    fn from(value: &LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<geo_types::Coord> for LatLng {
    fn from(value: geo_types::Coord) -> Self {
        LatLng {
            lat: value.y,
            lng: value.x,
        }
    }
}
