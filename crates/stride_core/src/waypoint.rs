use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lat_lng::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub lat_lng: LatLng,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat_lng: LatLng::new(lat, lng),
        }
    }
}

impl From<LatLng> for Waypoint {
    fn from(lat_lng: LatLng) -> Self {
        Self { lat_lng }
    }
}

impl From<&Waypoint> for geo_types::Point {
    fn from(value: &Waypoint) -> Self {
        (&value.lat_lng).into()
    }
}
