use geo_types::LineString;
use serde::Deserialize;

/// Response body of the OSRM `route` service.
#[derive(Deserialize, Debug)]
pub struct OsrmRouteResponse {
    pub code: String,

    /// Only present when `code` is not `Ok`
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OsrmRoute {
    /// Distance in meters
    pub distance: f64,

    /// Travel time as reported by the server
    pub duration: f64,

    pub geometry: OsrmGeometry,
}

/// GeoJSON `LineString` geometry, requested with `geometries=geojson`.
#[derive(Deserialize, Debug, Clone)]
pub struct OsrmGeometry {
    /// `[longitude, latitude]` pairs
    pub coordinates: Vec<[f64; 2]>,
}

impl OsrmRoute {
    pub fn line_string(&self) -> LineString<f64> {
        LineString::from(self.geometry.coordinates.clone())
    }
}
