use stride_osrm::route::OsrmRoute;

use crate::lat_lng::LatLng;

/// A resolved route. Derived from a workout's waypoints every session, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub polyline: Vec<LatLng>,

    /// Meters
    pub total_distance: f64,

    /// Passed through as the routing service reports it
    pub total_time: f64,
}

impl From<OsrmRoute> for RouteResult {
    fn from(route: OsrmRoute) -> Self {
        RouteResult {
            polyline: route.line_string().into_inner().into_iter().map(LatLng::from).collect(),
            total_distance: route.distance,
            total_time: route.duration,
        }
    }
}
