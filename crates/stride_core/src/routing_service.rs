use std::future::Future;

use stride_osrm::client::{OsrmError, OsrmRouteClient};
use thiserror::Error;

use crate::{route_result::RouteResult, waypoint::Waypoint};

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("A route needs a start and a destination, got {0} waypoint(s)")]
    InvalidWaypoints(usize),

    #[error("No route found between the selected locations")]
    NoRoute,

    #[error("{0}")]
    Service(String),
}

impl From<OsrmError> for RoutingError {
    fn from(error: OsrmError) -> Self {
        match error {
            OsrmError::TooFewPoints(count) => RoutingError::InvalidWaypoints(count),
            OsrmError::NoRoute => RoutingError::NoRoute,
            OsrmError::Service { message, .. } => RoutingError::Service(message),
            other => RoutingError::Service(other.to_string()),
        }
    }
}

/// Computes candidate routes through an ordered list of waypoints, best first.
pub trait RoutingService: Send + Sync + 'static {
    fn route(
        &self,
        waypoints: &[Waypoint],
    ) -> impl Future<Output = Result<Vec<RouteResult>, RoutingError>> + Send;
}

impl RoutingService for OsrmRouteClient {
    async fn route(&self, waypoints: &[Waypoint]) -> Result<Vec<RouteResult>, RoutingError> {
        let routes = self.fetch_routes(waypoints).await?;
        Ok(routes.into_iter().map(RouteResult::from).collect())
    }
}

/// Only a start followed by a destination can be routed.
pub fn waypoint_pair(waypoints: Vec<Waypoint>) -> Result<[Waypoint; 2], RoutingError> {
    let count = waypoints.len();
    <[Waypoint; 2]>::try_from(waypoints).map_err(|_| RoutingError::InvalidWaypoints(count))
}
