use std::sync::Arc;

use tracing::warn;

use crate::{
    app::AppEvent, event_loop::EventSender, routing_service::RoutingService, waypoint::Waypoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub id: RequestId,
    pub waypoints: [Waypoint; 2],
}

/// Starts a route computation without waiting for it. Every submitted request
/// is answered by exactly one [`AppEvent::RouteResolved`] with the same id.
pub trait RouteRequester {
    fn submit(&self, request: RouteRequest);
}

pub struct TokioRouteRequester<S> {
    service: Arc<S>,
    events: EventSender,
}

impl<S> TokioRouteRequester<S>
where
    S: RoutingService,
{
    pub fn new(service: Arc<S>, events: EventSender) -> Self {
        Self { service, events }
    }
}

impl<S> RouteRequester for TokioRouteRequester<S>
where
    S: RoutingService,
{
    fn submit(&self, request: RouteRequest) {
        let service = Arc::clone(&self.service);
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = service.route(&request.waypoints).await;
            let event = AppEvent::RouteResolved {
                request: request.id,
                outcome,
            };

            if events.send(event).is_err() {
                warn!("Route {:?} resolved after the event loop stopped", request.id);
            }
        });
    }
}
