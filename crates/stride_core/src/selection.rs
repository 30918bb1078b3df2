use crate::{
    lat_lng::LatLng,
    route_requester::RequestId,
    routing_service::{RoutingError, waypoint_pair},
    waypoint::Waypoint,
};

/// The two actions offered in the popup of a map click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChoice {
    Start,
    Destination,
}

impl SelectionChoice {
    pub const ALL: [SelectionChoice; 2] = [SelectionChoice::Start, SelectionChoice::Destination];

    pub fn label(&self) -> &'static str {
        match self {
            SelectionChoice::Start => "Start from this location",
            SelectionChoice::Destination => "Go to this location",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Idle,
    AwaitingDestination {
        start: Waypoint,
    },
    Resolving {
        start: Waypoint,
        destination: Waypoint,
        request: RequestId,
    },
    /// The last attempt failed; markers stay so the user can adjust and retry.
    Unresolved {
        start: Option<Waypoint>,
        destination: Waypoint,
    },
}

/// Turns popup choices into a start/destination pair.
#[derive(Debug)]
pub struct WaypointSelector {
    state: Selection,
}

impl Default for WaypointSelector {
    fn default() -> Self {
        Self {
            state: Selection::Idle,
        }
    }
}

impl WaypointSelector {
    pub fn state(&self) -> &Selection {
        &self.state
    }

    /// Last write wins. Returns whether a pending destination was discarded.
    pub fn choose_start(&mut self, at: LatLng) -> bool {
        let discarded_destination = matches!(
            self.state,
            Selection::Resolving { .. } | Selection::Unresolved { .. }
        );

        self.state = Selection::AwaitingDestination { start: at.into() };
        discarded_destination
    }

    /// Completes the pending pair with `at`. Without a start the pair is
    /// rejected and the selection is left unresolved.
    pub fn choose_destination(
        &mut self,
        at: LatLng,
        request: RequestId,
    ) -> Result<[Waypoint; 2], RoutingError> {
        let destination = Waypoint::from(at);

        let mut waypoints = Vec::with_capacity(2);
        if let Some(start) = self.pending_start() {
            waypoints.push(start);
        }
        waypoints.push(destination);

        match waypoint_pair(waypoints) {
            Ok([start, destination]) => {
                self.state = Selection::Resolving {
                    start,
                    destination,
                    request,
                };
                Ok([start, destination])
            }
            Err(err) => {
                self.state = Selection::Unresolved {
                    start: None,
                    destination,
                };
                Err(err)
            }
        }
    }

    /// Returns `true` when `request` belongs to the current selection, which
    /// is then done.
    pub fn complete(&mut self, request: RequestId) -> bool {
        if self.is_resolving(request) {
            self.state = Selection::Idle;
            true
        } else {
            false
        }
    }

    /// Returns `true` when `request` belongs to the current selection, which
    /// is kept for a retry.
    pub fn fail(&mut self, request: RequestId) -> bool {
        match self.state {
            Selection::Resolving {
                start,
                destination,
                request: current,
            } if current == request => {
                self.state = Selection::Unresolved {
                    start: Some(start),
                    destination,
                };
                true
            }
            _ => false,
        }
    }

    pub fn is_resolving(&self, request: RequestId) -> bool {
        matches!(self.state, Selection::Resolving { request: current, .. } if current == request)
    }

    fn pending_start(&self) -> Option<Waypoint> {
        match self.state {
            Selection::Idle => None,
            Selection::AwaitingDestination { start } | Selection::Resolving { start, .. } => {
                Some(start)
            }
            Selection::Unresolved { start, .. } => start,
        }
    }
}
