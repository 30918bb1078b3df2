use tracing::debug;

use crate::{lat_lng::LatLng, waypoint::Waypoint};

use super::map_surface::{MapSurface, MarkerId};

/// Owning handle of a marker on the map. Dropping it does not detach the
/// marker, only [`MarkerRegistry::remove`] does.
#[must_use]
#[derive(Debug, PartialEq)]
pub struct MarkerHandle {
    id: MarkerId,
    position: LatLng,
}

impl MarkerHandle {
    pub fn position(&self) -> LatLng {
        self.position
    }
}

/// Keeps at most one pending start and one pending destination marker while a
/// selection is in progress, plus the markers of every drawn route.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    pending_start: Option<MarkerHandle>,
    pending_destination: Option<MarkerHandle>,
    route_markers: Vec<MarkerHandle>,
}

impl MarkerRegistry {
    pub fn create<M: MapSurface>(&mut self, map: &mut M, at: LatLng) -> MarkerHandle {
        let id = map.add_marker(at);
        debug!("Added marker {:?} at {}", id, at);
        MarkerHandle { id, position: at }
    }

    pub fn remove<M: MapSurface>(&mut self, map: &mut M, handle: MarkerHandle) {
        debug!("Removed marker {:?}", handle.id);
        map.remove_marker(handle.id);
    }

    pub fn place_start<M: MapSurface>(&mut self, map: &mut M, at: LatLng) {
        if let Some(previous) = self.pending_start.take() {
            self.remove(map, previous);
        }
        self.pending_start = Some(self.create(map, at));
    }

    pub fn place_destination<M: MapSurface>(&mut self, map: &mut M, at: LatLng) {
        self.clear_pending_destination(map);
        self.pending_destination = Some(self.create(map, at));
    }

    pub fn clear_pending_destination<M: MapSurface>(&mut self, map: &mut M) {
        if let Some(previous) = self.pending_destination.take() {
            self.remove(map, previous);
        }
    }

    pub fn clear_pending<M: MapSurface>(&mut self, map: &mut M) {
        if let Some(start) = self.pending_start.take() {
            self.remove(map, start);
        }
        self.clear_pending_destination(map);
    }

    /// One marker per waypoint, kept for the rest of the session.
    pub fn place_route_markers<M: MapSurface>(&mut self, map: &mut M, waypoints: &[Waypoint]) {
        for waypoint in waypoints {
            let handle = self.create(map, waypoint.lat_lng);
            self.route_markers.push(handle);
        }
    }

    pub fn pending_start(&self) -> Option<&MarkerHandle> {
        self.pending_start.as_ref()
    }

    pub fn pending_destination(&self) -> Option<&MarkerHandle> {
        self.pending_destination.as_ref()
    }

    pub fn route_markers(&self) -> &[MarkerHandle] {
        &self.route_markers
    }
}
