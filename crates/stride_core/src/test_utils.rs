use std::{cell::RefCell, collections::BTreeMap};

use crate::{
    app::App,
    lat_lng::LatLng,
    list_view::{WorkoutEntry, WorkoutListView},
    map::map_surface::{MapSurface, MarkerId, TileLayer},
    route_requester::{RequestId, RouteRequest, RouteRequester},
    route_result::RouteResult,
    selection::SelectionChoice,
    storage::memory_store::MemoryStore,
    waypoint::Waypoint,
};

#[derive(Default)]
pub struct RecordingMap {
    pub markers: BTreeMap<MarkerId, LatLng>,
    next_marker: u64,
    pub popup: Option<(LatLng, Vec<SelectionChoice>)>,
    pub routes: Vec<Vec<LatLng>>,
    pub view: Option<(LatLng, f64)>,
    pub tile_layers: usize,
    pub alerts: Vec<String>,
}

impl RecordingMap {
    /// Positions of the markers currently on the map, oldest first.
    pub fn marker_positions(&self) -> Vec<LatLng> {
        self.markers.values().copied().collect()
    }
}

impl MapSurface for RecordingMap {
    fn add_marker(&mut self, at: LatLng) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(id, at);
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn open_popup(&mut self, at: LatLng, choices: &[SelectionChoice]) {
        self.popup = Some((at, choices.to_vec()));
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn draw_route(&mut self, polyline: &[LatLng]) {
        self.routes.push(polyline.to_vec());
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.view = Some((center, zoom));
    }

    fn add_tile_layer(&mut self, _layer: &TileLayer) {
        self.tile_layers += 1;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingList {
    pub entries: Vec<WorkoutEntry>,
}

impl WorkoutListView for RecordingList {
    fn insert(&mut self, index: usize, entry: WorkoutEntry) {
        self.entries.insert(index, entry);
    }
}

/// Keeps submitted requests; tests answer them with `AppEvent::RouteResolved`.
#[derive(Default)]
pub struct RecordingRequester {
    pub submitted: RefCell<Vec<RouteRequest>>,
}

impl RecordingRequester {
    pub fn last(&self) -> Option<RouteRequest> {
        self.submitted.borrow().last().cloned()
    }

    pub fn find(&self, id: RequestId) -> Option<RouteRequest> {
        self.submitted
            .borrow()
            .iter()
            .find(|request| request.id == id)
            .cloned()
    }
}

impl RouteRequester for RecordingRequester {
    fn submit(&self, request: RouteRequest) {
        self.submitted.borrow_mut().push(request);
    }
}

pub type TestApp = App<RecordingMap, RecordingList, MemoryStore, RecordingRequester>;

pub fn test_app(storage: MemoryStore) -> TestApp {
    App::new(
        RecordingMap::default(),
        RecordingList::default(),
        storage,
        RecordingRequester::default(),
    )
}

/// A route going straight through `waypoints`.
pub fn route_through(waypoints: &[Waypoint]) -> RouteResult {
    RouteResult {
        polyline: waypoints.iter().map(|waypoint| waypoint.lat_lng).collect(),
        total_distance: 1000.0 * waypoints.len() as f64,
        total_time: 12.0,
    }
}
