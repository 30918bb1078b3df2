use std::collections::VecDeque;

use comfy_table::Table;
use stride_core::{
    lat_lng::LatLng,
    list_view::{WorkoutEntry, WorkoutListView},
    map::map_surface::{MapSurface, MarkerId, TileLayer},
    selection::SelectionChoice,
};
use tracing::{debug, info};

/// Map surface for a terminal: nothing is drawn, the calls are logged and the
/// current view is remembered.
#[derive(Default)]
pub struct TerminalMap {
    next_marker: u64,
    markers: usize,
    routes: usize,
    view: Option<(LatLng, f64)>,
}

impl TerminalMap {
    pub fn view(&self) -> Option<(LatLng, f64)> {
        self.view
    }

    pub fn routes(&self) -> usize {
        self.routes
    }

    pub fn markers(&self) -> usize {
        self.markers
    }
}

impl MapSurface for TerminalMap {
    fn add_marker(&mut self, at: LatLng) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers += 1;
        debug!("Marker {:?} at {}", id, at);
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers = self.markers.saturating_sub(1);
        debug!("Marker {:?} removed", marker);
    }

    fn open_popup(&mut self, at: LatLng, choices: &[SelectionChoice]) {
        let labels: Vec<&str> = choices.iter().map(SelectionChoice::label).collect();
        debug!("Popup at {}: {}", at, labels.join(" | "));
    }

    fn close_popup(&mut self) {}

    fn draw_route(&mut self, polyline: &[LatLng]) {
        self.routes += 1;
        info!("Drew route with {} points", polyline.len());
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.view = Some((center, zoom));
        info!("View centered on {} (zoom {})", center, zoom);
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        debug!("Tile layer {} (max zoom {})", layer.url_template, layer.max_zoom);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}

/// Newest entry first, as placed by the binder.
#[derive(Default)]
pub struct TerminalList {
    entries: VecDeque<WorkoutEntry>,
}

impl TerminalList {
    pub fn entries(&self) -> impl Iterator<Item = &WorkoutEntry> {
        self.entries.iter()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["Id", "Workout", "Distance (m)", "Time (min)"]);

        for entry in &self.entries {
            table.add_row(vec![
                entry.id.to_string(),
                entry.title.clone(),
                format!("{:.0}", entry.distance),
                format!("{:.0}", entry.time),
            ]);
        }

        table
    }
}

impl WorkoutListView for TerminalList {
    fn insert(&mut self, index: usize, entry: WorkoutEntry) {
        self.entries.insert(index, entry);
    }
}
