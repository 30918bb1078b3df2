use crate::{lat_lng::LatLng, selection::SelectionChoice};

/// Zoom used for the initial view and when recentering on a workout.
pub const DEFAULT_ZOOM: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: String::from("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            max_zoom: 19,
            attribution: String::from(
                "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
            ),
        }
    }
}

/// The interactive map and its user-facing chrome. Calls are synchronous and
/// happen on the event loop only.
pub trait MapSurface {
    fn add_marker(&mut self, at: LatLng) -> MarkerId;

    fn remove_marker(&mut self, marker: MarkerId);

    /// Offers `choices` at `at`; a pick comes back as [`crate::app::AppEvent::PopupChoice`].
    fn open_popup(&mut self, at: LatLng, choices: &[SelectionChoice]);

    fn close_popup(&mut self);

    fn draw_route(&mut self, polyline: &[LatLng]);

    fn set_view(&mut self, center: LatLng, zoom: f64);

    fn add_tile_layer(&mut self, layer: &TileLayer);

    fn alert(&mut self, message: &str);
}
