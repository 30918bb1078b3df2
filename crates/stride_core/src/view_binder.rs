use tracing::debug;

use crate::{
    lat_lng::LatLng,
    list_view::{WorkoutEntry, WorkoutListView},
    map::map_surface::{DEFAULT_ZOOM, MapSurface},
    route_result::RouteResult,
    storage::key_value_store::KeyValueStore,
    workout::{Workout, WorkoutId},
    workout_store::WorkoutStore,
};

/// Connects the workout list to the map: rendering entries and recentering
/// on the workout whose entry was activated.
pub struct WorkoutViewBinder<V> {
    view: V,

    /// Store positions of the rendered entries, in list order (descending).
    rendered: Vec<usize>,
}

impl<V> WorkoutViewBinder<V>
where
    V: WorkoutListView,
{
    pub fn new(view: V) -> Self {
        Self {
            view,
            rendered: Vec::new(),
        }
    }

    /// `position` is the workout's index in the store. Entries keep newest
    /// first whatever order the routes were resolved in.
    pub fn render(&mut self, workout: &Workout, position: usize, route: &RouteResult) {
        let index = self.rendered.partition_point(|&rendered| rendered > position);
        self.rendered.insert(index, position);

        self.view.insert(index, WorkoutEntry {
            id: workout.id.clone(),
            title: format!("Workout {}", workout.id),
            distance: route.total_distance,
            time: route.total_time,
        });
    }

    /// `None` stands for a click outside of any entry. Unknown ids are ignored too.
    pub fn on_entry_activated<M, S>(
        &self,
        id: Option<&WorkoutId>,
        store: &WorkoutStore<S>,
        map: &mut M,
    ) -> Option<LatLng>
    where
        M: MapSurface,
        S: KeyValueStore,
    {
        let workout = store.find_by_id(id?)?;
        let center = workout.midpoint();

        debug!("Recentering on workout {} at {}", workout.id, center);
        map.set_view(center, DEFAULT_ZOOM);

        Some(center)
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
