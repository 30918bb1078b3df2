use std::fmt::Display;

use crate::workout::WorkoutId;

/// What the workout list shows for one workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    pub id: WorkoutId,
    pub title: String,

    /// Meters
    pub distance: f64,

    /// Shown in minutes
    pub time: f64,
}

impl Display for WorkoutEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  🏃 {:.0} m  ⏱ {:.0} min",
            self.title, self.distance, self.time
        )
    }
}

/// The list container, read newest first. `index` counts from the front.
pub trait WorkoutListView {
    fn insert(&mut self, index: usize, entry: WorkoutEntry);
}
