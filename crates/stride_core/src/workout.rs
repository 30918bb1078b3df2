use std::fmt::Display;

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{lat_lng::LatLng, waypoint::Waypoint};

/// Number of trailing digits of the creation time (Unix milliseconds) kept in an id.
pub const WORKOUT_ID_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WorkoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved route between a start and a destination. Never modified once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Workout {
    pub id: WorkoutId,

    /// `[start, destination]`
    pub waypoints: [Waypoint; 2],
}

impl Workout {
    pub fn new(id: WorkoutId, waypoints: [Waypoint; 2]) -> Self {
        Self { id, waypoints }
    }

    pub fn start(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn destination(&self) -> &Waypoint {
        &self.waypoints[1]
    }

    pub fn midpoint(&self) -> LatLng {
        self.start().lat_lng.midpoint(&self.destination().lat_lng)
    }
}

/// Hands out time-derived workout ids. Ids are strictly increasing within a
/// generator; a clock that did not move since the last id is bumped by 1ms.
#[derive(Debug, Default)]
pub struct WorkoutIdGenerator {
    last_millis: i64,
}

impl WorkoutIdGenerator {
    pub fn next_id<F>(&mut self, now: Timestamp, is_taken: F) -> WorkoutId
    where
        F: Fn(&WorkoutId) -> bool,
    {
        let mut millis = now.as_millisecond().max(self.last_millis + 1);

        loop {
            let id = id_from_millis(millis);
            if !is_taken(&id) {
                self.last_millis = millis;
                return id;
            }
            millis += 1;
        }
    }
}

fn id_from_millis(millis: i64) -> WorkoutId {
    let digits = millis.to_string();
    let start = digits.len().saturating_sub(WORKOUT_ID_DIGITS);
    WorkoutId(digits[start..].to_string())
}
